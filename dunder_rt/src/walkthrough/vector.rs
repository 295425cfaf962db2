use std::sync::Arc;

use dunder_core::{BinaryOp, DispatchResult, SlotKind, UnaryOp};

use crate::dispatch::{CallCx, Outcome};
use crate::object::{TypeBuilder, TypeRef, Value};
use crate::Runtime;

/// A new vector of the receiver's own type, so subclasses keep their type.
fn rebuild(cx: &CallCx<'_>, coords: [Value; 2]) -> DispatchResult<Outcome> {
    let class = Value::Type(Arc::clone(cx.rt.type_of(cx.receiver)));
    Ok(cx.rt.call(&class, &coords)?.into())
}

/// A two dimensional `Vector(x=0, y=0)` with `+`, `* scalar`, `abs`,
/// truthiness and `Repr`.
pub fn vector_type() -> TypeRef {
    TypeBuilder::new("Vector")
        .function("__init__", |rt, args| {
            let (this, rest) = match args.split_first() {
                Some(split) => split,
                None => return Ok(Value::None),
            };

            let x = rest.first().cloned().unwrap_or(Value::Int(0));
            let y = rest.get(1).cloned().unwrap_or(Value::Int(0));

            rt.set_attr(this, "x", x)?;
            rt.set_attr(this, "y", y)?;

            Ok(Value::None)
        })
        .method(SlotKind::Repr, |cx| {
            let x = cx.rt.get_attr(cx.receiver, "x")?;
            let y = cx.rt.get_attr(cx.receiver, "y")?;

            Ok(Value::str(format!(
                "Vector({}, {})",
                cx.rt.repr(&x)?,
                cx.rt.repr(&y)?
            )))
        })
        .method(SlotKind::Unary(UnaryOp::Abs), |cx| {
            let x = cx.rt.get_attr(cx.receiver, "x")?.as_float().unwrap_or_default();
            let y = cx.rt.get_attr(cx.receiver, "y")?.as_float().unwrap_or_default();

            Ok(Value::Float(x.hypot(y)))
        })
        .method(SlotKind::Bool, |cx| {
            let magnitude = cx.rt.unary_op(UnaryOp::Abs, cx.receiver)?;
            Ok(Value::Bool(cx.rt.truth(&magnitude)?))
        })
        .slot(SlotKind::Binary(BinaryOp::Add), |cx| {
            let other = cx.arg(0)?;

            if !cx.rt.has_attr(other, "x")? || !cx.rt.has_attr(other, "y")? {
                return Ok(Outcome::NotApplicable);
            }

            let mut coords = [Value::None, Value::None];

            for (coord, axis) in coords.iter_mut().zip(["x", "y"]) {
                let a = cx.rt.get_attr(cx.receiver, axis)?;
                let b = cx.rt.get_attr(other, axis)?;

                *coord = cx.rt.binary_op(BinaryOp::Add, &a, &b)?;
            }

            rebuild(&cx, coords)
        })
        // no reflected `Mul`, `scalar * vector` is left unsupported.
        .slot(SlotKind::Binary(BinaryOp::Mul), |cx| {
            let scalar = cx.arg(0)?;

            if scalar.as_float().is_none() {
                return Ok(Outcome::NotApplicable);
            }

            let mut coords = [Value::None, Value::None];

            for (coord, axis) in coords.iter_mut().zip(["x", "y"]) {
                let a = cx.rt.get_attr(cx.receiver, axis)?;
                *coord = cx.rt.binary_op(BinaryOp::Mul, &a, scalar)?;
            }

            rebuild(&cx, coords)
        })
        .build()
}

/// `Vector(x, y)` through the class's `Call` slot.
pub fn vector(rt: &Runtime, class: &TypeRef, x: Value, y: Value) -> DispatchResult<Value> {
    rt.call(&Value::Type(Arc::clone(class)), &[x, y])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::setup;

    #[test]
    fn defaults_to_the_origin() {
        let rt = setup();
        let class = vector_type();

        let origin = rt.call(&Value::Type(Arc::clone(&class)), &[]).unwrap();

        assert_eq!(rt.repr(&origin).unwrap(), "Vector(0, 0)");
        assert!(!rt.truth(&origin).unwrap());
    }

    #[test]
    fn sums_keep_the_subclass() {
        let rt = setup();
        let base = vector_type();
        let child = TypeBuilder::new("Arrow").parent(&base).build();

        let a = vector(&rt, &child, Value::Int(1), Value::Float(0.5)).unwrap();
        let b = vector(&rt, &base, Value::Int(2), Value::Int(2)).unwrap();

        let sum = rt.binary_op(BinaryOp::Add, &a, &b).unwrap();

        assert_eq!(rt.type_of(&sum).name(), "Arrow");
        assert_eq!(rt.repr(&sum).unwrap(), "Vector(3, 2.5)");
    }
}
