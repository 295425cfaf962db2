//! `int`, `bool` and `float`.
//!
//! Integer handlers only accept integer operands (bools included) and
//! decline anything else, so `1 + 2.5` resolves through `float`'s reflected
//! slot. Overflow and division by zero surface as `Raised`.

use dunder_core::{BinaryOp, CompareOp, DispatchResult, Failure, SlotKind, UnaryOp};

use crate::dispatch::{CallCx, Outcome};
use crate::object::{TypeBuilder, TypeRef, Value};
use crate::Runtime;

fn overflow() -> Failure {
    Failure::raised("OverflowError: integer overflow")
}

fn zero_division(what: &str) -> Failure {
    Failure::raised(format!("ZeroDivisionError: {}", what))
}

fn receiver_int(cx: &CallCx<'_>) -> DispatchResult<i64> {
    cx.receiver.as_int().ok_or_else(|| {
        Failure::invalid_arguments(format!(
            "descriptor requires an 'int' receiver, got '{}'",
            cx.rt.type_of(cx.receiver).name()
        ))
    })
}

fn receiver_float(cx: &CallCx<'_>) -> DispatchResult<f64> {
    cx.receiver.as_float().ok_or_else(|| {
        Failure::invalid_arguments(format!(
            "descriptor requires a 'float' receiver, got '{}'",
            cx.rt.type_of(cx.receiver).name()
        ))
    })
}

/// Python's floor division and modulo on integers.
fn int_binary(op: BinaryOp, a: i64, b: i64) -> DispatchResult<Option<Value>> {
    let value = match op {
        BinaryOp::Add => a.checked_add(b).ok_or_else(overflow)?.into(),
        BinaryOp::Sub => a.checked_sub(b).ok_or_else(overflow)?.into(),
        BinaryOp::Mul => a.checked_mul(b).ok_or_else(overflow)?.into(),

        BinaryOp::TrueDiv if b == 0 => return zero_division("division by zero").into(),
        BinaryOp::TrueDiv => Value::Float(a as f64 / b as f64),

        BinaryOp::FloorDiv | BinaryOp::Mod if b == 0 => {
            return zero_division("integer division or modulo by zero").into()
        }

        BinaryOp::FloorDiv => {
            let q = a.checked_div(b).ok_or_else(overflow)?;

            if a % b != 0 && ((a < 0) != (b < 0)) {
                Value::Int(q - 1)
            } else {
                Value::Int(q)
            }
        }

        BinaryOp::Mod => {
            let r = a.checked_rem(b).ok_or_else(overflow)?;

            if r != 0 && ((r < 0) != (b < 0)) {
                Value::Int(r + b)
            } else {
                Value::Int(r)
            }
        }

        BinaryOp::Pow if a == 0 && b < 0 => {
            return zero_division("0.0 cannot be raised to a negative power").into()
        }
        BinaryOp::Pow if b < 0 => Value::Float((a as f64).powf(b as f64)),
        BinaryOp::Pow => {
            let exp = u32::try_from(b).map_err(|_| overflow())?;
            a.checked_pow(exp).ok_or_else(overflow)?.into()
        }

        BinaryOp::LShift | BinaryOp::RShift if b < 0 => {
            return Failure::raised("ValueError: negative shift count").into()
        }

        BinaryOp::LShift if a == 0 => Value::Int(0),
        BinaryOp::LShift => {
            let shifted = (b < 63).then(|| a << b).filter(|s| s >> b == a);
            shifted.ok_or_else(overflow)?.into()
        }

        BinaryOp::RShift => Value::Int(a >> b.min(63)),

        BinaryOp::And => Value::Int(a & b),
        BinaryOp::Or => Value::Int(a | b),
        BinaryOp::Xor => Value::Int(a ^ b),

        BinaryOp::MatMul => return Ok(None),
    };

    Ok(Some(value))
}

fn float_binary(op: BinaryOp, a: f64, b: f64) -> DispatchResult<Option<Value>> {
    let value = match op {
        BinaryOp::Add => a + b,
        BinaryOp::Sub => a - b,
        BinaryOp::Mul => a * b,

        BinaryOp::TrueDiv | BinaryOp::FloorDiv | BinaryOp::Mod if b == 0.0 => {
            return zero_division("float division by zero").into()
        }

        BinaryOp::TrueDiv => a / b,
        BinaryOp::FloorDiv => (a / b).floor(),
        BinaryOp::Mod => {
            let r = a % b;

            if r != 0.0 && ((r < 0.0) != (b < 0.0)) {
                r + b
            } else {
                r
            }
        }

        BinaryOp::Pow if a == 0.0 && b < 0.0 => {
            return zero_division("0.0 cannot be raised to a negative power").into()
        }
        BinaryOp::Pow => a.powf(b),

        _ => return Ok(None),
    };

    Ok(Some(Value::Float(value)))
}

/// Numbers that compare equal hash equal, `hash(1) == hash(1.0) == hash(True)`.
pub(super) fn numeric_hash(rt: &Runtime, value: f64) -> i64 {
    if value.fract() == 0.0 && value.abs() < i64::MAX as f64 {
        rt.hash(value as i64) as i64
    } else {
        rt.hash(value.to_bits()) as i64
    }
}

fn compare_floats(op: CompareOp, a: f64, b: f64) -> bool {
    match a.partial_cmp(&b) {
        Some(ordering) => op.test(ordering),
        None => op == CompareOp::Ne,
    }
}

fn float_repr(f: f64) -> String {
    if f.is_nan() {
        "nan".to_owned()
    } else if f.is_infinite() {
        if f > 0.0 { "inf" } else { "-inf" }.to_owned()
    } else if f.fract() == 0.0 && f.abs() < 1e16 {
        format!("{:.1}", f)
    } else {
        format!("{}", f)
    }
}

pub(super) fn int_type() -> TypeRef {
    let mut builder = TypeBuilder::new("int");

    for op in BinaryOp::ALL {
        builder = builder
            .slot(SlotKind::Binary(op), move |cx| {
                let [other] = cx.expect_args::<1>()?;

                match other.as_int() {
                    Some(b) => Ok(int_binary(op, receiver_int(&cx)?, b)?.into()),
                    None => Ok(Outcome::NotApplicable),
                }
            })
            .slot(SlotKind::Reflected(op), move |cx| {
                let [other] = cx.expect_args::<1>()?;

                match other.as_int() {
                    Some(a) => Ok(int_binary(op, a, receiver_int(&cx)?)?.into()),
                    None => Ok(Outcome::NotApplicable),
                }
            });
    }

    for op in CompareOp::ALL {
        builder = builder.slot(SlotKind::Compare(op), move |cx| {
            let a = receiver_int(&cx)?;

            let result = match cx.expect_args::<1>()? {
                [Value::Float(b)] => compare_floats(op, a as f64, *b),
                [other] => match other.as_int() {
                    Some(b) => op.test(a.cmp(&b)),
                    None => return Ok(Outcome::NotApplicable),
                },
            };

            Ok(Value::Bool(result).into())
        });
    }

    builder
        .method(SlotKind::Unary(UnaryOp::Neg), |cx| {
            Ok(receiver_int(&cx)?.checked_neg().ok_or_else(overflow)?.into())
        })
        .method(SlotKind::Unary(UnaryOp::Pos), |cx| Ok(Value::Int(receiver_int(&cx)?)))
        .method(SlotKind::Unary(UnaryOp::Abs), |cx| {
            Ok(receiver_int(&cx)?.checked_abs().ok_or_else(overflow)?.into())
        })
        .method(SlotKind::Unary(UnaryOp::Invert), |cx| Ok(Value::Int(!receiver_int(&cx)?)))
        .method(SlotKind::Bool, |cx| Ok(Value::Bool(receiver_int(&cx)? != 0)))
        .method(SlotKind::Hash, |cx| {
            Ok(Value::Int(numeric_hash(cx.rt, receiver_int(&cx)? as f64)))
        })
        .method(SlotKind::Repr, |cx| Ok(Value::str(receiver_int(&cx)?.to_string())))
        .build()
}

/// `bool` is an `int` whose bitwise operators stay boolean.
pub(super) fn bool_type(int_type: &TypeRef) -> TypeRef {
    let mut builder = TypeBuilder::new("bool").parent(int_type);

    for op in [BinaryOp::And, BinaryOp::Or, BinaryOp::Xor] {
        let forward = int_type.slot(SlotKind::Binary(op)).cloned();

        let bitwise = move |cx: CallCx<'_>| -> DispatchResult<Outcome> {
            match (cx.receiver, cx.expect_args::<1>()?) {
                (Value::Bool(a), [Value::Bool(b)]) => Ok(Value::Bool(match op {
                    BinaryOp::And => a & b,
                    BinaryOp::Or => a | b,
                    _ => a ^ b,
                })
                .into()),

                _ => match &forward {
                    Some(int_op) => int_op(cx),
                    None => Ok(Outcome::NotApplicable),
                },
            }
        };

        builder = builder.slot(SlotKind::Binary(op), bitwise.clone());
        builder = builder.slot(SlotKind::Reflected(op), bitwise);
    }

    builder
        .method(SlotKind::Repr, |cx| {
            Ok(Value::str(match cx.receiver {
                Value::Bool(true) => "True",
                _ => "False",
            }))
        })
        .build()
}

pub(super) fn float_type() -> TypeRef {
    let mut builder = TypeBuilder::new("float");

    for op in BinaryOp::ALL {
        builder = builder
            .slot(SlotKind::Binary(op), move |cx| {
                let [other] = cx.expect_args::<1>()?;

                match other.as_float() {
                    Some(b) => Ok(float_binary(op, receiver_float(&cx)?, b)?.into()),
                    None => Ok(Outcome::NotApplicable),
                }
            })
            .slot(SlotKind::Reflected(op), move |cx| {
                let [other] = cx.expect_args::<1>()?;

                match other.as_float() {
                    Some(a) => Ok(float_binary(op, a, receiver_float(&cx)?)?.into()),
                    None => Ok(Outcome::NotApplicable),
                }
            });
    }

    for op in CompareOp::ALL {
        builder = builder.slot(SlotKind::Compare(op), move |cx| {
            let [other] = cx.expect_args::<1>()?;

            match other.as_float() {
                Some(b) => Ok(Value::Bool(compare_floats(op, receiver_float(&cx)?, b)).into()),
                None => Ok(Outcome::NotApplicable),
            }
        });
    }

    builder
        .method(SlotKind::Unary(UnaryOp::Neg), |cx| Ok(Value::Float(-receiver_float(&cx)?)))
        .method(SlotKind::Unary(UnaryOp::Pos), |cx| Ok(Value::Float(receiver_float(&cx)?)))
        .method(SlotKind::Unary(UnaryOp::Abs), |cx| Ok(Value::Float(receiver_float(&cx)?.abs())))
        .method(SlotKind::Bool, |cx| Ok(Value::Bool(receiver_float(&cx)? != 0.0)))
        .method(SlotKind::Hash, |cx| {
            Ok(Value::Int(numeric_hash(cx.rt, receiver_float(&cx)?)))
        })
        .method(SlotKind::Repr, |cx| Ok(Value::str(float_repr(receiver_float(&cx)?))))
        .build()
}

#[cfg(test)]
mod tests {
    use dunder_core::{BinaryOp, CompareOp, ErrorKind};

    use crate::object::Value;
    use crate::test::setup;

    #[test]
    fn python_division_semantics() {
        let rt = setup();
        let int = |op, a, b| rt.binary_op(op, &Value::Int(a), &Value::Int(b)).unwrap();

        assert_eq!(int(BinaryOp::FloorDiv, -7, 2).as_int(), Some(-4));
        assert_eq!(int(BinaryOp::Mod, -7, 2).as_int(), Some(1));
        assert_eq!(int(BinaryOp::Mod, 7, -2).as_int(), Some(-1));
        assert_eq!(int(BinaryOp::TrueDiv, 7, 2).as_float(), Some(3.5));
        assert_eq!(int(BinaryOp::Pow, 2, 10).as_int(), Some(1024));
        assert_eq!(int(BinaryOp::Pow, 2, -1).as_float(), Some(0.5));

        let err = rt
            .binary_op(BinaryOp::FloorDiv, &Value::Int(1), &Value::Int(0))
            .unwrap_err();

        assert_eq!(err.kind, ErrorKind::Raised);
        assert_eq!(
            rt.binary_op(BinaryOp::Add, &Value::Int(i64::MAX), &Value::Int(1))
                .unwrap_err()
                .kind,
            ErrorKind::Raised
        );
    }

    #[test]
    fn zero_to_a_negative_power_is_zero_division() {
        let rt = setup();

        for (base, exp) in [
            (Value::Int(0), Value::Int(-1)),
            (Value::Float(0.0), Value::Int(-2)),
            (Value::Int(0), Value::Float(-0.5)),
        ] {
            let err = rt.binary_op(BinaryOp::Pow, &base, &exp).unwrap_err();

            assert_eq!(err.kind, ErrorKind::Raised);
            assert!(err.to_string().contains("ZeroDivisionError"));
        }

        let zero = rt.binary_op(BinaryOp::Pow, &Value::Int(0), &Value::Int(0)).unwrap();
        assert_eq!(zero.as_int(), Some(1));
    }

    #[test]
    fn mixed_arithmetic_goes_through_float() {
        let rt = setup();

        let sum = rt.binary_op(BinaryOp::Add, &Value::Int(1), &Value::Float(2.5)).unwrap();
        assert!(matches!(sum, Value::Float(f) if f == 3.5));

        let sum = rt.binary_op(BinaryOp::Add, &Value::Bool(true), &Value::Int(1)).unwrap();
        assert!(matches!(sum, Value::Int(2)));

        let and = rt.binary_op(BinaryOp::And, &Value::Bool(true), &Value::Bool(false)).unwrap();
        assert!(matches!(and, Value::Bool(false)));

        let and = rt.binary_op(BinaryOp::And, &Value::Int(3), &Value::Bool(true)).unwrap();
        assert!(matches!(and, Value::Int(1)));
    }

    #[test]
    fn numeric_tower_equality_and_hash() {
        let rt = setup();
        let (one, one_f, yes) = (Value::Int(1), Value::Float(1.0), Value::Bool(true));

        assert!(rt.compare_bool(CompareOp::Eq, &one, &one_f).unwrap());
        assert!(rt.compare_bool(CompareOp::Eq, &one_f, &yes).unwrap());
        assert!(rt.compare_bool(CompareOp::Lt, &one, &Value::Float(1.5)).unwrap());

        let h = rt.hash_of(&one).unwrap();

        assert_eq!(h, rt.hash_of(&one_f).unwrap());
        assert_eq!(h, rt.hash_of(&yes).unwrap());
    }

    #[test]
    fn nan_is_unordered() {
        let rt = setup();
        let nan = Value::Float(f64::NAN);

        assert!(!rt.compare_bool(CompareOp::Eq, &nan, &Value::Float(f64::NAN)).unwrap());
        assert!(rt.compare_bool(CompareOp::Ne, &nan, &Value::Int(0)).unwrap());
        assert!(!rt.compare_bool(CompareOp::Lt, &nan, &Value::Int(0)).unwrap());
    }

    #[test]
    fn reprs() {
        let rt = setup();

        assert_eq!(rt.repr(&Value::Int(-3)).unwrap(), "-3");
        assert_eq!(rt.repr(&Value::Float(2.0)).unwrap(), "2.0");
        assert_eq!(rt.repr(&Value::Float(0.25)).unwrap(), "0.25");
        assert_eq!(rt.repr(&Value::Bool(false)).unwrap(), "False");
    }

    #[test]
    fn int_declines_unknown_operands() {
        let rt = setup();

        let err = rt
            .binary_op(BinaryOp::Sub, &Value::Int(1), &Value::str("a"))
            .unwrap_err();

        assert_eq!(err.kind, ErrorKind::UnsupportedOperand);
        assert_eq!(
            rt.compare(CompareOp::Lt, &Value::Int(1), &Value::None).unwrap_err().kind,
            ErrorKind::UnorderableTypes
        );
    }
}
