use dunder_core::{CompareOp, DispatchResult, Failure, FailureExt, SlotKind};

use crate::object::Value;
use crate::Runtime;

impl Runtime {
    /// Truthiness: the `Bool` slot, else a nonzero `Length`, else true.
    pub fn truth(&self, value: &Value) -> DispatchResult<bool> {
        if let Value::Bool(b) = value {
            return Ok(*b);
        }

        let ty = self.type_of(value);

        if let Some(result) = self.invoke_slot(SlotKind::Bool, value, &[]).trace()? {
            // a non-bool answer counts by its own truthiness.
            return match result {
                Value::Bool(b) => Ok(b),
                other => self.truth(&other).trace(),
            };
        }

        if ty.has_slot(SlotKind::Length) {
            return Ok(self.length(value).trace()? != 0);
        }

        Ok(true)
    }

    /// `hash(value)`
    ///
    /// Types without a `Hash` slot hash by identity, unless they declare
    /// equality in which case they are unhashable.
    pub fn hash_of(&self, value: &Value) -> DispatchResult<u64> {
        let ty = self.type_of(value);

        if let Some(result) = self.invoke_slot(SlotKind::Hash, value, &[]).trace()? {
            return match result.as_int() {
                Some(n) => Ok(n as u64),
                None => Failure::invalid_arguments(format!(
                    "__hash__ method should return an integer, returned {}",
                    self.type_of(&result).name()
                ))
                .into(),
            };
        }

        if ty.has_slot(SlotKind::Compare(CompareOp::Eq)) {
            return Failure::unhashable(ty.name()).into();
        }

        Ok(self.hash(value.addr()))
    }
}

#[cfg(test)]
mod tests {
    use dunder_core::{CompareOp, ErrorKind, SlotKind};

    use crate::object::{TypeBuilder, Value};
    use crate::test::setup;

    #[test]
    fn truth_precedence() {
        let rt = setup();

        let falsy = TypeBuilder::new("Falsy")
            .method(SlotKind::Bool, |_| Ok(Value::Bool(false)))
            .method(SlotKind::Length, |_| Ok(Value::Int(10)))
            .build();

        let empty = TypeBuilder::new("Empty")
            .method(SlotKind::Length, |_| Ok(Value::Int(0)))
            .build();

        let plain = TypeBuilder::new("Plain").build();

        assert!(!rt.truth(&rt.new_object(&falsy, None::<(&str, Value)>)).unwrap());
        assert!(!rt.truth(&rt.new_object(&empty, None::<(&str, Value)>)).unwrap());
        assert!(rt.truth(&rt.new_object(&plain, None::<(&str, Value)>)).unwrap());
    }

    #[test]
    fn bool_slot_result_is_coerced() {
        let rt = setup();

        for (answer, expected) in [(1, true), (0, false), (-3, true)] {
            let counted = TypeBuilder::new("Counted")
                .method(SlotKind::Bool, move |_| Ok(Value::Int(answer)))
                .build();

            let obj = rt.new_object(&counted, None::<(&str, Value)>);

            assert_eq!(rt.truth(&obj).unwrap(), expected);
        }

        let nested = TypeBuilder::new("Nested")
            .method(SlotKind::Bool, |_| Ok(Value::list([])))
            .build();

        assert!(!rt.truth(&rt.new_object(&nested, None::<(&str, Value)>)).unwrap());
    }

    #[test]
    fn eq_without_hash_is_unhashable() {
        let rt = setup();
        let eq_only = TypeBuilder::new("EqOnly")
            .method(SlotKind::Compare(CompareOp::Eq), |_| Ok(Value::Bool(true)))
            .build();

        let obj = rt.new_object(&eq_only, None::<(&str, Value)>);

        assert_eq!(rt.hash_of(&obj).unwrap_err().kind, ErrorKind::Unhashable);
    }

    #[test]
    fn identity_hash_is_stable_per_instance() {
        let rt = setup();
        let plain = TypeBuilder::new("Plain").build();

        let a = rt.new_object(&plain, None::<(&str, Value)>);
        let b = rt.new_object(&plain, None::<(&str, Value)>);

        assert_eq!(rt.hash_of(&a).unwrap(), rt.hash_of(&a.clone()).unwrap());
        assert_ne!(rt.hash_of(&a).unwrap(), rt.hash_of(&b).unwrap());
    }
}
