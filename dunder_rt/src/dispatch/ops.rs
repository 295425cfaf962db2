//! Binary, in-place, comparison and unary operator resolution.
//!
//! For `left <op> right` the candidates are `left`'s forward slot and
//! `right`'s reflected slot. The forward slot goes first unless `right`'s type
//! is a strict descendant of `left`'s type that overrides the reflected slot,
//! an inherited reflected handler does not count as an override. Whichever
//! goes first, an absent or declining handler passes the turn to the other
//! side, both declining is `UnsupportedOperand`.
//!
//! Comparisons reflect onto the swapped operator (`a < b` tries `b > a`) and
//! never derive one operator from another. When both sides decline, `==`
//! falls back to identity, `!=` to the negation of `==`, and ordering fails
//! with `UnorderableTypes`.

use std::slice;

use dunder_core::{
    BinaryOp, CompareOp, DispatchResult, Failure, FailureExt, SlotKind, UnaryOp,
};

use crate::object::Value;
use crate::Runtime;

use super::{Handler, Outcome};

impl Runtime {
    /// Try `forward` on `left` and `reflected` on `right` in priority order.
    ///
    /// `Ok(None)` when both sides are absent or declined.
    fn resolve_pair(
        &self,
        forward: SlotKind,
        reflected: SlotKind,
        left: &Value,
        right: &Value,
    ) -> DispatchResult<Option<Value>> {
        let left_ty = self.type_of(left);
        let right_ty = self.type_of(right);

        let forward_handler = left_ty.slot(forward);
        let reflected_handler = right_ty.slot(reflected);

        let right_first = reflected_handler.is_some()
            && right_ty.is_strict_subtype_of(left_ty)
            && right_ty.overrides(left_ty, reflected);

        tracing::trace!(
            "[Runtime::resolve_pair] {} {} {} ({} first)",
            left_ty.name(),
            forward,
            right_ty.name(),
            if right_first { "reflected" } else { "forward" }
        );

        let attempts: [(Option<&Handler>, &Value, &Value); 2] = if right_first {
            [
                (reflected_handler, right, left),
                (forward_handler, left, right),
            ]
        } else {
            [
                (forward_handler, left, right),
                (reflected_handler, right, left),
            ]
        };

        for (handler, receiver, other) in attempts {
            let handler = match handler {
                Some(handler) => handler,
                None => continue,
            };

            match self.invoke(handler, receiver, slice::from_ref(other)).trace()? {
                Outcome::Value(value) => return Ok(Some(value)),
                Outcome::NotApplicable => {
                    tracing::trace!(
                        "[Runtime::resolve_pair] {} declined",
                        self.type_of(receiver).name()
                    );
                }
            }
        }

        Ok(None)
    }

    /// `left <op> right`
    pub fn binary_op(&self, op: BinaryOp, left: &Value, right: &Value) -> DispatchResult<Value> {
        let resolved = self
            .resolve_pair(SlotKind::Binary(op), SlotKind::Reflected(op), left, right)
            .trace()?;

        match resolved {
            Some(value) => Ok(value),
            None => Failure::unsupported_operand(
                op,
                self.type_of(left).name(),
                self.type_of(right).name(),
            )
            .into(),
        }
    }

    /// `left <op>= right`, returns the value the target should be rebound to.
    ///
    /// Mutation only happens if `left`'s in-place handler performs it.
    pub fn inplace_op(&self, op: BinaryOp, left: &Value, right: &Value) -> DispatchResult<Value> {
        if let Some(handler) = self.type_of(left).slot(SlotKind::InPlace(op)) {
            if let Outcome::Value(value) = self
                .invoke(handler, left, slice::from_ref(right))
                .trace()?
            {
                return Ok(value);
            }
        }

        self.binary_op(op, left, right).trace()
    }

    /// Rich comparison, the result is whatever the handler produced (not necessarily a bool).
    pub fn compare(&self, op: CompareOp, left: &Value, right: &Value) -> DispatchResult<Value> {
        let resolved = self
            .resolve_pair(
                SlotKind::Compare(op),
                SlotKind::Compare(op.swapped()),
                left,
                right,
            )
            .trace()?;

        if let Some(value) = resolved {
            return Ok(value);
        }

        match op {
            CompareOp::Eq => Ok(Value::Bool(left.is(right))),
            CompareOp::Ne => {
                let eq = self.compare(CompareOp::Eq, left, right).trace()?;
                Ok(Value::Bool(!self.truth(&eq).trace()?))
            }

            CompareOp::Lt | CompareOp::Le | CompareOp::Gt | CompareOp::Ge => Failure::unorderable(
                op,
                self.type_of(left).name(),
                self.type_of(right).name(),
            )
            .into(),
        }
    }

    /// `compare` followed by truthiness of the result.
    pub fn compare_bool(&self, op: CompareOp, left: &Value, right: &Value) -> DispatchResult<bool> {
        let value = self.compare(op, left, right).trace()?;

        match value {
            Value::Bool(b) => Ok(b),
            other => self.truth(&other).trace(),
        }
    }

    /// `left is right or left == right`, the test containers use for membership.
    pub fn identical_or_equal(&self, left: &Value, right: &Value) -> DispatchResult<bool> {
        if left.is(right) {
            return Ok(true);
        }

        self.compare_bool(CompareOp::Eq, left, right)
    }

    pub fn unary_op(&self, op: UnaryOp, operand: &Value) -> DispatchResult<Value> {
        let ty = self.type_of(operand);

        if let Some(handler) = ty.slot(SlotKind::Unary(op)) {
            if let Outcome::Value(value) = self.invoke(handler, operand, &[]).trace()? {
                return Ok(value);
            }
        }

        Failure::new(dunder_core::ErrorKind::UnsupportedOperand)
            .with_detail(format!("bad operand type for {}: '{}'", op, ty.name()))
            .into()
    }
}
