use dunder_core::{DispatchResult, Failure, FailureExt, SlotKind};

use crate::object::Value;
use crate::Runtime;

impl Runtime {
    /// `callee(*args)`
    pub fn call(&self, callee: &Value, args: &[Value]) -> DispatchResult<Value> {
        match self.invoke_slot(SlotKind::Call, callee, args).trace()? {
            Some(value) => Ok(value),
            None => Failure::unsupported(format!(
                "'{}' object is not callable",
                self.type_of(callee).name()
            ))
            .into(),
        }
    }

    /// `receiver.name(*args)`
    pub fn call_method(&self, receiver: &Value, name: &str, args: &[Value]) -> DispatchResult<Value> {
        let method = self.get_attr(receiver, name).trace()?;

        self.call(&method, args).trace()
    }

    /// The developer facing representation of `value`.
    pub fn repr(&self, value: &Value) -> DispatchResult<String> {
        let ty = self.type_of(value);

        match self.invoke_slot(SlotKind::Repr, value, &[]).trace()? {
            Some(Value::Str(st)) => Ok(st.to_string()),
            Some(other) => Failure::invalid_arguments(format!(
                "__repr__ returned non-string (type {})",
                self.type_of(&other).name()
            ))
            .into(),
            None => Ok(format!("<{} object>", ty.name())),
        }
    }
}
