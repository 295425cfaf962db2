//! Scoped resources: `Enter` before a protected block, `Exit` exactly once after it.

use std::sync::Arc;

use dunder_core::{DispatchResult, Failure, FailureExt, SlotKind};

use crate::object::Value;
use crate::Runtime;

/// An entered scope, `Exit` runs when it is finished or dropped.
///
/// Dropping an unfinished guard (an early return or a panic unwinding
/// through the block) still invokes `Exit`, passing a `Raised` failure when
/// unwinding and `None` otherwise. Failures from that `Exit` are logged.
#[must_use = "dropping the guard exits the scope immediately"]
pub struct ScopeGuard<'rt> {
    rt: &'rt Runtime,
    manager: Value,
    entered: Value,
    exited: bool,
}

impl<'rt> ScopeGuard<'rt> {
    /// What `Enter` produced, the `as` target.
    pub fn entered(&self) -> &Value {
        &self.entered
    }

    /// Close the scope with the block's result.
    ///
    /// `Ok(None)` when the block failed and `Exit` suppressed the failure.
    pub fn finish<T>(mut self, result: DispatchResult<T>) -> DispatchResult<Option<T>> {
        self.exited = true;

        match result {
            Ok(value) => {
                self.rt.exit(&self.manager, None).trace()?;
                Ok(Some(value))
            }

            Err(failure) => {
                if self.rt.exit(&self.manager, Some(&failure)).trace()? {
                    tracing::debug!(
                        "[ScopeGuard::finish] {} suppressed {}",
                        self.rt.type_of(&self.manager).name(),
                        failure
                    );

                    Ok(None)
                } else {
                    Err(failure)
                }
            }
        }
    }
}

impl<'rt> Drop for ScopeGuard<'rt> {
    fn drop(&mut self) {
        if self.exited {
            return;
        }

        let failure = std::thread::panicking()
            .then(|| Failure::raised("protected block panicked"));

        if let Err(err) = self.rt.exit(&self.manager, failure.as_ref()) {
            tracing::warn!("[ScopeGuard::drop] __exit__ failed while abandoning scope: {}", err);
        }
    }
}

impl Runtime {
    pub fn enter(&self, manager: &Value) -> DispatchResult<Value> {
        match self.invoke_slot(SlotKind::Enter, manager, &[]).trace()? {
            Some(value) => Ok(value),
            None => Failure::unsupported(format!(
                "'{}' object does not support the context manager protocol",
                self.type_of(manager).name()
            ))
            .into(),
        }
    }

    /// Invoke `Exit`, returning whether `error` should be suppressed.
    pub fn exit(&self, manager: &Value, error: Option<&Failure>) -> DispatchResult<bool> {
        let arg = match error {
            Some(failure) => Value::Error(Arc::new(failure.clone())),
            None => Value::None,
        };

        match self.invoke_slot(SlotKind::Exit, manager, &[arg]).trace()? {
            Some(suppress) => Ok(error.is_some() && self.truth(&suppress).trace()?),
            None => Failure::unsupported(format!(
                "'{}' object does not support the context manager protocol",
                self.type_of(manager).name()
            ))
            .into(),
        }
    }

    /// Enter `manager` and hand back a guard that guarantees the matching `Exit`.
    pub fn scope(&self, manager: &Value) -> DispatchResult<ScopeGuard<'_>> {
        let ty = self.type_of(manager);

        if !ty.has_slot(SlotKind::Enter) || !ty.has_slot(SlotKind::Exit) {
            return Failure::unsupported(format!(
                "'{}' object does not support the context manager protocol",
                ty.name()
            ))
            .into();
        }

        let entered = self.enter(manager).trace()?;

        Ok(ScopeGuard {
            rt: self,
            manager: manager.clone(),
            entered,
            exited: false,
        })
    }

    /// `with manager as entered: body(entered)`
    pub fn with_scope<T, F>(&self, manager: &Value, body: F) -> DispatchResult<Option<T>>
    where
        F: FnOnce(Value) -> DispatchResult<T>,
    {
        let guard = self.scope(manager).trace()?;
        let result = body(guard.entered().clone());

        guard.finish(result)
    }
}
