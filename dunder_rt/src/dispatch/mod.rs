//! The resolvers, each one an `impl Runtime` block over a single protocol.
//!
//! Every resolver follows the same shape: look the relevant slot(s) up in the
//! operand's capability table, invoke the handler when present, otherwise apply
//! the documented fallback or fail with a specific `ErrorKind`.

use std::sync::Arc;

use dunder_core::{DispatchResult, Failure, SlotKind};

use crate::object::Value;
use crate::Runtime;

pub mod attr;
pub mod call;
pub mod container;
pub mod descr;
pub mod ops;
pub mod scope;
pub mod truth;

pub use self::{container::SlotIter, descr::DescriptorKind, scope::ScopeGuard};

/// A slot implementation.
pub type Handler = Arc<dyn Fn(CallCx<'_>) -> DispatchResult<Outcome> + Send + Sync>;

/// What a handler produced when it did not fail.
#[derive(Debug, Clone)]
pub enum Outcome {
    Value(Value),

    /// The handler explicitly declined, distinct from the slot being absent.
    NotApplicable,
}

impl Outcome {
    pub fn into_value(self) -> Option<Value> {
        match self {
            Outcome::Value(v) => Some(v),
            Outcome::NotApplicable => None,
        }
    }

    pub fn is_not_applicable(&self) -> bool {
        matches!(self, Outcome::NotApplicable)
    }
}

impl From<Value> for Outcome {
    fn from(value: Value) -> Self {
        Outcome::Value(value)
    }
}

/// `None` declines.
impl From<Option<Value>> for Outcome {
    fn from(value: Option<Value>) -> Self {
        match value {
            Some(value) => Outcome::Value(value),
            None => Outcome::NotApplicable,
        }
    }
}

/// Whether two handlers are the very same implementation (i.e. one was inherited).
#[inline]
pub fn same_handler(a: &Handler, b: &Handler) -> bool {
    Arc::as_ptr(a) as *const () == Arc::as_ptr(b) as *const ()
}

/// Everything a handler gets to see when it is invoked.
#[non_exhaustive]
pub struct CallCx<'a> {
    pub rt: &'a Runtime,
    pub receiver: &'a Value,
    pub args: &'a [Value],
}

impl<'a> CallCx<'a> {
    pub fn new(rt: &'a Runtime, receiver: &'a Value, args: &'a [Value]) -> Self {
        Self { rt, receiver, args }
    }

    pub fn arg(&self, n: usize) -> DispatchResult<&'a Value> {
        self.args.get(n).ok_or_else(|| {
            Failure::invalid_arguments(format!(
                "missing positional argument {} ({} given)",
                n,
                self.args.len()
            ))
        })
    }

    /// Destructure exactly `N` positional arguments.
    pub fn expect_args<const N: usize>(&self) -> DispatchResult<&'a [Value; N]> {
        <&[Value; N]>::try_from(self.args).map_err(|_| {
            Failure::invalid_arguments(format!(
                "takes {} positional arguments but {} were given",
                N,
                self.args.len()
            ))
        })
    }
}

impl Runtime {
    #[inline]
    pub(crate) fn invoke(
        &self,
        handler: &Handler,
        receiver: &Value,
        args: &[Value],
    ) -> DispatchResult<Outcome> {
        handler(CallCx::new(self, receiver, args))
    }

    /// Invoke a non-operator slot on `receiver`.
    ///
    /// `Ok(None)` when the slot is absent. A declining handler is reported as
    /// `Unsupported` since only operators may decline.
    pub(crate) fn invoke_slot(
        &self,
        kind: SlotKind,
        receiver: &Value,
        args: &[Value],
    ) -> DispatchResult<Option<Value>> {
        let ty = self.type_of(receiver);

        let handler = match ty.slot(kind) {
            Some(handler) => handler,
            None => return Ok(None),
        };

        match self.invoke(handler, receiver, args)? {
            Outcome::Value(value) => Ok(Some(value)),
            Outcome::NotApplicable => Failure::unsupported(format!(
                "'{}'.{} declined a non-operator slot",
                ty.name(),
                kind
            ))
            .into(),
        }
    }
}
