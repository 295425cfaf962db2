//! `dunder_rt` is a slot based protocol dispatch engine.
//!
//! Types register optional slot handlers in a capability table, the resolvers
//! on [`Runtime`] decide which handler (if any) an operation invokes, in what
//! order, and what happens when nothing applies.

#[cfg(test)]
pub(crate) mod test {
    use tracing_subscriber::EnvFilter;

    use crate::Runtime;

    pub fn setup() -> Runtime {
        let _ = tracing_subscriber::fmt()
            .with_test_writer()
            .with_env_filter(EnvFilter::from_default_env())
            .try_init();

        Runtime::new()
    }
}

pub mod dispatch;
pub mod object;
pub mod rt;
pub mod walkthrough;

pub use {
    dispatch::{CallCx, DescriptorKind, Handler, Outcome, ScopeGuard, SlotIter},
    dunder_core::{
        AttrDict, BinaryOp, CompareOp, DispatchResult, ErrorKind, Failure, FailureExt, SlotKind,
        UnaryOp,
    },
    object::{
        Function, Instance, ObjectRef, Slice, TypeBuilder, TypeDescriptor, TypeRef, Value, ValueIter,
    },
    rt::{Builtins, Runtime},
};
