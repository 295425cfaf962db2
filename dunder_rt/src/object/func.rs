use std::fmt;
use std::sync::Arc;

use dunder_core::DispatchResult;

use crate::Runtime;

use super::Value;

pub type NativeFn = Arc<dyn Fn(&Runtime, &[Value]) -> DispatchResult<Value> + Send + Sync>;

/// A native function value, functions are non-data descriptors that bind to instances.
#[derive(Clone)]
pub struct Function {
    name: Arc<str>,
    body: NativeFn,
}

impl Function {
    pub fn new<F>(name: &str, body: F) -> Self
    where
        F: Fn(&Runtime, &[Value]) -> DispatchResult<Value> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            body: Arc::new(body),
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn invoke(&self, rt: &Runtime, args: &[Value]) -> DispatchResult<Value> {
        (self.body)(rt, args)
    }

    pub(crate) fn addr(&self) -> usize {
        Arc::as_ptr(&self.body) as *const () as usize
    }

    pub fn ptr_eq(&self, other: &Function) -> bool {
        self.addr() == other.addr()
    }
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Function")
            .field(&self.name)
            .field(&(self.addr() as *const ()))
            .finish()
    }
}

/// A function bound to the instance it was read through.
#[derive(Debug, Clone)]
pub struct Method {
    pub receiver: Value,
    pub func: Function,
}

impl Method {
    pub fn invoke(&self, rt: &Runtime, args: &[Value]) -> DispatchResult<Value> {
        let mut bound = Vec::with_capacity(args.len() + 1);
        bound.push(self.receiver.clone());
        bound.extend_from_slice(args);

        self.func.invoke(rt, &bound)
    }
}
