use std::fmt;
use std::sync::Arc;

use dunder_core::DispatchResult;
use parking_lot::Mutex;

use super::Value;

type DynIter = Box<dyn Iterator<Item = DispatchResult<Value>> + Send>;

/// A native iterator exposed as a value.
///
/// Clones share the same traversal state, like holding the same iterator
/// object twice. An `__iter__` handler hands out a fresh one per call.
#[derive(Clone)]
pub struct ValueIter {
    inner: Arc<Mutex<DynIter>>,
}

impl ValueIter {
    pub fn new<I>(it: I) -> Self
    where
        I: Iterator<Item = DispatchResult<Value>> + Send + 'static,
    {
        Self {
            inner: Arc::new(Mutex::new(Box::new(it))),
        }
    }

    pub fn from_values<I>(values: I) -> Self
    where
        I: IntoIterator<Item = Value>,
        I::IntoIter: Send + 'static,
    {
        Self::new(values.into_iter().map(Ok))
    }

    pub fn empty() -> Self {
        Self::new(std::iter::empty())
    }

    /// Pull the next element, `None` once exhausted.
    pub fn next(&self) -> Option<DispatchResult<Value>> {
        self.inner.lock().next()
    }

    pub(crate) fn addr(&self) -> usize {
        Arc::as_ptr(&self.inner) as *const () as usize
    }

    pub fn ptr_eq(&self, other: &ValueIter) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for ValueIter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ValueIter")
            .field(&(self.addr() as *const ()))
            .finish()
    }
}
