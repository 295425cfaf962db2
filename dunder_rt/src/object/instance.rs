use std::fmt;
use std::sync::Arc;

use dunder_core::AttrDict;
use parking_lot::RwLock;

use super::{TypeRef, Value};

pub type ObjectRef = Arc<Instance>;

/// An instance of a user-defined type with its own attribute storage.
///
/// The lock only keeps the storage memory safe. A get followed by a set is
/// not atomic, callers that share one instance across threads serialize
/// those sequences themselves.
pub struct Instance {
    /// The type this instance was created from.
    class: TypeRef,

    /// **The** `__dict__` of the instance.
    dict: RwLock<AttrDict<Value>>,
}

impl Instance {
    pub fn new(class: TypeRef, dict: AttrDict<Value>) -> Self {
        Self {
            class,
            dict: RwLock::new(dict),
        }
    }

    #[inline]
    pub fn class(&self) -> &TypeRef {
        &self.class
    }

    pub fn get(&self, name: &str) -> Option<Value> {
        self.dict.read().get(name)
    }

    /// Insert or replace an entry, returning the previous value.
    pub fn set(&self, name: &str, value: Value) -> Option<Value> {
        self.dict.write().insert(name, value)
    }

    pub fn remove(&self, name: &str) -> Option<Value> {
        self.dict.write().remove(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.dict.read().contains_key(name)
    }

    /// A copy of the attribute storage as it is right now.
    pub fn snapshot(&self) -> AttrDict<Value> {
        self.dict.read().clone()
    }
}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dict = self.dict.read();
        let mut names = dict.keys().map(|k| k.as_ref()).collect::<Vec<_>>();
        names.sort_unstable();

        f.debug_struct("Instance")
            .field("class", &self.class.name())
            .field("dict", &names)
            .finish()
    }
}
