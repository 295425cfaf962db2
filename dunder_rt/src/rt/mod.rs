use std::hash::{BuildHasher, Hash, Hasher};
use std::sync::Arc;

use ahash::RandomState;
use dashmap::DashMap;
use dunder_core::AttrDict;

use crate::object::{Instance, TypeRef, Value};

pub mod builtins;

#[cfg(test)]
mod tests;

pub use self::builtins::Builtins;

/// The dispatch runtime.
///
/// Holds nothing but immutable type descriptors and the hash state, so a
/// `&Runtime` can be shared freely between threads resolving operations on
/// independent values.
#[derive(Debug)]
pub struct Runtime {
    /// The types every value that is not an `Object` belongs to.
    pub builtins: Builtins,

    /// The hash state used within the runtime.
    pub(crate) hash_state: RandomState,

    /// Named types registered by the embedder.
    types: DashMap<Arc<str>, TypeRef, RandomState>,
}

impl Default for Runtime {
    fn default() -> Self {
        Self::new()
    }
}

impl Runtime {
    pub fn new() -> Self {
        Self {
            builtins: Builtins::new(),
            hash_state: RandomState::new(),
            types: Default::default(),
        }
    }

    pub fn hash(&self, h: impl Hash) -> u64 {
        let mut hasher = self.hash_state.build_hasher();

        h.hash(&mut hasher);

        hasher.finish()
    }

    /// The type descriptor `value` dispatches through.
    #[track_caller]
    pub fn type_of<'a>(&'a self, value: &'a Value) -> &'a TypeRef {
        let Builtins {
            none_type,
            bool_type,
            int_type,
            float_type,
            str_type,
            tuple_type,
            list_type,
            slice_type,
            function_type,
            method_type,
            iterator_type,
            type_type,
            error_type,
            ..
        } = &self.builtins;

        match value {
            Value::None => none_type,
            Value::Bool(_) => bool_type,
            Value::Int(_) => int_type,
            Value::Float(_) => float_type,
            Value::Str(_) => str_type,
            Value::Tuple(_) => tuple_type,
            Value::List(_) => list_type,
            Value::Slice(_) => slice_type,
            Value::Function(_) => function_type,
            Value::Method(_) => method_type,
            Value::Iter(_) => iterator_type,
            Value::Type(_) => type_type,
            Value::Error(_) => error_type,
            Value::Object(obj) => obj.class(),
        }
    }

    /// Create an instance of `class` with the given attribute storage.
    pub fn new_object<I, S>(&self, class: &TypeRef, attrs: I) -> Value
    where
        I: IntoIterator<Item = (S, Value)>,
        S: Into<Arc<str>>,
    {
        let dict = attrs.into_iter().collect::<AttrDict<Value>>();

        tracing::trace!(
            "[Runtime::new_object] {} with {} attributes",
            class.name(),
            dict.len()
        );

        Value::Object(Arc::new(Instance::new(Arc::clone(class), dict)))
    }

    /// Register a type under its name so embedders can look it up later.
    pub fn register(&self, class: &TypeRef) -> Option<TypeRef> {
        self.types.insert(class.name().into(), Arc::clone(class))
    }

    pub fn lookup_type(&self, name: &str) -> Option<TypeRef> {
        self.types.get(name).map(|entry| Arc::clone(entry.value()))
    }
}
