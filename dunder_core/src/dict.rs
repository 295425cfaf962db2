use std::ops::{Deref, DerefMut};
use std::sync::Arc;

use crate::MapT;

/// An attribute namespace keyed by name, the `__dict__` of an instance or a type.
#[derive(Debug, Clone, derive_more::From)]
pub struct AttrDict<V>(pub MapT<Arc<str>, V>);

impl<V> DerefMut for AttrDict<V> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl<V> Deref for AttrDict<V> {
    type Target = MapT<Arc<str>, V>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<V> Default for AttrDict<V> {
    fn default() -> Self {
        Self(MapT::new())
    }
}

impl<V> AttrDict<V>
where
    V: Clone,
{
    /// Get a value from the namespace.
    pub fn get(&self, name: &str) -> Option<V> {
        self.0.get(name).cloned()
    }

    /// Insert or replace a value, returning the previous one.
    pub fn insert<S>(&mut self, name: S, value: V) -> Option<V>
    where
        S: Into<Arc<str>>,
    {
        self.0.insert(name.into(), value)
    }

    /// Remove a value, returning it if it was present.
    pub fn remove(&mut self, name: &str) -> Option<V> {
        self.0.remove(name)
    }
}

impl<S, V> FromIterator<(S, V)> for AttrDict<V>
where
    S: Into<Arc<str>>,
{
    fn from_iter<I: IntoIterator<Item = (S, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_replaces() {
        let mut dict = AttrDict::default();

        assert_eq!(dict.insert("x", 1), None);
        assert_eq!(dict.insert("x", 2), Some(1));
        assert_eq!(dict.get("x"), Some(2));
        assert_eq!(dict.remove("x"), Some(2));
        assert!(dict.is_empty());
    }
}
