//! Fundamental types that are shared by the dispatch engine and its embedders.
//!
//! Nothing in here knows what a value is. The slot catalogue, the error kinds
//! and the attribute map are all parameterised or plain enums so that the
//! runtime crate can hang its own representation off of them.
//!

pub mod dict;
pub mod error;
pub mod slot;

/// The map type used all over the place.
pub type MapT<K, V> = ahash::AHashMap<K, V>;

pub use {dict::*, error::*, slot::*};

/// Pattern match an expression and extract a value out of it.
///
/// ```
/// # use dunder_core::patma;
/// let n = Some(3);
/// assert_eq!(patma!(*x, Some(x) in &n), Some(3));
/// ```
#[macro_export]
macro_rules! patma {
    ($e:expr, $p:pat in $v:expr) => {
        match $v {
            $p => Some($e),
            #[allow(unreachable_patterns)]
            _ => None,
        }
    };
}
