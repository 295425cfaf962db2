use std::fmt;
use std::sync::Arc;

use dunder_core::{AttrDict, CompareOp, DispatchResult, MapT, SlotKind};

use crate::dispatch::{same_handler, CallCx, Handler, Outcome};
use crate::Runtime;

use super::{Function, Value};

pub type TypeRef = Arc<TypeDescriptor>;

/// Per-type registry of implemented slots.
///
/// A slot is either absent or present with a handler, a present handler may
/// still decline at call time by returning `Outcome::NotApplicable`.
#[derive(Clone, Default)]
pub struct CapabilityTable {
    slots: MapT<SlotKind, Handler>,
}

impl CapabilityTable {
    #[inline]
    pub fn get(&self, kind: SlotKind) -> Option<&Handler> {
        self.slots.get(&kind)
    }

    #[inline]
    pub fn contains(&self, kind: SlotKind) -> bool {
        self.slots.contains_key(&kind)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn kinds(&self) -> impl Iterator<Item = SlotKind> + '_ {
        self.slots.keys().copied()
    }
}

impl fmt::Debug for CapabilityTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut kinds = self.kinds().collect::<Vec<_>>();
        kinds.sort();

        f.debug_set()
            .entries(kinds.iter().map(ToString::to_string))
            .finish()
    }
}

/// Identifies a type, its capabilities and its class-level namespace.
///
/// Descriptors are immutable once built, share them as `TypeRef`s.
pub struct TypeDescriptor {
    name: Arc<str>,
    parent: Option<TypeRef>,
    slots: CapabilityTable,
    declared: Vec<SlotKind>,
    attrs: AttrDict<Value>,
}

impl TypeDescriptor {
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn parent(&self) -> Option<&TypeRef> {
        self.parent.as_ref()
    }

    #[inline]
    pub fn slots(&self) -> &CapabilityTable {
        &self.slots
    }

    /// The handler for `kind`, either declared here or inherited.
    #[inline]
    pub fn slot(&self, kind: SlotKind) -> Option<&Handler> {
        self.slots.get(kind)
    }

    #[inline]
    pub fn has_slot(&self, kind: SlotKind) -> bool {
        self.slots.contains(kind)
    }

    /// Whether this type itself declared `kind` rather than inheriting it.
    pub fn declares(&self, kind: SlotKind) -> bool {
        self.declared.contains(&kind)
    }

    /// Whether this type supplies a handler for `kind` distinct from the one `ancestor` supplies.
    pub fn overrides(&self, ancestor: &TypeDescriptor, kind: SlotKind) -> bool {
        match (self.slot(kind), ancestor.slot(kind)) {
            (Some(mine), Some(theirs)) => !same_handler(mine, theirs),
            (Some(_), None) => true,
            (None, _) => false,
        }
    }

    /// This type followed by its parent chain.
    pub fn ancestry(&self) -> impl Iterator<Item = &TypeDescriptor> + '_ {
        std::iter::successors(Some(self), |ty| ty.parent.as_deref())
    }

    pub fn is_subtype_of(&self, other: &TypeDescriptor) -> bool {
        self.ancestry().any(|ty| std::ptr::eq(ty, other))
    }

    pub fn is_strict_subtype_of(&self, other: &TypeDescriptor) -> bool {
        !std::ptr::eq(self, other) && self.is_subtype_of(other)
    }

    /// Look `name` up in this type's namespace and then along the parent chain.
    pub fn lookup_attr(&self, name: &str) -> Option<Value> {
        self.ancestry().find_map(|ty| ty.attrs.get(name))
    }

    /// The namespace this type declared itself, without inherited entries.
    pub fn own_attrs(&self) -> &AttrDict<Value> {
        &self.attrs
    }
}

impl fmt::Debug for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeDescriptor")
            .field("name", &self.name)
            .field("parent", &self.parent.as_ref().map(|p| p.name()))
            .field("slots", &self.slots)
            .field("attrs", &self.attrs.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Builds a `TypeDescriptor` in one go, capability tables never change afterwards.
///
/// ```
/// # use dunder_rt::{SlotKind, TypeBuilder, Value};
/// let sized = TypeBuilder::new("Sized")
///     .method(SlotKind::Length, |_| Ok(Value::Int(3)))
///     .build();
///
/// assert!(sized.has_slot(SlotKind::Length));
/// ```
#[derive(Default)]
pub struct TypeBuilder {
    name: Box<str>,
    parent: Option<TypeRef>,
    slots: MapT<SlotKind, Handler>,
    attrs: AttrDict<Value>,
}

impl TypeBuilder {
    pub fn new<S>(name: S) -> Self
    where
        S: Into<Box<str>>,
    {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn parent(mut self, parent: &TypeRef) -> Self {
        self.parent = Some(Arc::clone(parent));
        self
    }

    /// Fill `kind` with a handler that may decline.
    pub fn slot<F>(self, kind: SlotKind, f: F) -> Self
    where
        F: Fn(CallCx<'_>) -> DispatchResult<Outcome> + Send + Sync + 'static,
    {
        self.handler(kind, Arc::new(f))
    }

    /// Fill `kind` with a handler that always produces a value.
    pub fn method<F>(self, kind: SlotKind, f: F) -> Self
    where
        F: Fn(CallCx<'_>) -> DispatchResult<Value> + Send + Sync + 'static,
    {
        self.slot(kind, move |cx| f(cx).map(Outcome::Value))
    }

    /// Fill `kind` with an existing handler, sharing it with whoever else holds it.
    pub fn handler(mut self, kind: SlotKind, handler: Handler) -> Self {
        self.slots.insert(kind, handler);
        self
    }

    pub fn hasattr<S>(&self, name: S) -> bool
    where
        S: AsRef<str>,
    {
        self.attrs.contains_key(name.as_ref())
    }

    /// Bind a class-level attribute.
    pub fn attr<S, V>(mut self, name: S, value: V) -> Self
    where
        S: AsRef<str>,
        V: Into<Value>,
    {
        self.attrs.insert(name.as_ref(), value.into());
        self
    }

    /// Bind a native function as a class-level attribute, it binds to instances like a method.
    pub fn function<S, F>(self, name: S, f: F) -> Self
    where
        S: AsRef<str>,
        F: Fn(&Runtime, &[Value]) -> DispatchResult<Value> + Send + Sync + 'static,
    {
        let func = Function::new(name.as_ref(), f);
        self.attr(name, func)
    }

    pub fn build(self) -> TypeRef {
        let Self {
            name,
            parent,
            slots,
            attrs,
        } = self;

        let mut table = parent
            .as_ref()
            .map(|p| p.slots.clone())
            .unwrap_or_default();

        // declaring equality without a hash makes the type unhashable.
        let eq = SlotKind::Compare(CompareOp::Eq);

        if slots.contains_key(&eq) && !slots.contains_key(&SlotKind::Hash) {
            table.slots.remove(&SlotKind::Hash);
        }

        let mut declared = slots.keys().copied().collect::<Vec<_>>();
        declared.sort();

        table.slots.extend(slots);

        tracing::trace!(
            "[TypeBuilder::build] {} ({} slots, {} declared)",
            name,
            table.len(),
            declared.len()
        );

        Arc::new(TypeDescriptor {
            name: name.into(),
            parent,
            slots: table,
            declared,
            attrs,
        })
    }
}

#[cfg(test)]
mod tests {
    use dunder_core::BinaryOp;

    use super::*;

    fn base() -> TypeRef {
        TypeBuilder::new("Base")
            .method(SlotKind::Binary(BinaryOp::Add), |_| Ok(Value::Int(1)))
            .method(SlotKind::Reflected(BinaryOp::Add), |_| Ok(Value::Int(2)))
            .method(SlotKind::Hash, |_| Ok(Value::Int(0)))
            .attr("kind", "base")
            .build()
    }

    #[test]
    fn children_inherit_slots_and_attrs() {
        let base = base();
        let child = TypeBuilder::new("Child").parent(&base).build();

        assert!(child.has_slot(SlotKind::Binary(BinaryOp::Add)));
        assert!(!child.declares(SlotKind::Binary(BinaryOp::Add)));
        assert!(!child.overrides(&base, SlotKind::Reflected(BinaryOp::Add)));
        assert!(child.is_strict_subtype_of(&base));
        assert!(!base.is_strict_subtype_of(&base));
        assert!(base.is_subtype_of(&base));
        assert_eq!(child.lookup_attr("kind").unwrap().as_str(), Some("base"));
    }

    #[test]
    fn redeclared_slot_is_an_override() {
        let base = base();
        let child = TypeBuilder::new("Child")
            .parent(&base)
            .method(SlotKind::Reflected(BinaryOp::Add), |_| Ok(Value::Int(3)))
            .build();

        assert!(child.overrides(&base, SlotKind::Reflected(BinaryOp::Add)));
        assert!(child.declares(SlotKind::Reflected(BinaryOp::Add)));
    }

    #[test]
    fn declaring_eq_drops_inherited_hash() {
        let base = base();
        let child = TypeBuilder::new("Child")
            .parent(&base)
            .method(SlotKind::Compare(CompareOp::Eq), |_| Ok(Value::Bool(true)))
            .build();

        assert!(base.has_slot(SlotKind::Hash));
        assert!(!child.has_slot(SlotKind::Hash));

        let grandchild = TypeBuilder::new("Grandchild").parent(&child).build();

        assert!(!grandchild.has_slot(SlotKind::Hash));
    }
}
