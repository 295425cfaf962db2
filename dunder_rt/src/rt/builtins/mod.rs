//! The builtin type table.

use std::fmt;

use crate::object::{TypeRef, Value};
use crate::Runtime;

mod callable;
mod numeric;
mod sequence;

/// The types of every value that is not an `Object`.
#[derive(Clone)]
pub struct Builtins {
    pub none_type: TypeRef,
    pub bool_type: TypeRef,
    pub int_type: TypeRef,
    pub float_type: TypeRef,
    pub str_type: TypeRef,
    pub tuple_type: TypeRef,
    pub list_type: TypeRef,
    pub slice_type: TypeRef,
    pub function_type: TypeRef,
    pub method_type: TypeRef,
    pub property_type: TypeRef,
    pub iterator_type: TypeRef,
    pub type_type: TypeRef,
    pub error_type: TypeRef,
}

impl Builtins {
    pub fn new() -> Self {
        let int_type = numeric::int_type();
        let bool_type = numeric::bool_type(&int_type);

        let this = Self {
            none_type: callable::none_type(),
            bool_type,
            int_type,
            float_type: numeric::float_type(),
            str_type: sequence::str_type(),
            tuple_type: sequence::tuple_type(),
            list_type: sequence::list_type(),
            slice_type: sequence::slice_type(),
            function_type: callable::function_type(),
            method_type: callable::method_type(),
            property_type: callable::property_type(),
            iterator_type: callable::iterator_type(),
            type_type: callable::type_type(),
            error_type: callable::error_type(),
        };

        tracing::trace!("[Builtins::new] {} builtin types", this.iter().count());

        this
    }

    /// Every builtin type, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &TypeRef> {
        [
            &self.none_type,
            &self.bool_type,
            &self.int_type,
            &self.float_type,
            &self.str_type,
            &self.tuple_type,
            &self.list_type,
            &self.slice_type,
            &self.function_type,
            &self.method_type,
            &self.property_type,
            &self.iterator_type,
            &self.type_type,
            &self.error_type,
        ]
        .into_iter()
    }
}

impl Default for Builtins {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Builtins {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.iter().map(|ty| ty.name()))
            .finish()
    }
}

impl Runtime {
    /// A `property` data descriptor from optional accessor callables.
    ///
    /// `fget(instance)`, `fset(instance, value)` and `fdel(instance)` are
    /// invoked through `Runtime::call`, a missing one makes that access fail
    /// with `AttributeMissing`.
    pub fn new_property(
        &self,
        fget: Option<Value>,
        fset: Option<Value>,
        fdel: Option<Value>,
    ) -> Value {
        let accessors = [
            (callable::FGET, fget.unwrap_or_default()),
            (callable::FSET, fset.unwrap_or_default()),
            (callable::FDEL, fdel.unwrap_or_default()),
        ];

        self.new_object(&self.builtins.property_type, accessors)
    }
}
