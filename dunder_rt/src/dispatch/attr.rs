//! Attribute resolution: `get`, `set` and `delete` of a named attribute.
//!
//! Lookup order for `get`:
//!
//! 1. a data descriptor bound to the name on the type chain,
//! 2. the instance's own storage,
//! 3. a non-data descriptor or plain class-level attribute,
//! 4. the type's `GetAttr` slot as a last resort.
//!
//! Mutation stops after the data descriptor and falls to instance storage.
//! A type that declares `SetAttr`/`DelAttr` replaces the mutation procedure
//! altogether, returning `NotApplicable` from those hands control back to it.

use dunder_core::{DispatchResult, ErrorKind, Failure, FailureExt, SlotKind};

use crate::object::{TypeRef, Value};
use crate::Runtime;

use super::{DescriptorKind, Outcome};

impl Runtime {
    pub fn get_attr(&self, object: &Value, name: &str) -> DispatchResult<Value> {
        if let Value::Type(class) = object {
            return self.get_class_attr(class, name).trace();
        }

        let ty = self.type_of(object);
        let class_attr = ty.lookup_attr(name);

        if let Some(attr) = &class_attr {
            if self.classify(attr) == Some(DescriptorKind::Data) {
                tracing::trace!("[Runtime::get_attr] {}.{} -> data descriptor", ty.name(), name);

                return self.descriptor_get(attr, Some(object), ty).trace();
            }
        }

        if let Some(value) = object.as_object().and_then(|obj| obj.get(name)) {
            return Ok(value);
        }

        if let Some(attr) = class_attr {
            return match self.classify(&attr) {
                Some(_) => self.descriptor_get(&attr, Some(object), ty).trace(),
                None => Ok(attr),
            };
        }

        if let Some(handler) = ty.slot(SlotKind::GetAttr) {
            tracing::trace!("[Runtime::get_attr] {}.{} -> __getattr__", ty.name(), name);

            return match self.invoke(handler, object, &[Value::str(name)]).trace()? {
                Outcome::Value(value) => Ok(value),
                Outcome::NotApplicable => Failure::attribute_missing(ty.name(), name).into(),
            };
        }

        Failure::attribute_missing(ty.name(), name).into()
    }

    /// Attribute access on a class object, descriptors are invoked without an instance.
    fn get_class_attr(&self, class: &TypeRef, name: &str) -> DispatchResult<Value> {
        match class.lookup_attr(name) {
            Some(attr) if self.classify(&attr).is_some() => {
                self.descriptor_get(&attr, None, class).trace()
            }

            Some(attr) => Ok(attr),

            None => Failure::new(ErrorKind::AttributeMissing)
                .with_detail(format!(
                    "type object '{}' has no attribute '{}'",
                    class.name(),
                    name
                ))
                .into(),
        }
    }

    pub fn has_attr(&self, object: &Value, name: &str) -> DispatchResult<bool> {
        match self.get_attr(object, name) {
            Ok(_) => Ok(true),
            Err(failure) if failure.is(ErrorKind::AttributeMissing) => Ok(false),
            Err(failure) => Err(failure),
        }
    }

    pub fn set_attr(&self, object: &Value, name: &str, value: Value) -> DispatchResult<()> {
        let ty = self.type_of(object);

        if let Some(handler) = ty.slot(SlotKind::SetAttr) {
            let args = [Value::str(name), value.clone()];

            if let Outcome::Value(_) = self.invoke(handler, object, &args).trace()? {
                return Ok(());
            }
        }

        self.generic_set_attr(object, name, value)
    }

    /// The default mutation procedure, what a `SetAttr` handler delegates to.
    pub fn generic_set_attr(&self, object: &Value, name: &str, value: Value) -> DispatchResult<()> {
        let ty = self.type_of(object);

        if let Some(attr) = ty.lookup_attr(name) {
            if self.classify(&attr) == Some(DescriptorKind::Data) {
                return self.descriptor_set(&attr, object, value).trace();
            }
        }

        match object {
            Value::Object(obj) => {
                obj.set(name, value);
                Ok(())
            }

            Value::Type(class) => Failure::unsupported(format!(
                "cannot set '{}' attribute of immutable type '{}'",
                name,
                class.name()
            ))
            .into(),

            _ => Failure::attribute_missing(ty.name(), name).into(),
        }
    }

    pub fn del_attr(&self, object: &Value, name: &str) -> DispatchResult<()> {
        let ty = self.type_of(object);

        if let Some(handler) = ty.slot(SlotKind::DelAttr) {
            if let Outcome::Value(_) = self.invoke(handler, object, &[Value::str(name)]).trace()? {
                return Ok(());
            }
        }

        self.generic_del_attr(object, name)
    }

    pub fn generic_del_attr(&self, object: &Value, name: &str) -> DispatchResult<()> {
        let ty = self.type_of(object);

        if let Some(attr) = ty.lookup_attr(name) {
            if self.classify(&attr) == Some(DescriptorKind::Data) {
                return self.descriptor_delete(&attr, object).trace();
            }
        }

        match object.as_object().and_then(|obj| obj.remove(name)) {
            Some(_) => Ok(()),
            None => Failure::attribute_missing(ty.name(), name).into(),
        }
    }
}
