use dunder_core::{DispatchResult, ErrorKind, Failure, FailureExt, SlotKind};

use crate::object::{TypeRef, Value};
use crate::Runtime;

/// How an attribute-like binding orders against instance storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum DescriptorKind {
    /// Exposes `DescriptorGet` plus `DescriptorSet` or `DescriptorDelete`, wins over instance storage.
    #[display(fmt = "data descriptor")]
    Data,

    /// Exposes `DescriptorGet` only, instance storage wins over it.
    #[display(fmt = "non-data descriptor")]
    NonData,
}

impl Runtime {
    /// Classify `value` as a descriptor, `None` when it does not expose `DescriptorGet`.
    pub fn classify(&self, value: &Value) -> Option<DescriptorKind> {
        let ty = self.type_of(value);

        if !ty.has_slot(SlotKind::DescriptorGet) {
            return None;
        }

        if ty.has_slot(SlotKind::DescriptorSet) || ty.has_slot(SlotKind::DescriptorDelete) {
            Some(DescriptorKind::Data)
        } else {
            Some(DescriptorKind::NonData)
        }
    }

    /// Invoke `DescriptorGet(descriptor, instance, owner)`.
    pub fn descriptor_get(
        &self,
        descriptor: &Value,
        instance: Option<&Value>,
        owner: &TypeRef,
    ) -> DispatchResult<Value> {
        let args = [
            instance.cloned().unwrap_or_default(),
            Value::Type(TypeRef::clone(owner)),
        ];

        match self.invoke_slot(SlotKind::DescriptorGet, descriptor, &args).trace()? {
            Some(value) => Ok(value),
            None => Failure::unsupported(format!(
                "'{}' object is not a descriptor",
                self.type_of(descriptor).name()
            ))
            .into(),
        }
    }

    pub fn descriptor_set(
        &self,
        descriptor: &Value,
        instance: &Value,
        value: Value,
    ) -> DispatchResult<()> {
        let args = [instance.clone(), value];

        match self.invoke_slot(SlotKind::DescriptorSet, descriptor, &args).trace()? {
            Some(_) => Ok(()),
            None => Failure::new(ErrorKind::AttributeMissing)
                .with_detail(format!(
                    "'{}' descriptor is read-only",
                    self.type_of(descriptor).name()
                ))
                .into(),
        }
    }

    pub fn descriptor_delete(&self, descriptor: &Value, instance: &Value) -> DispatchResult<()> {
        let args = [instance.clone()];

        match self.invoke_slot(SlotKind::DescriptorDelete, descriptor, &args).trace()? {
            Some(_) => Ok(()),
            None => Failure::new(ErrorKind::AttributeMissing)
                .with_detail(format!(
                    "'{}' descriptor can not be deleted",
                    self.type_of(descriptor).name()
                ))
                .into(),
        }
    }
}
