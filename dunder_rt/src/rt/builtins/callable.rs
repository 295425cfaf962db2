//! Functions, bound methods, properties, iterators, classes and the odds and ends.

use std::sync::Arc;

use dunder_core::{ErrorKind, Failure, FailureExt, SlotKind};

use crate::dispatch::CallCx;
use crate::object::{Method, TypeBuilder, TypeRef, Value};

/// Storage slots of a property object.
pub(super) const FGET: &str = "fget";
pub(super) const FSET: &str = "fset";
pub(super) const FDEL: &str = "fdel";

pub(super) fn function_type() -> TypeRef {
    TypeBuilder::new("function")
        .method(SlotKind::Call, |cx| match cx.receiver {
            Value::Function(func) => func.invoke(cx.rt, cx.args).trace(),
            _ => Failure::invalid_arguments("expected a function receiver").into(),
        })
        .method(SlotKind::DescriptorGet, |cx| {
            let [instance, _owner] = cx.expect_args::<2>()?;

            match (cx.receiver, instance) {
                (Value::Function(_), Value::None) => Ok(cx.receiver.clone()),

                (Value::Function(func), instance) => Ok(Value::Method(Arc::new(Method {
                    receiver: instance.clone(),
                    func: func.clone(),
                }))),

                _ => Failure::invalid_arguments("expected a function receiver").into(),
            }
        })
        .method(SlotKind::Repr, |cx| match cx.receiver {
            Value::Function(func) => Ok(Value::str(format!("<function {}>", func.name()))),
            _ => Ok(Value::str("<function>")),
        })
        .build()
}

pub(super) fn method_type() -> TypeRef {
    TypeBuilder::new("method")
        .method(SlotKind::Call, |cx| match cx.receiver {
            Value::Method(method) => method.invoke(cx.rt, cx.args).trace(),
            _ => Failure::invalid_arguments("expected a bound method receiver").into(),
        })
        .method(SlotKind::Repr, |cx| match cx.receiver {
            Value::Method(method) => Ok(Value::str(format!(
                "<bound method {} of {}>",
                method.func.name(),
                cx.rt.repr(&method.receiver)?
            ))),
            _ => Ok(Value::str("<bound method>")),
        })
        .build()
}

/// Read one of the accessor functions a property object stores.
fn accessor(cx: &CallCx<'_>, name: &str) -> Value {
    cx.receiver
        .as_object()
        .and_then(|obj| obj.get(name))
        .unwrap_or_default()
}

/// `property` is always a data descriptor, missing accessors fail at use.
pub(super) fn property_type() -> TypeRef {
    TypeBuilder::new("property")
        .method(SlotKind::DescriptorGet, |cx| {
            let [instance, _owner] = cx.expect_args::<2>()?;

            if instance.is_none() {
                return Ok(cx.receiver.clone());
            }

            match accessor(&cx, FGET) {
                Value::None => Failure::new(ErrorKind::AttributeMissing)
                    .with_detail("unreadable attribute")
                    .into(),
                fget => cx.rt.call(&fget, &[instance.clone()]).trace(),
            }
        })
        .method(SlotKind::DescriptorSet, |cx| {
            let [instance, value] = cx.expect_args::<2>()?;

            match accessor(&cx, FSET) {
                Value::None => Failure::new(ErrorKind::AttributeMissing)
                    .with_detail("can't set attribute")
                    .into(),
                fset => cx.rt.call(&fset, &[instance.clone(), value.clone()]).trace(),
            }
        })
        .method(SlotKind::DescriptorDelete, |cx| {
            let [instance] = cx.expect_args::<1>()?;

            match accessor(&cx, FDEL) {
                Value::None => Failure::new(ErrorKind::AttributeMissing)
                    .with_detail("can't delete attribute")
                    .into(),
                fdel => cx.rt.call(&fdel, &[instance.clone()]).trace(),
            }
        })
        .build()
}

pub(super) fn iterator_type() -> TypeRef {
    TypeBuilder::new("iterator")
        .method(SlotKind::Iterate, |cx| Ok(cx.receiver.clone()))
        .build()
}

pub(super) fn none_type() -> TypeRef {
    TypeBuilder::new("NoneType")
        .method(SlotKind::Bool, |_| Ok(Value::Bool(false)))
        .method(SlotKind::Hash, |cx| Ok(Value::Int(cx.rt.hash(()) as i64)))
        .method(SlotKind::Repr, |_| Ok(Value::str("None")))
        .build()
}

/// Calling a class creates an instance and runs its `__init__`, if any.
pub(super) fn type_type() -> TypeRef {
    TypeBuilder::new("type")
        .method(SlotKind::Call, |cx| {
            let class = match cx.receiver {
                Value::Type(class) => class,
                _ => return Failure::invalid_arguments("expected a type receiver").into(),
            };

            let instance = cx.rt.new_object(class, None::<(&str, Value)>);

            if class.lookup_attr("__init__").is_some() {
                cx.rt.call_method(&instance, "__init__", cx.args).trace()?;
            } else if !cx.args.is_empty() {
                return Failure::invalid_arguments(format!("{}() takes no arguments", class.name()))
                    .into();
            }

            Ok(instance)
        })
        .method(SlotKind::Repr, |cx| match cx.receiver {
            Value::Type(class) => Ok(Value::str(format!("<class '{}'>", class.name()))),
            _ => Ok(Value::str("<class>")),
        })
        .build()
}

pub(super) fn error_type() -> TypeRef {
    TypeBuilder::new("Failure")
        .method(SlotKind::Repr, |cx| match cx.receiver {
            Value::Error(failure) => Ok(Value::str(failure.to_string())),
            _ => Ok(Value::str("<failure>")),
        })
        .build()
}
