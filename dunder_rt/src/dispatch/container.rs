//! Length, indexed access, membership and iteration.
//!
//! Iteration is derived from `GetItem` when `Iterate` is absent: indices are
//! looked up from zero until the handler fails with `IndexOutOfRange`. Reverse
//! iteration is derived from `Length` plus `GetItem` the same way.

use std::slice;

use dunder_core::{DispatchResult, ErrorKind, Failure, FailureExt, SlotKind};

use crate::object::{Value, ValueIter};
use crate::Runtime;

enum IterState {
    /// Produced by an `Iterate` or `Reverse` handler.
    Native(ValueIter),

    /// Looking up `GetItem` upwards from zero.
    Indexed { target: Value, next: i64 },

    /// Looking up `GetItem` downwards from `len - 1`.
    Reversed { target: Value, next: i64 },

    Done,
}

/// A lazy, single pass traversal produced by `Runtime::iterate` or `Runtime::reverse_iterate`.
///
/// Every call to those yields a fresh `SlotIter` with its own traversal state.
/// Once a failure is produced the iterator is fused.
pub struct SlotIter<'rt> {
    rt: &'rt Runtime,
    state: IterState,
}

impl<'rt> SlotIter<'rt> {
    fn new(rt: &'rt Runtime, state: IterState) -> Self {
        Self { rt, state }
    }

    /// Pull from `GetItem`, mapping `IndexOutOfRange` to exhaustion.
    fn lookup(&mut self, target: &Value, index: i64) -> Option<DispatchResult<Value>> {
        match self.rt.get_item(target, &Value::Int(index)) {
            Ok(value) => Some(Ok(value)),
            Err(failure) if failure.is(ErrorKind::IndexOutOfRange) => {
                tracing::trace!("[SlotIter::lookup] exhausted at index {}", index);
                self.state = IterState::Done;
                None
            }
            Err(failure) => {
                self.state = IterState::Done;
                Some(Err(failure))
            }
        }
    }
}

impl<'rt> Iterator for SlotIter<'rt> {
    type Item = DispatchResult<Value>;

    fn next(&mut self) -> Option<Self::Item> {
        match &mut self.state {
            IterState::Done => None,

            IterState::Native(it) => match it.next() {
                Some(Ok(value)) => Some(Ok(value)),
                Some(Err(failure)) => {
                    self.state = IterState::Done;
                    Some(Err(failure))
                }
                None => {
                    self.state = IterState::Done;
                    None
                }
            },

            IterState::Indexed { target, next } => {
                let (target, index) = (target.clone(), *next);
                *next += 1;
                self.lookup(&target, index)
            }

            IterState::Reversed { target, next } => {
                if *next < 0 {
                    self.state = IterState::Done;
                    return None;
                }

                let (target, index) = (target.clone(), *next);
                *next -= 1;
                self.lookup(&target, index)
            }
        }
    }
}

impl Runtime {
    /// `len(container)`
    pub fn length(&self, container: &Value) -> DispatchResult<usize> {
        let ty = self.type_of(container);

        let value = match self.invoke_slot(SlotKind::Length, container, &[]).trace()? {
            Some(value) => value,
            None => {
                return Failure::unsupported(format!("object of type '{}' has no len()", ty.name()))
                    .into()
            }
        };

        match value {
            Value::Int(n) if n >= 0 => Ok(n as usize),
            Value::Bool(b) => Ok(b as usize),
            Value::Int(_) => Failure::invalid_length(ty.name()).into(),
            other => Failure::invalid_length(ty.name())
                .with_detail(format!(
                    "'{}' object cannot be interpreted as a length",
                    self.type_of(&other).name()
                ))
                .into(),
        }
    }

    /// `container[key]`, classification of `key` is left to the handler.
    pub fn get_item(&self, container: &Value, key: &Value) -> DispatchResult<Value> {
        match self
            .invoke_slot(SlotKind::GetItem, container, slice::from_ref(key))
            .trace()?
        {
            Some(value) => Ok(value),
            None => Failure::unsupported(format!(
                "'{}' object is not subscriptable",
                self.type_of(container).name()
            ))
            .into(),
        }
    }

    /// `container[key] = value`
    pub fn set_item(&self, container: &Value, key: &Value, value: Value) -> DispatchResult<()> {
        let args = [key.clone(), value];

        match self.invoke_slot(SlotKind::SetItem, container, &args).trace()? {
            Some(_) => Ok(()),
            None => Failure::unsupported(format!(
                "'{}' object does not support item assignment",
                self.type_of(container).name()
            ))
            .into(),
        }
    }

    /// `del container[key]`
    pub fn del_item(&self, container: &Value, key: &Value) -> DispatchResult<()> {
        match self
            .invoke_slot(SlotKind::DelItem, container, slice::from_ref(key))
            .trace()?
        {
            Some(_) => Ok(()),
            None => Failure::unsupported(format!(
                "'{}' object does not support item deletion",
                self.type_of(container).name()
            ))
            .into(),
        }
    }

    /// Begin a forward traversal of `container`.
    pub fn iterate<'rt>(&'rt self, container: &Value) -> DispatchResult<SlotIter<'rt>> {
        let ty = self.type_of(container);

        match self.invoke_slot(SlotKind::Iterate, container, &[]).trace()? {
            Some(Value::Iter(it)) => return Ok(SlotIter::new(self, IterState::Native(it))),
            Some(other) => {
                return Failure::unsupported(format!(
                    "__iter__ returned non-iterator of type '{}'",
                    self.type_of(&other).name()
                ))
                .into()
            }
            None => (),
        }

        if ty.has_slot(SlotKind::GetItem) {
            tracing::trace!("[Runtime::iterate] {} derived from __getitem__", ty.name());

            let state = IterState::Indexed {
                target: container.clone(),
                next: 0,
            };

            return Ok(SlotIter::new(self, state));
        }

        Failure::unsupported(format!("'{}' object is not iterable", ty.name())).into()
    }

    /// Begin a backward traversal of `container`.
    pub fn reverse_iterate<'rt>(&'rt self, container: &Value) -> DispatchResult<SlotIter<'rt>> {
        let ty = self.type_of(container);

        if let Some(value) = self.invoke_slot(SlotKind::Reverse, container, &[]).trace()? {
            return match value {
                Value::Iter(it) => Ok(SlotIter::new(self, IterState::Native(it))),
                other => Failure::unsupported(format!(
                    "__reversed__ returned non-iterator of type '{}'",
                    self.type_of(&other).name()
                ))
                .into(),
            };
        }

        if ty.has_slot(SlotKind::Length) && ty.has_slot(SlotKind::GetItem) {
            let len = self.length(container).trace()?;

            tracing::trace!(
                "[Runtime::reverse_iterate] {} derived from __len__ ({}) and __getitem__",
                ty.name(),
                len
            );

            let state = IterState::Reversed {
                target: container.clone(),
                next: len as i64 - 1,
            };

            return Ok(SlotIter::new(self, state));
        }

        Failure::unsupported(format!("'{}' object is not reversible", ty.name())).into()
    }

    /// `item in container`
    ///
    /// Without a `Contains` slot the container is traversed and each element
    /// tested with `is` then `==`, stopping at the first match.
    pub fn contains(&self, container: &Value, item: &Value) -> DispatchResult<bool> {
        let ty = self.type_of(container);

        if let Some(result) = self
            .invoke_slot(SlotKind::Contains, container, slice::from_ref(item))
            .trace()?
        {
            return self.truth(&result).trace();
        }

        if !ty.has_slot(SlotKind::Iterate) && !ty.has_slot(SlotKind::GetItem) {
            return Failure::unsupported(format!(
                "argument of type '{}' is not iterable",
                ty.name()
            ))
            .into();
        }

        for elem in self.iterate(container).trace()? {
            if self.identical_or_equal(&elem.trace()?, item).trace()? {
                return Ok(true);
            }
        }

        Ok(false)
    }

    /// A uniformly random element of a sequence, through `Length` and `GetItem`.
    pub fn choice<R>(&self, sequence: &Value, rng: &mut R) -> DispatchResult<Value>
    where
        R: rand::Rng + ?Sized,
    {
        let len = self.length(sequence).trace()?;

        if len == 0 {
            return Failure::new(ErrorKind::IndexOutOfRange)
                .with_detail("cannot choose from an empty sequence")
                .into();
        }

        let index = rng.random_range(0..len);

        tracing::trace!("[Runtime::choice] picked {} of {}", index, len);

        self.get_item(sequence, &Value::Int(index as i64)).trace()
    }

    /// Drain a forward traversal of `container` into a `Vec`.
    pub fn collect(&self, container: &Value) -> DispatchResult<Vec<Value>> {
        self.iterate(container).trace()?.collect()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicI64, Ordering};
    use std::sync::Arc;

    use dunder_core::{ErrorKind, Failure, SlotKind};

    use crate::object::{TypeBuilder, TypeRef, Value, ValueIter};
    use crate::test::setup;

    /// A sequence of `0..n` that only knows `GetItem`, recording the highest index looked up.
    fn indexed(n: i64, highest: Arc<AtomicI64>) -> TypeRef {
        TypeBuilder::new("Indexed")
            .method(SlotKind::GetItem, move |cx| {
                let [key] = cx.expect_args::<1>()?;
                let index = key.as_int().unwrap_or(-1);

                highest.fetch_max(index, Ordering::SeqCst);

                if (0..n).contains(&index) {
                    Ok(Value::Int(index * 10))
                } else {
                    Failure::index_out_of_range("Indexed").into()
                }
            })
            .build()
    }

    #[test]
    fn iteration_derived_from_getitem() {
        let rt = setup();
        let highest = Arc::new(AtomicI64::new(-1));
        let seq = rt.new_object(&indexed(3, Arc::clone(&highest)), None::<(&str, Value)>);

        let values = rt
            .collect(&seq)
            .unwrap()
            .into_iter()
            .map(|v| v.as_int().unwrap())
            .collect::<Vec<_>>();

        assert_eq!(values, [0, 10, 20]);
        assert_eq!(highest.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn each_iterate_call_is_independent() {
        let rt = setup();
        let seq = rt.new_object(&indexed(2, Default::default()), None::<(&str, Value)>);

        let mut first = rt.iterate(&seq).unwrap();
        first.next();

        assert_eq!(rt.iterate(&seq).unwrap().count(), 2);
        assert_eq!(first.count(), 1);
    }

    #[test]
    fn other_failures_propagate_and_fuse() {
        let rt = setup();
        let broken = TypeBuilder::new("Broken")
            .method(SlotKind::GetItem, |cx| match cx.arg(0)?.as_int() {
                Some(0) => Ok(Value::Int(0)),
                _ => Failure::key_not_found(1).into(),
            })
            .build();

        let seq = rt.new_object(&broken, None::<(&str, Value)>);
        let mut it = rt.iterate(&seq).unwrap();

        assert!(it.next().unwrap().is_ok());
        assert_eq!(it.next().unwrap().unwrap_err().kind, ErrorKind::KeyNotFound);
        assert!(it.next().is_none());
    }

    #[test]
    fn native_iteration_takes_priority() {
        let rt = setup();
        let both = TypeBuilder::new("Both")
            .method(SlotKind::GetItem, |_| Ok(Value::Int(-1)))
            .method(SlotKind::Iterate, |_| {
                Ok(Value::Iter(ValueIter::from_values(vec![Value::Int(1)])))
            })
            .build();

        let obj = rt.new_object(&both, None::<(&str, Value)>);

        assert_eq!(rt.collect(&obj).unwrap().len(), 1);
    }

    #[test]
    fn reverse_is_derived_from_length_and_getitem() {
        let rt = setup();
        let seq = TypeBuilder::new("Seq")
            .method(SlotKind::Length, |_| Ok(Value::Int(3)))
            .method(SlotKind::GetItem, |cx| Ok(cx.arg(0)?.clone()))
            .build();

        let obj = rt.new_object(&seq, None::<(&str, Value)>);

        let values = rt
            .reverse_iterate(&obj)
            .unwrap()
            .map(|v| v.unwrap().as_int().unwrap())
            .collect::<Vec<_>>();

        assert_eq!(values, [2, 1, 0]);

        let only_getitem = rt.new_object(&indexed(3, Default::default()), None::<(&str, Value)>);

        assert_eq!(
            rt.reverse_iterate(&only_getitem).err().map(|f| f.kind),
            Some(ErrorKind::Unsupported)
        );
    }

    #[test]
    fn length_must_be_non_negative() {
        let rt = setup();
        let negative = TypeBuilder::new("Negative")
            .method(SlotKind::Length, |_| Ok(Value::Int(-1)))
            .build();

        let obj = rt.new_object(&negative, None::<(&str, Value)>);

        assert_eq!(rt.length(&obj).unwrap_err().kind, ErrorKind::InvalidLength);
        assert_eq!(rt.length(&Value::Int(1)).unwrap_err().kind, ErrorKind::Unsupported);
    }

    #[test]
    fn contains_short_circuits() {
        let rt = setup();
        let highest = Arc::new(AtomicI64::new(-1));
        let seq = rt.new_object(&indexed(52, Arc::clone(&highest)), None::<(&str, Value)>);

        assert!(rt.contains(&seq, &Value::Int(300)).unwrap());
        assert_eq!(highest.load(Ordering::SeqCst), 30);

        assert!(!rt.contains(&seq, &Value::Int(7)).unwrap());
        assert_eq!(highest.load(Ordering::SeqCst), 52);
    }

    #[test]
    fn contains_without_any_protocol() {
        let rt = setup();
        let opaque = TypeBuilder::new("Opaque").build();
        let obj = rt.new_object(&opaque, None::<(&str, Value)>);

        assert_eq!(
            rt.contains(&obj, &Value::None).unwrap_err().kind,
            ErrorKind::Unsupported
        );
    }

    #[test]
    fn item_assignment_requires_slots() {
        let rt = setup();
        let opaque = TypeBuilder::new("Opaque").build();
        let obj = rt.new_object(&opaque, None::<(&str, Value)>);

        assert_eq!(
            rt.get_item(&obj, &Value::Int(0)).unwrap_err().kind,
            ErrorKind::Unsupported
        );
        assert_eq!(
            rt.set_item(&obj, &Value::Int(0), Value::None).unwrap_err().kind,
            ErrorKind::Unsupported
        );
        assert_eq!(
            rt.del_item(&obj, &Value::Int(0)).unwrap_err().kind,
            ErrorKind::Unsupported
        );
    }

    #[test]
    fn choice_stays_within_the_sequence() {
        use rand::rngs::StdRng;
        use rand::SeedableRng;

        let rt = setup();
        let mut rng = StdRng::seed_from_u64(52);
        let seq = Value::tuple((0..5).map(|n| Value::Int(n * 10)));

        let mut seen = std::collections::BTreeSet::new();

        for _ in 0..200 {
            let picked = rt.choice(&seq, &mut rng).unwrap().as_int().unwrap();

            assert!(rt.contains(&seq, &Value::Int(picked)).unwrap());
            seen.insert(picked);
        }

        assert_eq!(seen.len(), 5);
        assert_eq!(
            rt.choice(&Value::list([]), &mut rng).unwrap_err().kind,
            ErrorKind::IndexOutOfRange
        );
    }
}
