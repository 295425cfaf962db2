//! `str`, `tuple` and `list`.
//!
//! List handlers never hold the storage lock while calling back into the
//! runtime, they snapshot first.

use std::sync::Arc;

use dunder_core::{BinaryOp, CompareOp, DispatchResult, ErrorKind, Failure, FailureExt, SlotKind};

use crate::dispatch::{CallCx, Outcome};
use crate::object::{ListRef, Slice, TypeBuilder, TypeRef, Value, ValueIter};
use crate::Runtime;

fn mismatch(cx: &CallCx<'_>, expected: &str) -> Failure {
    Failure::invalid_arguments(format!(
        "descriptor requires a '{}' receiver, got '{}'",
        expected,
        cx.rt.type_of(cx.receiver).name()
    ))
}

fn receiver_str<'a>(cx: &CallCx<'a>) -> DispatchResult<&'a str> {
    cx.receiver.as_str().ok_or_else(|| mismatch(cx, "str"))
}

fn receiver_tuple<'a>(cx: &CallCx<'a>) -> DispatchResult<&'a Arc<[Value]>> {
    match cx.receiver {
        Value::Tuple(items) => Ok(items),
        _ => Err(mismatch(cx, "tuple")),
    }
}

fn receiver_list<'a>(cx: &CallCx<'a>) -> DispatchResult<&'a ListRef> {
    match cx.receiver {
        Value::List(list) => Ok(list),
        _ => Err(mismatch(cx, "list")),
    }
}

/// Resolve a possibly negative integer key against `len`.
pub(super) fn normalize_index(
    rt: &Runtime,
    type_name: &str,
    len: usize,
    key: &Value,
) -> DispatchResult<usize> {
    let index = match key {
        Value::Int(n) => *n,
        Value::Bool(b) => *b as i64,
        other => return Failure::wrong_key_type(type_name, rt.type_of(other).name()).into(),
    };

    let adjusted = if index < 0 { index + len as i64 } else { index };

    if (0..len as i64).contains(&adjusted) {
        Ok(adjusted as usize)
    } else {
        Failure::index_out_of_range(type_name).into()
    }
}

/// The elements of `items` a slice key selects.
fn sliced<T: Clone>(items: &[T], slice: &Slice) -> DispatchResult<Vec<T>> {
    Ok(slice.positions(items.len())?.map(|n| items[n].clone()).collect())
}

/// Compare element-wise up to the first difference, then by length.
fn lexicographic(rt: &Runtime, op: CompareOp, a: &[Value], b: &[Value]) -> DispatchResult<bool> {
    for (x, y) in a.iter().zip(b) {
        if !rt.identical_or_equal(x, y).trace()? {
            return match op {
                CompareOp::Eq => Ok(false),
                CompareOp::Ne => Ok(true),
                _ => rt.compare_bool(op, x, y).trace(),
            };
        }
    }

    Ok(op.test(a.len().cmp(&b.len())))
}

fn too_long() -> Failure {
    Failure::raised("OverflowError: repeated sequence is too long")
}

fn out_of_memory() -> Failure {
    Failure::raised("MemoryError: cannot allocate the repeated sequence")
}

/// The repeat count and the total length of `len` units repeated `times` times.
fn repeat_len(len: usize, times: i64) -> DispatchResult<(usize, usize)> {
    if times <= 0 || len == 0 {
        return Ok((0, 0));
    }

    let times = usize::try_from(times).map_err(|_| too_long())?;
    let total = len.checked_mul(times).ok_or_else(too_long)?;

    Ok((times, total))
}

fn repeat(items: &[Value], times: i64) -> DispatchResult<Vec<Value>> {
    let (times, total) = repeat_len(items.len(), times)?;
    let mut out = Vec::new();

    out.try_reserve_exact(total).map_err(|_| out_of_memory())?;

    for _ in 0..times {
        out.extend_from_slice(items);
    }

    Ok(out)
}

fn repeat_str(st: &str, times: i64) -> DispatchResult<String> {
    let (times, total) = repeat_len(st.len(), times)?;
    let mut out = String::new();

    out.try_reserve_exact(total).map_err(|_| out_of_memory())?;

    for _ in 0..times {
        out.push_str(st);
    }

    Ok(out)
}

fn join_reprs(rt: &Runtime, items: &[Value]) -> DispatchResult<String> {
    let reprs = items
        .iter()
        .map(|item| rt.repr(item))
        .collect::<DispatchResult<Vec<_>>>()?;

    Ok(reprs.join(", "))
}

/// Single quoted unless the string contains a single quote and no double quote.
fn str_repr(st: &str) -> String {
    let quote = if st.contains('\'') && !st.contains('"') { '"' } else { '\'' };
    let mut out = String::with_capacity(st.len() + 2);

    out.push(quote);

    for ch in st.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            c => out.push(c),
        }
    }

    out.push(quote);
    out
}

pub(super) fn str_type() -> TypeRef {
    let mut builder = TypeBuilder::new("str")
        .method(SlotKind::Length, |cx| {
            Ok(Value::Int(receiver_str(&cx)?.chars().count() as i64))
        })
        .method(SlotKind::GetItem, |cx| {
            let st = receiver_str(&cx)?;
            let [key] = cx.expect_args::<1>()?;

            if let Value::Slice(slice) = key {
                let chars = st.chars().collect::<Vec<_>>();
                return Ok(Value::str(sliced(&chars, slice)?.into_iter().collect::<String>()));
            }

            let index = normalize_index(cx.rt, "string", st.chars().count(), key)?;

            Ok(st
                .chars()
                .nth(index)
                .map(|ch| Value::str(ch.to_string()))
                .unwrap_or_default())
        })
        .method(SlotKind::Contains, |cx| {
            let st = receiver_str(&cx)?;

            match cx.expect_args::<1>()? {
                [Value::Str(needle)] => Ok(Value::Bool(st.contains(&**needle))),
                [other] => Failure::new(ErrorKind::WrongKeyType)
                    .with_detail(format!(
                        "'in <string>' requires string as left operand, not {}",
                        cx.rt.type_of(other).name()
                    ))
                    .into(),
            }
        })
        .method(SlotKind::Iterate, |cx| {
            let chars = receiver_str(&cx)?
                .chars()
                .map(|ch| Value::str(ch.to_string()))
                .collect::<Vec<_>>();

            Ok(Value::Iter(ValueIter::from_values(chars)))
        })
        .slot(SlotKind::Binary(BinaryOp::Add), |cx| {
            let st = receiver_str(&cx)?;

            Ok(match cx.expect_args::<1>()? {
                [Value::Str(other)] => Value::str(format!("{}{}", st, other)).into(),
                _ => Outcome::NotApplicable,
            })
        })
        .method(SlotKind::Hash, |cx| {
            Ok(Value::Int(cx.rt.hash(receiver_str(&cx)?) as i64))
        })
        .method(SlotKind::Repr, |cx| Ok(Value::str(str_repr(receiver_str(&cx)?))));

    for kind in [SlotKind::Binary(BinaryOp::Mul), SlotKind::Reflected(BinaryOp::Mul)] {
        builder = builder.slot(kind, |cx| {
            let st = receiver_str(&cx)?;
            let [times] = cx.expect_args::<1>()?;

            match times.as_int() {
                Some(n) => Ok(Value::str(repeat_str(st, n)?).into()),
                None => Ok(Outcome::NotApplicable),
            }
        });
    }

    for op in CompareOp::ALL {
        builder = builder.slot(SlotKind::Compare(op), move |cx| {
            let st = receiver_str(&cx)?;

            Ok(match cx.expect_args::<1>()? {
                [Value::Str(other)] => Value::Bool(op.test(st.cmp(&**other))).into(),
                _ => Outcome::NotApplicable,
            })
        });
    }

    builder.build()
}

pub(super) fn tuple_type() -> TypeRef {
    let mut builder = TypeBuilder::new("tuple")
        .method(SlotKind::Length, |cx| Ok(Value::Int(receiver_tuple(&cx)?.len() as i64)))
        .method(SlotKind::GetItem, |cx| {
            let items = receiver_tuple(&cx)?;
            let [key] = cx.expect_args::<1>()?;

            match key {
                Value::Slice(slice) => Ok(Value::tuple(sliced(items, slice)?)),
                key => Ok(items[normalize_index(cx.rt, "tuple", items.len(), key)?].clone()),
            }
        })
        .method(SlotKind::Iterate, |cx| {
            let items = Arc::clone(receiver_tuple(&cx)?);

            Ok(Value::Iter(ValueIter::new(
                (0..items.len()).map(move |n| Ok(items[n].clone())),
            )))
        })
        .slot(SlotKind::Binary(BinaryOp::Add), |cx| {
            let items = receiver_tuple(&cx)?;

            Ok(match cx.expect_args::<1>()? {
                [Value::Tuple(other)] => {
                    Value::tuple(items.iter().chain(other.iter()).cloned()).into()
                }
                _ => Outcome::NotApplicable,
            })
        })
        .method(SlotKind::Hash, |cx| {
            let hashes = receiver_tuple(&cx)?
                .iter()
                .map(|item| cx.rt.hash_of(item))
                .collect::<DispatchResult<Vec<_>>>()?;

            Ok(Value::Int(cx.rt.hash(hashes) as i64))
        })
        .method(SlotKind::Repr, |cx| {
            let items = receiver_tuple(&cx)?;
            let trailing = if items.len() == 1 { "," } else { "" };

            Ok(Value::str(format!("({}{})", join_reprs(cx.rt, items)?, trailing)))
        });

    for kind in [SlotKind::Binary(BinaryOp::Mul), SlotKind::Reflected(BinaryOp::Mul)] {
        builder = builder.slot(kind, |cx| {
            let items = receiver_tuple(&cx)?;
            let [times] = cx.expect_args::<1>()?;

            match times.as_int() {
                Some(n) => Ok(Value::tuple(repeat(items, n)?).into()),
                None => Ok(Outcome::NotApplicable),
            }
        });
    }

    for op in CompareOp::ALL {
        builder = builder.slot(SlotKind::Compare(op), move |cx| {
            let items = receiver_tuple(&cx)?;

            match cx.expect_args::<1>()? {
                [Value::Tuple(other)] => {
                    Ok(Value::Bool(lexicographic(cx.rt, op, items, other)?).into())
                }
                _ => Ok(Outcome::NotApplicable),
            }
        });
    }

    builder.build()
}

pub(super) fn list_type() -> TypeRef {
    let mut builder = TypeBuilder::new("list")
        .method(SlotKind::Length, |cx| Ok(Value::Int(receiver_list(&cx)?.read().len() as i64)))
        .method(SlotKind::GetItem, |cx| {
            let list = receiver_list(&cx)?.read();
            let [key] = cx.expect_args::<1>()?;

            match key {
                Value::Slice(slice) => Ok(Value::list(sliced(list.as_slice(), slice)?)),
                key => Ok(list[normalize_index(cx.rt, "list", list.len(), key)?].clone()),
            }
        })
        .method(SlotKind::SetItem, |cx| {
            let [key, value] = cx.expect_args::<2>()?;
            let mut list = receiver_list(&cx)?.write();

            let index = normalize_index(cx.rt, "list assignment", list.len(), key)?;
            list[index] = value.clone();

            Ok(Value::None)
        })
        .method(SlotKind::DelItem, |cx| {
            let [key] = cx.expect_args::<1>()?;
            let mut list = receiver_list(&cx)?.write();

            if let Value::Slice(slice) = key {
                let mut doomed = slice.positions(list.len())?.collect::<Vec<_>>();
                doomed.sort_unstable_by(|a, b| b.cmp(a));

                for index in doomed {
                    list.remove(index);
                }

                return Ok(Value::None);
            }

            let index = normalize_index(cx.rt, "list assignment", list.len(), key)?;
            list.remove(index);

            Ok(Value::None)
        })
        .method(SlotKind::Iterate, |cx| {
            let snapshot = receiver_list(&cx)?.read().clone();

            Ok(Value::Iter(ValueIter::from_values(snapshot)))
        })
        .method(SlotKind::Reverse, |cx| {
            let snapshot = receiver_list(&cx)?.read().clone();

            Ok(Value::Iter(ValueIter::from_values(snapshot.into_iter().rev())))
        })
        .slot(SlotKind::Binary(BinaryOp::Add), |cx| {
            let mut items = receiver_list(&cx)?.read().clone();

            match cx.expect_args::<1>()? {
                [Value::List(other)] => {
                    let other = other.read().clone();
                    items.extend(other);

                    Ok(Value::list(items).into())
                }
                _ => Ok(Outcome::NotApplicable),
            }
        })
        .method(SlotKind::InPlace(BinaryOp::Add), |cx| {
            let [other] = cx.expect_args::<1>()?;
            let extra = cx.rt.collect(other).trace()?;

            receiver_list(&cx)?.write().extend(extra);

            Ok(cx.receiver.clone())
        })
        .method(SlotKind::Repr, |cx| {
            let snapshot = receiver_list(&cx)?.read().clone();

            Ok(Value::str(format!("[{}]", join_reprs(cx.rt, &snapshot)?)))
        })
        .function("append", |_, args| match args {
            [Value::List(list), item] => {
                list.write().push(item.clone());
                Ok(Value::None)
            }
            _ => Failure::invalid_arguments("append() takes exactly one argument").into(),
        })
        .function("pop", |_, args| match args {
            [Value::List(list)] => match list.write().pop() {
                Some(item) => Ok(item),
                None => Failure::new(ErrorKind::IndexOutOfRange)
                    .with_detail("pop from empty list")
                    .into(),
            },
            _ => Failure::invalid_arguments("pop() takes no arguments").into(),
        });

    for kind in [SlotKind::Binary(BinaryOp::Mul), SlotKind::Reflected(BinaryOp::Mul)] {
        builder = builder.slot(kind, |cx| {
            let snapshot = receiver_list(&cx)?.read().clone();
            let [times] = cx.expect_args::<1>()?;

            match times.as_int() {
                Some(n) => Ok(Value::list(repeat(&snapshot, n)?).into()),
                None => Ok(Outcome::NotApplicable),
            }
        });
    }

    // no `Hash`, lists compare by value so they are unhashable.
    for op in CompareOp::ALL {
        builder = builder.slot(SlotKind::Compare(op), move |cx| {
            let items = receiver_list(&cx)?.read().clone();

            match cx.expect_args::<1>()? {
                [Value::List(other)] => {
                    let other = other.read().clone();

                    Ok(Value::Bool(lexicographic(cx.rt, op, &items, &other)?).into())
                }
                _ => Ok(Outcome::NotApplicable),
            }
        });
    }

    builder.build()
}

pub(super) fn slice_type() -> TypeRef {
    let mut builder = TypeBuilder::new("slice")
        .method(SlotKind::Hash, |cx| match cx.receiver {
            Value::Slice(slice) => Ok(Value::Int(cx.rt.hash(slice) as i64)),
            _ => Err(mismatch(&cx, "slice")),
        })
        .method(SlotKind::Repr, |cx| Ok(Value::str(format!("{:?}", cx.receiver))));

    for op in [CompareOp::Eq, CompareOp::Ne] {
        builder = builder.slot(SlotKind::Compare(op), move |cx| {
            Ok(match (cx.receiver, cx.expect_args::<1>()?) {
                (Value::Slice(a), [Value::Slice(b)]) => {
                    Value::Bool((a == b) == (op == CompareOp::Eq)).into()
                }
                _ => Outcome::NotApplicable,
            })
        });
    }

    builder.build()
}
