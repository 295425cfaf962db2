use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use dunder_core::{BinaryOp, SlotKind};

use super::*;
use crate::object::TypeBuilder;
use crate::test::setup;

#[test]
pub fn every_value_has_a_type() {
    let rt = setup();

    let cases = [
        (Value::None, "NoneType"),
        (Value::Bool(true), "bool"),
        (Value::Int(1), "int"),
        (Value::Float(1.0), "float"),
        (Value::str("a"), "str"),
        (Value::tuple([]), "tuple"),
        (Value::list([]), "list"),
        (Value::slice(None, Some(1), None), "slice"),
        (Value::Type(Arc::clone(&rt.builtins.int_type)), "type"),
    ];

    for (value, name) in cases {
        assert_eq!(rt.type_of(&value).name(), name);
    }

    assert!(rt.builtins.bool_type.is_strict_subtype_of(&rt.builtins.int_type));
}

#[test]
pub fn registry() {
    let rt = setup();
    let deck = TypeBuilder::new("Deck").build();

    assert!(rt.register(&deck).is_none());
    assert!(rt.register(&deck).is_some());
    assert!(Arc::ptr_eq(&rt.lookup_type("Deck").unwrap(), &deck));
    assert!(rt.lookup_type("Hand").is_none());
}

#[test]
pub fn shared_between_threads() {
    let rt = setup();
    let calls = Arc::new(AtomicUsize::new(0));
    let seen = Arc::clone(&calls);

    let counter = TypeBuilder::new("Counter")
        .method(SlotKind::Binary(BinaryOp::Add), move |cx| {
            seen.fetch_add(1, Ordering::SeqCst);
            cx.rt.get_attr(cx.receiver, "n")
        })
        .build();

    std::thread::scope(|s| {
        for n in 0..4 {
            let (rt, counter) = (&rt, &counter);

            s.spawn(move || {
                let obj = rt.new_object(counter, [("n", Value::Int(n))]);

                for _ in 0..100 {
                    let got = rt.binary_op(BinaryOp::Add, &obj, &Value::None).unwrap();
                    assert_eq!(got.as_int(), Some(n));
                }
            });
        }
    });

    assert_eq!(calls.load(Ordering::SeqCst), 400);
}
