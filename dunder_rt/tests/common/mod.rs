//! Shared fixtures for the integration suite.
#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use dunder_rt::walkthrough::{self, Cards};
use dunder_rt::{Runtime, SlotKind, TypeBuilder, TypeRef, Value};
use tracing_subscriber::EnvFilter;

pub fn setup() -> Runtime {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init();

    Runtime::new()
}

/// The walkthrough cards, with a deck that counts every `GetItem` call
/// before handing it to the plain `FrenchDeck` handler.
pub fn counting_cards(lookups: &Arc<AtomicUsize>) -> Cards {
    let cards = Cards::new();
    let lookups = Arc::clone(lookups);

    let getitem = cards
        .deck_type
        .slot(SlotKind::GetItem)
        .map(Arc::clone)
        .expect("FrenchDeck declares GetItem");

    let counting = TypeBuilder::new("CountingDeck")
        .parent(&cards.deck_type)
        .slot(SlotKind::GetItem, move |cx| {
            lookups.fetch_add(1, Ordering::SeqCst);
            getitem(cx)
        })
        .build();

    Cards {
        deck_type: counting,
        ..cards
    }
}

pub fn vector_type() -> TypeRef {
    walkthrough::vector_type()
}

pub fn vector(rt: &Runtime, class: &TypeRef, x: i64, y: i64) -> Value {
    walkthrough::vector(rt, class, Value::Int(x), Value::Int(y)).unwrap()
}
