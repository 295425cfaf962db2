mod common;

use std::collections::BTreeSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use dunder_rt::walkthrough::spades_high;
use dunder_rt::{BinaryOp, ErrorKind, UnaryOp, Value};
use rand::rngs::StdRng;
use rand::SeedableRng;

use common::{counting_cards, setup, vector, vector_type};

#[test]
fn deck_is_a_sequence() {
    let rt = setup();
    let cards = counting_cards(&Default::default());
    let deck = cards.deck(&rt);

    assert_eq!(rt.length(&deck).unwrap(), 52);
    assert_eq!(
        rt.repr(&rt.get_item(&deck, &Value::Int(0)).unwrap()).unwrap(),
        "Card(rank='2', suit='spades')"
    );
    assert_eq!(
        rt.repr(&rt.get_item(&deck, &Value::Int(-1)).unwrap()).unwrap(),
        "Card(rank='A', suit='hearts')"
    );
    assert!(rt.truth(&deck).unwrap());
    assert_eq!(rt.collect(&deck).unwrap().len(), 52);
    assert_eq!(
        rt.get_item(&deck, &Value::str("first")).unwrap_err().kind,
        ErrorKind::WrongKeyType
    );
}

#[test]
fn deck_slices_through_its_cards() {
    let rt = setup();
    let cards = counting_cards(&Default::default());
    let deck = cards.deck(&rt);

    let top = rt.get_item(&deck, &Value::slice(None, Some(3), None)).unwrap();

    assert_eq!(
        rt.repr(&top).unwrap(),
        "[Card(rank='2', suit='spades'), Card(rank='3', suit='spades'), Card(rank='4', suit='spades')]"
    );

    // every 13th card starting from the 12th is an ace.
    let aces = rt.get_item(&deck, &Value::slice(Some(12), None, Some(13))).unwrap();

    assert_eq!(rt.length(&aces).unwrap(), 4);

    for ace in rt.collect(&aces).unwrap() {
        assert_eq!(rt.get_attr(&ace, "rank").unwrap().as_str(), Some("A"));
    }

    let stepped = rt.get_item(&deck, &Value::slice(Some(0), Some(10), Some(2))).unwrap();
    assert_eq!(rt.length(&stepped).unwrap(), 5);
}

#[test]
fn random_cards_come_from_the_deck() {
    let rt = setup();
    let cards = counting_cards(&Default::default());
    let deck = cards.deck(&rt);
    let mut rng = StdRng::seed_from_u64(7);

    let mut seen = BTreeSet::new();

    for _ in 0..20 {
        let card = rt.choice(&deck, &mut rng).unwrap();

        assert!(rt.contains(&deck, &card).unwrap());
        seen.insert(rt.repr(&card).unwrap());
    }

    assert!(seen.len() > 1);
}

#[test]
fn deck_reverses_through_len_and_getitem() {
    let rt = setup();
    let cards = counting_cards(&Default::default());
    let deck = cards.deck(&rt);

    let first = rt.reverse_iterate(&deck).unwrap().next().unwrap().unwrap();

    assert!(rt.identical_or_equal(&first, &cards.card(&rt, "A", "hearts")).unwrap());
}

#[test]
fn deck_sorts_spades_high() {
    let rt = setup();
    let cards = counting_cards(&Default::default());
    let deck = cards.deck(&rt);

    let mut sorted = rt
        .iterate(&deck)
        .unwrap()
        .map(|card| {
            let card = card.unwrap();
            (spades_high(&rt, &card).unwrap(), card)
        })
        .collect::<Vec<_>>();

    sorted.sort_by_key(|(key, _)| *key);

    let lowest = &sorted[0].1;
    let highest = &sorted[51].1;

    assert_eq!(rt.repr(lowest).unwrap(), "Card(rank='2', suit='clubs')");
    assert_eq!(rt.repr(highest).unwrap(), "Card(rank='A', suit='spades')");
}

#[test]
fn membership_short_circuits_at_the_match() {
    let rt = setup();
    let lookups = Arc::new(AtomicUsize::new(0));
    let cards = counting_cards(&lookups);
    let deck = cards.deck(&rt);

    // spades and diamonds fill 0..26, clubs start at 26 so the 6 of clubs sits at 30.
    let present = cards.card(&rt, "6", "clubs");
    assert!(rt
        .identical_or_equal(&rt.get_item(&deck, &Value::Int(30)).unwrap(), &present)
        .unwrap());

    lookups.store(0, Ordering::SeqCst);

    assert!(rt.contains(&deck, &present).unwrap());
    assert_eq!(lookups.load(Ordering::SeqCst), 31);
}

#[test]
fn membership_of_an_absent_card_exhausts_the_deck() {
    let rt = setup();
    let lookups = Arc::new(AtomicUsize::new(0));
    let cards = counting_cards(&lookups);
    let deck = cards.deck(&rt);

    assert!(!rt.contains(&deck, &cards.card(&rt, "Q", "beasts")).unwrap());

    // 52 elements and the lookup at 52 that ends the iteration.
    assert_eq!(lookups.load(Ordering::SeqCst), 53);
    assert!(rt.contains(&deck, &cards.card(&rt, "Q", "hearts")).unwrap());
}

#[test]
fn vector_arithmetic() {
    let rt = setup();
    let class = vector_type();

    let v1 = vector(&rt, &class, 2, 4);
    let v2 = vector(&rt, &class, 2, 1);
    let v3 = rt.call(&Value::Type(Arc::clone(&class)), &[]).unwrap();

    assert_eq!(rt.repr(&v1).unwrap(), "Vector(2, 4)");

    let sum = rt.binary_op(BinaryOp::Add, &v1, &v2).unwrap();
    assert_eq!(rt.repr(&sum).unwrap(), "Vector(4, 5)");

    let magnitude = rt.unary_op(UnaryOp::Abs, &v1).unwrap();
    assert!((magnitude.as_float().unwrap() - 4.47213595499958).abs() < 1e-12);

    assert!(rt.truth(&v1).unwrap());
    assert!(!rt.truth(&v3).unwrap());

    let scaled = rt.binary_op(BinaryOp::Mul, &v2, &Value::Int(8)).unwrap();
    assert_eq!(rt.repr(&scaled).unwrap(), "Vector(16, 8)");
}

#[test]
fn vector_rejects_what_it_does_not_know() {
    let rt = setup();
    let class = vector_type();
    let v = vector(&rt, &class, 1, 1);

    // no reflected `Mul`, so `8 * v` has nowhere to go.
    assert_eq!(
        rt.binary_op(BinaryOp::Mul, &Value::Int(8), &v).unwrap_err().kind,
        ErrorKind::UnsupportedOperand
    );
    assert_eq!(
        rt.binary_op(BinaryOp::Add, &v, &Value::Int(1)).unwrap_err().kind,
        ErrorKind::UnsupportedOperand
    );
    assert_eq!(rt.hash_of(&v).unwrap(), rt.hash_of(&v.clone()).unwrap());
}
