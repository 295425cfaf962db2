use std::sync::Arc;

use dunder_core::{CompareOp, DispatchResult, FailureExt, SlotKind};

use crate::dispatch::Outcome;
use crate::object::{TypeBuilder, TypeRef, Value};
use crate::Runtime;

pub const RANKS: [&str; 13] = [
    "2", "3", "4", "5", "6", "7", "8", "9", "10", "J", "Q", "K", "A",
];

pub const SUITS: [&str; 4] = ["spades", "diamonds", "clubs", "hearts"];

// -- Card

/// `(rank, suit)` as a tuple, what a `Card` indexes, compares and hashes as.
fn fields(rt: &Runtime, card: &Value) -> DispatchResult<Value> {
    let rank = rt.get_attr(card, "rank").trace()?;
    let suit = rt.get_attr(card, "suit").trace()?;

    Ok(Value::tuple([rank, suit]))
}

/// A named pair: `.rank` and `.suit`, or `card[0]` and `card[1]`.
fn card_type() -> TypeRef {
    TypeBuilder::new("Card")
        .method(SlotKind::Length, |_| Ok(Value::Int(2)))
        .method(SlotKind::GetItem, |cx| {
            let fields = fields(cx.rt, cx.receiver)?;
            cx.rt.get_item(&fields, cx.arg(0)?)
        })
        .slot(SlotKind::Compare(CompareOp::Eq), |cx| {
            let other = cx.arg(0)?;

            if !Arc::ptr_eq(cx.rt.type_of(cx.receiver), cx.rt.type_of(other)) {
                return Ok(Outcome::NotApplicable);
            }

            let (a, b) = (fields(cx.rt, cx.receiver)?, fields(cx.rt, other)?);

            Ok(cx.rt.compare(CompareOp::Eq, &a, &b)?.into())
        })
        .method(SlotKind::Hash, |cx| {
            let fields = fields(cx.rt, cx.receiver)?;
            Ok(Value::Int(cx.rt.hash_of(&fields)? as i64))
        })
        .method(SlotKind::Repr, |cx| {
            let rank = cx.rt.get_attr(cx.receiver, "rank")?;
            let suit = cx.rt.get_attr(cx.receiver, "suit")?;

            Ok(Value::str(format!(
                "Card(rank={}, suit={})",
                cx.rt.repr(&rank)?,
                cx.rt.repr(&suit)?
            )))
        })
        .build()
}

// -- FrenchDeck

/// A deck that delegates `Length` and `GetItem` to its `_cards` list, and
/// implements nothing else.
fn deck_type() -> TypeRef {
    TypeBuilder::new("FrenchDeck")
        .method(SlotKind::Length, |cx| {
            let cards = cx.rt.get_attr(cx.receiver, "_cards")?;
            Ok(Value::Int(cx.rt.length(&cards)? as i64))
        })
        .method(SlotKind::GetItem, |cx| {
            let cards = cx.rt.get_attr(cx.receiver, "_cards")?;
            cx.rt.get_item(&cards, cx.arg(0)?)
        })
        .build()
}

/// The `Card` and `FrenchDeck` types.
#[derive(Debug, Clone)]
pub struct Cards {
    pub card_type: TypeRef,
    pub deck_type: TypeRef,
}

impl Default for Cards {
    fn default() -> Self {
        Self::new()
    }
}

impl Cards {
    pub fn new() -> Self {
        Self {
            card_type: card_type(),
            deck_type: deck_type(),
        }
    }

    pub fn card(&self, rt: &Runtime, rank: &str, suit: &str) -> Value {
        rt.new_object(
            &self.card_type,
            [("rank", Value::str(rank)), ("suit", Value::str(suit))],
        )
    }

    /// All 52 cards, suit by suit in `SUITS` order, ranks ascending.
    pub fn deck(&self, rt: &Runtime) -> Value {
        let cards = SUITS
            .iter()
            .flat_map(|suit| RANKS.iter().map(move |rank| self.card(rt, rank, suit)))
            .collect::<Vec<_>>();

        rt.new_object(&self.deck_type, [("_cards", Value::list(cards))])
    }
}

/// Rank first, then suit with spades highest and clubs lowest.
pub fn spades_high(rt: &Runtime, card: &Value) -> DispatchResult<usize> {
    let rank = rt.get_attr(card, "rank").trace()?;
    let suit = rt.get_attr(card, "suit").trace()?;

    let rank = RANKS
        .iter()
        .position(|r| Some(*r) == rank.as_str())
        .unwrap_or_default();

    let suit = match suit.as_str() {
        Some("spades") => 3,
        Some("hearts") => 2,
        Some("diamonds") => 1,
        _ => 0,
    };

    Ok(rank * SUITS.len() + suit)
}

#[cfg(test)]
mod tests {
    use dunder_core::ErrorKind;

    use super::*;
    use crate::test::setup;

    #[test]
    fn cards_are_named_pairs() {
        let rt = setup();
        let cards = Cards::new();
        let card = cards.card(&rt, "Q", "hearts");

        assert_eq!(rt.get_attr(&card, "rank").unwrap().as_str(), Some("Q"));
        assert_eq!(rt.get_item(&card, &Value::Int(-1)).unwrap().as_str(), Some("hearts"));
        assert_eq!(rt.repr(&card).unwrap(), "Card(rank='Q', suit='hearts')");

        let twin = cards.card(&rt, "Q", "hearts");

        assert!(rt.compare_bool(CompareOp::Eq, &card, &twin).unwrap());
        assert!(rt.compare_bool(CompareOp::Ne, &card, &cards.card(&rt, "Q", "clubs")).unwrap());
        assert_eq!(rt.hash_of(&card).unwrap(), rt.hash_of(&twin).unwrap());

        // a bare tuple is not a card.
        let tuple = Value::tuple([Value::str("Q"), Value::str("hearts")]);
        assert!(!rt.compare_bool(CompareOp::Eq, &card, &tuple).unwrap());
        assert_eq!(
            rt.compare(CompareOp::Lt, &card, &twin).unwrap_err().kind,
            ErrorKind::UnorderableTypes
        );
    }

    #[test]
    fn spades_high_ordering() {
        let rt = setup();
        let cards = Cards::new();

        let key = |rank, suit| spades_high(&rt, &cards.card(&rt, rank, suit)).unwrap();

        assert_eq!(key("2", "clubs"), 0);
        assert_eq!(key("2", "spades"), 3);
        assert_eq!(key("A", "spades"), 51);
        assert!(key("3", "clubs") > key("2", "spades"));
    }
}
