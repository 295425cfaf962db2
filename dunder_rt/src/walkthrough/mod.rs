//! Ready made types showing the protocols working together.
//!
//! `Card` and `FrenchDeck` are sequences built from nothing but `Length` and
//! `GetItem`, `Vector` is a numeric type built from operator, truthiness and
//! `Repr` slots. The `dunder` binary walks through both.

mod cards;
mod vector;

pub use self::{
    cards::{spades_high, Cards, RANKS, SUITS},
    vector::{vector, vector_type},
};
