//! The card deck walkthrough, a sequence built from `Length` and `GetItem` alone.

use anyhow::Context;
use dunder_rt::walkthrough::{spades_high, Cards};
use dunder_rt::{DispatchResult, Runtime, Value};

pub fn run(rt: &Runtime, sample: usize, choose: usize, sorted: bool) -> anyhow::Result<()> {
    let cards = Cards::new();
    rt.register(&cards.card_type);
    rt.register(&cards.deck_type);

    let deck = cards.deck(rt);

    println!("len(deck) = {}", rt.length(&deck)?);
    println!("deck[0] = {}", rt.repr(&rt.get_item(&deck, &Value::Int(0))?)?);
    println!("deck[-1] = {}", rt.repr(&rt.get_item(&deck, &Value::Int(-1))?)?);

    let top = rt.get_item(&deck, &Value::slice(None, Some(3), None))?;
    println!("deck[:3] = {}", rt.repr(&top)?);

    let step = i64::try_from(sample.max(1)).context("--sample is too large")?;
    let sampled = rt.get_item(&deck, &Value::slice(Some(step - 1), None, Some(step)))?;
    println!("deck[{}::{}] = {}", step - 1, step, rt.repr(&sampled)?);

    let mut rng = rand::rng();

    for _ in 0..choose {
        println!("choice(deck) = {}", rt.repr(&rt.choice(&deck, &mut rng)?)?);
    }

    for needle in [cards.card(rt, "Q", "hearts"), cards.card(rt, "7", "beasts")] {
        println!("{} in deck = {}", rt.repr(&needle)?, rt.contains(&deck, &needle)?);
    }

    let last = rt
        .reverse_iterate(&deck)?
        .next()
        .context("the deck is empty")??;

    println!("reversed(deck)[0] = {}", rt.repr(&last)?);

    if sorted {
        let mut keyed = rt
            .iterate(&deck)?
            .map(|card| -> DispatchResult<(usize, Value)> {
                let card = card?;
                Ok((spades_high(rt, &card)?, card))
            })
            .collect::<DispatchResult<Vec<_>>>()?;

        keyed.sort_by_key(|(key, _)| *key);

        for (_, card) in keyed {
            println!("{}", rt.repr(&card)?);
        }
    }

    Ok(())
}
