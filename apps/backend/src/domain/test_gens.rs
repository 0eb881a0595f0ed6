// Proptest generators for domain types.
// Card sets are drawn without replacement so no set repeats a card.

use proptest::prelude::*;
use proptest::sample::subsequence;

use crate::domain::{Card, Deck, Rank, Suit};

pub fn suit() -> impl Strategy<Value = Suit> {
    proptest::sample::select(Suit::ALL.to_vec())
}

pub fn rank() -> impl Strategy<Value = Rank> {
    proptest::sample::select(Rank::ALL.to_vec())
}

pub fn card() -> impl Strategy<Value = Card> {
    (suit(), rank()).prop_map(|(suit, rank)| Card { suit, rank })
}

/// Between `min` and `max` distinct cards, shuffled.
pub fn unique_cards(min: usize, max: usize) -> impl Strategy<Value = Vec<Card>> {
    subsequence(Deck::new().cards().to_vec(), min..=max).prop_shuffle()
}

/// A run of `len` consecutive ranks starting at `start`, one card each.
pub fn straight() -> impl Strategy<Value = Vec<Card>> {
    (3usize..=12)
        .prop_flat_map(|len| (Just(len), 0..=(13 - len)))
        .prop_flat_map(|(len, start)| {
            proptest::collection::vec(suit(), len).prop_map(move |suits| {
                suits
                    .into_iter()
                    .enumerate()
                    .map(|(i, suit)| Card {
                        suit,
                        rank: Rank::ALL[start + i],
                    })
                    .collect()
            })
        })
}

/// Four of one rank.
pub fn four_of_kind() -> impl Strategy<Value = Vec<Card>> {
    rank().prop_map(|rank| Suit::ALL.iter().map(|&suit| Card { suit, rank }).collect())
}

/// `pairs` consecutive pairs (3..=6 pairs), suits drawn per pair.
pub fn consecutive_pairs() -> impl Strategy<Value = Vec<Card>> {
    (3usize..=6)
        .prop_flat_map(|pairs| (Just(pairs), 0..=(13 - pairs)))
        .prop_flat_map(|(pairs, start)| {
            proptest::collection::vec(subsequence(Suit::ALL.to_vec(), 2), pairs).prop_map(
                move |suit_pairs| {
                    suit_pairs
                        .into_iter()
                        .enumerate()
                        .flat_map(|(i, suits)| {
                            let rank = Rank::ALL[start + i];
                            suits.into_iter().map(move |suit| Card { suit, rank })
                        })
                        .collect()
                },
            )
        })
}

/// 2..=4 players.
pub fn player_count() -> impl Strategy<Value = usize> {
    2usize..=4
}
