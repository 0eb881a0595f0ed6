//! Hand classification: which shape a set of cards forms.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::{Card, Rank};

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HandCategory {
    Single,
    Pair,
    Triple,
    /// Three or more cards with strictly consecutive rank values.
    Straight,
    /// Three or more consecutive ranks, exactly two cards of each.
    ConsecutivePairs,
    FourOfKind,
    /// Not a legal play.
    Other,
}

impl HandCategory {
    /// Bomb categories beat every non-bomb play regardless of size.
    pub const fn is_bomb(self) -> bool {
        matches!(self, HandCategory::FourOfKind | HandCategory::ConsecutivePairs)
    }

    pub const fn is_valid(self) -> bool {
        !matches!(self, HandCategory::Other)
    }
}

/// Count cards per rank. `None` when the set repeats a card.
fn rank_counts(cards: &[Card]) -> Option<BTreeMap<Rank, usize>> {
    let mut seen = Vec::with_capacity(cards.len());
    let mut counts = BTreeMap::new();
    for card in cards {
        if seen.contains(card) {
            return None;
        }
        seen.push(*card);
        *counts.entry(card.rank).or_insert(0) += 1;
    }
    Some(counts)
}

fn values_consecutive<I: IntoIterator<Item = u8>>(sorted_values: I) -> bool {
    let mut prev: Option<u8> = None;
    for v in sorted_values {
        if let Some(p) = prev {
            if v != p + 1 {
                return false;
            }
        }
        prev = Some(v);
    }
    true
}

/// Classify a set of cards. Total: anything unrecognised (including an empty
/// set or one that repeats a card) is `Other`.
pub fn classify(cards: &[Card]) -> HandCategory {
    if cards.is_empty() {
        return HandCategory::Other;
    }
    let Some(counts) = rank_counts(cards) else {
        return HandCategory::Other;
    };
    if cards.len() == 1 {
        return HandCategory::Single;
    }

    if counts.len() == 1 {
        return match cards.len() {
            2 => HandCategory::Pair,
            3 => HandCategory::Triple,
            4 => HandCategory::FourOfKind,
            _ => HandCategory::Other,
        };
    }

    // BTreeMap keys iterate in rank order, and Rank's Ord follows value().
    if cards.len() >= 3
        && counts.values().all(|&n| n == 1)
        && values_consecutive(counts.keys().map(|r| r.value()))
    {
        return HandCategory::Straight;
    }

    if cards.len() >= 6
        && cards.len() % 2 == 0
        && counts.values().all(|&n| n == 2)
        && values_consecutive(counts.keys().map(|r| r.value()))
    {
        return HandCategory::ConsecutivePairs;
    }

    HandCategory::Other
}

/// Whether a freshly dealt hand wins outright.
///
/// Any of: six ranks held at least twice, all four Twos, or one of every
/// rank from Three through Ace.
pub fn is_instant_win(hand: &[Card]) -> bool {
    if hand.is_empty() {
        return false;
    }
    let mut counts: BTreeMap<Rank, usize> = BTreeMap::new();
    for card in hand {
        *counts.entry(card.rank).or_insert(0) += 1;
    }

    let six_pairs = counts.values().filter(|&&n| n >= 2).count() >= 6;
    let four_twos = counts.get(&Rank::Two).copied().unwrap_or(0) == 4;
    let dragon = Rank::ALL
        .iter()
        .filter(|&&r| r != Rank::Two)
        .all(|r| counts.contains_key(r));

    six_pairs || four_twos || dragon
}
