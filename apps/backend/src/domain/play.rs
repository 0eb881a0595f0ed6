//! Plays on the table and the beats-relation between them.

use serde::{Deserialize, Serialize};

use crate::domain::hand_class::{classify, HandCategory};
use crate::domain::Card;

/// A classified set of cards with its comparison key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Play {
    pub category: HandCategory,
    pub cards: Vec<Card>,
    /// Rank value of a same-rank set, or the top rank value of a run.
    /// Zero for an invalid play.
    pub primary_rank: u8,
}

impl Play {
    pub fn from_cards(cards: &[Card]) -> Self {
        let category = classify(cards);
        let primary_rank = match category {
            HandCategory::Other => 0,
            // Every other category's key is its highest rank value.
            _ => cards.iter().map(|c| c.rank.value()).max().unwrap_or(0),
        };
        let mut cards = cards.to_vec();
        cards.sort();
        Self {
            category,
            cards,
            primary_rank,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.category.is_valid()
    }

    pub fn is_bomb(&self) -> bool {
        self.category.is_bomb()
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

/// Whether `challenger` may be laid on top of `incumbent`.
///
/// `None` is an empty table. Bombs of different size or category never beat
/// each other.
pub fn beats(challenger: &Play, incumbent: Option<&Play>) -> bool {
    if !challenger.is_valid() {
        return false;
    }
    let Some(incumbent) = incumbent else {
        return true;
    };

    let same_shape =
        challenger.category == incumbent.category && challenger.len() == incumbent.len();

    match (challenger.is_bomb(), incumbent.is_bomb()) {
        (true, false) => true,
        (false, true) => false,
        _ => same_shape && challenger.primary_rank > incumbent.primary_rank,
    }
}
