//! The 52-card deck: shuffling and round-robin dealing.

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

use crate::domain::{Card, Rank, Suit};
use crate::errors::domain::{DomainError, ValidationKind};

pub const DECK_SIZE: usize = 52;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Default for Deck {
    fn default() -> Self {
        Self::new()
    }
}

impl Deck {
    /// Fresh deck in suit-major order, every rank from Three to Two per suit.
    pub fn new() -> Self {
        let mut cards = Vec::with_capacity(DECK_SIZE);
        for suit in Suit::ALL {
            for rank in Rank::ALL {
                cards.push(Card { suit, rank });
            }
        }
        Self { cards }
    }

    /// Deck shuffled with a ChaCha20 stream seeded from `seed`.
    pub fn seeded(seed: u64) -> Self {
        let mut deck = Self::new();
        deck.shuffle(&mut ChaCha20Rng::seed_from_u64(seed));
        deck
    }

    /// Deck shuffled from OS entropy.
    pub fn shuffled() -> Self {
        let mut deck = Self::new();
        deck.shuffle(&mut ChaCha20Rng::from_os_rng());
        deck
    }

    /// Fisher-Yates over the whole deck.
    pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.cards.shuffle(rng);
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    /// Deal `per_player` cards to each of `players` hands.
    ///
    /// Cards are drawn round-robin: deck index `c * players + p` becomes the
    /// `c`-th card of hand `p`. Hands keep draw order; callers sort if they
    /// want display order.
    pub fn deal(&self, players: usize, per_player: usize) -> Result<Vec<Vec<Card>>, DomainError> {
        let needed = players.checked_mul(per_player).ok_or_else(|| {
            DomainError::validation(ValidationKind::InsufficientCards, "Deal size overflow")
        })?;
        if needed > self.cards.len() {
            return Err(DomainError::validation(
                ValidationKind::InsufficientCards,
                format!(
                    "Cannot deal {per_player} cards to {players} players from {} cards",
                    self.cards.len()
                ),
            ));
        }

        let mut hands: Vec<Vec<Card>> = (0..players)
            .map(|_| Vec::with_capacity(per_player))
            .collect();
        for c in 0..per_player {
            for (p, hand) in hands.iter_mut().enumerate() {
                hand.push(self.cards[c * players + p]);
            }
        }
        Ok(hands)
    }
}
