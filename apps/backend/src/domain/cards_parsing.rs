//! Card parsing from string representations: short tokens ("3S", "TH", "2D")
//! and the upper-case wire names ("SPADES", "THREE").

use std::fmt;
use std::str::FromStr;

use super::cards_types::{Card, Rank, Suit};
use crate::errors::domain::{DomainError, ValidationKind};

impl FromStr for Card {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parse_err =
            || DomainError::validation(ValidationKind::ParseCard, format!("Parse card: {s}"));

        let mut chars = s.chars();
        let (Some(rank_ch), Some(suit_ch), None) = (chars.next(), chars.next(), chars.next())
        else {
            return Err(parse_err());
        };

        let rank = match rank_ch {
            '3' => Rank::Three,
            '4' => Rank::Four,
            '5' => Rank::Five,
            '6' => Rank::Six,
            '7' => Rank::Seven,
            '8' => Rank::Eight,
            '9' => Rank::Nine,
            'T' => Rank::Ten,
            'J' => Rank::Jack,
            'Q' => Rank::Queen,
            'K' => Rank::King,
            'A' => Rank::Ace,
            '2' => Rank::Two,
            _ => return Err(parse_err()),
        };
        let suit = match suit_ch {
            'S' => Suit::Spades,
            'C' => Suit::Clubs,
            'D' => Suit::Diamonds,
            'H' => Suit::Hearts,
            _ => return Err(parse_err()),
        };
        Ok(Card { suit, rank })
    }
}

/// Non-panicking helper to parse card tokens (e.g., "3S", "2H") into Card instances.
pub fn try_parse_cards<I, S>(tokens: I) -> Result<Vec<Card>, DomainError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    tokens
        .into_iter()
        .map(|s| s.as_ref().parse::<Card>())
        .collect()
}

impl Suit {
    pub const fn wire_name(self) -> &'static str {
        match self {
            Suit::Spades => "SPADES",
            Suit::Clubs => "CLUBS",
            Suit::Diamonds => "DIAMONDS",
            Suit::Hearts => "HEARTS",
        }
    }

    pub fn from_wire_name(s: &str) -> Result<Self, DomainError> {
        Suit::ALL
            .into_iter()
            .find(|suit| suit.wire_name() == s)
            .ok_or_else(|| {
                DomainError::validation(ValidationKind::ParseCard, format!("Invalid suit: {s}"))
            })
    }
}

impl Rank {
    pub const fn wire_name(self) -> &'static str {
        match self {
            Rank::Three => "THREE",
            Rank::Four => "FOUR",
            Rank::Five => "FIVE",
            Rank::Six => "SIX",
            Rank::Seven => "SEVEN",
            Rank::Eight => "EIGHT",
            Rank::Nine => "NINE",
            Rank::Ten => "TEN",
            Rank::Jack => "JACK",
            Rank::Queen => "QUEEN",
            Rank::King => "KING",
            Rank::Ace => "ACE",
            Rank::Two => "TWO",
        }
    }

    pub fn from_wire_name(s: &str) -> Result<Self, DomainError> {
        Rank::ALL
            .into_iter()
            .find(|rank| rank.wire_name() == s)
            .ok_or_else(|| {
                DomainError::validation(ValidationKind::ParseCard, format!("Invalid rank: {s}"))
            })
    }
}

/// Build a card from its wire names (suit="SPADES", rank="THREE").
pub fn from_wire_names(suit_str: &str, rank_str: &str) -> Result<Card, DomainError> {
    Ok(Card {
        suit: Suit::from_wire_name(suit_str)?,
        rank: Rank::from_wire_name(rank_str)?,
    })
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_of_{}", self.rank.wire_name(), self.suit.wire_name())
    }
}
