use proptest::prelude::ProptestConfig;
use uuid::Uuid;

use crate::domain::{try_parse_cards, Card, PlayerId, RoomId, SessionState};

/// Proptest config honouring `PROPTEST_CASES`.
pub fn proptest_config() -> ProptestConfig {
    let cases = std::env::var("PROPTEST_CASES")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(64);
    ProptestConfig {
        cases,
        ..ProptestConfig::default()
    }
}

pub fn cards(tokens: &[&str]) -> Vec<Card> {
    try_parse_cards(tokens).expect("valid card tokens")
}

/// Stable, readable ids: player(1), player(2), ...
pub fn player(n: u128) -> PlayerId {
    Uuid::from_u128(n)
}

pub fn room() -> RoomId {
    Uuid::from_u128(0xAB)
}

/// A session whose seats hold exactly the given hands.
pub fn session_with_hands(hands: &[&[&str]]) -> SessionState {
    let players = (1..=hands.len() as u128).map(player).collect();
    let hands = hands.iter().map(|h| cards(h)).collect();
    SessionState::new(room(), players, hands)
}
