//! Domain layer: pure game rules and the session state machine.

pub mod cards_parsing;
pub mod cards_serde;
pub mod cards_types;
pub mod deck;
pub mod engine;
pub mod hand_class;
pub mod play;
pub mod player_view;
pub mod seed_derivation;
pub mod settlement;
pub mod state;

#[cfg(test)]
mod test_gens;
#[cfg(test)]
mod test_prelude;
#[cfg(test)]
mod tests_engine;
#[cfg(test)]
mod tests_hand_class;
#[cfg(test)]
mod tests_play;
#[cfg(test)]
mod tests_props_engine;
#[cfg(test)]
mod tests_settlement;

// Re-exports for ergonomics
pub use cards_parsing::try_parse_cards;
pub use cards_types::{Card, Rank, Suit};
pub use deck::{Deck, DECK_SIZE};
pub use engine::{apply_pass, apply_play, check_game_end, start, start_with_rng, validate_play};
pub use hand_class::{classify, is_instant_win, HandCategory};
pub use play::{beats, Play};
pub use player_view::{PlayerSessionView, SessionView};
pub use seed_derivation::derive_dealing_seed;
pub use settlement::{payouts_for_ranking, settle, Settlement, StakeTier};
pub use state::{MoveLogEntry, PlayerId, RoomId, SessionState};
