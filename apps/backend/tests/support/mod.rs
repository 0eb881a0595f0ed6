#![allow(dead_code)]

use std::sync::Arc;
use std::time::SystemTime;

use tienlen_backend::auth::jwt::{mint_access_token, ACCESS_TOKEN_TTL};
use tienlen_backend::domain::{try_parse_cards, Card, PlayerId, RoomId, SessionState};
use tienlen_backend::services::propagation::RecordingPublisher;
use tienlen_backend::services::sessions::SessionDirectory;
use tienlen_backend::state::security_config::SecurityConfig;

#[ctor::ctor]
fn init_logging() {
    backend_test_support::logging::init();
}

pub fn cards(tokens: &[&str]) -> Vec<Card> {
    try_parse_cards(tokens).expect("valid card tokens")
}

/// A fresh room with one seat per hand, seat order as given.
pub fn table(hands: &[&[&str]]) -> (RoomId, Vec<PlayerId>, SessionState) {
    let room = backend_test_support::ids::unique_room();
    let players = backend_test_support::ids::unique_players(hands.len());
    let hands = hands.iter().map(|h| cards(h)).collect();
    let state = SessionState::new(room, players.clone(), hands);
    (room, players, state)
}

/// A directory that records everything it publishes.
pub fn recording_directory() -> (SessionDirectory, Arc<RecordingPublisher>) {
    let publisher = RecordingPublisher::new();
    (SessionDirectory::new(publisher.clone()), publisher)
}

pub fn bearer(player: PlayerId, security: &SecurityConfig) -> String {
    let token = mint_access_token(player, SystemTime::now(), ACCESS_TOKEN_TTL, security)
        .expect("should mint token successfully");
    format!("Bearer {token}")
}
