//! What a session looks like from outside: safe to broadcast, no hidden cards.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::play::Play;
use crate::domain::state::{MoveLogEntry, PlayerId, RoomId, SessionState};
use crate::domain::Card;

/// Public view of a session. Hands appear only as counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionView {
    pub room_id: RoomId,
    /// Orders views and events of one room; higher is newer.
    pub version: u32,
    pub turn_order: Vec<PlayerId>,
    pub current_player: Option<PlayerId>,
    pub current_pile: Option<Play>,
    pub hand_counts: BTreeMap<PlayerId, usize>,
    pub passed: Vec<PlayerId>,
    pub log: Vec<MoveLogEntry>,
}

impl SessionView {
    pub fn of(state: &SessionState) -> Self {
        Self {
            room_id: state.room_id,
            version: state.version,
            turn_order: state.turn_order.clone(),
            current_player: state.current_player(),
            current_pile: state.current_pile.clone(),
            hand_counts: state.hand_counts().into_iter().collect(),
            passed: state
                .turn_order
                .iter()
                .copied()
                .filter(|p| state.passed_this_turn.contains(p))
                .collect(),
            log: state.move_log.clone(),
        }
    }
}

/// The public view plus the viewer's own hand, when they are seated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerSessionView {
    #[serde(flatten)]
    pub session: SessionView,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hand: Option<Vec<Card>>,
}

impl PlayerSessionView {
    pub fn of(state: &SessionState, viewer: PlayerId) -> Self {
        Self {
            session: SessionView::of(state),
            hand: state.hand(viewer).map(<[Card]>::to_vec),
        }
    }
}
