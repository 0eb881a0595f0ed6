//! Events a session emits, one variant per kind.
//!
//! Room events are safe for every connection subscribed to the room. Private
//! events carry a single player's cards and go to that player only.
//!
//! Room events are published after the room lock is released, so two of them
//! can arrive out of order. Each carries the session `version` it reflects;
//! clients keep the highest one seen and re-sync through a snapshot on a gap.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::{Card, MoveLogEntry, Play, PlayerId, RoomId, SessionView, Settlement, StakeTier};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RoomEvent {
    /// A new game was dealt. Hands travel separately as [`PrivateEvent::Hand`].
    Started {
        room_id: RoomId,
        version: u32,
        stake: StakeTier,
        turn_order: Vec<PlayerId>,
        current_player: Option<PlayerId>,
        hand_counts: BTreeMap<PlayerId, usize>,
    },
    /// A play or pass was accepted and the game goes on.
    State {
        room_id: RoomId,
        version: u32,
        current_player: Option<PlayerId>,
        current_pile: Option<Play>,
        hand_counts: BTreeMap<PlayerId, usize>,
        new_log_entries: Vec<MoveLogEntry>,
        round_closed: bool,
    },
    /// Terminal ranking and settlement.
    Ended {
        room_id: RoomId,
        version: u32,
        ranking: Vec<PlayerId>,
        settlement: Settlement,
        instant_win: bool,
    },
    /// The session was torn down without a result; nothing is settled.
    Aborted {
        room_id: RoomId,
        version: u32,
        code: String,
    },
}

impl RoomEvent {
    pub fn room_id(&self) -> RoomId {
        match self {
            RoomEvent::Started { room_id, .. }
            | RoomEvent::State { room_id, .. }
            | RoomEvent::Ended { room_id, .. }
            | RoomEvent::Aborted { room_id, .. } => *room_id,
        }
    }

    pub fn version(&self) -> u32 {
        match self {
            RoomEvent::Started { version, .. }
            | RoomEvent::State { version, .. }
            | RoomEvent::Ended { version, .. }
            | RoomEvent::Aborted { version, .. } => *version,
        }
    }

    pub fn started(view: &SessionView, stake: StakeTier) -> Self {
        RoomEvent::Started {
            room_id: view.room_id,
            version: view.version,
            stake,
            turn_order: view.turn_order.clone(),
            current_player: view.current_player,
            hand_counts: view.hand_counts.clone(),
        }
    }

    /// State delta carrying the log entries appended since `log_cursor`.
    pub fn state_since(view: &SessionView, log_cursor: usize, round_closed: bool) -> Self {
        RoomEvent::State {
            room_id: view.room_id,
            version: view.version,
            current_player: view.current_player,
            current_pile: view.current_pile.clone(),
            hand_counts: view.hand_counts.clone(),
            new_log_entries: view.log.get(log_cursor..).unwrap_or_default().to_vec(),
            round_closed,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PrivateEvent {
    /// The recipient's own dealt hand.
    Hand { room_id: RoomId, cards: Vec<Card> },
}
