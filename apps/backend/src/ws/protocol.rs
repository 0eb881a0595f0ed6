use serde::{Deserialize, Serialize};

use crate::domain::{Card, PlayerId, PlayerSessionView, RoomId};
use crate::protocol::{PrivateEvent, RoomEvent};

pub const PROTOCOL_VERSION: i32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMsg {
    Hello { protocol: i32 },
    Subscribe { room_id: RoomId },
    Unsubscribe { room_id: RoomId },
    Play { room_id: RoomId, cards: Vec<Card> },
    Pass { room_id: RoomId },
}

#[allow(clippy::large_enum_variant)]
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMsg {
    HelloAck {
        protocol: i32,
        player_id: PlayerId,
    },

    Ack {
        message: &'static str,
    },

    /// Sent right after a successful subscribe. Room events with a
    /// `version` at or below this one are already reflected.
    Snapshot {
        version: u32,
        session: PlayerSessionView,
    },

    /// A room event for a subscribed room.
    Event {
        event: RoomEvent,
    },

    /// The recipient's own hand, sent only to that player.
    Hand {
        room_id: RoomId,
        cards: Vec<Card>,
    },

    /// A refused command or protocol violation. Rejected plays leave the
    /// socket open; protocol violations close it.
    Error {
        code: &'static str,
        message: String,
    },
}

impl ServerMsg {
    pub fn private(event: PrivateEvent) -> Self {
        match event {
            PrivateEvent::Hand { room_id, cards } => ServerMsg::Hand { room_id, cards },
        }
    }
}
