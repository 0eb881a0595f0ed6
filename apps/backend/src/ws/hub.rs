//! In-process fan-out from session events to websocket connections.

use std::collections::HashSet;

use actix::prelude::*;
use async_trait::async_trait;
use dashmap::DashMap;
use tracing::debug;
use uuid::Uuid;

use crate::domain::{PlayerId, RoomId};
use crate::error::AppError;
use crate::protocol::{PrivateEvent, RoomEvent};
use crate::services::propagation::EventPublisher;

#[derive(Message, Clone)]
#[rtype(result = "()")]
pub enum HubEvent {
    Room(RoomEvent),
    Private(PrivateEvent),
}

struct Connection {
    player_id: PlayerId,
    recipient: Recipient<HubEvent>,
    rooms: HashSet<RoomId>,
}

/// Live websocket connections, indexed by connection, room, and player.
#[derive(Default)]
pub struct WsRegistry {
    connections: DashMap<Uuid, Connection>,
    rooms: DashMap<RoomId, DashMap<Uuid, Recipient<HubEvent>>>,
    players: DashMap<PlayerId, DashMap<Uuid, Recipient<HubEvent>>>,
}

impl WsRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_connection(
        &self,
        player_id: PlayerId,
        conn_id: Uuid,
        recipient: Recipient<HubEvent>,
    ) {
        self.players
            .entry(player_id)
            .or_default()
            .insert(conn_id, recipient.clone());
        self.connections.insert(
            conn_id,
            Connection {
                player_id,
                recipient,
                rooms: HashSet::new(),
            },
        );
    }

    pub fn unregister_connection(&self, conn_id: Uuid) {
        let Some((_, conn)) = self.connections.remove(&conn_id) else {
            return;
        };
        for room_id in conn.rooms {
            remove_member(&self.rooms, room_id, conn_id);
        }
        remove_member(&self.players, conn.player_id, conn_id);
    }

    pub fn subscribe(&self, conn_id: Uuid, room_id: RoomId) {
        let Some(mut conn) = self.connections.get_mut(&conn_id) else {
            return;
        };
        if conn.rooms.insert(room_id) {
            self.rooms
                .entry(room_id)
                .or_default()
                .insert(conn_id, conn.recipient.clone());
        }
    }

    pub fn unsubscribe(&self, conn_id: Uuid, room_id: RoomId) {
        if let Some(mut conn) = self.connections.get_mut(&conn_id) {
            conn.rooms.remove(&room_id);
        }
        remove_member(&self.rooms, room_id, conn_id);
    }

    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    pub fn room_subscribers(&self, room_id: RoomId) -> usize {
        self.rooms.get(&room_id).map_or(0, |m| m.len())
    }

    pub fn broadcast_room(&self, room_id: RoomId, event: RoomEvent) {
        let Some(members) = self.rooms.get(&room_id) else {
            return;
        };
        let msg = HubEvent::Room(event);
        for recipient in members.iter() {
            recipient.value().do_send(msg.clone());
        }
        debug!(%room_id, recipients = members.len(), "Room event fanned out");
    }

    pub fn send_to_player(&self, player_id: PlayerId, event: PrivateEvent) {
        let Some(conns) = self.players.get(&player_id) else {
            return;
        };
        let msg = HubEvent::Private(event);
        for recipient in conns.iter() {
            recipient.value().do_send(msg.clone());
        }
    }
}

fn remove_member<K>(index: &DashMap<K, DashMap<Uuid, Recipient<HubEvent>>>, key: K, conn_id: Uuid)
where
    K: std::hash::Hash + Eq,
{
    if let Some(members) = index.get(&key) {
        members.remove(&conn_id);
    }
    index.remove_if(&key, |_, members| members.is_empty());
}

/// Single-process delivery straight into the registry.
#[async_trait]
impl EventPublisher for WsRegistry {
    async fn publish_room(&self, room_id: RoomId, event: RoomEvent) -> Result<(), AppError> {
        self.broadcast_room(room_id, event);
        Ok(())
    }

    async fn publish_private(
        &self,
        player_id: PlayerId,
        event: PrivateEvent,
    ) -> Result<(), AppError> {
        self.send_to_player(player_id, event);
        Ok(())
    }
}
