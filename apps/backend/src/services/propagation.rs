//! Outbound side of a session: where room and private events go.

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::domain::{PlayerId, RoomId, SessionView};
use crate::error::AppError;
use crate::protocol::{PrivateEvent, RoomEvent};

/// Delivers session events to connected clients.
///
/// Called after the room lock is released. Failures are logged by the caller
/// and never roll back engine state; clients resync by fetching the session.
#[async_trait]
pub trait EventPublisher: Send + Sync {
    /// Broadcast to everyone watching `room_id`.
    async fn publish_room(&self, room_id: RoomId, event: RoomEvent) -> Result<(), AppError>;

    /// Deliver to `player_id` alone.
    async fn publish_private(
        &self,
        player_id: PlayerId,
        event: PrivateEvent,
    ) -> Result<(), AppError>;

    /// Store (or clear, with `None`) an out-of-process copy of the public view.
    async fn mirror(&self, _room_id: RoomId, _view: Option<&SessionView>) -> Result<(), AppError> {
        Ok(())
    }
}

/// Drops everything. For tools and tests that do not care about delivery.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopPublisher;

#[async_trait]
impl EventPublisher for NoopPublisher {
    async fn publish_room(&self, _room_id: RoomId, _event: RoomEvent) -> Result<(), AppError> {
        Ok(())
    }

    async fn publish_private(
        &self,
        _player_id: PlayerId,
        _event: PrivateEvent,
    ) -> Result<(), AppError> {
        Ok(())
    }
}

/// Keeps every published event in memory, in order.
#[derive(Debug, Default)]
pub struct RecordingPublisher {
    room: Mutex<Vec<(RoomId, RoomEvent)>>,
    private: Mutex<Vec<(PlayerId, PrivateEvent)>>,
    mirrored: Mutex<Vec<(RoomId, Option<SessionView>)>>,
}

impl RecordingPublisher {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn room_events(&self) -> Vec<(RoomId, RoomEvent)> {
        self.room.lock().clone()
    }

    pub fn private_events(&self) -> Vec<(PlayerId, PrivateEvent)> {
        self.private.lock().clone()
    }

    pub fn mirrored(&self) -> Vec<(RoomId, Option<SessionView>)> {
        self.mirrored.lock().clone()
    }
}

#[async_trait]
impl EventPublisher for RecordingPublisher {
    async fn publish_room(&self, room_id: RoomId, event: RoomEvent) -> Result<(), AppError> {
        self.room.lock().push((room_id, event));
        Ok(())
    }

    async fn publish_private(
        &self,
        player_id: PlayerId,
        event: PrivateEvent,
    ) -> Result<(), AppError> {
        self.private.lock().push((player_id, event));
        Ok(())
    }

    async fn mirror(&self, room_id: RoomId, view: Option<&SessionView>) -> Result<(), AppError> {
        self.mirrored.lock().push((room_id, view.cloned()));
        Ok(())
    }
}
