//! Live sessions, one per room.
//!
//! Every mutation of a room's state runs under that room's mutex. The mutex is
//! never held across an `.await`: events are built inside the critical
//! section and published after it is released.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use parking_lot::Mutex;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::domain::engine::{self, instant_win_ranking, instant_winners};
use crate::domain::{
    derive_dealing_seed, payouts_for_ranking, settle, Card, PlayerId, PlayerSessionView, RoomId,
    SessionState, SessionView, Settlement, StakeTier,
};
use crate::error::AppError;
use crate::errors::domain::{ConflictKind, DomainError, ValidationKind};
use crate::protocol::{PrivateEvent, RoomEvent};
use crate::services::propagation::EventPublisher;
use crate::services::wallet::{apply_settlement, Wallet};

pub const MIN_PLAYERS: usize = 2;
pub const MAX_PLAYERS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SessionStatus {
    Active,
    /// Terminal ranking reached or evicted; removal from the map may lag.
    Ended,
    /// Card accounting broke; the session is being torn down.
    Broken,
}

struct RoomSession {
    state: SessionState,
    stake: StakeTier,
    status: SessionStatus,
    last_activity: Instant,
}

struct RoomSlot {
    inner: Mutex<RoomSession>,
}

/// How a game finished.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameEnd {
    pub ranking: Vec<PlayerId>,
    pub settlement: Settlement,
    pub instant_win: bool,
}

/// Result of an accepted allocate, play, or pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SessionOutcome {
    Live {
        session: SessionView,
        round_closed: bool,
    },
    Ended(GameEnd),
}

impl SessionOutcome {
    pub fn is_ended(&self) -> bool {
        matches!(self, SessionOutcome::Ended(_))
    }
}

/// Work left for after the room lock is released.
struct Followup {
    room_id: RoomId,
    event: RoomEvent,
    mirror: Option<SessionView>,
    ended: Option<(Arc<RoomSlot>, Settlement)>,
}

pub struct SessionDirectory {
    rooms: DashMap<RoomId, Arc<RoomSlot>>,
    publisher: Arc<dyn EventPublisher>,
    wallet: Option<Arc<dyn Wallet>>,
    deal_seed: Option<u64>,
}

impl SessionDirectory {
    pub fn new(publisher: Arc<dyn EventPublisher>) -> Self {
        Self {
            rooms: DashMap::new(),
            publisher,
            wallet: None,
            deal_seed: None,
        }
    }

    pub fn with_wallet(mut self, wallet: Arc<dyn Wallet>) -> Self {
        self.wallet = Some(wallet);
        self
    }

    /// Make dealing reproducible: each room shuffles from a seed derived from
    /// `seed` and its id.
    pub fn with_deal_seed(mut self, seed: Option<u64>) -> Self {
        self.deal_seed = seed;
        self
    }

    pub fn active_rooms(&self) -> usize {
        self.rooms.len()
    }

    /// Deal a new game for `room_id`.
    ///
    /// `players` must be 2..=4 distinct ids, in seat order. Fails with
    /// `SessionActive` while a previous game in the room is still live.
    pub async fn allocate(
        &self,
        room_id: RoomId,
        players: Vec<PlayerId>,
        stake: StakeTier,
    ) -> Result<SessionOutcome, DomainError> {
        validate_roster(&players)?;

        let state = match self.deal_seed {
            Some(base) => {
                let mut rng = ChaCha20Rng::seed_from_u64(derive_dealing_seed(base, room_id));
                engine::start_with_rng(room_id, &players, &mut rng)?
            }
            None => engine::start(room_id, &players)?,
        };

        let winners = instant_winners(&state);
        let view = SessionView::of(&state);
        let hands: Vec<(PlayerId, Vec<Card>)> = state
            .turn_order
            .iter()
            .map(|p| (*p, state.hand(*p).map(<[Card]>::to_vec).unwrap_or_default()))
            .collect();

        let end = if winners.is_empty() {
            None
        } else {
            let ranking = instant_win_ranking(&state, &winners);
            let settlement = payouts_for_ranking(&ranking, stake);
            Some(GameEnd {
                ranking,
                settlement,
                instant_win: true,
            })
        };

        let slot = Arc::new(RoomSlot {
            inner: Mutex::new(RoomSession {
                state,
                stake,
                status: if end.is_some() {
                    SessionStatus::Ended
                } else {
                    SessionStatus::Active
                },
                last_activity: Instant::now(),
            }),
        });

        match self.rooms.entry(room_id) {
            Entry::Occupied(mut occupied) => {
                let live = occupied.get().inner.lock().status == SessionStatus::Active;
                if live {
                    return Err(DomainError::conflict(
                        ConflictKind::SessionActive,
                        format!("Room {room_id} already has a game in progress"),
                    ));
                }
                if end.is_none() {
                    occupied.insert(slot);
                } else {
                    occupied.remove();
                }
            }
            Entry::Vacant(vacant) => {
                if end.is_none() {
                    vacant.insert(slot);
                }
            }
        }

        info!(%room_id, players = players.len(), %stake, instant_win = end.is_some(), "Session allocated");

        for (player_id, cards) in hands {
            self.publish_private(player_id, PrivateEvent::Hand { room_id, cards })
                .await;
        }

        match end {
            None => {
                self.publish_room(room_id, RoomEvent::started(&view, stake))
                    .await;
                self.mirror(room_id, Some(&view)).await;
                Ok(SessionOutcome::Live {
                    session: view,
                    round_closed: false,
                })
            }
            Some(end) => {
                self.publish_room(
                    room_id,
                    RoomEvent::Ended {
                        room_id,
                        version: view.version,
                        ranking: end.ranking.clone(),
                        settlement: end.settlement.clone(),
                        instant_win: true,
                    },
                )
                .await;
                self.apply_wallet(room_id, &end.settlement).await;
                Ok(SessionOutcome::Ended(end))
            }
        }
    }

    /// Register an already dealt state for its room, e.g. one rebuilt from a
    /// fixture. Same conflict rule as [`allocate`](Self::allocate); nothing
    /// is published.
    pub fn install(&self, state: SessionState, stake: StakeTier) -> Result<(), DomainError> {
        validate_roster(&state.turn_order)?;
        let room_id = state.room_id;
        let slot = Arc::new(RoomSlot {
            inner: Mutex::new(RoomSession {
                state,
                stake,
                status: SessionStatus::Active,
                last_activity: Instant::now(),
            }),
        });
        match self.rooms.entry(room_id) {
            Entry::Occupied(mut occupied) => {
                if occupied.get().inner.lock().status == SessionStatus::Active {
                    return Err(DomainError::conflict(
                        ConflictKind::SessionActive,
                        format!("Room {room_id} already has a game in progress"),
                    ));
                }
                occupied.insert(slot);
            }
            Entry::Vacant(vacant) => {
                vacant.insert(slot);
            }
        }
        Ok(())
    }

    /// Play `cards` for `player`, who must hold the turn.
    pub async fn submit_play(
        &self,
        room_id: RoomId,
        player: PlayerId,
        cards: Vec<Card>,
    ) -> Result<SessionOutcome, DomainError> {
        self.submit(room_id, player, |state| {
            if engine::apply_play(state, player, &cards)? {
                Ok(false)
            } else {
                Err(DomainError::invalid_play(
                    "Cards do not form a valid play that beats the pile",
                ))
            }
        })
        .await
    }

    /// Pass for `player`, who must hold the turn.
    pub async fn submit_pass(
        &self,
        room_id: RoomId,
        player: PlayerId,
    ) -> Result<SessionOutcome, DomainError> {
        self.submit(room_id, player, |state| engine::apply_pass(state, player))
            .await
    }

    /// Copy of the live state, taken under the room lock.
    pub fn get(&self, room_id: RoomId) -> Option<SessionState> {
        let slot = self.rooms.get(&room_id).map(|r| Arc::clone(r.value()))?;
        let guard = slot.inner.lock();
        (guard.status == SessionStatus::Active).then(|| guard.state.clone())
    }

    /// Public view plus `player`'s own hand.
    pub fn view_for(
        &self,
        room_id: RoomId,
        player: PlayerId,
    ) -> Result<PlayerSessionView, DomainError> {
        let state = self
            .get(room_id)
            .ok_or_else(|| DomainError::session_not_found(room_id))?;
        Ok(PlayerSessionView::of(&state, player))
    }

    /// Evict sessions untouched for longer than `idle`.
    ///
    /// Each room is locked before it is marked ended, so an in-flight action
    /// either completes first or finds the session gone.
    pub async fn evict_idle(&self, idle: Duration) -> Vec<RoomId> {
        let slots: Vec<(RoomId, Arc<RoomSlot>)> = self
            .rooms
            .iter()
            .map(|r| (*r.key(), Arc::clone(r.value())))
            .collect();

        let mut evicted = Vec::new();
        for (room_id, slot) in slots {
            {
                let mut guard = slot.inner.lock();
                if guard.status != SessionStatus::Active || guard.last_activity.elapsed() < idle {
                    continue;
                }
                guard.status = SessionStatus::Ended;
            }
            self.remove_slot(room_id, &slot);
            info!(%room_id, idle_secs = idle.as_secs(), "Idle session evicted");
            self.mirror(room_id, None).await;
            evicted.push(room_id);
        }
        evicted
    }

    async fn submit<F>(
        &self,
        room_id: RoomId,
        player: PlayerId,
        action: F,
    ) -> Result<SessionOutcome, DomainError>
    where
        F: FnOnce(&mut SessionState) -> Result<bool, DomainError>,
    {
        let slot = self
            .rooms
            .get(&room_id)
            .map(|r| Arc::clone(r.value()))
            .ok_or_else(|| DomainError::session_not_found(room_id))?;

        let step = {
            let mut guard = slot.inner.lock();
            if guard.status != SessionStatus::Active {
                return Err(DomainError::session_not_found(room_id));
            }
            guard.state.require_turn_holder(player)?;

            let log_cursor = guard.state.move_log.len();
            match action(&mut guard.state) {
                Ok(round_closed) => {
                    guard.last_activity = Instant::now();
                    Ok(Self::settle_step(room_id, &slot, &mut guard, log_cursor, round_closed))
                }
                Err(err) if err.is_fatal() => {
                    guard.status = SessionStatus::Broken;
                    let version = guard.state.version;
                    drop(guard);
                    error!(%room_id, %player, error = %err, "Session integrity violated, evicting");
                    self.remove_slot(room_id, &slot);
                    let followup = Followup {
                        room_id,
                        event: RoomEvent::Aborted {
                            room_id,
                            version,
                            code: AppError::from(err.clone()).code().as_str().to_string(),
                        },
                        mirror: None,
                        ended: None,
                    };
                    Err((err, followup))
                }
                Err(err) => {
                    debug!(%room_id, %player, error = %err, "Action rejected");
                    return Err(err);
                }
            }
        };

        match step {
            Ok((outcome, followup)) => {
                self.run_followup(followup).await;
                Ok(outcome)
            }
            Err((err, followup)) => {
                self.run_followup(followup).await;
                Err(err)
            }
        }
    }

    /// Build the outcome and the deferred publish for an accepted action.
    fn settle_step(
        room_id: RoomId,
        slot: &Arc<RoomSlot>,
        guard: &mut RoomSession,
        log_cursor: usize,
        round_closed: bool,
    ) -> (SessionOutcome, Followup) {
        match engine::check_game_end(&guard.state) {
            Some(ranking) => {
                let settlement = settle(&guard.state, guard.stake);
                guard.status = SessionStatus::Ended;
                info!(%room_id, winner = ?ranking.first(), "Game ended");
                let end = GameEnd {
                    ranking: ranking.clone(),
                    settlement: settlement.clone(),
                    instant_win: false,
                };
                let followup = Followup {
                    room_id,
                    event: RoomEvent::Ended {
                        room_id,
                        version: guard.state.version,
                        ranking,
                        settlement: settlement.clone(),
                        instant_win: false,
                    },
                    mirror: None,
                    ended: Some((Arc::clone(slot), settlement)),
                };
                (SessionOutcome::Ended(end), followup)
            }
            None => {
                let view = SessionView::of(&guard.state);
                if round_closed {
                    debug!(%room_id, leader = ?view.current_player, "Round closed");
                }
                let followup = Followup {
                    room_id,
                    event: RoomEvent::state_since(&view, log_cursor, round_closed),
                    mirror: Some(view.clone()),
                    ended: None,
                };
                (
                    SessionOutcome::Live {
                        session: view,
                        round_closed,
                    },
                    followup,
                )
            }
        }
    }

    async fn run_followup(&self, followup: Followup) {
        let Followup {
            room_id,
            event,
            mirror,
            ended,
        } = followup;

        self.publish_room(room_id, event).await;
        match ended {
            Some((slot, settlement)) => {
                self.remove_slot(room_id, &slot);
                self.mirror(room_id, None).await;
                self.apply_wallet(room_id, &settlement).await;
            }
            None => self.mirror(room_id, mirror.as_ref()).await,
        }
    }

    /// Remove `slot` if it is still the one registered for `room_id`.
    fn remove_slot(&self, room_id: RoomId, slot: &Arc<RoomSlot>) {
        self.rooms
            .remove_if(&room_id, |_, current| Arc::ptr_eq(current, slot));
    }

    async fn publish_room(&self, room_id: RoomId, event: RoomEvent) {
        if let Err(err) = self.publisher.publish_room(room_id, event).await {
            warn!(%room_id, error = %err, "Room event not delivered");
        }
    }

    async fn publish_private(&self, player_id: PlayerId, event: PrivateEvent) {
        if let Err(err) = self.publisher.publish_private(player_id, event).await {
            warn!(%player_id, error = %err, "Private event not delivered");
        }
    }

    async fn mirror(&self, room_id: RoomId, view: Option<&SessionView>) {
        if let Err(err) = self.publisher.mirror(room_id, view).await {
            warn!(%room_id, error = %err, "Session mirror not updated");
        }
    }

    async fn apply_wallet(&self, room_id: RoomId, settlement: &Settlement) {
        let Some(wallet) = &self.wallet else {
            return;
        };
        let failures = apply_settlement(wallet.as_ref(), settlement).await;
        if !failures.is_empty() {
            warn!(%room_id, failed = failures.len(), "Settlement needs reconciliation");
        }
    }
}

fn validate_roster(players: &[PlayerId]) -> Result<(), DomainError> {
    if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&players.len()) {
        return Err(DomainError::validation(
            ValidationKind::InvalidPlayerCount,
            format!(
                "A session needs {MIN_PLAYERS} to {MAX_PLAYERS} players, got {}",
                players.len()
            ),
        ));
    }
    let mut seen = HashSet::with_capacity(players.len());
    for p in players {
        if !seen.insert(p) {
            return Err(DomainError::validation(
                ValidationKind::DuplicatePlayer,
                format!("Player {p} is seated twice"),
            ));
        }
    }
    Ok(())
}
