//! Per-game session state and the turn guards the engine relies on.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::domain::play::Play;
use crate::domain::Card;
use crate::errors::domain::{DomainError, ValidationKind};

pub type PlayerId = Uuid;
pub type RoomId = Uuid;

/// One accepted action. An empty `cards` list records a pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveLogEntry {
    pub player_id: PlayerId,
    pub cards: Vec<Card>,
    /// Unix milliseconds.
    pub timestamp: i64,
}

impl MoveLogEntry {
    pub fn is_pass(&self) -> bool {
        self.cards.is_empty()
    }
}

pub(crate) fn now_millis() -> i64 {
    (OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000) as i64
}

/// Everything one game needs: seats, hands, table and history.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionState {
    pub room_id: RoomId,
    /// Seat order, fixed at start.
    pub turn_order: Vec<PlayerId>,
    pub hands: HashMap<PlayerId, Vec<Card>>,
    /// Always `< turn_order.len()`.
    pub current_turn_index: usize,
    pub current_pile: Option<Play>,
    /// Players who passed since the pile last changed.
    pub passed_this_turn: HashSet<PlayerId>,
    pub move_log: Vec<MoveLogEntry>,
    /// Cards in hands at the moment of dealing.
    pub dealt_cards: usize,
    /// Zero when dealt, bumped once per accepted play or pass.
    pub version: u32,
}

impl SessionState {
    /// Seat `turn_order[i]` with `hands[i]`. Missing hands are empty.
    pub fn new(room_id: RoomId, turn_order: Vec<PlayerId>, hands: Vec<Vec<Card>>) -> Self {
        let mut hands = hands.into_iter();
        let hands: HashMap<PlayerId, Vec<Card>> = turn_order
            .iter()
            .map(|p| (*p, hands.next().unwrap_or_default()))
            .collect();
        let dealt_cards = hands.values().map(Vec::len).sum();
        Self {
            room_id,
            turn_order,
            hands,
            current_turn_index: 0,
            current_pile: None,
            passed_this_turn: HashSet::new(),
            move_log: Vec::new(),
            dealt_cards,
            version: 0,
        }
    }

    pub fn player_count(&self) -> usize {
        self.turn_order.len()
    }

    /// The player whose turn it is.
    pub fn current_player(&self) -> Option<PlayerId> {
        self.turn_order.get(self.current_turn_index).copied()
    }

    pub fn seat_of(&self, player: PlayerId) -> Option<usize> {
        self.turn_order.iter().position(|p| *p == player)
    }

    pub fn is_seated(&self, player: PlayerId) -> bool {
        self.hands.contains_key(&player)
    }

    pub fn hand(&self, player: PlayerId) -> Option<&[Card]> {
        self.hands.get(&player).map(Vec::as_slice)
    }

    pub fn hand_size(&self, player: PlayerId) -> usize {
        self.hands.get(&player).map_or(0, Vec::len)
    }

    /// Remaining card counts in seat order.
    pub fn hand_counts(&self) -> Vec<(PlayerId, usize)> {
        self.turn_order
            .iter()
            .map(|p| (*p, self.hand_size(*p)))
            .collect()
    }

    pub fn cards_played(&self) -> usize {
        self.move_log.iter().map(|e| e.cards.len()).sum()
    }

    /// Cards held plus cards played equals cards dealt.
    pub fn cards_conserved(&self) -> bool {
        self.hands.values().map(Vec::len).sum::<usize>() + self.cards_played() == self.dealt_cards
    }

    pub fn require_seated(&self, player: PlayerId) -> Result<usize, DomainError> {
        self.seat_of(player).ok_or_else(|| {
            DomainError::validation(
                ValidationKind::UnknownPlayer,
                format!("Player {player} is not seated in room {}", self.room_id),
            )
        })
    }

    /// Only the player at `turn_order[current_turn_index]` may act.
    pub fn require_turn_holder(&self, player: PlayerId) -> Result<(), DomainError> {
        self.require_seated(player)?;
        match self.current_player() {
            Some(current) if current == player => Ok(()),
            _ => Err(DomainError::validation(
                ValidationKind::NotYourTurn,
                "It is not your turn",
            )),
        }
    }

    pub(crate) fn advance_turn(&mut self) {
        if !self.turn_order.is_empty() {
            self.current_turn_index = (self.current_turn_index + 1) % self.turn_order.len();
        }
    }

    pub(crate) fn log_move(&mut self, player_id: PlayerId, cards: Vec<Card>) {
        self.move_log.push(MoveLogEntry {
            player_id,
            cards,
            timestamp: now_millis(),
        });
        self.version += 1;
    }
}
