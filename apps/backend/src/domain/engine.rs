//! Session state machine: deal, play, pass, and end-of-game detection.
//!
//! The engine does not check whose turn it is; callers guard with
//! [`SessionState::require_turn_holder`] before invoking it.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use tracing::debug;

use crate::domain::deck::Deck;
use crate::domain::hand_class::is_instant_win;
use crate::domain::play::{beats, Play};
use crate::domain::state::{PlayerId, RoomId, SessionState};
use crate::domain::Card;
use crate::errors::domain::{DomainError, IntegrityKind, ValidationKind};

/// Start a session with an OS-seeded shuffle.
pub fn start(room_id: RoomId, players: &[PlayerId]) -> Result<SessionState, DomainError> {
    start_with_rng(room_id, players, &mut ChaCha20Rng::from_os_rng())
}

/// Deterministic form of [`start`]: the shuffle draws from `rng`.
///
/// Each player gets `52 / players` cards; the remainder is never dealt.
pub fn start_with_rng<R: Rng + ?Sized>(
    room_id: RoomId,
    players: &[PlayerId],
    rng: &mut R,
) -> Result<SessionState, DomainError> {
    if players.is_empty() {
        return Err(DomainError::validation(
            ValidationKind::InvalidPlayerCount,
            "A session needs at least one player",
        ));
    }

    let mut deck = Deck::new();
    deck.shuffle(rng);
    let per_player = deck.len() / players.len();
    let mut hands = deck.deal(players.len(), per_player)?;
    for hand in &mut hands {
        hand.sort();
    }

    debug!(%room_id, players = players.len(), per_player, "Dealt new session");
    Ok(SessionState::new(room_id, players.to_vec(), hands))
}

/// Players holding an instant-win hand, in seat order.
///
/// Only full 13-card deals qualify.
pub fn instant_winners(state: &SessionState) -> Vec<PlayerId> {
    state
        .turn_order
        .iter()
        .copied()
        .filter(|p| {
            state
                .hand(*p)
                .is_some_and(|hand| hand.len() == 13 && is_instant_win(hand))
        })
        .collect()
}

fn holds_all(hand: &[Card], cards: &[Card]) -> bool {
    cards.iter().all(|c| hand.contains(c))
}

/// Whether `player` may lay `cards` on `incumbent`.
pub fn validate_play(
    state: &SessionState,
    player: PlayerId,
    cards: &[Card],
    incumbent: Option<&Play>,
) -> bool {
    let play = Play::from_cards(cards);
    if !play.is_valid() {
        return false;
    }
    let Some(hand) = state.hand(player) else {
        return false;
    };
    if !holds_all(hand, cards) {
        return false;
    }
    beats(&play, incumbent)
}

/// Lay `cards` from `player`'s hand onto the pile.
///
/// Validates against the state's own pile. `Ok(false)` means rejected with
/// nothing changed. When the play empties the hand the turn does not advance.
pub fn apply_play(
    state: &mut SessionState,
    player: PlayerId,
    cards: &[Card],
) -> Result<bool, DomainError> {
    state.require_seated(player)?;
    if !validate_play(state, player, cards, state.current_pile.as_ref()) {
        return Ok(false);
    }

    let hand = state.hands.get_mut(&player).ok_or_else(|| {
        DomainError::integrity(
            IntegrityKind::Other("hand missing".into()),
            format!("No hand for seated player {player}"),
        )
    })?;
    if !holds_all(hand, cards) {
        return Err(DomainError::integrity(
            IntegrityKind::CardsNotInHand,
            format!("Cards vanished from {player}'s hand during play"),
        ));
    }
    hand.retain(|c| !cards.contains(c));
    let emptied = hand.is_empty();

    state.current_pile = Some(Play::from_cards(cards));
    state.passed_this_turn.clear();
    state.log_move(player, cards.to_vec());

    if !emptied {
        state.advance_turn();
    }
    Ok(true)
}

/// Record a pass. Returns `true` when the round closed.
///
/// The round closes once everyone but one player has passed: the pile
/// clears and the remaining player leads onto an empty table.
pub fn apply_pass(state: &mut SessionState, player: PlayerId) -> Result<bool, DomainError> {
    state.require_seated(player)?;
    state.passed_this_turn.insert(player);
    state.log_move(player, Vec::new());

    let others = state.player_count().saturating_sub(1);
    if state.passed_this_turn.len() >= others {
        let leader = state
            .turn_order
            .iter()
            .position(|p| !state.passed_this_turn.contains(p));
        if let Some(leader) = leader {
            state.current_pile = None;
            state.passed_this_turn.clear();
            state.current_turn_index = leader;
            return Ok(true);
        }
    }

    state.advance_turn();
    Ok(false)
}

/// Final ranking once someone has emptied their hand.
///
/// Empty hands come first in seat order, then everyone else by remaining
/// card count with seat order breaking ties.
pub fn check_game_end(state: &SessionState) -> Option<Vec<PlayerId>> {
    let (mut ranking, mut rest): (Vec<_>, Vec<_>) = state
        .turn_order
        .iter()
        .copied()
        .partition(|p| state.hand_size(*p) == 0);
    if ranking.is_empty() {
        return None;
    }
    // sort_by_key is stable, so seat order survives among equal counts
    rest.sort_by_key(|p| state.hand_size(*p));
    ranking.extend(rest);
    Some(ranking)
}

/// Ranking for an instant-win start: the winners in seat order, then the rest
/// in seat order.
pub fn instant_win_ranking(state: &SessionState, winners: &[PlayerId]) -> Vec<PlayerId> {
    let mut ranking = winners.to_vec();
    ranking.extend(
        state
            .turn_order
            .iter()
            .copied()
            .filter(|p| !winners.contains(p)),
    );
    ranking
}
