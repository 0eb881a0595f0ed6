use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

use crate::domain::engine::{
    apply_pass, apply_play, check_game_end, instant_win_ranking, instant_winners, start,
    start_with_rng, validate_play,
};
use crate::domain::play::Play;
use crate::domain::test_prelude::{cards, player, room, session_with_hands};
use crate::domain::{Card, HandCategory, DECK_SIZE};
use crate::errors::domain::ValidationKind;

fn seeded(seed: u64) -> ChaCha20Rng {
    ChaCha20Rng::seed_from_u64(seed)
}

#[test]
fn start_deals_evenly_and_discards_remainder() {
    for n in 1..=4u128 {
        let players: Vec<_> = (1..=n).map(player).collect();
        let state = start_with_rng(room(), &players, &mut seeded(9)).unwrap();
        let per = DECK_SIZE / n as usize;
        for p in &players {
            assert_eq!(state.hand_size(*p), per);
        }
        assert_eq!(state.turn_order, players);
        assert_eq!(state.current_turn_index, 0);
        assert!(state.current_pile.is_none());
        assert!(state.passed_this_turn.is_empty());
        assert!(state.move_log.is_empty());
        assert_eq!(state.dealt_cards, per * n as usize);
    }
}

#[test]
fn start_is_deterministic_under_a_seed() {
    let players = [player(1), player(2), player(3), player(4)];
    let a = start_with_rng(room(), &players, &mut seeded(42)).unwrap();
    let b = start_with_rng(room(), &players, &mut seeded(42)).unwrap();
    assert_eq!(a, b);
}

#[test]
fn start_rejects_no_players() {
    let err = start(room(), &[]).unwrap_err();
    assert_eq!(
        err.validation_kind(),
        Some(&ValidationKind::InvalidPlayerCount)
    );
}

#[test]
fn validate_play_checks_shape_ownership_and_pile() {
    let state = session_with_hands(&[&["3S", "4S", "5S", "9H"], &["6D"]]);
    let a = player(1);
    assert!(validate_play(&state, a, &cards(&["3S", "4S", "5S"]), None));
    assert!(!validate_play(&state, a, &cards(&["3S", "9H"]), None));
    assert!(!validate_play(&state, a, &cards(&["6D"]), None), "not in hand");
    assert!(!validate_play(&state, player(9), &cards(&["3S"]), None));

    let pile = Play::from_cards(&cards(&["TH"]));
    assert!(!validate_play(&state, a, &cards(&["9H"]), Some(&pile)));
}

#[test]
fn apply_play_moves_cards_to_pile_and_advances() {
    let mut state = session_with_hands(&[&["3S", "4S", "9H"], &["6D", "7D"], &["8C"]]);
    let a = player(1);

    assert!(apply_play(&mut state, a, &cards(&["4S"])).unwrap());
    assert_eq!(state.hand(a).unwrap(), cards(&["3S", "9H"]).as_slice());
    assert_eq!(state.current_pile.as_ref().unwrap().category, HandCategory::Single);
    assert_eq!(state.current_turn_index, 1);
    assert_eq!(state.move_log.len(), 1);
    assert_eq!(state.move_log[0].player_id, a);
    assert!(state.cards_conserved());
}

#[test]
fn rejected_play_changes_nothing() {
    let mut state = session_with_hands(&[&["3S", "4S"], &["6D", "7D"]]);
    assert!(apply_play(&mut state, player(1), &cards(&["4S"])).unwrap());
    let before = state.clone();

    assert!(!apply_play(&mut state, player(2), &cards(&["6D", "7D"])).unwrap());
    assert!(!apply_play(&mut state, player(2), &cards(&["KD"])).unwrap());
    assert_eq!(state, before);
}

#[test]
fn apply_play_uses_the_state_pile() {
    let mut state = session_with_hands(&[&["9S", "4S"], &["6D", "KD"]]);
    assert!(apply_play(&mut state, player(1), &cards(&["9S"])).unwrap());
    // 6 is lower than the 9 on the table regardless of what a caller thinks.
    assert!(!apply_play(&mut state, player(2), &cards(&["6D"])).unwrap());
    assert!(apply_play(&mut state, player(2), &cards(&["KD"])).unwrap());
}

#[test]
fn unknown_player_is_an_error() {
    let mut state = session_with_hands(&[&["3S"], &["6D"]]);
    let err = apply_play(&mut state, player(7), &cards(&["3S"])).unwrap_err();
    assert_eq!(err.validation_kind(), Some(&ValidationKind::UnknownPlayer));
    let err = apply_pass(&mut state, player(7)).unwrap_err();
    assert_eq!(err.validation_kind(), Some(&ValidationKind::UnknownPlayer));
}

#[test]
fn emptying_a_hand_does_not_advance_the_turn() {
    let mut state = session_with_hands(&[&["3S"], &["6D", "7D"]]);
    assert!(apply_play(&mut state, player(1), &cards(&["3S"])).unwrap());
    assert_eq!(state.current_turn_index, 0);
    assert_eq!(check_game_end(&state), Some(vec![player(1), player(2)]));
}

#[test]
fn pass_advances_until_round_closes() {
    let mut state = session_with_hands(&[&["3S", "4S"], &["6D"], &["7D"], &["8D"]]);
    let [a, b, c, d] = [player(1), player(2), player(3), player(4)];

    assert!(apply_play(&mut state, a, &cards(&["3S"])).unwrap());
    assert!(!apply_pass(&mut state, b).unwrap());
    assert_eq!(state.current_player(), Some(c));
    assert!(!apply_pass(&mut state, c).unwrap());
    assert_eq!(state.current_player(), Some(d));
    assert!(apply_pass(&mut state, d).unwrap());

    assert!(state.current_pile.is_none());
    assert!(state.passed_this_turn.is_empty());
    assert_eq!(state.current_player(), Some(a));
    assert_eq!(state.move_log.len(), 4);
    assert!(state.move_log[1..].iter().all(|e| e.is_pass()));
}

#[test]
fn new_play_clears_the_pass_set() {
    let mut state = session_with_hands(&[&["3S", "4S"], &["6D", "7D"], &["8D", "9D"]]);
    let [a, b, c] = [player(1), player(2), player(3)];

    assert!(apply_play(&mut state, a, &cards(&["3S"])).unwrap());
    assert!(!apply_pass(&mut state, b).unwrap());
    assert!(apply_play(&mut state, c, &cards(&["8D"])).unwrap());
    assert!(state.passed_this_turn.is_empty());
    assert_eq!(state.current_player(), Some(a));
}

#[test]
fn duplicate_cards_are_rejected() {
    let mut state = session_with_hands(&[&["3S", "4S"], &["6D"]]);
    let dup = cards(&["3S", "3S"]);
    assert!(!apply_play(&mut state, player(1), &dup).unwrap());
    assert_eq!(state.hand_size(player(1)), 2);
}

#[test]
fn game_end_ranking_scenario() {
    let state = session_with_hands(&[
        &["3S", "4S", "5S", "6S", "7S"],
        &[],
        &["3D", "4D", "5D", "6D", "7D", "8D"],
        &["3H", "4H"],
    ]);
    // Hand sizes [5, 0, 6, 2] => 0, 2, 5, 6.
    assert_eq!(
        check_game_end(&state),
        Some(vec![player(2), player(4), player(1), player(3)])
    );
}

#[test]
fn game_end_ties_follow_seat_order() {
    let state = session_with_hands(&[&["3S", "4S"], &[], &["3D", "4D"], &[]]);
    assert_eq!(
        check_game_end(&state),
        Some(vec![player(2), player(4), player(1), player(3)])
    );
}

#[test]
fn no_empty_hand_means_game_continues() {
    let state = session_with_hands(&[&["3S"], &["4S"]]);
    assert_eq!(check_game_end(&state), None);
}

#[test]
fn two_player_scenario() {
    let (a, b) = (player(1), player(2));
    let mut state = start_with_rng(room(), &[a, b], &mut seeded(2024)).unwrap();
    assert_eq!(state.hand_size(a), 26);
    assert_eq!(state.hand_size(b), 26);

    // A leads their lowest card.
    let lowest = *state.hand(a).unwrap().iter().min().unwrap();
    assert!(apply_play(&mut state, a, &[lowest]).unwrap());
    assert_eq!(state.hand_size(a), 25);
    assert_eq!(state.current_player(), Some(b));

    // B passes: round closes and A leads again.
    assert!(apply_pass(&mut state, b).unwrap());
    assert!(state.current_pile.is_none());
    assert_eq!(state.current_player(), Some(a));

    // 25 cards over 13 ranks must contain a pair.
    let hand = state.hand(a).unwrap().to_vec();
    let pair: Vec<Card> = hand
        .windows(2)
        .find(|w| w[0].rank == w[1].rank)
        .map(|w| w.to_vec())
        .unwrap();
    assert!(apply_play(&mut state, a, &pair).unwrap());
    assert_eq!(state.current_player(), Some(b));

    let before = state.clone();
    let single = state.hand(b).unwrap()[0];
    assert!(!apply_play(&mut state, b, &[single]).unwrap());
    assert_eq!(state, before);
    assert_eq!(state.current_player(), Some(b));
}

#[test]
fn instant_winners_only_on_full_deals() {
    let dragon = [
        "3C", "4S", "5C", "6S", "7C", "8S", "9C", "TS", "JC", "QS", "KC", "AS", "AH",
    ];
    let plain = [
        "3D", "4D", "5D", "6D", "7D", "8D", "9D", "TD", "JD", "QD", "KD", "2C", "2D",
    ];
    let state = session_with_hands(&[&plain, &dragon]);
    assert_eq!(instant_winners(&state), vec![player(2)]);
    assert_eq!(
        instant_win_ranking(&state, &[player(2)]),
        vec![player(2), player(1)]
    );

    // The same pattern in a 26-card hand does not count.
    let mut long = dragon.to_vec();
    long.extend(["3H", "4H", "5H"]);
    let state = session_with_hands(&[&long, &plain]);
    assert!(instant_winners(&state).is_empty());
}
