//! Property tests for dealing, classification, comparison and turn flow.
//!
//! Properties tested:
//! - Dealing partitions distinct cards, n * k of them
//! - Classification is deterministic and recognises generated shapes
//! - Any valid play beats an empty table; nothing beats itself
//! - Bombs beat every non-bomb
//! - A play followed by everyone else passing closes the round
//! - Card conservation holds across random play sequences
//! - Four-player settlement is zero-sum

use std::collections::HashSet;

use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

use crate::domain::engine::{apply_pass, apply_play, start_with_rng};
use crate::domain::settlement::{settle, StakeTier};
use crate::domain::test_prelude::{player, room};
use crate::domain::{beats, classify, test_gens, test_prelude, Deck, HandCategory, Play};

proptest! {
    #![proptest_config(test_prelude::proptest_config())]

    #[test]
    fn prop_deal_partitions_distinct_cards(
        seed in any::<u64>(),
        players in 1usize..=6,
        per in 0usize..=13,
    ) {
        let deck = Deck::seeded(seed);
        let res = deck.deal(players, per);
        if players * per > 52 {
            prop_assert!(res.is_err());
        } else {
            let hands = res.unwrap();
            prop_assert_eq!(hands.len(), players);
            let all: Vec<_> = hands.iter().flatten().collect();
            let unique: HashSet<_> = all.iter().collect();
            prop_assert_eq!(all.len(), players * per);
            prop_assert_eq!(unique.len(), players * per);
        }
    }

    #[test]
    fn prop_classify_is_deterministic(cards in test_gens::unique_cards(0, 13)) {
        prop_assert_eq!(classify(&cards), classify(&cards));
        let mut reversed = cards.clone();
        reversed.reverse();
        prop_assert_eq!(classify(&cards), classify(&reversed));
    }

    #[test]
    fn prop_generated_shapes_classify(
        straight in test_gens::straight(),
        four in test_gens::four_of_kind(),
        pairs in test_gens::consecutive_pairs(),
    ) {
        prop_assert_eq!(classify(&straight), HandCategory::Straight);
        prop_assert_eq!(classify(&four), HandCategory::FourOfKind);
        prop_assert_eq!(classify(&pairs), HandCategory::ConsecutivePairs);
    }

    #[test]
    fn prop_valid_plays_beat_empty_table_but_not_themselves(
        cards in test_gens::unique_cards(1, 8),
    ) {
        let play = Play::from_cards(&cards);
        prop_assert_eq!(beats(&play, None), play.is_valid());
        prop_assert!(!beats(&play, Some(&play)));
    }

    #[test]
    fn prop_bombs_beat_non_bombs(
        bomb_is_four in any::<bool>(),
        four in test_gens::four_of_kind(),
        pairs in test_gens::consecutive_pairs(),
        straight in test_gens::straight(),
        single in test_gens::card(),
    ) {
        let bomb = Play::from_cards(if bomb_is_four { &four } else { &pairs });
        for target in [Play::from_cards(&straight), Play::from_cards(&[single])] {
            prop_assert!(beats(&bomb, Some(&target)));
            prop_assert!(!beats(&target, Some(&bomb)));
        }
    }

    #[test]
    fn prop_closed_round_returns_to_player(
        seed in any::<u64>(),
        n in test_gens::player_count(),
    ) {
        let players: Vec<_> = (1..=n as u128).map(player).collect();
        let mut state = start_with_rng(room(), &players, &mut ChaCha20Rng::seed_from_u64(seed)).unwrap();
        let leader = players[0];
        let card = state.hand(leader).unwrap()[0];

        prop_assert!(apply_play(&mut state, leader, &[card]).unwrap());
        let mut closed = false;
        for p in &players[1..] {
            closed = apply_pass(&mut state, *p).unwrap();
        }
        prop_assert!(closed);
        prop_assert!(state.current_pile.is_none());
        prop_assert_eq!(state.current_player(), Some(leader));
    }

    #[test]
    fn prop_cards_are_conserved(
        seed in any::<u64>(),
        n in test_gens::player_count(),
        steps in proptest::collection::vec(any::<bool>(), 1..60),
    ) {
        let players: Vec<_> = (1..=n as u128).map(player).collect();
        let mut state = start_with_rng(room(), &players, &mut ChaCha20Rng::seed_from_u64(seed)).unwrap();

        for try_play in steps {
            let Some(current) = state.current_player() else { break };
            if state.hand_size(current) == 0 {
                break;
            }
            // Lead the lowest card on an empty table, otherwise the lowest
            // single that beats the pile, otherwise pass.
            let hand = state.hand(current).unwrap().to_vec();
            let candidate = hand
                .iter()
                .find(|c| beats(&Play::from_cards(&[**c]), state.current_pile.as_ref()))
                .copied();
            match candidate {
                Some(card) if try_play || state.current_pile.is_none() => {
                    prop_assert!(apply_play(&mut state, current, &[card]).unwrap());
                }
                _ => {
                    apply_pass(&mut state, current).unwrap();
                }
            }
            prop_assert!(state.cards_conserved());
            prop_assert!(state.current_turn_index < state.turn_order.len());
        }
    }

    #[test]
    fn prop_four_player_settlement_is_zero_sum(
        seed in any::<u64>(),
        plays in 0usize..30,
        tier in proptest::sample::select(StakeTier::ALL.to_vec()),
    ) {
        let players: Vec<_> = (1..=4u128).map(player).collect();
        let mut state = start_with_rng(room(), &players, &mut ChaCha20Rng::seed_from_u64(seed)).unwrap();
        // Shrink hands unevenly so the ranking is not trivial.
        for i in 0..plays {
            let p = players[i % 4];
            if let Some(hand) = state.hands.get_mut(&p) {
                hand.pop();
            }
        }
        let s = settle(&state, tier);
        prop_assert_eq!(s.len(), 4);
        prop_assert_eq!(s.values().sum::<i64>(), 0);
    }
}
