use crate::domain::hand_class::{classify, is_instant_win, HandCategory};
use crate::domain::test_prelude::cards;

#[test]
fn empty_set_is_other() {
    assert_eq!(classify(&[]), HandCategory::Other);
}

#[test]
fn same_rank_sets() {
    assert_eq!(classify(&cards(&["7D"])), HandCategory::Single);
    assert_eq!(classify(&cards(&["3C", "3S"])), HandCategory::Pair);
    assert_eq!(classify(&cards(&["9C", "9S", "9H"])), HandCategory::Triple);
    assert_eq!(
        classify(&cards(&["2C", "2S", "2H", "2D"])),
        HandCategory::FourOfKind
    );
}

#[test]
fn two_different_ranks_is_not_a_play() {
    assert_eq!(classify(&cards(&["3C", "4C"])), HandCategory::Other);
}

#[test]
fn straights_need_three_consecutive_values() {
    assert_eq!(
        classify(&cards(&["3C", "4C", "5C", "6C", "7C", "8C"])),
        HandCategory::Straight
    );
    assert_eq!(
        classify(&cards(&["5H", "3S", "4D"])),
        HandCategory::Straight,
        "input order does not matter"
    );
    assert_eq!(classify(&cards(&["3C", "4C", "6C"])), HandCategory::Other);
    assert_eq!(
        classify(&cards(&["3C", "3D", "4C", "5C"])),
        HandCategory::Other
    );
}

#[test]
fn two_is_treated_numerically_in_straights() {
    // K(13) A(14) 2(15) climbs by one each step.
    assert_eq!(classify(&cards(&["KS", "AS", "2S"])), HandCategory::Straight);
    // No wraparound from Two back to Three.
    assert_eq!(classify(&cards(&["AS", "2S", "3S"])), HandCategory::Other);
}

#[test]
fn consecutive_pairs() {
    assert_eq!(
        classify(&cards(&["3C", "3S", "4C", "4S", "5C", "5S"])),
        HandCategory::ConsecutivePairs
    );
    assert_eq!(
        classify(&cards(&[
            "8C", "8S", "9C", "9S", "TC", "TS", "JH", "JD", "QH", "QD", "KH", "KD"
        ])),
        HandCategory::ConsecutivePairs
    );
    // Gap in the run.
    assert_eq!(
        classify(&cards(&["3C", "3S", "4C", "4S", "6C", "6S"])),
        HandCategory::Other
    );
    // Only two pairs.
    assert_eq!(
        classify(&cards(&["3C", "3S", "4C", "4S"])),
        HandCategory::Other
    );
    // A triple inside the run.
    assert_eq!(
        classify(&cards(&["3C", "3S", "3H", "4C", "4S", "5C"])),
        HandCategory::Other
    );
}

#[test]
fn repeated_card_is_other() {
    assert_eq!(classify(&cards(&["3C", "3C"])), HandCategory::Other);
    assert_eq!(classify(&cards(&["3C", "4C", "4C"])), HandCategory::Other);
}

#[test]
fn bombs() {
    assert!(HandCategory::FourOfKind.is_bomb());
    assert!(HandCategory::ConsecutivePairs.is_bomb());
    assert!(!HandCategory::Straight.is_bomb());
    assert!(!HandCategory::Other.is_valid());
}

#[test]
fn instant_win_six_pairs() {
    let hand = cards(&[
        "3C", "3S", "5C", "5S", "7C", "7S", "9C", "9S", "JC", "JS", "KC", "KS", "2H",
    ]);
    assert!(is_instant_win(&hand));
}

#[test]
fn instant_win_four_twos() {
    let hand = cards(&[
        "2C", "2S", "2H", "2D", "3C", "5S", "7C", "9S", "JC", "KS", "4C", "6D", "8H",
    ]);
    assert!(is_instant_win(&hand));
}

#[test]
fn instant_win_dragon() {
    let hand = cards(&[
        "3C", "4S", "5C", "6S", "7C", "8S", "9C", "TS", "JC", "QS", "KC", "AS", "AH",
    ]);
    assert!(is_instant_win(&hand));
}

#[test]
fn ordinary_hand_is_not_instant_win() {
    let hand = cards(&[
        "3C", "3S", "5C", "5S", "7C", "7S", "9C", "9S", "JC", "JS", "KC", "AS", "2H",
    ]);
    assert!(!is_instant_win(&hand), "five pairs only, no dragon");
    assert!(!is_instant_win(&[]));
}
