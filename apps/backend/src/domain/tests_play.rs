use crate::domain::hand_class::HandCategory;
use crate::domain::play::{beats, Play};
use crate::domain::test_prelude::cards;

fn play(tokens: &[&str]) -> Play {
    Play::from_cards(&cards(tokens))
}

#[test]
fn primary_rank_is_the_top_value() {
    assert_eq!(play(&["9C", "9S"]).primary_rank, 9);
    assert_eq!(play(&["3C", "4S", "5D"]).primary_rank, 5);
    assert_eq!(
        play(&["5C", "5S", "6C", "6S", "7C", "7S"]).primary_rank,
        7
    );
    assert_eq!(play(&["2H"]).primary_rank, 15);
    assert_eq!(play(&["3C", "5C"]).primary_rank, 0);
}

#[test]
fn anything_valid_beats_an_empty_table() {
    assert!(beats(&play(&["3S"]), None));
    assert!(beats(&play(&["3S", "4S", "5S"]), None));
    assert!(!beats(&play(&["3S", "5S"]), None));
}

#[test]
fn invalid_never_beats() {
    let junk = play(&["3S", "9H"]);
    assert_eq!(junk.category, HandCategory::Other);
    assert!(!beats(&junk, Some(&play(&["3C"]))));
}

#[test]
fn same_shape_compares_rank() {
    assert!(beats(&play(&["4C"]), Some(&play(&["3H"]))));
    assert!(!beats(&play(&["3H"]), Some(&play(&["4C"]))));
    assert!(beats(&play(&["2C"]), Some(&play(&["AH"]))));
    assert!(beats(&play(&["KC", "KD"]), Some(&play(&["QC", "QD"]))));
    assert!(beats(
        &play(&["4C", "5D", "6H"]),
        Some(&play(&["3C", "4D", "5H"]))
    ));
}

#[test]
fn suit_does_not_break_ties() {
    assert!(!beats(&play(&["3H"]), Some(&play(&["3S"]))));
    assert!(!beats(&play(&["3S"]), Some(&play(&["3H"]))));
}

#[test]
fn shape_mismatch_does_not_beat() {
    assert!(!beats(&play(&["KC", "KD"]), Some(&play(&["3C"]))));
    assert!(!beats(
        &play(&["4C", "5D", "6H", "7H"]),
        Some(&play(&["3C", "4D", "5H"]))
    ));
    assert!(!beats(&play(&["AC"]), Some(&play(&["3C", "3D"]))));
}

#[test]
fn bombs_beat_any_non_bomb() {
    let four_threes = play(&["3C", "3D", "3H", "3S"]);
    let three_pairs = play(&["3C", "3D", "4H", "4S", "5C", "5D"]);
    let big_straight = play(&["3C", "4D", "5H", "6S", "7C", "8D", "9H", "TS", "JC", "QD", "KH", "AS"]);
    for target in [play(&["2H"]), play(&["2H", "2D"]), big_straight] {
        assert!(beats(&four_threes, Some(&target)));
        assert!(beats(&three_pairs, Some(&target)));
        assert!(!beats(&target, Some(&four_threes)));
    }
}

#[test]
fn bomb_against_bomb() {
    let fours_low = play(&["3C", "3D", "3H", "3S"]);
    let fours_high = play(&["4C", "4D", "4H", "4S"]);
    assert!(beats(&fours_high, Some(&fours_low)));
    assert!(!beats(&fours_low, Some(&fours_high)));

    let pairs3 = play(&["5C", "5D", "6H", "6S", "7C", "7D"]);
    let pairs4 = play(&["5H", "5S", "6C", "6D", "7H", "7S", "8C", "8D"]);
    assert!(!beats(&pairs4, Some(&pairs3)), "different size bombs");
    assert!(!beats(&fours_high, Some(&pairs3)), "different category bombs");
    assert!(!beats(&pairs3, Some(&fours_low)));
}

#[test]
fn a_play_never_beats_itself() {
    for p in [
        play(&["5C"]),
        play(&["5C", "5D"]),
        play(&["3C", "4D", "5H"]),
        play(&["3C", "3D", "3H", "3S"]),
    ] {
        assert!(!beats(&p, Some(&p)));
    }
}
