use crate::domain::settlement::{payouts_for_ranking, settle, StakeTier};
use crate::domain::test_prelude::{player, session_with_hands};
use crate::errors::domain::ValidationKind;

#[test]
fn ban1_four_players() {
    let ranking = [player(1), player(2), player(3), player(4)];
    let s = payouts_for_ranking(&ranking, StakeTier::Ban1);
    assert_eq!(s[&player(1)], 10_000);
    assert_eq!(s[&player(2)], 5_000);
    assert_eq!(s[&player(3)], -5_000);
    assert_eq!(s[&player(4)], -10_000);
}

#[test]
fn every_tier_is_zero_sum_for_four() {
    let ranking = [player(1), player(2), player(3), player(4)];
    for tier in StakeTier::ALL {
        let [first, second, third, fourth] = tier.payouts();
        assert!(first > 0 && second > 0 && third < 0 && fourth < 0);
        assert_eq!(first, -fourth);
        assert_eq!(second, -third);
        assert_eq!(payouts_for_ranking(&ranking, tier).values().sum::<i64>(), 0);
    }
    assert_eq!(StakeTier::Ban5.payouts()[0], 1_000_000);
    assert_eq!(StakeTier::Ban3.payouts()[1], 50_000);
}

#[test]
fn short_tables_stay_zero_sum() {
    let two = payouts_for_ranking(&[player(1), player(2)], StakeTier::Ban2);
    assert_eq!(two[&player(1)], 20_000);
    assert_eq!(two[&player(2)], -20_000);

    let three = payouts_for_ranking(&[player(1), player(2), player(3)], StakeTier::Ban2);
    assert_eq!(three[&player(1)], 20_000);
    assert_eq!(three[&player(2)], 0);
    assert_eq!(three[&player(3)], -20_000);
}

#[test]
fn positions_past_fourth_get_nothing() {
    let ranking: Vec<_> = (1..=5).map(player).collect();
    let s = payouts_for_ranking(&ranking, StakeTier::Ban1);
    assert_eq!(s.len(), 5);
    assert_eq!(s[&player(5)], 0);
}

#[test]
fn settle_ranks_by_hand_size_then_seat() {
    let state = session_with_hands(&[&["3S", "4S"], &[], &["5D"], &["6D", "7D"]]);
    let s = settle(&state, StakeTier::Ban1);
    assert_eq!(s.len(), 4);
    assert_eq!(s[&player(2)], 10_000);
    assert_eq!(s[&player(3)], 5_000);
    assert_eq!(s[&player(1)], -5_000, "tie with seat 4 goes to the earlier seat");
    assert_eq!(s[&player(4)], -10_000);
}

#[test]
fn stake_tier_parsing() {
    assert_eq!("BAN3".parse::<StakeTier>().unwrap(), StakeTier::Ban3);
    assert_eq!("ban4".parse::<StakeTier>().unwrap(), StakeTier::Ban4);
    let err = "BAN9".parse::<StakeTier>().unwrap_err();
    assert_eq!(err.validation_kind(), Some(&ValidationKind::ParseStakeTier));
    assert_eq!(
        serde_json::to_string(&StakeTier::Ban1).unwrap(),
        "\"BAN1\""
    );
}
