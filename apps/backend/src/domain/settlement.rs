//! Converting a final ranking into per-player credits and debits.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::state::{PlayerId, SessionState};
use crate::errors::domain::{DomainError, ValidationKind};

/// Signed chip deltas, positive = credit.
pub type Settlement = BTreeMap<PlayerId, i64>;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum StakeTier {
    #[serde(rename = "BAN1")]
    Ban1,
    #[serde(rename = "BAN2")]
    Ban2,
    #[serde(rename = "BAN3")]
    Ban3,
    #[serde(rename = "BAN4")]
    Ban4,
    #[serde(rename = "BAN5")]
    Ban5,
}

impl StakeTier {
    pub const ALL: [StakeTier; 5] = [
        StakeTier::Ban1,
        StakeTier::Ban2,
        StakeTier::Ban3,
        StakeTier::Ban4,
        StakeTier::Ban5,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            StakeTier::Ban1 => "BAN1",
            StakeTier::Ban2 => "BAN2",
            StakeTier::Ban3 => "BAN3",
            StakeTier::Ban4 => "BAN4",
            StakeTier::Ban5 => "BAN5",
        }
    }

    /// `[first, second, third, fourth]`; zero-sum.
    pub const fn payouts(self) -> [i64; 4] {
        match self {
            StakeTier::Ban1 => [10_000, 5_000, -5_000, -10_000],
            StakeTier::Ban2 => [20_000, 10_000, -10_000, -20_000],
            StakeTier::Ban3 => [100_000, 50_000, -50_000, -100_000],
            StakeTier::Ban4 => [200_000, 100_000, -100_000, -200_000],
            StakeTier::Ban5 => [1_000_000, 500_000, -500_000, -1_000_000],
        }
    }
}

impl fmt::Display for StakeTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StakeTier {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StakeTier::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                DomainError::validation(
                    ValidationKind::ParseStakeTier,
                    format!("Unknown stake tier: {s}"),
                )
            })
    }
}

/// Payout per ranking position for a table of `players`.
///
/// Two players take first and fourth, three take first, nothing and fourth,
/// so every game at 2..=4 players is zero-sum. Positions past fourth get 0.
fn position_payouts(tier: StakeTier, players: usize) -> Vec<i64> {
    let [first, second, third, fourth] = tier.payouts();
    let mut table = match players {
        0 => Vec::new(),
        1 => vec![0],
        2 => vec![first, fourth],
        3 => vec![first, 0, fourth],
        _ => vec![first, second, third, fourth],
    };
    table.resize(players, 0);
    table
}

/// Pay out an explicit ranking, best first.
pub fn payouts_for_ranking(ranking: &[PlayerId], tier: StakeTier) -> Settlement {
    ranking
        .iter()
        .copied()
        .zip(position_payouts(tier, ranking.len()))
        .collect()
}

/// Rank by remaining hand size (seat order on ties) and pay out.
pub fn settle(state: &SessionState, tier: StakeTier) -> Settlement {
    let mut ranking = state.turn_order.clone();
    ranking.sort_by_key(|p| state.hand_size(*p));
    payouts_for_ranking(&ranking, tier)
}
