//! Wallet collaborator: where settlement deltas land.

use async_trait::async_trait;
use dashmap::DashMap;
use tracing::{info, warn};

use crate::domain::{PlayerId, Settlement};
use crate::errors::domain::{ConflictKind, DomainError, NotFoundKind};

#[async_trait]
pub trait Wallet: Send + Sync {
    async fn credit(&self, player_id: PlayerId, amount: i64) -> Result<(), DomainError>;

    /// Fails with `InsufficientBalance` rather than going negative.
    async fn debit(&self, player_id: PlayerId, amount: i64) -> Result<(), DomainError>;

    async fn balance(&self, player_id: PlayerId) -> Result<i64, DomainError>;
}

/// Process-local balances.
#[derive(Debug, Default)]
pub struct InMemoryWallet {
    balances: DashMap<PlayerId, i64>,
}

impl InMemoryWallet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_balances(balances: impl IntoIterator<Item = (PlayerId, i64)>) -> Self {
        Self {
            balances: balances.into_iter().collect(),
        }
    }
}

#[async_trait]
impl Wallet for InMemoryWallet {
    async fn credit(&self, player_id: PlayerId, amount: i64) -> Result<(), DomainError> {
        *self.balances.entry(player_id).or_insert(0) += amount;
        Ok(())
    }

    async fn debit(&self, player_id: PlayerId, amount: i64) -> Result<(), DomainError> {
        let mut entry = self.balances.entry(player_id).or_insert(0);
        if *entry < amount {
            return Err(DomainError::conflict(
                ConflictKind::InsufficientBalance,
                format!(
                    "Insufficient balance for {player_id}: has {}, needs {amount}",
                    *entry
                ),
            ));
        }
        *entry -= amount;
        Ok(())
    }

    async fn balance(&self, player_id: PlayerId) -> Result<i64, DomainError> {
        self.balances
            .get(&player_id)
            .map(|b| *b)
            .ok_or_else(|| {
                DomainError::not_found(NotFoundKind::Wallet, format!("No wallet for {player_id}"))
            })
    }
}

/// A settlement line the wallet refused.
#[derive(Debug, Clone, PartialEq)]
pub struct WalletFailure {
    pub player_id: PlayerId,
    pub delta: i64,
    pub error: DomainError,
}

/// Credit positive deltas and debit the negation of negative ones.
///
/// Every line is attempted; refusals are logged and returned for the caller
/// to reconcile.
pub async fn apply_settlement(wallet: &dyn Wallet, settlement: &Settlement) -> Vec<WalletFailure> {
    let mut failures = Vec::new();
    for (&player_id, &delta) in settlement {
        let res = match delta {
            d if d > 0 => wallet.credit(player_id, d).await,
            d if d < 0 => wallet.debit(player_id, -d).await,
            _ => continue,
        };
        if let Err(error) = res {
            warn!(%player_id, delta, error = %error, "Settlement line not applied");
            failures.push(WalletFailure {
                player_id,
                delta,
                error,
            });
        }
    }
    info!(
        lines = settlement.len(),
        failed = failures.len(),
        "Settlement applied"
    );
    failures
}
