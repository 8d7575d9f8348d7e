//! Simulated operation engine.
//!
//! Every public operation follows the same shape: validate against the
//! static [`catalog`] → construct a `pending` [`Operation`] → persist it →
//! schedule asynchronous settlement after a randomized delay → return the
//! pending record immediately. Callers never block on settlement.
//!
//! Settlement is observable two ways: polling [`OperationEngine::get_operations`]
//! (the log is re-read from storage on every call; see
//! [`OPERATION_POLL_INTERVAL`](crate::defaults::OPERATION_POLL_INTERVAL)),
//! or awaiting terminal-state events from [`OperationEngine::subscribe`].
//!
//! In-flight settlement tasks are never cancelled. Instead, a settlement
//! write is guarded by re-reading the log: if the operation id is gone (the
//! log was wiped by a lock or logout in the interim) the write and its
//! event are dropped, so a wipe can never be undone by a late timer.

pub mod catalog;
mod operation;

pub use operation::{InvestmentStrategy, Operation, OperationKind, OperationStatus};

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use rand::Rng;
use thiserror::Error;
use tokio::sync::broadcast;

use crate::defaults::OPERATION_LOG_CAP;
use crate::storage::{self, keys, KeyValueStore, Tier};
use crate::utils::{new_token, unix_millis};

/// Swap fee, percent of the swapped amount.
const SWAP_FEE_PERCENT: f64 = 0.3;
/// Investment management fee, percent of the invested amount.
const INVEST_FEE_PERCENT: f64 = 1.5;

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Validation errors, surfaced synchronously before any record is created.
#[derive(Debug, Error, PartialEq)]
pub enum EngineError {
    /// The requested conversion is not in the trading catalog.
    #[error("trading pair not supported: {from}/{to}")]
    UnsupportedPair {
        /// Asset offered.
        from: String,
        /// Asset requested.
        to: String,
    },

    /// No staking pool exists for the asset.
    #[error("staking not available for {asset}")]
    StakingUnavailable {
        /// Asset requested.
        asset: String,
    },

    /// The stake is below the pool minimum.
    #[error("minimum stake amount is {minimum} {asset}")]
    BelowStakingMinimum {
        /// Asset requested.
        asset: String,
        /// Pool minimum.
        minimum: f64,
    },

    /// Operation amounts must be positive.
    #[error("amount must be positive")]
    NonPositiveAmount,
}

/// Engine executing simulated trade/stake/swap/invest operations.
///
/// Construct one per application over a shared store handle. Operations
/// must be issued from within a Tokio runtime; settlement runs on spawned
/// tasks.
pub struct OperationEngine {
    store: Arc<dyn KeyValueStore>,
    settled: broadcast::Sender<Operation>,
}

impl OperationEngine {
    /// Creates an engine over the given backend.
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        let (settled, _) = broadcast::channel(64);
        Self { store, settled }
    }

    /// Subscribes to terminal-state settlement events.
    ///
    /// Events for operations wiped before settlement are never published.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<Operation> {
        self.settled.subscribe()
    }

    /// Executes a catalog-checked trade.
    ///
    /// Resolves after 2–5 s with a 90% completion probability.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::UnsupportedPair`] if `(from, to)` is not a
    /// listed pair, or [`EngineError::NonPositiveAmount`].
    pub fn execute_trade(&self, from: &str, to: &str, amount: f64) -> EngineResult<Operation> {
        ensure_positive(amount)?;
        let pair = catalog::find_pair(from, to).ok_or_else(|| EngineError::UnsupportedPair {
            from: from.to_string(),
            to: to.to_string(),
        })?;

        let operation = Operation {
            id: new_token(),
            kind: OperationKind::Trade,
            from_asset: from.to_string(),
            to_asset: Some(to.to_string()),
            amount,
            fee: amount * pair.fee_percent / 100.0,
            status: OperationStatus::Pending,
            created_at_ms: unix_millis(),
            estimated_return: None,
            staking_period_days: None,
        };
        self.submit(operation, 2_000..=5_000, 0.9)
    }

    /// Executes a stake into a catalog pool.
    ///
    /// Resolves after 1–3 s, always completing.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::StakingUnavailable`] if no pool exists for
    /// `asset`, [`EngineError::BelowStakingMinimum`] if `amount` is under
    /// the pool minimum, or [`EngineError::NonPositiveAmount`].
    pub fn execute_stake(
        &self,
        asset: &str,
        amount: f64,
        period_days: u32,
    ) -> EngineResult<Operation> {
        ensure_positive(amount)?;
        let pool = catalog::find_pool(asset).ok_or_else(|| EngineError::StakingUnavailable {
            asset: asset.to_string(),
        })?;
        if amount < pool.min_amount {
            return Err(EngineError::BelowStakingMinimum {
                asset: asset.to_string(),
                minimum: pool.min_amount,
            });
        }

        let estimated_return = amount * pool.apy * f64::from(period_days) / (365.0 * 100.0);
        let operation = Operation {
            id: new_token(),
            kind: OperationKind::Stake,
            from_asset: asset.to_string(),
            to_asset: None,
            amount,
            fee: 0.0,
            status: OperationStatus::Pending,
            created_at_ms: unix_millis(),
            estimated_return: Some(estimated_return),
            staking_period_days: Some(period_days),
        };
        self.submit(operation, 1_000..=3_000, 1.0)
    }

    /// Executes a swap between arbitrary symbols (no catalog check).
    ///
    /// The swap rate is randomized per call and never persisted. Resolves
    /// after 1.5–4 s with a 95% completion probability.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::NonPositiveAmount`].
    pub fn execute_swap(&self, from: &str, to: &str, amount: f64) -> EngineResult<Operation> {
        ensure_positive(amount)?;
        let rate = rand::thread_rng().gen_range(0.5..=2.5);
        tracing::debug!(from, to, rate, "swap rate drawn");

        let operation = Operation {
            id: new_token(),
            kind: OperationKind::Swap,
            from_asset: from.to_string(),
            to_asset: Some(to.to_string()),
            amount,
            fee: amount * SWAP_FEE_PERCENT / 100.0,
            status: OperationStatus::Pending,
            created_at_ms: unix_millis(),
            estimated_return: None,
            staking_period_days: None,
        };
        self.submit(operation, 1_500..=4_000, 0.95)
    }

    /// Executes a strategy-based investment (no catalog check).
    ///
    /// Resolves after 3–7 s, always completing.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::NonPositiveAmount`].
    pub fn execute_investment(
        &self,
        asset: &str,
        amount: f64,
        strategy: InvestmentStrategy,
    ) -> EngineResult<Operation> {
        ensure_positive(amount)?;
        let operation = Operation {
            id: new_token(),
            kind: OperationKind::Invest,
            from_asset: asset.to_string(),
            to_asset: None,
            amount,
            fee: amount * INVEST_FEE_PERCENT / 100.0,
            status: OperationStatus::Pending,
            created_at_ms: unix_millis(),
            estimated_return: Some(amount * strategy.annual_rate()),
            staking_period_days: None,
        };
        self.submit(operation, 3_000..=7_000, 1.0)
    }

    /// Reads the operation log fresh from storage, newest first.
    #[must_use]
    pub fn get_operations(&self) -> Vec<Operation> {
        load_log(self.store.as_ref())
    }

    /// Erases the operation log and staking state.
    pub fn clear_operations(&self) {
        storage::delete_entry(self.store.as_ref(), Tier::Session, keys::OPERATION_LOG);
        storage::delete_entry(self.store.as_ref(), Tier::Session, keys::STAKING_STATE);
        tracing::debug!("operation log cleared");
    }

    /// Per-asset totals of successfully settled stakes.
    #[must_use]
    pub fn staked_totals(&self) -> HashMap<String, f64> {
        storage::read_json(self.store.as_ref(), Tier::Session, keys::STAKING_STATE)
            .unwrap_or_default()
    }

    /// Persists a fresh pending record and schedules its settlement.
    fn submit(
        &self,
        operation: Operation,
        delay_ms: std::ops::RangeInclusive<u64>,
        completion_probability: f64,
    ) -> EngineResult<Operation> {
        let mut log = load_log(self.store.as_ref());
        log.insert(0, operation.clone());
        log.truncate(OPERATION_LOG_CAP);
        storage::write_json(self.store.as_ref(), Tier::Session, keys::OPERATION_LOG, &log);

        let mut rng = rand::thread_rng();
        let delay_millis = rng.gen_range(delay_ms);
        let outcome = if rng.gen_bool(completion_probability) {
            OperationStatus::Completed
        } else {
            OperationStatus::Failed
        };
        drop(rng);

        tracing::debug!(
            id = %operation.id,
            kind = %operation.kind,
            delay_ms = delay_millis,
            "operation pending; settlement scheduled"
        );
        let store = Arc::clone(&self.store);
        let settled = self.settled.clone();
        let id = operation.id.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(delay_millis)).await;
            settle(store.as_ref(), &settled, &id, outcome);
        });

        Ok(operation)
    }
}

fn ensure_positive(amount: f64) -> EngineResult<()> {
    if amount > 0.0 {
        Ok(())
    } else {
        Err(EngineError::NonPositiveAmount)
    }
}

fn load_log(store: &dyn KeyValueStore) -> Vec<Operation> {
    storage::read_json(store, Tier::Session, keys::OPERATION_LOG).unwrap_or_default()
}

/// Applies a terminal outcome to a pending record, preserving its log
/// position.
///
/// Re-reads the log so a wipe in the interim makes this a no-op rather
/// than resurrecting a stale entry, and a record that already reached a
/// terminal state is never altered again.
fn settle(
    store: &dyn KeyValueStore,
    settled: &broadcast::Sender<Operation>,
    id: &str,
    outcome: OperationStatus,
) {
    let mut log = load_log(store);
    let Some(entry) = log.iter_mut().find(|op| op.id == id) else {
        tracing::debug!(id, "settlement dropped; operation no longer in log");
        return;
    };
    if entry.status.is_terminal() {
        tracing::debug!(id, status = %entry.status, "settlement dropped; already terminal");
        return;
    }
    entry.status = outcome;
    let snapshot = entry.clone();
    storage::write_json(store, Tier::Session, keys::OPERATION_LOG, &log);

    if snapshot.kind == OperationKind::Stake && outcome == OperationStatus::Completed {
        record_stake(store, &snapshot);
    }

    tracing::debug!(id, status = %outcome, "operation settled");
    // Nobody listening is fine; polling readers see the same state.
    let _ = settled.send(snapshot);
}

/// Adds a completed stake to the per-asset staked totals.
fn record_stake(store: &dyn KeyValueStore, operation: &Operation) {
    let mut totals: HashMap<String, f64> =
        storage::read_json(store, Tier::Session, keys::STAKING_STATE).unwrap_or_default();
    *totals.entry(operation.from_asset.clone()).or_insert(0.0) += operation.amount;
    storage::write_json(store, Tier::Session, keys::STAKING_STATE, &totals);
}
