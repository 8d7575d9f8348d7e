//! Simulated wallet state and transaction history.
//!
//! Balances are seeded with fixed data the first time they are read and
//! then perturbed by [`WalletStore::fluctuate`], which a dashboard calls on
//! a timer to make the numbers look live. The snapshot invariant holds
//! after every mutation: `total_value` equals the sum of the per-currency
//! values.
//!
//! Snapshots and transactions are written to the session tier and mirrored
//! to the local tier for restoration (transactions: only the newest
//! [`TRANSACTION_BACKUP_CAP`] entries). Reads prefer the session tier.

use std::sync::Arc;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::defaults::{TRANSACTION_BACKUP_CAP, TRANSACTION_LOG_CAP};
use crate::storage::{self, keys, KeyValueStore, Tier};
use crate::utils::{new_token, unix_millis};

/// Direction of a display-only transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum TransactionDirection {
    /// Funds left the wallet.
    Send,
    /// Funds arrived in the wallet.
    Receive,
}

/// Display status of a transaction. Immutable once created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum TransactionStatus {
    /// Confirmed.
    Completed,
    /// Awaiting confirmation.
    Pending,
    /// Rejected.
    Failed,
}

/// A display-only ledger entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Opaque unique token.
    pub id: String,
    /// Send or receive.
    pub direction: TransactionDirection,
    /// Amount moved.
    pub amount: f64,
    /// Currency symbol.
    pub currency: String,
    /// Creation instant, unix milliseconds.
    pub timestamp_ms: u64,
    /// Display status.
    pub status: TransactionStatus,
    /// Short fake chain reference.
    pub reference: String,
}

/// A simulated currency position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CryptoCurrency {
    /// Ticker symbol.
    pub symbol: String,
    /// Display name.
    pub name: String,
    /// Held balance.
    pub balance: f64,
    /// Fiat value of the position.
    pub value: f64,
    /// 24-hour change, percent.
    pub change_24h: f64,
}

/// Current simulated balances.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WalletSnapshot {
    /// Sum of the per-currency values.
    pub total_value: f64,
    /// Positions, in display order.
    pub currencies: Vec<CryptoCurrency>,
}

impl WalletSnapshot {
    /// Recomputes `total_value` from the currency values.
    pub fn recompute_total(&mut self) {
        self.total_value = self.currencies.iter().map(|currency| currency.value).sum();
    }
}

/// Service object owning wallet balances and the transaction log.
pub struct WalletStore {
    store: Arc<dyn KeyValueStore>,
}

impl WalletStore {
    /// Creates a wallet store over the given backend.
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Current snapshot: session tier, falling back to the local backup,
    /// else freshly seeded (and persisted).
    #[must_use]
    pub fn snapshot(&self) -> WalletSnapshot {
        if let Some(snapshot) = self.read_snapshot() {
            return snapshot;
        }
        let mut snapshot = seed_snapshot();
        snapshot.recompute_total();
        self.persist_snapshot(&snapshot);
        tracing::debug!("wallet seeded with default balances");
        snapshot
    }

    /// Applies a random ±1% perturbation to every position and persists
    /// the result. Returns the mutated snapshot.
    #[must_use]
    pub fn fluctuate(&self) -> WalletSnapshot {
        let mut snapshot = self.snapshot();
        let mut rng = rand::thread_rng();
        for currency in &mut snapshot.currencies {
            let fluctuation = (rng.gen::<f64>() - 0.5) * 0.02;
            currency.change_24h += fluctuation;
            currency.value *= 1.0 + fluctuation;
        }
        drop(rng);
        snapshot.recompute_total();
        self.persist_snapshot(&snapshot);
        snapshot
    }

    /// Transaction log, newest first: session tier, falling back to the
    /// local backup, else freshly seeded (and persisted).
    #[must_use]
    pub fn transactions(&self) -> Vec<Transaction> {
        let read = |tier| -> Option<Vec<Transaction>> {
            storage::read_json(self.store.as_ref(), tier, keys::TRANSACTION_LOG)
        };
        if let Some(transactions) = read(Tier::Session).or_else(|| read(Tier::Local)) {
            return transactions;
        }
        let transactions = seed_transactions(unix_millis());
        self.persist_transactions(&transactions);
        transactions
    }

    /// Appends a randomly generated transaction to the capped log.
    #[must_use]
    pub fn record_random_transaction(&self) -> Transaction {
        let mut rng = rand::thread_rng();
        let currencies = ["BTC", "ETH", "ADA", "DOT"];
        let directions = [TransactionDirection::Send, TransactionDirection::Receive];
        let statuses = [
            TransactionStatus::Completed,
            TransactionStatus::Pending,
            TransactionStatus::Failed,
        ];
        let transaction = Transaction {
            id: new_token(),
            direction: *directions.choose(&mut rng).unwrap_or(&directions[0]),
            amount: rng.gen_range(0.0..10.0),
            currency: (*currencies.choose(&mut rng).unwrap_or(&currencies[0])).to_string(),
            timestamp_ms: unix_millis(),
            status: *statuses.choose(&mut rng).unwrap_or(&statuses[0]),
            reference: format!("0x{}...", &new_token()[..12]),
        };
        drop(rng);

        let mut transactions = self.transactions();
        transactions.insert(0, transaction.clone());
        transactions.truncate(TRANSACTION_LOG_CAP);
        self.persist_transactions(&transactions);
        transaction
    }

    /// Removes the session-tier wallet and transaction records. Invoked as
    /// the idle-lock wipe effect; the local-tier backup survives until a
    /// full session clear.
    pub fn clear_sensitive(&self) {
        storage::delete_entry(self.store.as_ref(), Tier::Session, keys::WALLET_SNAPSHOT);
        storage::delete_entry(self.store.as_ref(), Tier::Session, keys::TRANSACTION_LOG);
        tracing::debug!("sensitive wallet data cleared");
    }

    fn read_snapshot(&self) -> Option<WalletSnapshot> {
        let read = |tier| -> Option<WalletSnapshot> {
            storage::read_json(self.store.as_ref(), tier, keys::WALLET_SNAPSHOT)
        };
        read(Tier::Session).or_else(|| read(Tier::Local))
    }

    fn persist_snapshot(&self, snapshot: &WalletSnapshot) {
        storage::write_json(self.store.as_ref(), Tier::Session, keys::WALLET_SNAPSHOT, snapshot);
        storage::write_json(self.store.as_ref(), Tier::Local, keys::WALLET_SNAPSHOT, snapshot);
    }

    fn persist_transactions(&self, transactions: &[Transaction]) {
        storage::write_json(
            self.store.as_ref(),
            Tier::Session,
            keys::TRANSACTION_LOG,
            &transactions,
        );
        let backup = &transactions[..transactions.len().min(TRANSACTION_BACKUP_CAP)];
        storage::write_json(self.store.as_ref(), Tier::Local, keys::TRANSACTION_LOG, &backup);
    }
}

fn seed_snapshot() -> WalletSnapshot {
    WalletSnapshot {
        total_value: 0.0,
        currencies: vec![
            CryptoCurrency {
                symbol: "BTC".to_string(),
                name: "Bitcoin".to_string(),
                balance: 1.2345,
                value: 32_450.67,
                change_24h: 2.34,
            },
            CryptoCurrency {
                symbol: "ETH".to_string(),
                name: "Ethereum".to_string(),
                balance: 5.6789,
                value: 8_567.43,
                change_24h: -1.23,
            },
            CryptoCurrency {
                symbol: "ADA".to_string(),
                name: "Cardano".to_string(),
                balance: 1_000.0,
                value: 450.0,
                change_24h: 0.89,
            },
            CryptoCurrency {
                symbol: "DOT".to_string(),
                name: "Polkadot".to_string(),
                balance: 250.5,
                value: 1_875.25,
                change_24h: -2.1,
            },
        ],
    }
}

fn seed_transactions(now_ms: u64) -> Vec<Transaction> {
    vec![
        Transaction {
            id: new_token(),
            direction: TransactionDirection::Receive,
            amount: 0.5,
            currency: "BTC".to_string(),
            timestamp_ms: now_ms.saturating_sub(3_600_000),
            status: TransactionStatus::Completed,
            reference: "0xabc123...".to_string(),
        },
        Transaction {
            id: new_token(),
            direction: TransactionDirection::Send,
            amount: 2.0,
            currency: "ETH".to_string(),
            timestamp_ms: now_ms.saturating_sub(7_200_000),
            status: TransactionStatus::Completed,
            reference: "0xdef456...".to_string(),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn wallet_pair() -> (Arc<MemoryStore>, WalletStore) {
        let backend = Arc::new(MemoryStore::new());
        let wallet = WalletStore::new(Arc::clone(&backend) as Arc<dyn KeyValueStore>);
        (backend, wallet)
    }

    fn assert_total_invariant(snapshot: &WalletSnapshot) {
        let sum: f64 = snapshot.currencies.iter().map(|c| c.value).sum();
        assert!((snapshot.total_value - sum).abs() < 1e-9);
    }

    #[test]
    fn test_snapshot_seeds_and_persists_on_first_read() {
        let (backend, wallet) = wallet_pair();
        let snapshot = wallet.snapshot();

        assert_eq!(snapshot.currencies.len(), 4);
        assert_eq!(snapshot.currencies[0].symbol, "BTC");
        assert_total_invariant(&snapshot);

        // Persisted to both tiers.
        assert!(backend
            .get(Tier::Session, keys::WALLET_SNAPSHOT)
            .expect("get")
            .is_some());
        assert!(backend
            .get(Tier::Local, keys::WALLET_SNAPSHOT)
            .expect("get")
            .is_some());
    }

    #[test]
    fn test_snapshot_round_trip_preserves_total_invariant() {
        let (_, wallet) = wallet_pair();
        wallet.snapshot();
        let reloaded = wallet.snapshot();
        assert_total_invariant(&reloaded);
    }

    #[test]
    fn test_fluctuate_mutates_and_keeps_invariant() {
        let (_, wallet) = wallet_pair();
        let before = wallet.snapshot();
        let after = wallet.fluctuate();

        assert_total_invariant(&after);
        // Values moved by at most ±1% each.
        for (b, a) in before.currencies.iter().zip(&after.currencies) {
            assert!((a.value - b.value).abs() <= b.value * 0.0101);
        }
        // The mutation was persisted.
        let reloaded = wallet.snapshot();
        assert!((reloaded.total_value - after.total_value).abs() < 1e-9);
    }

    #[test]
    fn test_snapshot_restores_from_local_backup() {
        let (backend, wallet) = wallet_pair();
        wallet.snapshot();
        // Simulate the tab closing: session tier gone, local backup kept.
        backend.clear_tier(Tier::Session).expect("clear");

        let restored = wallet.snapshot();
        assert_eq!(restored.currencies.len(), 4);
        assert_total_invariant(&restored);
    }

    #[test]
    fn test_transactions_seed_once() {
        let (_, wallet) = wallet_pair();
        let first = wallet.transactions();
        assert_eq!(first.len(), 2);
        assert_eq!(first[0].direction, TransactionDirection::Receive);

        let second = wallet.transactions();
        assert_eq!(first, second);
    }

    #[test]
    fn test_random_transactions_capped_with_backup() {
        let (backend, wallet) = wallet_pair();
        for _ in 0..(TRANSACTION_LOG_CAP + 10) {
            wallet.record_random_transaction();
        }
        let transactions = wallet.transactions();
        assert_eq!(transactions.len(), TRANSACTION_LOG_CAP);

        let backup: Vec<Transaction> =
            storage::read_json(backend.as_ref(), Tier::Local, keys::TRANSACTION_LOG)
                .expect("backup present");
        assert_eq!(backup.len(), TRANSACTION_BACKUP_CAP);
        // Backup mirrors the newest entries.
        assert_eq!(backup[0], transactions[0]);
    }

    #[test]
    fn test_clear_sensitive_removes_session_copies_only() {
        let (backend, wallet) = wallet_pair();
        wallet.snapshot();
        wallet.record_random_transaction();

        wallet.clear_sensitive();

        assert!(backend
            .get(Tier::Session, keys::WALLET_SNAPSHOT)
            .expect("get")
            .is_none());
        assert!(backend
            .get(Tier::Session, keys::TRANSACTION_LOG)
            .expect("get")
            .is_none());
        // Restoration backups survive an idle lock.
        assert!(backend
            .get(Tier::Local, keys::WALLET_SNAPSHOT)
            .expect("get")
            .is_some());
    }
}
