//! Well-known record keys.
//!
//! Key names are shared between services so that a privacy wipe in one
//! service can remove records written by another.

/// Session-tier record holding the authenticated session.
pub const SESSION_RECORD: &str = "wallet_session";

/// Local-tier mirror of the last login email, kept for UI restoration only.
pub const USER_EMAIL: &str = "user_email";

/// Local-tier marker set while the dashboard is idle-locked.
pub const LOCK_MARKER: &str = "session_lock";

/// Session-tier operation log, newest first, capped.
pub const OPERATION_LOG: &str = "crypto_operations";

/// Session-tier per-asset staked totals.
pub const STAKING_STATE: &str = "user_staking";

/// Wallet snapshot, written to both tiers.
pub const WALLET_SNAPSHOT: &str = "wallet_data";

/// Transaction log, capped per tier.
pub const TRANSACTION_LOG: &str = "transaction_history";
