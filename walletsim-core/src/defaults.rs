//! Fixed durations and caps for the simulated dashboard.

use std::time::Duration;

/// Sliding session lifetime: 30 minutes from login or last extension.
pub const SESSION_DURATION_MS: u64 = 30 * 60 * 1000;

/// Idle time without an activity signal before the dashboard locks.
pub const IDLE_TIMEOUT: Duration = Duration::from_secs(5 * 60);

/// Maximum operation log length (newest first).
pub const OPERATION_LOG_CAP: usize = 50;

/// Maximum transaction log length in the session tier.
pub const TRANSACTION_LOG_CAP: usize = 50;

/// Number of transactions mirrored to the local tier as a backup.
pub const TRANSACTION_BACKUP_CAP: usize = 5;

/// Suggested interval for observers polling the operation log.
pub const OPERATION_POLL_INTERVAL: Duration = Duration::from_secs(2);
