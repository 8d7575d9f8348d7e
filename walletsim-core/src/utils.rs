//! Small shared helpers.

use std::time::{SystemTime, UNIX_EPOCH};

/// Current wall-clock time in milliseconds since the unix epoch.
///
/// A clock before the epoch reads as zero rather than failing; nothing in
/// the simulation is worth crashing over.
pub(crate) fn unix_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| {
            u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX)
        })
}

/// Short opaque token for operation and transaction ids.
pub(crate) fn new_token() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}
