//! Authenticated session lifecycle.
//!
//! A session is a time-bounded record (email, login time, expiry) owned
//! exclusively by [`SessionStore`]. Validity is a lazy wall-clock comparison
//! evaluated on every read; expired or malformed records are eagerly
//! deleted so callers never observe a stale session.
//!
//! Clearing a session is a full privacy wipe: the entire session tier goes,
//! along with the local-tier email mirror and wallet/transaction backups.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::defaults::SESSION_DURATION_MS;
use crate::storage::{self, keys, KeyValueStore, Tier};
use crate::utils::unix_millis;

/// Result type for session operations.
pub type SessionResult<T> = Result<T, SessionError>;

/// Errors raised when creating a session.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    /// Login requires a non-empty email.
    #[error("email must not be empty")]
    EmptyEmail,
}

/// A time-bounded authenticated context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Email the session was created for.
    pub email: String,
    /// Login instant, unix milliseconds.
    pub login_time_ms: u64,
    /// Expiry instant, unix milliseconds. The session is valid strictly
    /// before this instant.
    pub expires_at_ms: u64,
}

/// Service object owning the session record.
///
/// Construct one per application (or per test) over a shared store handle.
pub struct SessionStore {
    store: Arc<dyn KeyValueStore>,
}

impl SessionStore {
    /// Creates a session store over the given backend.
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Logs in: writes a fresh session record and mirrors the email to the
    /// local tier for UI restoration.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::EmptyEmail`] if `email` is empty or
    /// whitespace.
    pub fn create(&self, email: &str) -> SessionResult<Session> {
        self.create_at(email, unix_millis())
    }

    fn create_at(&self, email: &str, now_ms: u64) -> SessionResult<Session> {
        let email = email.trim();
        if email.is_empty() {
            return Err(SessionError::EmptyEmail);
        }
        let session = Session {
            email: email.to_string(),
            login_time_ms: now_ms,
            expires_at_ms: now_ms.saturating_add(SESSION_DURATION_MS),
        };
        storage::write_json(self.store.as_ref(), Tier::Session, keys::SESSION_RECORD, &session);
        storage::write_json(
            self.store.as_ref(),
            Tier::Local,
            keys::USER_EMAIL,
            &session.email,
        );
        tracing::debug!(email = %session.email, "session created");
        Ok(session)
    }

    /// Returns `true` while a well-formed, unexpired session record exists.
    ///
    /// An expired record is cleared as a side effect, so a `false` reading
    /// also guarantees the record is gone.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.is_valid_at(unix_millis())
    }

    fn is_valid_at(&self, now_ms: u64) -> bool {
        let Some(session) = self.peek() else {
            return false;
        };
        if now_ms >= session.expires_at_ms {
            tracing::debug!("session expired; clearing");
            self.clear();
            return false;
        }
        true
    }

    /// Returns the current session, or absence if none is valid.
    ///
    /// Never returns a stale record: validity (including eager expiry
    /// cleanup) is checked first.
    #[must_use]
    pub fn get(&self) -> Option<Session> {
        self.get_at(unix_millis())
    }

    fn get_at(&self, now_ms: u64) -> Option<Session> {
        if self.is_valid_at(now_ms) {
            self.peek()
        } else {
            None
        }
    }

    /// Sliding-window renewal: re-creates the session with the same email
    /// and a fresh expiry. Returns the renewed session, or absence if there
    /// was no valid session to extend.
    #[must_use]
    pub fn extend(&self) -> Option<Session> {
        self.extend_at(unix_millis())
    }

    fn extend_at(&self, now_ms: u64) -> Option<Session> {
        let session = self.get_at(now_ms)?;
        self.create_at(&session.email, now_ms).ok()
    }

    /// Logs out: wipes the entire session tier plus the local-tier email
    /// mirror and wallet/transaction backups.
    pub fn clear(&self) {
        if let Err(err) = self.store.clear_tier(Tier::Session) {
            tracing::warn!(%err, "failed to clear session tier");
        }
        storage::delete_entry(self.store.as_ref(), Tier::Local, keys::USER_EMAIL);
        storage::delete_entry(self.store.as_ref(), Tier::Local, keys::WALLET_SNAPSHOT);
        storage::delete_entry(self.store.as_ref(), Tier::Local, keys::TRANSACTION_LOG);
        tracing::debug!("session cleared; temporary data removed");
    }

    /// Email of the current session, falling back to the local-tier mirror
    /// when no session is live.
    #[must_use]
    pub fn user_email(&self) -> Option<String> {
        self.get().map(|session| session.email).or_else(|| {
            storage::read_json(self.store.as_ref(), Tier::Local, keys::USER_EMAIL)
        })
    }

    /// Raw read of the session record, without validity checks.
    fn peek(&self) -> Option<Session> {
        storage::read_json(self.store.as_ref(), Tier::Session, keys::SESSION_RECORD)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn store_pair() -> (Arc<MemoryStore>, SessionStore) {
        let backend = Arc::new(MemoryStore::new());
        let sessions = SessionStore::new(Arc::clone(&backend) as Arc<dyn KeyValueStore>);
        (backend, sessions)
    }

    #[test]
    fn test_create_rejects_empty_email() {
        let (_, sessions) = store_pair();
        assert_eq!(sessions.create(""), Err(SessionError::EmptyEmail));
        assert_eq!(sessions.create("   "), Err(SessionError::EmptyEmail));
        assert!(!sessions.is_valid());
    }

    #[test]
    fn test_session_valid_strictly_before_expiry() {
        let (_, sessions) = store_pair();
        let session = sessions
            .create_at("a@example.com", 1_000)
            .expect("create session");
        assert_eq!(session.expires_at_ms, 1_000 + SESSION_DURATION_MS);

        assert!(sessions.is_valid_at(1_000));
        assert!(sessions.is_valid_at(1_000 + SESSION_DURATION_MS - 1));
        // Exactly at expiry the session is invalid and must be cleared.
        assert!(!sessions.is_valid_at(1_000 + SESSION_DURATION_MS));
        assert!(sessions.peek().is_none());
    }

    #[test]
    fn test_get_never_returns_stale_record() {
        let (_, sessions) = store_pair();
        sessions
            .create_at("a@example.com", 1_000)
            .expect("create session");
        assert!(sessions.get_at(2_000).is_some());
        assert!(sessions.get_at(1_000 + SESSION_DURATION_MS).is_none());
        assert!(sessions.get_at(2_000).is_none());
    }

    #[test]
    fn test_extend_keeps_email_and_increases_expiry() {
        let (_, sessions) = store_pair();
        let original = sessions
            .create_at("a@example.com", 1_000)
            .expect("create session");
        let renewed = sessions.extend_at(5_000).expect("extend session");

        assert_eq!(renewed.email, original.email);
        assert!(renewed.expires_at_ms > original.expires_at_ms);
        assert_eq!(renewed.login_time_ms, 5_000);
    }

    #[test]
    fn test_extend_without_session_is_noop() {
        let (_, sessions) = store_pair();
        assert!(sessions.extend().is_none());
    }

    #[test]
    fn test_clear_wipes_session_tier_and_backups() {
        let (backend, sessions) = store_pair();
        sessions.create("a@example.com").expect("create session");
        backend
            .put(Tier::Session, keys::WALLET_SNAPSHOT, b"{}")
            .expect("seed wallet");
        backend
            .put(Tier::Local, keys::WALLET_SNAPSHOT, b"{}")
            .expect("seed backup");

        sessions.clear();

        assert!(backend.is_empty(Tier::Session));
        assert!(backend
            .get(Tier::Local, keys::USER_EMAIL)
            .expect("get")
            .is_none());
        assert!(backend
            .get(Tier::Local, keys::WALLET_SNAPSHOT)
            .expect("get")
            .is_none());
    }

    #[test]
    fn test_malformed_record_treated_as_absent() {
        let (backend, sessions) = store_pair();
        backend
            .put(Tier::Session, keys::SESSION_RECORD, b"garbage")
            .expect("seed garbage");

        assert!(!sessions.is_valid());
        assert!(sessions.get().is_none());
        assert!(backend
            .get(Tier::Session, keys::SESSION_RECORD)
            .expect("get")
            .is_none());
    }

    #[test]
    fn test_user_email_falls_back_to_local_mirror() {
        let (_, sessions) = store_pair();
        sessions
            .create_at("a@example.com", 1_000)
            .expect("create session");
        assert_eq!(sessions.user_email().as_deref(), Some("a@example.com"));

        // No live session, only the mirror: the fallback path is taken.
        let (backend, sessions) = store_pair();
        storage::write_json(
            backend.as_ref(),
            Tier::Local,
            keys::USER_EMAIL,
            &"mirror@example.com".to_string(),
        );
        assert_eq!(
            sessions.user_email().as_deref(),
            Some("mirror@example.com")
        );
    }
}
