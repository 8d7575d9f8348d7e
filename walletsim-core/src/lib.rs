#![deny(clippy::all, clippy::pedantic, clippy::nursery)]
//! Core of a simulated cryptocurrency wallet dashboard.
//!
//! Everything here is fake by design: balances are randomly generated,
//! operations settle by dice roll, and nothing ever touches a blockchain
//! or an exchange. What is real is the state management around the fakes:
//!
//! - [`session`] — time-bounded sessions with sliding expiry and eager
//!   cleanup of expired records.
//! - [`lock`] — an inactivity monitor that locks the dashboard after five
//!   idle minutes and lets the caller wire in a sensitive-data wipe.
//! - [`engine`] — trade/stake/swap/invest requests that settle
//!   asynchronously with randomized latency and outcomes.
//! - [`wallet`] — simulated balances with periodic market fluctuation and
//!   a capped transaction log.
//! - [`storage`] — the pluggable two-tier key-value store everything
//!   persists into.
//! - [`chat`] — a keyword-matching canned-response assistant.
//!
//! Services are explicit objects constructed once over a shared store
//! handle and passed by reference; there are no process-wide singletons.
//!
//! ```
//! use std::sync::Arc;
//! use walletsim_core::session::SessionStore;
//! use walletsim_core::storage::MemoryStore;
//!
//! let store = Arc::new(MemoryStore::new());
//! let sessions = SessionStore::new(store);
//!
//! sessions.create("demo@example.com").expect("login");
//! assert!(sessions.is_valid());
//! assert_eq!(sessions.user_email().as_deref(), Some("demo@example.com"));
//!
//! sessions.clear();
//! assert!(!sessions.is_valid());
//! ```

pub mod chat;
pub mod defaults;
pub mod engine;
pub mod lock;
pub mod session;
pub mod storage;
pub mod wallet;

mod utils;
