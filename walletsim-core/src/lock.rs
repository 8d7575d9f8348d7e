//! Inactivity lock monitor.
//!
//! State machine: `Unlocked → (idle timeout) → Locked → (explicit unlock) →
//! Unlocked`. A durable marker mirrors the in-memory flag so a lock
//! survives reloads; either source reading locked means locked.
//!
//! The monitor's only direct responsibility is detecting the idle timeout
//! and toggling lock state. Wiping sensitive data is an effect the caller
//! wires into the `on_lock` callback — typically
//! [`WalletStore::clear_sensitive`](crate::wallet::WalletStore::clear_sensitive)
//! plus
//! [`OperationEngine::clear_operations`](crate::engine::OperationEngine::clear_operations).
//!
//! Activity signals are expected to be frequent (pointer moves fire on
//! every motion event); recording one is a single atomic load plus a
//! `Notify` ping, no storage access.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use std::time::Duration;

use tokio::sync::Notify;
use tokio::task::JoinHandle;

use crate::defaults::IDLE_TIMEOUT;
use crate::storage::{self, keys, KeyValueStore, Tier};

/// User-activity signal kinds that keep the dashboard unlocked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display, strum::EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum ActivitySignal {
    /// Pointer button pressed.
    PointerPress,
    /// Pointer moved.
    PointerMove,
    /// Key pressed.
    KeyPress,
    /// Page scrolled.
    Scroll,
    /// Touch started.
    TouchStart,
}

type LockCallback = Box<dyn Fn() + Send + Sync>;

struct MonitorInner {
    store: Arc<dyn KeyValueStore>,
    timeout: Duration,
    locked: AtomicBool,
    activity: Notify,
    unlocked: Notify,
    on_lock: RwLock<Option<LockCallback>>,
}

impl MonitorInner {
    /// Transitions to `Locked`, invoking the callback exactly once per
    /// transition.
    fn trigger_lock(&self) {
        if self
            .locked
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return;
        }
        if let Err(err) = self
            .store
            .put(Tier::Local, keys::LOCK_MARKER, b"locked")
        {
            tracing::warn!(%err, "failed to persist lock marker");
        }
        tracing::info!("session locked after inactivity");
        let callback = self
            .on_lock
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(on_lock) = callback.as_ref() {
            on_lock();
        }
    }

    fn marker_present(&self) -> bool {
        match self.store.get(Tier::Local, keys::LOCK_MARKER) {
            Ok(marker) => marker.is_some(),
            Err(err) => {
                tracing::warn!(%err, "failed to read lock marker");
                false
            }
        }
    }
}

/// Watches activity signals and locks the dashboard after a fixed idle
/// period.
pub struct IdleLockMonitor {
    inner: Arc<MonitorInner>,
    watcher: Mutex<Option<JoinHandle<()>>>,
}

impl IdleLockMonitor {
    /// Creates a monitor with the standard 5-minute idle timeout.
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self::with_timeout(store, IDLE_TIMEOUT)
    }

    /// Creates a monitor with a custom idle timeout.
    #[must_use]
    pub fn with_timeout(store: Arc<dyn KeyValueStore>, timeout: Duration) -> Self {
        Self {
            inner: Arc::new(MonitorInner {
                store,
                timeout,
                locked: AtomicBool::new(false),
                activity: Notify::new(),
                unlocked: Notify::new(),
                on_lock: RwLock::new(None),
            }),
            watcher: Mutex::new(None),
        }
    }

    /// Registers the lock callback and starts the idle watcher.
    ///
    /// If a durable lock marker is found from a previous run, the monitor
    /// transitions to `Locked` immediately (callback included) instead of
    /// waiting for the timer.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn initialize(&self, on_lock: impl Fn() + Send + Sync + 'static) {
        *self
            .inner
            .on_lock
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(Box::new(on_lock));

        if self.inner.marker_present() {
            tracing::info!("restoring previous lock state");
            self.inner.trigger_lock();
        }

        let inner = Arc::clone(&self.inner);
        let handle = tokio::spawn(async move {
            loop {
                if inner.locked.load(Ordering::SeqCst) {
                    inner.unlocked.notified().await;
                    continue;
                }
                tokio::select! {
                    () = inner.activity.notified() => {}
                    () = tokio::time::sleep(inner.timeout) => inner.trigger_lock(),
                }
            }
        });
        let mut watcher = self
            .watcher
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(previous) = watcher.replace(handle) {
            previous.abort();
        }
    }

    /// Records a user-activity signal, resetting the idle countdown while
    /// unlocked. Signals arriving while locked are ignored.
    pub fn record_activity(&self, signal: ActivitySignal) {
        if self.inner.locked.load(Ordering::SeqCst) {
            return;
        }
        tracing::trace!(%signal, "activity; idle timer reset");
        self.inner.activity.notify_one();
    }

    /// Clears lock state (flag and durable marker) and restarts the idle
    /// timer. Works regardless of how the lock was triggered.
    pub fn unlock(&self) {
        self.inner.locked.store(false, Ordering::SeqCst);
        storage::delete_entry(self.inner.store.as_ref(), Tier::Local, keys::LOCK_MARKER);
        self.inner.unlocked.notify_one();
        tracing::info!("session unlocked");
    }

    /// Returns `true` if either the in-memory flag or the durable marker
    /// says locked.
    #[must_use]
    pub fn is_locked(&self) -> bool {
        self.inner.locked.load(Ordering::SeqCst) || self.inner.marker_present()
    }

    /// Tears the monitor down: cancels the idle watcher and removes the
    /// durable marker. Not equivalent to unlocking — the in-memory flag is
    /// left as is.
    pub fn cleanup(&self) {
        let mut watcher = self
            .watcher
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(handle) = watcher.take() {
            handle.abort();
        }
        storage::delete_entry(self.inner.store.as_ref(), Tier::Local, keys::LOCK_MARKER);
    }
}

impl Drop for IdleLockMonitor {
    fn drop(&mut self) {
        let mut watcher = self
            .watcher
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(handle) = watcher.take() {
            handle.abort();
        }
    }
}
