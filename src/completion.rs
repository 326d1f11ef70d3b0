//! Completion registry: block until a download reaches a terminal state
//!
//! Each wait obtains its own one-shot channel, appended to a per-handle list.
//! A terminal notification drains the whole list, so concurrent waiters on the
//! same handle are all released and none can be orphaned by a later
//! registration. Signals for handles nobody waits on are dropped; missed
//! signals are not queued. A waiter dropped before its outcome arrives
//! removes its own entry.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use tokio::sync::oneshot;

use crate::error::{DownloadError, Error, Result};
use crate::types::Gid;

/// Terminal outcome delivered to waiters (`Ok` = completed)
pub type Outcome = std::result::Result<(), DownloadError>;

type WaiterMap = HashMap<Gid, Vec<oneshot::Sender<Outcome>>>;

/// Maps download handles to the waiters blocked on them
#[derive(Debug, Default)]
pub struct CompletionRegistry {
    waiters: Arc<Mutex<WaiterMap>>,
}

fn lock(waiters: &Mutex<WaiterMap>) -> MutexGuard<'_, WaiterMap> {
    // A panic while holding the lock cannot leave the map half-updated
    waiters.lock().unwrap_or_else(PoisonError::into_inner)
}

/// A registered wait that has not been awaited yet
///
/// Registering and awaiting are split so a caller can register before it
/// hands the wait to another task.
#[derive(Debug)]
#[must_use = "a waiter does nothing unless awaited"]
pub struct Waiter {
    gid: Gid,
    rx: Option<oneshot::Receiver<Outcome>>,
    registry: Weak<Mutex<WaiterMap>>,
}

impl Waiter {
    /// The download being waited on
    pub fn gid(&self) -> &Gid {
        &self.gid
    }

    /// Block until the download's terminal outcome is signalled
    ///
    /// Returns `Error::ConnectionClosed` if the registry was cleared before
    /// any outcome arrived.
    pub async fn wait(mut self) -> Result<()> {
        let Some(rx) = self.rx.as_mut() else {
            return Err(Error::ConnectionClosed);
        };
        match rx.await {
            Ok(outcome) => outcome.map_err(Error::from),
            Err(_) => Err(Error::ConnectionClosed),
        }
    }
}

impl Drop for Waiter {
    fn drop(&mut self) {
        // Closes our sender so the prune below recognises it
        drop(self.rx.take());

        let Some(registry) = self.registry.upgrade() else {
            return;
        };
        let mut waiters = lock(&registry);
        let Some(list) = waiters.get_mut(&self.gid) else {
            return;
        };
        list.retain(|tx| !tx.is_closed());
        if list.is_empty() {
            waiters.remove(&self.gid);
            tracing::trace!(gid = %self.gid, "abandoned download waiter removed");
        }
    }
}

impl CompletionRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, WaiterMap> {
        lock(&self.waiters)
    }

    /// Register a private waiter for `gid`
    pub fn register(&self, gid: &Gid) -> Waiter {
        let (tx, rx) = oneshot::channel();
        let mut waiters = self.lock();
        let list = waiters.entry(gid.clone()).or_default();
        // Drop waiters whose receivers were abandoned (e.g. after cancellation)
        list.retain(|tx| !tx.is_closed());
        list.push(tx);
        tracing::trace!(gid = %gid, waiters = list.len(), "registered download waiter");

        Waiter {
            gid: gid.clone(),
            rx: Some(rx),
            registry: Arc::downgrade(&self.waiters),
        }
    }

    /// Register and block until `gid` reaches a terminal state
    ///
    /// `Ok(())` means the download completed; stopped and errored downloads
    /// yield the corresponding [`DownloadError`].
    pub async fn wait(&self, gid: &Gid) -> Result<()> {
        self.register(gid).wait().await
    }

    /// Deliver `outcome` to every waiter registered for `gid` and forget them
    ///
    /// Returns the number of waiters that received the outcome. Without any
    /// registered waiter the signal is silently dropped.
    pub fn signal(&self, gid: &Gid, outcome: Outcome) -> usize {
        let Some(list) = self.lock().remove(gid) else {
            tracing::trace!(gid = %gid, "no waiter registered, dropping signal");
            return 0;
        };

        let delivered = list
            .into_iter()
            .filter_map(|tx| tx.send(outcome.clone()).ok())
            .count();
        tracing::debug!(gid = %gid, delivered, ok = outcome.is_ok(), "signalled download waiters");
        delivered
    }

    /// Release every pending waiter with `Error::ConnectionClosed`
    pub fn clear(&self) -> usize {
        let drained: Vec<_> = self.lock().drain().collect();
        drained.iter().map(|(_, list)| list.len()).sum()
    }

    /// Returns true if at least one waiter is registered for `gid`
    pub fn contains(&self, gid: &Gid) -> bool {
        self.lock().contains_key(gid)
    }

    /// Number of waiters registered for `gid`
    pub fn waiter_count(&self, gid: &Gid) -> usize {
        self.lock().get(gid).map_or(0, Vec::len)
    }

    /// Number of handles with registered waiters
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Returns true if nobody is waiting on anything
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}
