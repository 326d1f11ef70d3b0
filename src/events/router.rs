//! Notification router
//!
//! One task consumes the inbound notification stream in arrival order. For each
//! lifecycle notification it:
//! 1. hands each listener registered for the event kind to the blocking pool,
//! 2. publishes the event on the broadcast channel,
//! 3. for terminal kinds, signals the completion registry before taking the
//!    next notification.
//!
//! Listeners race with the registry signal and with each other. A listener
//! that blocks or panics only ties up its own blocking-pool thread, never a
//! runtime worker, so the router loop keeps going.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use futures::{Stream, StreamExt};
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;

use crate::completion::{CompletionRegistry, Outcome};
use crate::error::DownloadError;
use crate::rpc::Notification;
use crate::types::{DownloadEvent, EventKind};

/// Callback invoked with every event of the kind it was registered for
pub type Listener = Arc<dyn Fn(DownloadEvent) + Send + Sync + 'static>;

/// Fans lifecycle notifications out to listeners and the completion registry
pub struct NotificationRouter {
    listeners: RwLock<HashMap<EventKind, Vec<Listener>>>,
    registry: Arc<CompletionRegistry>,
    event_tx: broadcast::Sender<DownloadEvent>,
}

impl std::fmt::Debug for NotificationRouter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let listeners = self.listeners.read().unwrap_or_else(PoisonError::into_inner);
        let counts: HashMap<_, _> = listeners.iter().map(|(k, v)| (*k, v.len())).collect();
        f.debug_struct("NotificationRouter")
            .field("listeners", &counts)
            .field("registry", &self.registry)
            .finish()
    }
}

impl NotificationRouter {
    /// Create a router that signals `registry` on terminal events
    pub fn new(registry: Arc<CompletionRegistry>, broadcast_capacity: usize) -> Self {
        let (event_tx, _rx) = broadcast::channel(broadcast_capacity.max(1));
        Self {
            listeners: RwLock::new(HashMap::new()),
            registry,
            event_tx,
        }
    }

    /// Register `listener` for every future event of `kind`
    ///
    /// Listeners accumulate: registering the same callback twice invokes it twice.
    /// There is no unsubscribe.
    pub fn subscribe<F>(&self, kind: EventKind, listener: F)
    where
        F: Fn(DownloadEvent) + Send + Sync + 'static,
    {
        let mut listeners = self.listeners.write().unwrap_or_else(PoisonError::into_inner);
        listeners.entry(kind).or_default().push(Arc::new(listener));
    }

    /// Number of listeners registered for `kind`
    pub fn listener_count(&self, kind: EventKind) -> usize {
        self.listeners
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&kind)
            .map_or(0, Vec::len)
    }

    /// Receive every dispatched event, independent of listener registration
    pub fn events(&self) -> broadcast::Receiver<DownloadEvent> {
        self.event_tx.subscribe()
    }

    /// The registry this router signals
    pub fn registry(&self) -> &Arc<CompletionRegistry> {
        &self.registry
    }

    /// Deliver one event
    ///
    /// Must be called from within a tokio runtime: listeners run on its
    /// blocking pool.
    pub fn dispatch(&self, event: DownloadEvent) {
        tracing::debug!(gid = %event.gid, kind = %event.kind, "dispatching download event");

        let listeners: Vec<Listener> = self
            .listeners
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&event.kind)
            .cloned()
            .unwrap_or_default();

        for listener in listeners {
            let event = event.clone();
            // Detached: the join handle (and any panic it carries) is dropped
            tokio::task::spawn_blocking(move || listener(event));
        }

        // No receivers is fine - the event is simply dropped
        self.event_tx.send(event.clone()).ok();

        if event.kind.is_terminal() {
            self.registry.signal(&event.gid, terminal_outcome(&event));
        }
    }

    /// Translate and deliver one raw notification
    ///
    /// Unknown methods and notifications without a handle are logged and skipped.
    pub fn handle_notification(&self, notification: &Notification) -> Option<DownloadEvent> {
        match notification.to_event() {
            Ok(event) => {
                self.dispatch(event.clone());
                Some(event)
            }
            Err(e) => {
                tracing::warn!(method = %notification.method, error = %e, "ignoring notification");
                None
            }
        }
    }

    /// Consume `notifications` in arrival order until the stream ends or
    /// `shutdown` is cancelled
    pub async fn run<S>(&self, mut notifications: S, shutdown: CancellationToken)
    where
        S: Stream<Item = Notification> + Unpin,
    {
        tracing::info!("notification router started");
        loop {
            tokio::select! {
                biased;
                _ = shutdown.cancelled() => {
                    tracing::info!("notification router shut down");
                    break;
                }
                next = notifications.next() => match next {
                    Some(notification) => {
                        self.handle_notification(&notification);
                    }
                    None => {
                        tracing::info!("notification stream ended");
                        break;
                    }
                },
            }
        }
    }
}

/// Registry outcome of a terminal event
fn terminal_outcome(event: &DownloadEvent) -> Outcome {
    let gid = event.gid.clone();
    match event.kind {
        EventKind::Complete => Ok(()),
        EventKind::Stop => Err(DownloadError::Stopped { gid }),
        _ => Err(DownloadError::Errored { gid }),
    }
}
