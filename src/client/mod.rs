//! aria2 client: remote operations, notification dispatch and submit-and-wait
//!
//! The client is split into focused submodules:
//! - [`add`] - submitting URIs, torrents and metalinks
//! - [`control`] - remove, pause, unpause and delete
//! - [`query`] - status, files, peers, queue inspection and global info
//! - [`options`] - per-download and global options
//! - [`session`] - download results, session save and remote shutdown
//! - [`multicall`] - batched calls through `system.multicall`
//! - [`orchestration`] - waiting for downloads and submit-and-wait
//! - [`handle`] - [`GidHandle`], a client bound to one download

mod add;
mod control;
mod handle;
mod multicall;
mod options;
mod orchestration;
mod query;
mod session;

#[cfg(test)]
pub(crate) mod test_helpers;

#[cfg(test)]
mod tests;

pub use handle::GidHandle;

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tokio::sync::{broadcast, mpsc};
use tokio_stream::Stream;
use tokio_stream::wrappers::ReceiverStream;
use tokio_util::sync::CancellationToken;

use crate::completion::{CompletionRegistry, Waiter};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::events::{self, NotificationRouter};
use crate::rpc::{HttpTransport, Notification, Transport};
use crate::types::{DownloadEvent, EventKind, Gid, Options};

/// Client for a running aria2 instance (cloneable - all fields are Arc-wrapped)
#[derive(Clone)]
pub struct Aria2Client {
    /// Issues JSON-RPC calls
    pub(crate) transport: Arc<dyn Transport>,
    /// Configuration (wrapped in Arc for sharing across tasks)
    pub(crate) config: Arc<Config>,
    /// Listener table, event broadcast and completion registry
    pub(crate) router: Arc<NotificationRouter>,
    /// Inbound notification queue consumed by the router task
    pub(crate) notify_tx: mpsc::Sender<Notification>,
    /// Stops the router task
    pub(crate) dispatch_shutdown: CancellationToken,
}

impl std::fmt::Debug for Aria2Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Aria2Client")
            .field("transport", &self.transport.name())
            .field("url", &self.config.rpc.url)
            .field("closed", &self.is_closed())
            .finish()
    }
}

impl Aria2Client {
    /// Create a client that talks to aria2 over HTTP
    ///
    /// Spawns the notification router on the current tokio runtime.
    ///
    /// HTTP only carries calls. aria2's notifications have to be forwarded
    /// through [`notifier`](Self::notifier) or
    /// [`push_raw_notification`](Self::push_raw_notification); until they are,
    /// [`download`](Self::download), [`run_download`](Self::run_download) and
    /// [`wait_for_download`](Self::wait_for_download) never see a terminal
    /// event and only return on cancellation or [`close`](Self::close).
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use aria2_dl::{Aria2Client, Config};
    ///
    /// #[tokio::main]
    /// async fn main() -> Result<(), Box<dyn std::error::Error>> {
    ///     let client = Aria2Client::new(Config::with_url("http://127.0.0.1:6800/jsonrpc")).await?;
    ///     let version = client.get_version().await?;
    ///     println!("aria2 {}", version.version);
    ///     Ok(())
    /// }
    /// ```
    pub async fn new(config: Config) -> Result<Self> {
        let transport = Arc::new(HttpTransport::new(&config)?);
        Self::with_transport(config, transport).await
    }

    /// Create a client on top of an existing transport
    pub async fn with_transport(config: Config, transport: Arc<dyn Transport>) -> Result<Self> {
        config.validate()?;

        let registry = Arc::new(CompletionRegistry::new());
        let router = Arc::new(NotificationRouter::new(
            registry,
            config.events.broadcast_capacity,
        ));
        let (notify_tx, notify_rx) = mpsc::channel(config.events.notification_capacity);
        let dispatch_shutdown = CancellationToken::new();

        {
            let router = router.clone();
            let shutdown = dispatch_shutdown.clone();
            tokio::spawn(async move {
                router.run(ReceiverStream::new(notify_rx), shutdown).await;
            });
        }

        tracing::info!(
            transport = transport.name(),
            url = %config.rpc.url,
            authenticated = config.rpc.secret.is_some(),
            "aria2 client initialized"
        );

        Ok(Self {
            transport,
            config: Arc::new(config),
            router,
            notify_tx,
            dispatch_shutdown,
        })
    }

    /// The configuration this client was built with
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The registry that releases waiters on terminal events
    pub fn registry(&self) -> &Arc<CompletionRegistry> {
        self.router.registry()
    }

    /// Register `listener` for every future event of `kind`
    ///
    /// Listeners accumulate and run on their own tasks; a listener that panics
    /// or blocks does not affect other listeners or waiting downloads.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use aria2_dl::{Aria2Client, Config, EventKind};
    ///
    /// # async fn example(client: Aria2Client) {
    /// client.subscribe(EventKind::Complete, |event| {
    ///     println!("download {} complete", event.gid);
    /// });
    /// # }
    /// ```
    pub fn subscribe<F>(&self, kind: EventKind, listener: F)
    where
        F: Fn(DownloadEvent) + Send + Sync + 'static,
    {
        self.router.subscribe(kind, listener);
    }

    /// Receive every dispatched event
    ///
    /// Subscribers falling behind by more than `events.broadcast_capacity`
    /// events receive `RecvError::Lagged`.
    pub fn events(&self) -> broadcast::Receiver<DownloadEvent> {
        self.router.events()
    }

    /// Every dispatched event as a stream (lagged events are skipped)
    pub fn event_stream(&self) -> impl Stream<Item = DownloadEvent> + Send + 'static {
        events::event_stream(self.router.events())
    }

    /// Sender for inbound aria2 notifications
    ///
    /// Whatever owns the notification connection (e.g. a WebSocket reader)
    /// pushes notifications here; they are dispatched in the order sent.
    pub fn notifier(&self) -> mpsc::Sender<Notification> {
        self.notify_tx.clone()
    }

    /// Queue one inbound notification for dispatch
    pub async fn push_notification(&self, notification: Notification) -> Result<()> {
        self.notify_tx
            .send(notification)
            .await
            .map_err(|_| Error::ConnectionClosed)
    }

    /// Decode a raw JSON-RPC notification and queue it for dispatch
    pub async fn push_raw_notification(&self, raw: &[u8]) -> Result<()> {
        self.push_notification(Notification::from_json(raw)?).await
    }

    /// A handle bound to one download
    pub fn gid(&self, gid: impl Into<Gid>) -> GidHandle {
        GidHandle::new(self.clone(), gid.into())
    }

    /// Returns true once [`close`](Self::close) was called
    pub fn is_closed(&self) -> bool {
        self.dispatch_shutdown.is_cancelled()
    }

    /// Stop dispatching notifications and release the transport
    ///
    /// Downloads still being waited on can no longer be released by a
    /// terminal event, so their waiters fail with `Error::ConnectionClosed`.
    /// Calls made after closing fail the same way.
    pub async fn close(&self) -> Result<()> {
        self.dispatch_shutdown.cancel();
        let released = self.registry().clear();
        tracing::info!(released, "aria2 client closed");
        self.transport.close().await
    }

    pub(crate) fn ensure_open(&self) -> Result<()> {
        if self.is_closed() {
            return Err(Error::ConnectionClosed);
        }
        Ok(())
    }

    /// Positional parameters with the secret token prepended
    pub(crate) fn args(&self, params: Vec<Value>) -> Vec<Value> {
        match self.config.token_arg() {
            Some(token) => std::iter::once(Value::String(token)).chain(params).collect(),
            None => params,
        }
    }

    /// Register a completion waiter for `gid` on an open client
    ///
    /// `close` cancels before it clears the registry, so a registration that
    /// lands after the clear sees the client closed here.
    pub(crate) fn register_waiter(&self, gid: &Gid) -> Result<Waiter> {
        let waiter = self.registry().register(gid);
        self.ensure_open()?;
        Ok(waiter)
    }

    /// Call `method` and decode its result
    pub(crate) async fn call<T: DeserializeOwned>(
        &self,
        method: &str,
        params: Vec<Value>,
    ) -> Result<T> {
        self.ensure_open()?;
        let reply = self.transport.call(method, self.args(params)).await?;
        serde_json::from_value(reply).map_err(|e| {
            Error::InvalidResponse(format!("unexpected reply to {method}: {e}"))
        })
    }

    /// Call a method whose result is only an acknowledgement ("OK" or a GID)
    pub(crate) async fn call_unit(&self, method: &str, params: Vec<Value>) -> Result<()> {
        let _: Value = self.call(method, params).await?;
        Ok(())
    }
}

/// Append the optional options/position pair of the add methods
///
/// aria2 reads both positionally, so a position without options still needs
/// an empty options object in front of it.
pub(crate) fn push_options(
    params: &mut Vec<Value>,
    options: Option<&Options>,
    position: Option<u32>,
) -> Result<()> {
    match (options, position) {
        (Some(options), position) => {
            params.push(serde_json::to_value(options)?);
            if let Some(position) = position {
                params.push(json!(position));
            }
        }
        (None, Some(position)) => {
            params.push(json!({}));
            params.push(json!(position));
        }
        (None, None) => {}
    }
    Ok(())
}

/// Append a key filter when one was given (no keys = every key)
pub(crate) fn push_keys(params: &mut Vec<Value>, keys: &[&str]) {
    if !keys.is_empty() {
        params.push(json!(keys));
    }
}
