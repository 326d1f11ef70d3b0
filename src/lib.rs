//! # aria2-dl
//!
//! Asynchronous client library for the aria2 download utility's JSON-RPC
//! interface.
//!
//! ## Design Philosophy
//!
//! aria2-dl is designed to be:
//! - **Event-driven** - aria2's lifecycle notifications are routed to listeners
//!   and broadcast subscribers, no polling required
//! - **Submit-and-wait** - submit a download and block until it finishes or
//!   the caller cancels
//! - **Library-first** - no CLI, purely a Rust crate for embedding
//! - **Transport-agnostic** - calls go through the [`Transport`] trait
//!
//! ## Quick Start
//!
//! Plain HTTP cannot carry aria2's push notifications, so whatever connection
//! receives them (a WebSocket reader, say) forwards them to the client.
//! Without such a source, waiting on a download never ends.
//!
//! ```no_run
//! use aria2_dl::{Aria2Client, Config, EventKind, Options, utils};
//!
//! # async fn next_notification_frame() -> Option<Vec<u8>> { None }
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut config = Config::with_url("http://127.0.0.1:6800/jsonrpc");
//!     config.rpc.secret = Some("s3cret".to_string());
//!
//!     let client = Aria2Client::new(config).await?;
//!
//!     // Feed aria2's notifications into the client
//!     let feed = client.clone();
//!     tokio::spawn(async move {
//!         while let Some(frame) = next_notification_frame().await {
//!             if let Err(e) = feed.push_raw_notification(&frame).await {
//!                 eprintln!("dropping notification: {e}");
//!             }
//!         }
//!     });
//!
//!     // Subscribe to events
//!     client.subscribe(EventKind::Error, |event| {
//!         eprintln!("download {} failed", event.gid);
//!     });
//!
//!     // Submit and wait for the final status
//!     let status = client
//!         .download(
//!             utils::uris(["https://example.com/file.iso"]),
//!             Some(Options::new().with("dir", "/srv/downloads")),
//!         )
//!         .await?;
//!     println!("{} is {:?}", status.gid, status.status);
//!
//!     client.close().await?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// Multicall sub-calls and reply decoding
pub mod batch;
/// aria2 client (decomposed into focused submodules)
pub mod client;
/// Completion registry for submit-and-wait
pub mod completion;
/// Configuration types
pub mod config;
/// Error types
pub mod error;
/// Lifecycle notification dispatch
pub mod events;
/// JSON-RPC transport and protocol types
pub mod rpc;
/// Core types and events
pub mod types;
/// Utility functions
pub mod utils;

// Re-export commonly used types
pub use batch::{MethodCall, MethodCallError, MethodResult, decode_batch, decode_batch_bytes};
pub use client::{Aria2Client, GidHandle};
pub use completion::CompletionRegistry;
pub use config::{Config, DownloadBehaviour, EventConfig, RpcConfig};
pub use error::{DownloadError, Error, Result};
pub use events::{Listener, NotificationRouter};
pub use rpc::{HttpTransport, Notification, Transport};
pub use types::{
    DownloadEvent, DownloadState, EventKind, File, Gid, Options, PositionHow, Status,
};
