//! Lifecycle notification dispatch
//!
//! - [`router`] - translates aria2 notifications into [`DownloadEvent`]s,
//!   invokes listeners and signals the completion registry
//!
//! Consumers can either register callbacks per [`EventKind`](crate::types::EventKind)
//! or read every event from a broadcast receiver / stream.

mod router;

pub use router::{Listener, NotificationRouter};

use tokio::sync::broadcast;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;
use tokio_stream::{Stream, StreamExt};

use crate::types::DownloadEvent;

/// Turn a broadcast receiver into a stream of events
///
/// A subscriber that falls behind the broadcast capacity skips the events it
/// missed; the gap is logged and the stream continues.
pub fn event_stream(
    receiver: broadcast::Receiver<DownloadEvent>,
) -> impl Stream<Item = DownloadEvent> + Send + 'static {
    BroadcastStream::new(receiver).filter_map(|result| match result {
        Ok(event) => Some(event),
        Err(BroadcastStreamRecvError::Lagged(skipped)) => {
            tracing::warn!(skipped, "event subscriber lagged, events dropped");
            None
        }
    })
}
