//! JSON-RPC transport seam
//!
//! The client never talks to the network directly. Calls go through a
//! [`Transport`], and inbound notifications are pushed into the client by
//! whatever owns the connection (see [`Aria2Client::notifier`](crate::Aria2Client::notifier)).
//!
//! - [`protocol`] - JSON-RPC 2.0 envelopes and aria2 notifications
//! - [`http`] - request/response transport over HTTP(S)

pub mod http;
pub mod protocol;

use async_trait::async_trait;
use serde_json::Value;

pub use http::HttpTransport;
pub use protocol::{Notification, RpcErrorObject, RpcRequest, RpcResponse};

/// Issues JSON-RPC calls against aria2
///
/// Implementations receive fully assembled positional parameters (the secret
/// token, if any, is already the first element) and return the raw `result`
/// member of the reply. A JSON-RPC error object must be returned as
/// [`Error::Rpc`](crate::Error::Rpc).
///
/// # Examples
///
/// ```no_run
/// use aria2_dl::rpc::{HttpTransport, Transport};
/// use aria2_dl::Config;
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let transport = HttpTransport::new(&Config::default())?;
/// let version = transport.call("aria2.getVersion", vec![]).await?;
/// println!("{version}");
/// # Ok(())
/// # }
/// ```
#[async_trait]
pub trait Transport: Send + Sync {
    /// Call `method` with positional `params` and return the `result` member
    async fn call(&self, method: &str, params: Vec<Value>) -> crate::Result<Value>;

    /// Release the underlying connection
    ///
    /// Stateless transports have nothing to release.
    async fn close(&self) -> crate::Result<()> {
        Ok(())
    }

    /// Human-readable name for logging
    fn name(&self) -> &'static str;
}
