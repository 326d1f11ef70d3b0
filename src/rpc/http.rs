//! JSON-RPC over HTTP(S)
//!
//! aria2 accepts JSON-RPC requests as HTTP POSTs on its `/jsonrpc` endpoint.
//! HTTP cannot carry server-initiated notifications, so a client built on
//! this transport only sees events that are fed to it through
//! [`Aria2Client::notifier`](crate::Aria2Client::notifier).

use async_trait::async_trait;
use serde_json::Value;
use std::sync::atomic::{AtomicU64, Ordering};

use super::Transport;
use super::protocol::{RpcRequest, RpcResponse};
use crate::config::Config;
use crate::error::{Error, Result};

/// Request/response transport backed by `reqwest`
#[derive(Debug)]
pub struct HttpTransport {
    client: reqwest::Client,
    url: String,
    next_id: AtomicU64,
}

impl HttpTransport {
    /// Build a transport for the endpoint and timeout in `config`
    pub fn new(config: &Config) -> Result<Self> {
        config.validate()?;
        let url = url::Url::parse(&config.rpc.url).ok();
        if !matches!(url.as_ref().map(url::Url::scheme), Some("http" | "https")) {
            return Err(Error::Config {
                message: format!("HTTP transport cannot use '{}'", config.rpc.url),
                key: Some("rpc.url".to_string()),
            });
        }

        let client = reqwest::Client::builder()
            .timeout(config.rpc.request_timeout)
            .build()?;

        Ok(Self {
            client,
            url: config.rpc.url.clone(),
            next_id: AtomicU64::new(1),
        })
    }

    /// Endpoint this transport posts to
    pub fn url(&self) -> &str {
        &self.url
    }

    fn next_id(&self) -> String {
        self.next_id.fetch_add(1, Ordering::Relaxed).to_string()
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn call(&self, method: &str, params: Vec<Value>) -> Result<Value> {
        let request = RpcRequest::new(self.next_id(), method, params);
        tracing::debug!(method, id = %request.id, "sending RPC request");

        let response = self.client.post(&self.url).json(&request).send().await?;
        let status = response.status();
        let body = response.bytes().await?;

        // aria2 answers RPC errors with a non-2xx status and a JSON error body
        match serde_json::from_slice::<RpcResponse>(&body) {
            Ok(reply) => reply.into_result(),
            Err(e) if status.is_success() => Err(Error::Serialization(e)),
            Err(_) => Err(Error::Transport(format!(
                "{} returned HTTP {}: {}",
                self.url,
                status,
                String::from_utf8_lossy(&body)
            ))),
        }
    }

    fn name(&self) -> &'static str {
        "http"
    }
}
