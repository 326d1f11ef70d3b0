//! Configuration types for aria2-dl

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Connection settings for the aria2 JSON-RPC endpoint
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RpcConfig {
    /// JSON-RPC endpoint (default: "http://127.0.0.1:6800/jsonrpc")
    #[serde(default = "default_rpc_url")]
    pub url: String,

    /// RPC secret, sent as "token:<secret>" with every call (None = no authentication)
    #[serde(default)]
    pub secret: Option<String>,

    /// Timeout for a single call (default: 30 seconds)
    #[serde(default = "default_request_timeout", with = "duration_serde")]
    pub request_timeout: Duration,
}

impl Default for RpcConfig {
    fn default() -> Self {
        Self {
            url: default_rpc_url(),
            secret: None,
            request_timeout: default_request_timeout(),
        }
    }
}

/// Notification dispatch settings
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EventConfig {
    /// Capacity of the inbound notification queue (default: 256)
    #[serde(default = "default_notification_capacity")]
    pub notification_capacity: usize,

    /// Capacity of the event broadcast channel (default: 1000)
    ///
    /// Subscribers that fall further behind than this receive a `Lagged` error.
    #[serde(default = "default_broadcast_capacity")]
    pub broadcast_capacity: usize,
}

impl Default for EventConfig {
    fn default() -> Self {
        Self {
            notification_capacity: default_notification_capacity(),
            broadcast_capacity: default_broadcast_capacity(),
        }
    }
}

/// Behavior of the submit-and-wait operations
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DownloadBehaviour {
    /// Delete the download's files when a waiting download is cancelled (default: true)
    #[serde(default = "default_true")]
    pub delete_files_on_cancel: bool,

    /// Keys requested from `aria2.tellStatus` for the final status (empty = all keys)
    #[serde(default)]
    pub status_keys: Vec<String>,
}

impl Default for DownloadBehaviour {
    fn default() -> Self {
        Self {
            delete_files_on_cancel: true,
            status_keys: Vec::new(),
        }
    }
}

/// Main configuration for [`Aria2Client`](crate::Aria2Client)
///
/// Fields are organized into logical sub-configs:
/// - [`rpc`](RpcConfig) - endpoint, secret, timeouts
/// - [`events`](EventConfig) - notification and broadcast capacities
/// - [`download`](DownloadBehaviour) - cancellation cleanup, final status keys
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Config {
    /// RPC endpoint settings
    #[serde(default)]
    pub rpc: RpcConfig,

    /// Notification dispatch settings
    #[serde(default)]
    pub events: EventConfig,

    /// Submit-and-wait behavior
    #[serde(default)]
    pub download: DownloadBehaviour,
}

impl Config {
    /// Configuration pointing at the given endpoint with everything else defaulted
    pub fn with_url(url: impl Into<String>) -> Self {
        Self {
            rpc: RpcConfig {
                url: url.into(),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    /// Check the configuration for values the client cannot work with
    ///
    /// The endpoint may use any scheme aria2 serves RPC on (`http`, `https`,
    /// `ws`, `wss`). Each transport narrows that further:
    /// [`HttpTransport`](crate::rpc::HttpTransport) refuses `ws` and `wss`, so
    /// [`Aria2Client::new`](crate::Aria2Client::new) does too, while
    /// [`Aria2Client::with_transport`](crate::Aria2Client::with_transport)
    /// accepts whatever the supplied transport does.
    pub fn validate(&self) -> Result<()> {
        let url = url::Url::parse(&self.rpc.url).map_err(|e| Error::Config {
            message: format!("invalid RPC url '{}': {}", self.rpc.url, e),
            key: Some("rpc.url".to_string()),
        })?;

        if !matches!(url.scheme(), "http" | "https" | "ws" | "wss") {
            return Err(Error::Config {
                message: format!("unsupported RPC url scheme '{}'", url.scheme()),
                key: Some("rpc.url".to_string()),
            });
        }

        if self.rpc.request_timeout.is_zero() {
            return Err(Error::Config {
                message: "request timeout must be greater than zero".to_string(),
                key: Some("rpc.request_timeout".to_string()),
            });
        }

        if self.events.notification_capacity == 0 {
            return Err(Error::Config {
                message: "notification capacity must be greater than zero".to_string(),
                key: Some("events.notification_capacity".to_string()),
            });
        }

        if self.events.broadcast_capacity == 0 {
            return Err(Error::Config {
                message: "broadcast capacity must be greater than zero".to_string(),
                key: Some("events.broadcast_capacity".to_string()),
            });
        }

        Ok(())
    }

    /// The token parameter aria2 expects as the first positional argument
    pub(crate) fn token_arg(&self) -> Option<String> {
        self.rpc
            .secret
            .as_ref()
            .map(|secret| format!("token:{secret}"))
    }
}

fn default_rpc_url() -> String {
    "http://127.0.0.1:6800/jsonrpc".to_string()
}

fn default_request_timeout() -> Duration {
    Duration::from_secs(30)
}

fn default_notification_capacity() -> usize {
    256
}

fn default_broadcast_capacity() -> usize {
    1000
}

fn default_true() -> bool {
    true
}

// Duration serialization helper
mod duration_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_secs())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.rpc.url, "http://127.0.0.1:6800/jsonrpc");
        assert_eq!(config.rpc.request_timeout, Duration::from_secs(30));
        assert_eq!(config.events.broadcast_capacity, 1000);
        assert!(config.download.delete_files_on_cancel);
        assert!(config.validate().is_ok());
        assert_eq!(config.token_arg(), None);
    }

    #[test]
    fn test_deserialize_partial_config() {
        let config: Config = serde_json::from_str(
            r#"{"rpc": {"url": "http://aria2.local:6800/jsonrpc", "secret": "s3cret", "request_timeout": 5}}"#,
        )
        .unwrap();
        assert_eq!(config.rpc.url, "http://aria2.local:6800/jsonrpc");
        assert_eq!(config.rpc.request_timeout, Duration::from_secs(5));
        assert_eq!(config.token_arg().as_deref(), Some("token:s3cret"));
        assert_eq!(config.events.notification_capacity, 256);
    }

    #[test]
    fn test_validate_rejects_bad_url() {
        let config = Config::with_url("not a url");
        let err = config.validate().unwrap_err();
        match err {
            Error::Config { key, .. } => assert_eq!(key.as_deref(), Some("rpc.url")),
            other => panic!("expected config error, got {other:?}"),
        }
    }

    #[test]
    fn test_validate_rejects_unsupported_scheme() {
        let config = Config::with_url("ftp://127.0.0.1:6800/jsonrpc");
        assert!(matches!(config.validate(), Err(Error::Config { .. })));
    }

    #[test]
    fn test_validate_rejects_zero_capacity() {
        let mut config = Config::default();
        config.events.broadcast_capacity = 0;
        match config.validate().unwrap_err() {
            Error::Config { key, .. } => {
                assert_eq!(key.as_deref(), Some("events.broadcast_capacity"))
            }
            other => panic!("expected config error, got {other:?}"),
        }
    }
}
