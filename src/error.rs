//! Error types for aria2-dl
//!
//! This module provides error handling for the library:
//! - Transport and submission failures (RPC error objects, HTTP, malformed replies)
//! - Terminal download outcomes reported by aria2 notifications
//! - Local cancellation, kept distinct from remote outcomes
//! - Machine-readable error codes for callers that map errors programmatically

use crate::types::Gid;
use thiserror::Error;

/// Result type alias for aria2-dl operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for aria2-dl
///
/// This is the primary error type used throughout the library. Each variant includes
/// contextual information to help diagnose issues.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error with context about which setting is invalid
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable error message describing the configuration issue
        message: String,
        /// The configuration key that caused the error (e.g., "rpc.url")
        key: Option<String>,
    },

    /// aria2 answered a call with a JSON-RPC error object
    #[error("aria2 RPC error {code}: {message}")]
    Rpc {
        /// JSON-RPC error code
        code: i64,
        /// Error message reported by aria2
        message: String,
    },

    /// Terminal outcome of a download (stopped or errored)
    #[error("download error: {0}")]
    Download(#[from] DownloadError),

    /// The caller's cancellation signal fired before the download finished
    #[error("download {gid} cancelled")]
    Cancelled {
        /// The download that was being waited on
        gid: Gid,
    },

    /// Transport failure that is not an HTTP error (closed channel, framing)
    #[error("transport error: {0}")]
    Transport(String),

    /// The connection to aria2 has been closed
    #[error("connection closed")]
    ConnectionClosed,

    /// A reply could not be interpreted
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// Network error
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Terminal download outcomes delivered through the completion registry
///
/// These are cloned to every waiter registered for the same download.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum DownloadError {
    /// aria2 emitted `downloadStop` (removed or stopped by a user)
    #[error("download {gid} stopped")]
    Stopped {
        /// The download that stopped
        gid: Gid,
    },

    /// aria2 emitted `downloadError`
    #[error("download {gid} encountered error")]
    Errored {
        /// The download that failed
        gid: Gid,
    },
}

impl DownloadError {
    /// The download this outcome belongs to
    pub fn gid(&self) -> &Gid {
        match self {
            DownloadError::Stopped { gid } | DownloadError::Errored { gid } => gid,
        }
    }
}

impl Error {
    /// Get the machine-readable error code
    pub fn error_code(&self) -> &'static str {
        match self {
            Error::Config { .. } => "config_error",
            Error::Rpc { .. } => "rpc_error",
            Error::Download(e) => match e {
                DownloadError::Stopped { .. } => "download_stopped",
                DownloadError::Errored { .. } => "download_errored",
            },
            Error::Cancelled { .. } => "cancelled",
            Error::Transport(_) => "transport_error",
            Error::ConnectionClosed => "connection_closed",
            Error::InvalidResponse(_) => "invalid_response",
            Error::Network(_) => "network_error",
            Error::Serialization(_) => "serialization_error",
            Error::Io(_) => "io_error",
        }
    }

    /// Returns true if this error is the local cancellation error
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Error::Cancelled { .. })
    }
}
