//! Common test utilities for aria2-dl live tests

#![allow(dead_code)]

use aria2_dl::{Aria2Client, Config};

/// Error type for test configuration
#[derive(Debug)]
pub struct ConfigError(pub String);

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Config error: {}", self.0)
    }
}

impl std::error::Error for ConfigError {}

/// Load the daemon endpoint from environment variables
///
/// Required environment variables:
/// - `ARIA2_RPC_URL` - JSON-RPC endpoint (e.g. http://127.0.0.1:6800/jsonrpc)
///
/// Optional environment variables:
/// - `ARIA2_RPC_SECRET` - value of aria2's `--rpc-secret`
pub fn load_live_config() -> Result<Config, ConfigError> {
    dotenvy::dotenv().ok();

    let url = std::env::var("ARIA2_RPC_URL")
        .map_err(|_| ConfigError("ARIA2_RPC_URL not set in environment".to_string()))?;

    let mut config = Config::with_url(url);
    config.rpc.secret = std::env::var("ARIA2_RPC_SECRET").ok();
    Ok(config)
}

/// Create a client for the daemon named in the environment
pub async fn create_live_client() -> Result<Aria2Client, ConfigError> {
    let config = load_live_config()?;
    Aria2Client::new(config)
        .await
        .map_err(|e| ConfigError(format!("Failed to create client: {}", e)))
}

/// Check if a live daemon is configured
pub fn has_live_daemon() -> bool {
    dotenvy::dotenv().ok();
    std::env::var("ARIA2_RPC_URL").is_ok()
}

/// Skip test if no daemon is configured
#[macro_export]
macro_rules! skip_if_no_daemon {
    () => {
        if !$crate::common::has_live_daemon() {
            eprintln!("Skipping test: ARIA2_RPC_URL not found in .env");
            return;
        }
    };
}
