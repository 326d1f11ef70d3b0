//! Shared test helpers for creating Aria2Client instances in tests.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use crate::client::Aria2Client;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::rpc::Transport;
use crate::types::Gid;

/// One call observed by [`MockTransport`]
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct RecordedCall {
    pub(crate) method: String,
    pub(crate) params: Vec<Value>,
}

#[derive(Clone, Debug)]
enum Reply {
    Ok(Value),
    Rpc { code: i64, message: String },
}

/// Transport that answers from a per-method script and records every call
#[derive(Debug, Default)]
pub(crate) struct MockTransport {
    replies: Mutex<HashMap<String, Reply>>,
    calls: Mutex<Vec<RecordedCall>>,
    delay: Mutex<Option<Duration>>,
}

impl MockTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Answer every call to `method` with `result`
    pub(crate) fn reply(&self, method: &str, result: Value) -> &Self {
        self.replies
            .lock()
            .unwrap()
            .insert(method.to_string(), Reply::Ok(result));
        self
    }

    /// Answer every call to `method` with a JSON-RPC error object
    pub(crate) fn fail(&self, method: &str, code: i64, message: &str) -> &Self {
        self.replies.lock().unwrap().insert(
            method.to_string(),
            Reply::Rpc {
                code,
                message: message.to_string(),
            },
        );
        self
    }

    /// Delay every reply by `delay`
    pub(crate) fn set_delay(&self, delay: Duration) {
        *self.delay.lock().unwrap() = Some(delay);
    }

    pub(crate) fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Parameters of every call to `method`, in call order
    pub(crate) fn calls_to(&self, method: &str) -> Vec<Vec<Value>> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|call| call.method == method)
            .map(|call| call.params.clone())
            .collect()
    }

    pub(crate) fn call_count(&self, method: &str) -> usize {
        self.calls_to(method).len()
    }

    /// Script the replies of a download that aria2 accepts as `gid`
    pub(crate) fn accept_download(&self, gid: &str) -> &Self {
        self.reply("aria2.addUri", Value::String(gid.to_string()))
            .reply("aria2.remove", Value::String(gid.to_string()))
            .reply("aria2.getFiles", serde_json::json!([]))
            .reply(
                "aria2.tellStatus",
                serde_json::json!({"gid": gid, "status": "complete", "totalLength": "1024", "completedLength": "1024"}),
            )
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn call(&self, method: &str, params: Vec<Value>) -> Result<Value> {
        self.calls.lock().unwrap().push(RecordedCall {
            method: method.to_string(),
            params,
        });

        let delay = *self.delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let reply = self.replies.lock().unwrap().get(method).cloned();
        match reply {
            Some(Reply::Ok(value)) => Ok(value),
            Some(Reply::Rpc { code, message }) => Err(Error::Rpc { code, message }),
            None => Err(Error::Transport(format!("no scripted reply for {method}"))),
        }
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}

/// Helper to create a test Aria2Client backed by a [`MockTransport`].
pub(crate) async fn create_test_client() -> (Aria2Client, Arc<MockTransport>) {
    create_test_client_with_config(Config::default()).await
}

pub(crate) async fn create_test_client_with_config(
    config: Config,
) -> (Aria2Client, Arc<MockTransport>) {
    let transport = Arc::new(MockTransport::new());
    let client = Aria2Client::with_transport(config, transport.clone())
        .await
        .unwrap();
    (client, transport)
}

/// Wait until a submit-and-wait call has registered its waiter for `gid`
pub(crate) async fn wait_until_registered(client: &Aria2Client, gid: &str) {
    let gid = Gid::from(gid);
    tokio::time::timeout(Duration::from_secs(2), async {
        while !client.registry().contains(&gid) {
            tokio::time::sleep(Duration::from_millis(1)).await;
        }
    })
    .await
    .expect("waiter was never registered");
}
