//! JSON-RPC 2.0 envelopes used by aria2

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};
use crate::types::{DownloadEvent, EventKind, Gid};

const JSONRPC_VERSION: &str = "2.0";

fn jsonrpc_version() -> String {
    JSONRPC_VERSION.to_string()
}

/// Outbound call
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RpcRequest {
    /// Always "2.0"
    pub jsonrpc: String,
    /// Request ID, echoed back in the response
    pub id: String,
    /// Method name (e.g. "aria2.addUri")
    pub method: String,
    /// Positional parameters
    pub params: Vec<Value>,
}

impl RpcRequest {
    /// Build a request envelope
    pub fn new(id: impl Into<String>, method: impl Into<String>, params: Vec<Value>) -> Self {
        Self {
            jsonrpc: jsonrpc_version(),
            id: id.into(),
            method: method.into(),
            params,
        }
    }
}

/// JSON-RPC error object
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RpcErrorObject {
    /// Error code
    pub code: i64,
    /// Error message
    pub message: String,
}

impl From<RpcErrorObject> for Error {
    fn from(error: RpcErrorObject) -> Self {
        Error::Rpc {
            code: error.code,
            message: error.message,
        }
    }
}

/// Reply to a call
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RpcResponse {
    /// Always "2.0"
    #[serde(default = "jsonrpc_version")]
    pub jsonrpc: String,
    /// ID of the request this answers (null for parse errors)
    #[serde(default)]
    pub id: Option<Value>,
    /// Result on success
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    /// Error object on failure
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<RpcErrorObject>,
}

impl RpcResponse {
    /// Collapse the envelope into the call outcome
    pub fn into_result(self) -> Result<Value> {
        match (self.result, self.error) {
            (_, Some(error)) => Err(error.into()),
            (Some(result), None) => Ok(result),
            (None, None) => Err(Error::InvalidResponse(
                "response carries neither result nor error".to_string(),
            )),
        }
    }
}

/// Handle carried in the params of an aria2 notification
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventParam {
    /// Download handle
    pub gid: Gid,
}

/// Inbound notification (a JSON-RPC request without an ID)
///
/// ```json
/// {"jsonrpc": "2.0", "method": "aria2.onDownloadStart", "params": [{"gid": "2089b05ecca3d829"}]}
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    /// Always "2.0"
    #[serde(default = "jsonrpc_version")]
    pub jsonrpc: String,
    /// Notification method (e.g. "aria2.onDownloadComplete")
    pub method: String,
    /// Event structs; the first names the download the event is about
    #[serde(default)]
    pub params: Vec<EventParam>,
}

impl Notification {
    /// Build the notification aria2 would send for `kind` on `gid`
    pub fn new(kind: EventKind, gid: impl Into<Gid>) -> Self {
        Self {
            jsonrpc: jsonrpc_version(),
            method: kind.method().to_string(),
            params: vec![EventParam { gid: gid.into() }],
        }
    }

    /// Parse a notification from its JSON text
    pub fn from_json(bytes: &[u8]) -> Result<Self> {
        Ok(serde_json::from_slice(bytes)?)
    }

    /// Translate into a typed lifecycle event
    ///
    /// Fails for methods that are not lifecycle notifications and for
    /// notifications without a handle.
    pub fn to_event(&self) -> Result<DownloadEvent> {
        let kind = EventKind::from_method(&self.method).ok_or_else(|| {
            Error::InvalidResponse(format!("unknown notification method: {}", self.method))
        })?;

        let mut handles = self.params.iter().map(|param| param.gid.clone());
        let gid = handles.next().ok_or_else(|| {
            Error::InvalidResponse(format!("notification {} carries no gid", self.method))
        })?;

        Ok(DownloadEvent {
            kind,
            gid,
            related: handles.collect(),
        })
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notification_to_event() {
        let raw = br#"{"jsonrpc":"2.0","method":"aria2.onDownloadComplete","params":[{"gid":"2089b05ecca3d829"}]}"#;
        let event = Notification::from_json(raw).unwrap().to_event().unwrap();
        assert_eq!(event.kind, EventKind::Complete);
        assert_eq!(event.gid, "2089b05ecca3d829");
        assert!(event.related.is_empty());
    }

    #[test]
    fn test_extra_params_become_related_handles() {
        let raw = br#"{"method":"aria2.onBtDownloadComplete","params":[{"gid":"a"},{"gid":"b"}]}"#;
        let event = Notification::from_json(raw).unwrap().to_event().unwrap();
        assert_eq!(event.kind, EventKind::BtComplete);
        assert_eq!(event.related, vec![Gid::from("b")]);
    }

    #[test]
    fn test_unknown_method_is_rejected() {
        let notification = Notification {
            jsonrpc: "2.0".into(),
            method: "aria2.onSomething".into(),
            params: vec![EventParam {
                gid: Gid::from("a"),
            }],
        };
        assert!(matches!(
            notification.to_event(),
            Err(Error::InvalidResponse(_))
        ));
    }

    #[test]
    fn test_missing_gid_is_rejected() {
        let raw = br#"{"method":"aria2.onDownloadStart","params":[]}"#;
        let notification = Notification::from_json(raw).unwrap();
        assert!(notification.to_event().is_err());
    }

    #[test]
    fn test_response_into_result() {
        let ok: RpcResponse =
            serde_json::from_str(r#"{"jsonrpc":"2.0","id":"1","result":"OK"}"#).unwrap();
        assert_eq!(ok.into_result().unwrap(), serde_json::json!("OK"));

        let err: RpcResponse = serde_json::from_str(
            r#"{"jsonrpc":"2.0","id":"2","error":{"code":1,"message":"Unauthorized"}}"#,
        )
        .unwrap();
        match err.into_result().unwrap_err() {
            Error::Rpc { code, message } => {
                assert_eq!(code, 1);
                assert_eq!(message, "Unauthorized");
            }
            other => panic!("expected rpc error, got {other:?}"),
        }

        let empty: RpcResponse = serde_json::from_str(r#"{"id":"3"}"#).unwrap();
        assert!(matches!(
            empty.into_result(),
            Err(Error::InvalidResponse(_))
        ));
    }

    #[test]
    fn test_request_envelope_shape() {
        let request = RpcRequest::new("7", "aria2.tellStatus", vec![serde_json::json!("abc")]);
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["jsonrpc"], "2.0");
        assert_eq!(value["id"], "7");
        assert_eq!(value["params"][0], "abc");
    }
}
