//! Multiplexed calls (`system.multicall`) and their reply decoder
//!
//! aria2 answers a multicall with one element per sub-call, in order. A
//! successful sub-call is a one-element array wrapping its result; a failed
//! one is an error struct `{"code": .., "message": ..}`:
//!
//! ```json
//! [["2089b05ecca3d829"], {"code": 1, "message": "GID not found"}]
//! ```
//!
//! # Known ambiguity
//!
//! An element is treated as an error only if it decodes to an error struct
//! that differs from [`MethodCallError::default()`]. A genuine failure whose
//! code is `0` and whose message is empty is therefore indistinguishable from
//! "not an error" and is reported as a success with a null payload. This is
//! the protocol's detection contract, not something the decoder can repair
//! without an explicit discriminant on the wire.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};

/// One sub-call of a multicall
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MethodCall {
    /// Method to invoke (e.g. "aria2.tellStatus")
    pub method_name: String,
    /// Positional parameters, without the secret token
    pub params: Vec<Value>,
}

impl MethodCall {
    /// Build a sub-call
    pub fn new(method_name: impl Into<String>, params: Vec<Value>) -> Self {
        Self {
            method_name: method_name.into(),
            params,
        }
    }
}

/// Failure descriptor of a sub-call
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodCallError {
    /// Error code
    #[serde(default)]
    pub code: i64,
    /// Error message
    #[serde(default)]
    pub message: String,
}

impl std::fmt::Display for MethodCallError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} (code {})", self.message, self.code)
    }
}

/// Outcome of one sub-call; exactly one of `result` and `error` is set
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MethodResult {
    /// Raw result of a successful sub-call
    pub result: Option<Value>,
    /// Failure descriptor of a failed sub-call
    pub error: Option<MethodCallError>,
}

impl MethodResult {
    /// Successful outcome
    pub fn success(result: Value) -> Self {
        Self {
            result: Some(result),
            error: None,
        }
    }

    /// Failed outcome
    pub fn failure(error: MethodCallError) -> Self {
        Self {
            result: None,
            error: Some(error),
        }
    }

    /// Returns true if the sub-call succeeded
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    /// Convert into the raw result, mapping a failure to `Error::Rpc`
    pub fn into_result(self) -> Result<Value> {
        match self.error {
            Some(error) => Err(Error::Rpc {
                code: error.code,
                message: error.message,
            }),
            None => Ok(self.result.unwrap_or(Value::Null)),
        }
    }

    /// Decode a successful result into a typed value
    pub fn decode<T: DeserializeOwned>(self) -> Result<T> {
        Ok(serde_json::from_value(self.into_result()?)?)
    }
}

/// Classify every element of a multicall reply, preserving order
///
/// Pure: the same input always yields the same output.
pub fn decode_batch(raw: &[Value]) -> Vec<MethodResult> {
    raw.iter().map(decode_element).collect()
}

/// Decode a raw multicall reply buffer and classify its elements
pub fn decode_batch_bytes(raw: &[u8]) -> Result<Vec<MethodResult>> {
    let elements: Vec<Value> = serde_json::from_slice(raw)?;
    Ok(decode_batch(&elements))
}

fn decode_element(element: &Value) -> MethodResult {
    let error = decode_error(element);
    if error == MethodCallError::default() {
        MethodResult::success(sole_member(element))
    } else {
        MethodResult::failure(error)
    }
}

/// An element that does not decode as an error struct yields the zero value
///
/// Only JSON objects are error envelopes; serde would otherwise accept a
/// success array like `[5]` as a positional struct.
fn decode_error(element: &Value) -> MethodCallError {
    match element {
        Value::Object(_) => {
            MethodCallError::deserialize(element).unwrap_or_default()
        }
        _ => MethodCallError::default(),
    }
}

/// Unwrap the one-element array aria2 puts around a successful result
fn sole_member(element: &Value) -> Value {
    match element {
        Value::Array(items) => items.first().cloned().unwrap_or(Value::Null),
        _ => Value::Null,
    }
}
