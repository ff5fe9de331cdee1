//! Response definitions
//!
//! Represents responses to clients.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::TreeKvError;

/// Response status codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    #[serde(rename = "OK")]
    Ok,
    #[serde(rename = "ERROR")]
    Error,
}

/// A response to send to client
///
/// Serialized as `{"response":"OK","value":...}` or
/// `{"response":"ERROR","reason":"..."}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    /// Status code
    #[serde(rename = "response")]
    pub status: Status,

    /// Value read by a GET
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,

    /// Human readable failure reason
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl Response {
    /// Create an OK response without a value
    pub fn ok() -> Self {
        Self {
            status: Status::Ok,
            value: None,
            reason: None,
        }
    }

    /// Create an OK response carrying a GET result
    pub fn with_value(value: Value) -> Self {
        Self {
            status: Status::Ok,
            value: Some(value),
            reason: None,
        }
    }

    /// Create an ERROR response
    pub fn error(reason: impl Into<String>) -> Self {
        Self {
            status: Status::Error,
            value: None,
            reason: Some(reason.into()),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == Status::Ok
    }
}

impl From<&TreeKvError> for Response {
    fn from(err: &TreeKvError) -> Self {
        Response::error(err.to_string())
    }
}
