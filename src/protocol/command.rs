//! Command definitions
//!
//! Represents commands from clients.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Result, TreeKvError};

/// Command types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandType {
    Get,
    Set,
    Delete,
    Exit,
    Unknown,
}

impl CommandType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CommandType::Get => "get",
            CommandType::Set => "set",
            CommandType::Delete => "delete",
            CommandType::Exit => "exit",
            CommandType::Unknown => "unknown",
        }
    }
}

/// Request object as it travels on the wire.
///
/// `{"type":"set","key":["a","b"],"value":2}`. `key` and `value` are left
/// out when the command does not use them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Request {
    #[serde(rename = "type", default, deserialize_with = "kind_from_any")]
    pub kind: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

/// Read `type` from any JSON value; non-strings keep their JSON text so that
/// `{"type":5}` is an unknown command rather than a malformed request.
fn kind_from_any<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(kind) => kind,
        other => other.to_string(),
    })
}

impl Request {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            key: None,
            value: None,
        }
    }

    pub fn with_key(mut self, key: impl Into<Value>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn with_value(mut self, value: impl Into<Value>) -> Self {
        self.value = Some(value.into());
        self
    }

    /// Parse request JSON text
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| TreeKvError::MalformedRequest(e.to_string()))
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// A parsed command
///
/// Keys are kept as raw JSON; their shape is checked when the command runs
/// so that a bad key is reported as `No such key`.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Get the value at a key or path
    Get { key: Value },

    /// Store a value at a key or path
    Set { key: Value, value: Value },

    /// Remove the value at a key or path
    Delete { key: Value },

    /// Reply OK, then stop the server
    Exit,

    /// Any other `type`
    Unknown(String),
}

impl Command {
    /// Get the command type
    pub fn command_type(&self) -> CommandType {
        match self {
            Command::Get { .. } => CommandType::Get,
            Command::Set { .. } => CommandType::Set,
            Command::Delete { .. } => CommandType::Delete,
            Command::Exit => CommandType::Exit,
            Command::Unknown(_) => CommandType::Unknown,
        }
    }

    /// Wire form of this command
    pub fn to_request(&self) -> Request {
        match self {
            Command::Get { key } => Request::new("get").with_key(key.clone()),
            Command::Set { key, value } => Request::new("set")
                .with_key(key.clone())
                .with_value(value.clone()),
            Command::Delete { key } => Request::new("delete").with_key(key.clone()),
            Command::Exit => Request::new("exit"),
            Command::Unknown(kind) => Request::new(kind.clone()),
        }
    }
}

impl From<Request> for Command {
    fn from(request: Request) -> Self {
        // A missing key becomes null, which no path accepts
        let key = request.key.unwrap_or(Value::Null);
        match request.kind.as_str() {
            "get" => Command::Get { key },
            "set" => Command::Set {
                key,
                value: request.value.unwrap_or(Value::Null),
            },
            "delete" => Command::Delete { key },
            "exit" => Command::Exit,
            _ => Command::Unknown(request.kind),
        }
    }
}
