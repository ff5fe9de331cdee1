//! Key paths
//!
//! A path is the ordered list of object keys leading to a location in the
//! document. A flat key is simply a path with one segment.

use std::fmt;

use serde_json::Value;

use crate::error::{Result, TreeKvError};

/// Non-empty sequence of object keys
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Path {
    segments: Vec<String>,
}

impl Path {
    /// Build a path from its segments, rejecting an empty one
    pub fn new(segments: Vec<String>) -> Result<Self> {
        if segments.is_empty() {
            return Err(TreeKvError::NoSuchKey);
        }
        Ok(Self { segments })
    }

    /// A single top-level key
    pub fn flat(key: impl Into<String>) -> Self {
        Self {
            segments: vec![key.into()],
        }
    }

    /// Parse the `key` field of a get or delete request.
    ///
    /// Accepts a string or an array of strings; any other shape (numbers,
    /// objects, arrays holding non-strings, an empty array) is `NoSuchKey`.
    pub fn from_json(key: &Value) -> Result<Self> {
        match key {
            Value::String(key) => Ok(Self::flat(key.clone())),
            Value::Array(items) => {
                let segments = items
                    .iter()
                    .map(|item| match item {
                        Value::String(segment) => Ok(segment.clone()),
                        _ => Err(TreeKvError::NoSuchKey),
                    })
                    .collect::<Result<Vec<_>>>()?;
                Self::new(segments)
            }
            _ => Err(TreeKvError::NoSuchKey),
        }
    }

    /// Parse the `key` field of a set request.
    ///
    /// Like [`Path::from_json`], but a number or boolean key is also a flat
    /// key, stored under its JSON text (`1` becomes `"1"`). `null` is not.
    pub fn from_json_scalar(key: &Value) -> Result<Self> {
        match key {
            Value::Number(number) => Ok(Self::flat(number.to_string())),
            Value::Bool(flag) => Ok(Self::flat(flag.to_string())),
            other => Self::from_json(other),
        }
    }

    /// All segments but the last: the objects walked to reach the parent
    pub fn parents(&self) -> &[String] {
        &self.segments[..self.segments.len() - 1]
    }

    /// The terminal segment
    pub fn leaf(&self) -> &str {
        &self.segments[self.segments.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Paths are never empty; provided for API symmetry with `len`
    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn is_flat(&self) -> bool {
        self.segments.len() == 1
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments.join("/"))
    }
}

impl From<&str> for Path {
    fn from(key: &str) -> Self {
        Self::flat(key)
    }
}
