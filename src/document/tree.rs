//! Document tree
//!
//! The whole store is one JSON object. Values are addressed by walking
//! nested objects key by key; arrays are never indexed into.

use serde_json::{Map, Value};

use crate::error::{Result, TreeKvError};
use super::Path;

/// Object map type used throughout the tree
pub type Object = Map<String, Value>;

/// The persisted document: a root object and everything below it
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    root: Object,
}

impl Document {
    /// Create an empty document (`{}`)
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an existing root object
    pub fn from_object(root: Object) -> Self {
        Self { root }
    }

    /// Convert a parsed JSON value into a document.
    ///
    /// Only objects are valid roots.
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(root) => Ok(Self { root }),
            other => Err(TreeKvError::CorruptDocument(format!(
                "document root must be an object, found {}",
                kind_name(&other)
            ))),
        }
    }

    pub fn root(&self) -> &Object {
        &self.root
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.root)
    }

    /// Number of direct keys on the root object (the capacity measure)
    pub fn root_key_count(&self) -> usize {
        self.root.len()
    }

    /// Walk to the object holding `path`'s terminal segment, without creating
    /// anything. Missing or non-object intermediates are `NoSuchKey`.
    pub fn resolve(&self, path: &Path) -> Result<&Object> {
        let mut node = &self.root;
        for segment in path.parents() {
            node = match node.get(segment) {
                Some(Value::Object(child)) => child,
                _ => return Err(TreeKvError::NoSuchKey),
            };
        }
        Ok(node)
    }

    /// Mutable walk to the parent object of `path`.
    ///
    /// With `create_intermediate`, missing segments and segments holding a
    /// scalar become empty objects. Arrays are never replaced or indexed.
    pub fn resolve_mut(&mut self, path: &Path, create_intermediate: bool) -> Result<&mut Object> {
        let mut node = &mut self.root;
        for segment in path.parents() {
            if create_intermediate && replaceable(node.get(segment)) {
                node.insert(segment.clone(), Value::Object(Object::new()));
            }
            node = match node.get_mut(segment) {
                Some(Value::Object(child)) => child,
                _ => return Err(TreeKvError::NoSuchKey),
            };
        }
        Ok(node)
    }

    /// Look up the value at `path`
    pub fn get_at(&self, path: &Path) -> Result<&Value> {
        self.resolve(path)?
            .get(path.leaf())
            .ok_or(TreeKvError::NoSuchKey)
    }

    /// Store `value` at `path`, creating intermediate objects and
    /// overwriting whatever the terminal key held before
    pub fn set_at(&mut self, path: &Path, value: Value) -> Result<()> {
        let parent = self.resolve_mut(path, true)?;
        parent.insert(path.leaf().to_string(), value);
        Ok(())
    }

    /// Remove the value at `path` and return it
    pub fn delete_at(&mut self, path: &Path) -> Result<Value> {
        let parent = self.resolve_mut(path, false)?;
        // shift_remove keeps the remaining keys in insertion order
        parent
            .shift_remove(path.leaf())
            .ok_or(TreeKvError::NoSuchKey)
    }
}

fn replaceable(existing: Option<&Value>) -> bool {
    !matches!(existing, Some(Value::Object(_)) | Some(Value::Array(_)))
}

fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
