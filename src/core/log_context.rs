//! Structured logging context
//!
//! A [`Context`] is the key-value metadata attached to a trace: the
//! recognized `corr`/`trans`/`op` fields plus any number of extra fields.
//! Contexts are merged from three layers before formatting, in increasing
//! precedence: the logger's context getter, the logger's stored context
//! (accumulated through the child chain), and the per-call context.
//!
//! Backed by a `serde_json::Map`, which preserves insertion order — the
//! pipe format emits extra fields in the order they were added.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Correlation id field, recognized by the pipe format.
pub const FIELD_CORR: &str = "corr";
/// Transaction id field, recognized by the pipe format.
pub const FIELD_TRANS: &str = "trans";
/// Operation name field, recognized by the pipe format.
pub const FIELD_OP: &str = "op";

/// Context for structured logging with key-value fields
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Context {
    fields: Map<String, Value>,
}

impl Context {
    /// Create a new empty context
    pub fn new() -> Self {
        Self { fields: Map::new() }
    }

    /// Add a field to the context
    pub fn with_field<K, V>(mut self, key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
    {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// Add a field to the context (mutable version)
    pub fn set<K, V>(&mut self, key: K, value: V)
    where
        K: Into<String>,
        V: Into<Value>,
    {
        self.fields.insert(key.into(), value.into());
    }

    /// Get a field by key
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Remove a field from the context
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.fields.remove(key)
    }

    /// Get all fields
    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// Check if the context has any fields
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Get the number of fields in the context
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Merge another context into this one.
    ///
    /// Fields from `other` overwrite fields already present, so calling
    /// `extend` with layers in increasing precedence yields the merged
    /// context. Overwritten keys keep their original position.
    pub fn extend(&mut self, other: &Context) {
        for (key, value) in &other.fields {
            self.fields.insert(key.clone(), value.clone());
        }
    }

    /// Consume this context and return the underlying map
    pub fn into_map(self) -> Map<String, Value> {
        self.fields
    }
}

impl From<Map<String, Value>> for Context {
    fn from(fields: Map<String, Value>) -> Self {
        Self { fields }
    }
}

impl From<Value> for Context {
    /// Build a context from a JSON value. Non-object values yield an
    /// empty context.
    fn from(value: Value) -> Self {
        match value {
            Value::Object(fields) => Self { fields },
            _ => Self::new(),
        }
    }
}

impl fmt::Display for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            serde_json::to_string(&self.fields).unwrap_or_else(|_| "{}".to_string())
        )
    }
}
