//! # Shared Context
//!
//! The dict-like state threaded through every phase of one resolution.
//!
//! A `SharedContext` is a cheap clonable handle: clones share the same
//! underlying storage, so middleware writes are visible to later phases and
//! to the caller. The pipeline treats the context as opaque storage — it
//! reads and writes individual keys and never replaces the map wholesale.
//!
//! Callers that share one context across concurrent resolutions get
//! per-operation atomicity from the internal locks, but any cross-key
//! coordination is their own responsibility.

use crate::registry::ComponentRegistry;
use parking_lot::RwLock;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

#[derive(Default)]
struct ContextInner {
    values: RwLock<HashMap<String, Value>>,
    overrides: RwLock<HashMap<String, Value>>,
    registry: RwLock<Option<Arc<ComponentRegistry>>>,
}

/// Mutable, dict-like state shared across the phases of a resolution.
#[derive(Clone, Default)]
pub struct SharedContext {
    inner: Arc<ContextInner>,
}

impl SharedContext {
    /// Create an empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach an ambient registry, letting resolvers be built from the
    /// context instead of an explicit registry argument.
    #[must_use]
    pub fn with_registry(self, registry: Arc<ComponentRegistry>) -> Self {
        *self.inner.registry.write() = Some(registry);
        self
    }

    /// The ambient registry, if one was attached.
    #[must_use]
    pub fn registry(&self) -> Option<Arc<ComponentRegistry>> {
        self.inner.registry.read().clone()
    }

    /// Get a value by key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<Value> {
        self.inner.values.read().get(key).cloned()
    }

    /// Set a value, replacing any previous value for the key.
    pub fn set(&self, key: impl Into<String>, value: Value) {
        self.inner.values.write().insert(key.into(), value);
    }

    /// Remove a value, returning it if present.
    pub fn remove(&self, key: &str) -> Option<Value> {
        self.inner.values.write().remove(key)
    }

    /// Whether a key is present.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.inner.values.read().contains_key(key)
    }

    /// Append a value to the array stored under `key`, creating the array if
    /// the key is absent. Handy for collector middleware.
    pub fn push(&self, key: impl Into<String>, value: Value) {
        let mut values = self.inner.values.write();
        let entry = values.entry(key.into()).or_insert_with(|| Value::Array(vec![]));
        if let Value::Array(items) = entry {
            items.push(value);
        } else {
            *entry = Value::Array(vec![entry.take(), value]);
        }
    }

    /// Set a constructor override handed to the injector verbatim.
    pub fn set_override(&self, name: impl Into<String>, value: Value) {
        self.inner.overrides.write().insert(name.into(), value);
    }

    /// Snapshot of the caller-supplied constructor overrides.
    #[must_use]
    pub fn overrides(&self) -> HashMap<String, Value> {
        self.inner.overrides.read().clone()
    }

    /// Number of stored values (overrides not included).
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.values.read().len()
    }

    /// Whether the value map is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.values.read().is_empty()
    }
}

impl fmt::Debug for SharedContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let keys: Vec<String> = self.inner.values.read().keys().cloned().collect();
        f.debug_struct("SharedContext")
            .field("keys", &keys)
            .field("overrides", &self.inner.overrides.read().len())
            .field("registry", &self.inner.registry.read().is_some())
            .finish()
    }
}
