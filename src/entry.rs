use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use crate::{path::JsonPath, Result};

/// Lifecycle state of a tracked entity between attach and flush.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntityState {
    Added,
    Modified,
    Deleted,
    Unchanged,
}

/// An entity instance plus its lifecycle state and before/after snapshots.
///
/// `original` is captured when the entry is attached and is never mutated by
/// the translation layer; `current` is mutated only by concurrency-token
/// stamping during Added-translation.
#[derive(Clone, Debug)]
pub struct TrackedEntry {
    type_name: String,
    state: EntityState,
    current: Value,
    original: Value,
}

impl TrackedEntry {
    /// Track a newly created entity. No original snapshot exists yet.
    pub fn added(type_name: impl Into<String>, document: Value) -> Self {
        Self {
            type_name: type_name.into(),
            state: EntityState::Added,
            current: document,
            original: Value::Null,
        }
    }

    /// Attach an entity loaded from the store; original and current start equal.
    pub fn loaded(type_name: impl Into<String>, document: Value) -> Self {
        Self {
            type_name: type_name.into(),
            state: EntityState::Unchanged,
            original: document.clone(),
            current: document,
        }
    }

    pub fn added_from<T: Serialize>(type_name: impl Into<String>, entity: &T) -> Result<Self> {
        Ok(Self::added(type_name, serde_json::to_value(entity)?))
    }

    pub fn loaded_from<T: Serialize>(type_name: impl Into<String>, entity: &T) -> Result<Self> {
        Ok(Self::loaded(type_name, serde_json::to_value(entity)?))
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn state(&self) -> EntityState {
        self.state
    }

    pub fn mark_modified(&mut self) {
        if self.state == EntityState::Unchanged {
            self.state = EntityState::Modified;
        }
    }

    pub fn mark_deleted(&mut self) {
        self.state = EntityState::Deleted;
    }

    pub fn current_value(&self, path: &JsonPath) -> Option<&Value> {
        path.get(&self.current)
    }

    pub fn original_value(&self, path: &JsonPath) -> Option<&Value> {
        path.get(&self.original)
    }

    /// The full current-value snapshot, as persisted by an insert.
    pub fn current_document(&self) -> &Value {
        &self.current
    }

    /// Write a property into the current snapshot. The original snapshot is
    /// never touched.
    pub fn set_current_value(&mut self, path: &JsonPath, value: Value) {
        path.set(&mut self.current, value);
    }

    /// Read the current snapshot back as a typed entity, e.g. to observe a
    /// stamped concurrency token.
    pub fn current_as<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_value(self.current.clone())?)
    }
}
