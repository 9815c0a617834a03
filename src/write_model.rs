use std::sync::Arc;

use serde_json::{Map, Value};

use crate::{
    descriptor::EntityDescriptor,
    entry::{EntityState, TrackedEntry},
    filter::{Filter, FilterBuilder},
    metrics,
    path::JsonPath,
    tokens::TokenManager,
    Error, Result,
};

/// Ordered `$set` clauses for a conditional update.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct UpdateDocument {
    set: Vec<(JsonPath, Value)>,
}

impl UpdateDocument {
    pub fn is_empty(&self) -> bool {
        self.set.is_empty()
    }

    pub fn set_clauses(&self) -> &[(JsonPath, Value)] {
        &self.set
    }

    /// Append a set-clause, preserving clause order.
    pub fn with_set(mut self, path: impl Into<JsonPath>, value: Value) -> Self {
        self.set.push((path.into(), value));
        self
    }

    /// Render as an update document, e.g. `{"$set": {"tier": "pro"}}`.
    pub fn to_value(&self) -> Value {
        let mut set = Map::new();
        for (path, value) in &self.set {
            set.insert(path.to_string(), value.clone());
        }
        let mut doc = Map::new();
        doc.insert("$set".to_string(), Value::Object(set));
        Value::Object(doc)
    }
}

/// Store-agnostic write instruction produced by one translation call.
#[derive(Clone, Debug, PartialEq)]
pub enum WriteOperation {
    InsertOne { document: Value },
    UpdateOne { filter: Filter, update: UpdateDocument },
    DeleteOne { filter: Filter },
}

/// A write operation routed to its target collection and entity type, so the
/// executor can report per-entity success or failure back to the tracker.
#[derive(Clone, Debug, PartialEq)]
pub struct WriteModel {
    pub entity_type: String,
    pub collection: String,
    pub operation: WriteOperation,
}

/// Capability interface: build one write model from one tracked entry.
pub trait WriteModelTranslator: Send + Sync {
    fn translate(&self, entry: &mut TrackedEntry) -> Result<WriteModel>;
}

impl std::fmt::Debug for dyn WriteModelTranslator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("WriteModelTranslator")
    }
}

/// Per-type translator wiring the descriptor, filter builder, and token
/// manager together.
pub struct DocumentTranslator {
    descriptor: Arc<EntityDescriptor>,
    tokens: TokenManager,
}

impl DocumentTranslator {
    pub(crate) fn new(descriptor: Arc<EntityDescriptor>, tokens: TokenManager) -> Self {
        Self { descriptor, tokens }
    }

    fn insert_model(&self, entry: &mut TrackedEntry) -> Result<WriteOperation> {
        self.tokens.stamp_if_needed(entry, &self.descriptor)?;
        for path in self.descriptor.key_paths() {
            let present = entry
                .current_value(path)
                .is_some_and(|value| !value.is_null());
            if !present {
                return Err(Error::MissingKeyValue {
                    entity_type: entry.type_name().to_string(),
                    path: path.to_string(),
                });
            }
        }
        metrics::record_insert_model();
        Ok(WriteOperation::InsertOne {
            document: entry.current_document().clone(),
        })
    }

    fn update_model(&self, entry: &TrackedEntry) -> Result<WriteOperation> {
        let filter = FilterBuilder::build(entry, &self.descriptor)?;
        let mut update = UpdateDocument::default();
        for path in self.descriptor.property_paths() {
            let current = entry.current_value(path).cloned().unwrap_or(Value::Null);
            let original = entry.original_value(path).cloned().unwrap_or(Value::Null);
            if current != original {
                update = update.with_set(path.clone(), current);
            }
        }
        if update.is_empty() {
            // Preserved: every Modified entry yields an operation, even with
            // zero differing properties. See the degenerate-update note in
            // DESIGN.md before short-circuiting this.
            tracing::debug!(
                target: "docwright::translate",
                entity_type = %entry.type_name(),
                "modified entry produced an empty update"
            );
            metrics::record_empty_update();
        }
        metrics::record_update_model();
        Ok(WriteOperation::UpdateOne { filter, update })
    }

    fn delete_model(&self, entry: &TrackedEntry) -> Result<WriteOperation> {
        let filter = FilterBuilder::build(entry, &self.descriptor)?;
        metrics::record_delete_model();
        Ok(WriteOperation::DeleteOne { filter })
    }
}

impl WriteModelTranslator for DocumentTranslator {
    fn translate(&self, entry: &mut TrackedEntry) -> Result<WriteModel> {
        let operation = match entry.state() {
            EntityState::Added => self.insert_model(entry)?,
            EntityState::Modified => self.update_model(entry)?,
            EntityState::Deleted => self.delete_model(entry)?,
            state => return Err(Error::UnsupportedState { state }),
        };
        Ok(WriteModel {
            entity_type: self.descriptor.type_name().to_string(),
            collection: self.descriptor.collection().to_string(),
            operation,
        })
    }
}
