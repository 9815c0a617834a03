use serde_json::{Map, Value};

use crate::{descriptor::EntityDescriptor, entry::TrackedEntry, path::JsonPath, Error, Result};

/// Conjunction of equality clauses locating one stored document version.
///
/// Clause order is deterministic: key properties in declared order, then the
/// concurrency token. All clauses are conjoined, so order carries no
/// semantics, but a stable order keeps serialized filters reproducible.
#[derive(Clone, Debug, PartialEq)]
pub struct Filter {
    clauses: Vec<(JsonPath, Value)>,
}

impl Filter {
    /// Single equality clause.
    pub fn eq(path: impl Into<JsonPath>, value: Value) -> Self {
        Self {
            clauses: vec![(path.into(), value)],
        }
    }

    /// Conjoin another equality clause, preserving clause order.
    pub fn and_eq(mut self, path: impl Into<JsonPath>, value: Value) -> Self {
        self.clauses.push((path.into(), value));
        self
    }

    pub fn clauses(&self) -> &[(JsonPath, Value)] {
        &self.clauses
    }

    /// Render as a conjunction document, e.g. `{"id": 7, "revision": "..."}`.
    pub fn to_value(&self) -> Value {
        let mut doc = Map::new();
        for (path, value) in &self.clauses {
            doc.insert(path.to_string(), value.clone());
        }
        Value::Object(doc)
    }
}

/// Builds the Modified/Deleted precondition filter from original values.
///
/// Current values must not be used to locate the stored document; an altered
/// key field in memory still has to match the document as it was read.
pub struct FilterBuilder;

impl FilterBuilder {
    pub fn build(entry: &TrackedEntry, descriptor: &EntityDescriptor) -> Result<Filter> {
        let mut clauses = Vec::with_capacity(descriptor.key_paths().len() + 1);
        for path in descriptor.key_paths() {
            let value = entry
                .original_value(path)
                .filter(|value| !value.is_null())
                .ok_or_else(|| Error::MissingKeyValue {
                    entity_type: entry.type_name().to_string(),
                    path: path.to_string(),
                })?;
            clauses.push((path.clone(), value.clone()));
        }
        if let Some(path) = descriptor.concurrency_token_path() {
            let value = entry.original_value(path).cloned().unwrap_or(Value::Null);
            clauses.push((path.clone(), value));
        }
        Ok(Filter { clauses })
    }
}
