use std::sync::Arc;

use serde_json::Value;

use crate::{
    descriptor::EntityDescriptor, entry::TrackedEntry, metrics, values::ValueGeneratorRegistry,
    Error, Result,
};

/// Stamps a fresh concurrency token into an Added entry's current document.
///
/// This is the one place the translation layer mutates an entity: the stamped
/// value stays visible to the caller so the in-memory entity reflects what was
/// persisted. Never reads original values; never runs for Modified/Deleted.
#[derive(Clone)]
pub struct TokenManager {
    generators: Arc<ValueGeneratorRegistry>,
}

impl TokenManager {
    pub fn new(generators: Arc<ValueGeneratorRegistry>) -> Self {
        Self { generators }
    }

    /// Returns the stamped value when a fresh token was written. A no-op when
    /// no token path is declared or a caller-supplied token is already set.
    pub fn stamp_if_needed(
        &self,
        entry: &mut TrackedEntry,
        descriptor: &EntityDescriptor,
    ) -> Result<Option<Value>> {
        let Some(path) = descriptor.concurrency_token_path() else {
            return Ok(None);
        };
        if entry.current_value(path).is_some_and(|value| !value.is_null()) {
            return Ok(None);
        }
        let value = self
            .generators
            .generate(descriptor.type_name(), path, entry)
            .map_err(|source| Error::TokenGeneration {
                path: path.to_string(),
                source: Box::new(source),
            })?;
        entry.set_current_value(path, value.clone());
        metrics::record_token_generated();
        Ok(Some(value))
    }

    /// Awaitable variant for registries holding async generators.
    pub async fn stamp_if_needed_async(
        &self,
        entry: &mut TrackedEntry,
        descriptor: &EntityDescriptor,
    ) -> Result<Option<Value>> {
        let Some(path) = descriptor.concurrency_token_path() else {
            return Ok(None);
        };
        if entry.current_value(path).is_some_and(|value| !value.is_null()) {
            return Ok(None);
        }
        let value = self
            .generators
            .generate_async(descriptor.type_name(), path, entry)
            .await
            .map_err(|source| Error::TokenGeneration {
                path: path.to_string(),
                source: Box::new(source),
            })?;
        entry.set_current_value(path, value.clone());
        metrics::record_token_generated();
        Ok(Some(value))
    }
}
