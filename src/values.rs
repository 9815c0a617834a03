use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use uuid::Uuid;

use crate::{entry::TrackedEntry, path::JsonPath, Error, Result};

/// Supplies fresh values for generated properties (identifiers, tokens).
pub trait ValueGenerator: Send + Sync {
    fn generate(&self, path: &JsonPath, entry: &TrackedEntry) -> Result<Value>;
}

/// Async variant for generators that must suspend (e.g. reserving a range
/// from a remote sequence).
#[async_trait]
pub trait AsyncValueGenerator: Send + Sync {
    async fn generate(&self, path: &JsonPath, entry: &TrackedEntry) -> Result<Value>;
}

/// Random UUID strings; the default for concurrency tokens and surrogate ids.
#[derive(Clone, Copy, Debug, Default)]
pub struct UuidStringGenerator;

impl ValueGenerator for UuidStringGenerator {
    fn generate(&self, _path: &JsonPath, _entry: &TrackedEntry) -> Result<Value> {
        Ok(Value::String(Uuid::new_v4().to_string()))
    }
}

/// RFC 3339 UTC timestamps, for row-version style properties.
#[derive(Clone, Copy, Debug, Default)]
pub struct TimestampGenerator;

impl ValueGenerator for TimestampGenerator {
    fn generate(&self, _path: &JsonPath, _entry: &TrackedEntry) -> Result<Value> {
        Ok(Value::String(chrono::Utc::now().to_rfc3339()))
    }
}

/// Closure-backed generator for one-off wiring without a concrete type.
pub struct ClosureGenerator {
    handler: Box<dyn Fn(&JsonPath, &TrackedEntry) -> Result<Value> + Send + Sync>,
}

impl ClosureGenerator {
    pub fn new<F>(handler: F) -> Self
    where
        F: Fn(&JsonPath, &TrackedEntry) -> Result<Value> + Send + Sync + 'static,
    {
        Self {
            handler: Box::new(handler),
        }
    }
}

impl ValueGenerator for ClosureGenerator {
    fn generate(&self, path: &JsonPath, entry: &TrackedEntry) -> Result<Value> {
        (self.handler)(path, entry)
    }
}

type GeneratorKey = (String, JsonPath);

/// Registry resolving generators by (entity type, property path).
///
/// Paths with no registered generator fall back to UUID strings, so a
/// declared concurrency token always has a source of fresh values.
pub struct ValueGeneratorRegistry {
    sync_generators: HashMap<GeneratorKey, Arc<dyn ValueGenerator>>,
    async_generators: HashMap<GeneratorKey, Arc<dyn AsyncValueGenerator>>,
    fallback: Arc<dyn ValueGenerator>,
}

impl ValueGeneratorRegistry {
    pub fn new() -> Self {
        Self {
            sync_generators: HashMap::new(),
            async_generators: HashMap::new(),
            fallback: Arc::new(UuidStringGenerator),
        }
    }

    /// Replace the fallback used when no generator is registered for a path.
    pub fn with_fallback<G>(mut self, generator: G) -> Self
    where
        G: ValueGenerator + 'static,
    {
        self.fallback = Arc::new(generator);
        self
    }

    /// Register a synchronous generator for one property of one entity type.
    pub fn register<G>(&mut self, entity_type: impl Into<String>, path: impl Into<JsonPath>, generator: G)
    where
        G: ValueGenerator + 'static,
    {
        self.sync_generators
            .insert((entity_type.into(), path.into()), Arc::new(generator));
    }

    /// Register an asynchronous generator for one property of one entity type.
    pub fn register_async<G>(
        &mut self,
        entity_type: impl Into<String>,
        path: impl Into<JsonPath>,
        generator: G,
    ) where
        G: AsyncValueGenerator + 'static,
    {
        self.async_generators
            .insert((entity_type.into(), path.into()), Arc::new(generator));
    }

    pub fn has_async_generator(&self, entity_type: &str, path: &JsonPath) -> bool {
        self.async_generators
            .contains_key(&(entity_type.to_string(), path.clone()))
    }

    /// Generate synchronously. Fails with [`Error::GeneratorRequiresAsync`]
    /// when only an async generator covers the path.
    pub fn generate(&self, entity_type: &str, path: &JsonPath, entry: &TrackedEntry) -> Result<Value> {
        let key = (entity_type.to_string(), path.clone());
        if let Some(generator) = self.sync_generators.get(&key) {
            return generator.generate(path, entry);
        }
        if self.async_generators.contains_key(&key) {
            return Err(Error::GeneratorRequiresAsync {
                path: path.to_string(),
            });
        }
        self.fallback.generate(path, entry)
    }

    /// Generate, awaiting an async generator when one is registered and
    /// falling back to the synchronous path otherwise.
    pub async fn generate_async(
        &self,
        entity_type: &str,
        path: &JsonPath,
        entry: &TrackedEntry,
    ) -> Result<Value> {
        let key = (entity_type.to_string(), path.clone());
        if let Some(generator) = self.async_generators.get(&key) {
            return generator.generate(path, entry).await;
        }
        if let Some(generator) = self.sync_generators.get(&key) {
            return generator.generate(path, entry);
        }
        self.fallback.generate(path, entry)
    }
}

impl Default for ValueGeneratorRegistry {
    fn default() -> Self {
        Self::new()
    }
}
