use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::{
    descriptor::Model,
    entry::TrackedEntry,
    tokens::TokenManager,
    values::ValueGeneratorRegistry,
    write_model::{DocumentTranslator, WriteModelTranslator},
    Error, Result,
};

/// Resolves and memoizes one translator per runtime entity type.
///
/// The cache is append-only: entries are added on first use and never
/// invalidated, so readers only contend on the lock itself.
pub struct TranslatorSelector {
    model: Arc<Model>,
    tokens: TokenManager,
    cache: RwLock<HashMap<String, Arc<dyn WriteModelTranslator>>>,
}

impl TranslatorSelector {
    pub fn new(model: Arc<Model>, generators: Arc<ValueGeneratorRegistry>) -> Self {
        Self {
            model,
            tokens: TokenManager::new(generators),
            cache: RwLock::new(HashMap::new()),
        }
    }

    pub fn model(&self) -> &Model {
        &self.model
    }

    /// Return the cached translator for the entry's runtime type, building and
    /// caching one on first use.
    pub fn select(&self, entry: &TrackedEntry) -> Result<Arc<dyn WriteModelTranslator>> {
        if let Some(translator) = self
            .cache
            .read()
            .expect("translator cache poisoned")
            .get(entry.type_name())
        {
            return Ok(translator.clone());
        }

        let descriptor = self
            .model
            .descriptor(entry.type_name())
            .ok_or_else(|| Error::UnmappedType(entry.type_name().to_string()))?;
        let translator: Arc<dyn WriteModelTranslator> =
            Arc::new(DocumentTranslator::new(descriptor, self.tokens.clone()));

        // A racing caller may have constructed a second translator; only the
        // first insert is retained, and that instance is what every caller
        // observes from here on.
        let mut cache = self.cache.write().expect("translator cache poisoned");
        let retained = cache
            .entry(entry.type_name().to_string())
            .or_insert(translator);
        Ok(retained.clone())
    }

    /// Pre-stamp an Added entry's concurrency token, awaiting async
    /// generators. Translation afterwards stays synchronous.
    pub async fn stamp_token(&self, entry: &mut TrackedEntry) -> Result<()> {
        let descriptor = self
            .model
            .descriptor(entry.type_name())
            .ok_or_else(|| Error::UnmappedType(entry.type_name().to_string()))?;
        self.tokens
            .stamp_if_needed_async(entry, &descriptor)
            .await?;
        Ok(())
    }
}
