use std::collections::HashMap;
use std::sync::Arc;

use crate::path::JsonPath;

/// Static per-type metadata: target collection, declared properties, primary
/// key, and the optional concurrency-token property.
///
/// Built once during model construction, immutable thereafter, shared by all
/// entries of the type.
#[derive(Clone, Debug)]
pub struct EntityDescriptor {
    type_name: String,
    collection: String,
    properties: Vec<JsonPath>,
    key_paths: Vec<JsonPath>,
    concurrency_token_path: Option<JsonPath>,
}

impl EntityDescriptor {
    pub fn builder(type_name: impl Into<String>) -> EntityDescriptorBuilder {
        EntityDescriptorBuilder {
            type_name: type_name.into(),
            collection: None,
            properties: Vec::new(),
            key_paths: Vec::new(),
            concurrency_token_path: None,
        }
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Declared property paths, in declaration order.
    pub fn property_paths(&self) -> &[JsonPath] {
        &self.properties
    }

    /// Primary-key property paths, in declaration order. Never empty.
    pub fn key_paths(&self) -> &[JsonPath] {
        &self.key_paths
    }

    pub fn concurrency_token_path(&self) -> Option<&JsonPath> {
        self.concurrency_token_path.as_ref()
    }
}

pub struct EntityDescriptorBuilder {
    type_name: String,
    collection: Option<String>,
    properties: Vec<JsonPath>,
    key_paths: Vec<JsonPath>,
    concurrency_token_path: Option<JsonPath>,
}

impl EntityDescriptorBuilder {
    pub fn collection(mut self, name: impl Into<String>) -> Self {
        self.collection = Some(name.into());
        self
    }

    /// Declare a plain property. Declaration order drives set-clause order.
    pub fn property(mut self, path: impl Into<JsonPath>) -> Self {
        self.push_property(path.into());
        self
    }

    /// Declare a primary-key property, also registering it as a property.
    pub fn key(mut self, path: impl Into<JsonPath>) -> Self {
        let path = path.into();
        self.push_property(path.clone());
        self.key_paths.push(path);
        self
    }

    /// Declare the concurrency-token property, also registering it as a property.
    pub fn concurrency_token(mut self, path: impl Into<JsonPath>) -> Self {
        let path = path.into();
        self.push_property(path.clone());
        self.concurrency_token_path = Some(path);
        self
    }

    fn push_property(&mut self, path: JsonPath) {
        if !self.properties.contains(&path) {
            self.properties.push(path);
        }
    }

    pub fn build(self) -> EntityDescriptor {
        if self.key_paths.is_empty() {
            panic!(
                "EntityDescriptor for `{}` requires at least one key path.",
                self.type_name
            );
        }
        let collection = self
            .collection
            .unwrap_or_else(|| self.type_name.to_ascii_lowercase());
        EntityDescriptor {
            type_name: self.type_name,
            collection,
            properties: self.properties,
            key_paths: self.key_paths,
            concurrency_token_path: self.concurrency_token_path,
        }
    }
}

/// Registry of entity descriptors keyed by runtime type name.
#[derive(Debug, Default)]
pub struct Model {
    descriptors: HashMap<String, Arc<EntityDescriptor>>,
}

impl Model {
    pub fn builder() -> ModelBuilder {
        ModelBuilder::default()
    }

    pub fn descriptor(&self, type_name: &str) -> Option<Arc<EntityDescriptor>> {
        self.descriptors.get(type_name).cloned()
    }

    pub fn entity_types(&self) -> impl Iterator<Item = &str> {
        self.descriptors.keys().map(String::as_str)
    }
}

#[derive(Default)]
pub struct ModelBuilder {
    descriptors: HashMap<String, Arc<EntityDescriptor>>,
}

impl ModelBuilder {
    pub fn entity(mut self, descriptor: EntityDescriptor) -> Self {
        self.descriptors
            .insert(descriptor.type_name().to_string(), Arc::new(descriptor));
        self
    }

    pub fn build(self) -> Model {
        Model {
            descriptors: self.descriptors,
        }
    }
}
