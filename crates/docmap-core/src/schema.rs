mod builder;
pub use builder::{Builder, ModelBuilder};

mod model;
pub use model::Model;

mod property;
pub use property::{Embedded, Property, PropertyType, ScalarType, StorageOptions};

use crate::{Error, Result};
use indexmap::IndexMap;

/// The model registry: every model descriptor the connector can operate on,
/// keyed by model name.
///
/// Descriptors are created once at schema-definition time and are read-only
/// for the lifetime of the connector.
#[derive(Debug, Default, Clone)]
pub struct Schema {
    models: IndexMap<String, Model>,
}

impl Schema {
    pub fn builder() -> Builder {
        Builder::default()
    }

    /// Get a model by name, failing when it was never registered.
    pub fn model(&self, name: &str) -> Result<&Model> {
        self.models
            .get(name)
            .ok_or_else(|| Error::invalid_schema(format!("unknown model `{name}`")))
    }

    pub fn get(&self, name: &str) -> Option<&Model> {
        self.models.get(name)
    }

    pub fn models(&self) -> impl Iterator<Item = &Model> {
        self.models.values()
    }

    /// Returns the nested property definitions an object-shaped type points
    /// at. Arrays resolve to their element's schema.
    pub fn nested_properties<'a>(
        &'a self,
        ty: &'a PropertyType,
    ) -> Option<&'a IndexMap<String, Property>> {
        match ty {
            PropertyType::Object(embedded) => Some(&embedded.properties),
            PropertyType::Model(name) => self.models.get(name).map(|model| &model.properties),
            PropertyType::Array(item) => self.nested_properties(item),
            _ => None,
        }
    }
}
