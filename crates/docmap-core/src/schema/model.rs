use super::{ModelBuilder, Property};
use crate::ModelSettings;

use indexmap::IndexMap;

/// Per-entity metadata: property definitions, declared identifier
/// properties and entity-level settings.
#[derive(Debug, Clone)]
pub struct Model {
    /// Name of the model
    pub name: String,

    /// Property definitions, in declaration order
    pub properties: IndexMap<String, Property>,

    /// Entity-level settings
    pub settings: ModelSettings,
}

/// Identifier property name used when a model declares none.
const DEFAULT_ID_NAME: &str = "id";

impl Model {
    pub fn builder(name: impl Into<String>) -> ModelBuilder {
        ModelBuilder::new(name)
    }

    pub fn property(&self, name: &str) -> Option<&Property> {
        self.properties.get(name)
    }

    /// Declared identifier property names, ordered by id position.
    pub fn id_names(&self) -> Vec<&str> {
        let mut ids: Vec<_> = self
            .properties
            .iter()
            .filter_map(|(name, property)| property.id.map(|pos| (pos, name.as_str())))
            .collect();

        if ids.is_empty() {
            return vec![DEFAULT_ID_NAME];
        }

        ids.sort_by_key(|(pos, _)| *pos);
        ids.into_iter().map(|(_, name)| name).collect()
    }

    /// The primary identifier property name.
    pub fn id_name(&self) -> &str {
        self.properties
            .iter()
            .filter_map(|(name, property)| property.id.map(|pos| (pos, name.as_str())))
            .min_by_key(|(pos, _)| *pos)
            .map(|(_, name)| name)
            .unwrap_or(DEFAULT_ID_NAME)
    }

    pub fn id_property(&self) -> Option<&Property> {
        self.property(self.id_name())
    }

    /// Storage field name of a property, honoring column-name overrides.
    /// Names with no property definition pass through unchanged.
    pub fn column_name<'a>(&'a self, name: &'a str) -> &'a str {
        self.properties
            .get(name)
            .and_then(|property| property.storage.field_name.as_deref())
            .unwrap_or(name)
    }

    /// Inverse of [`Model::column_name`] for overridden columns.
    pub fn property_name_for_column(&self, column: &str) -> Option<&str> {
        self.properties
            .iter()
            .find(|(_, property)| property.storage.field_name.as_deref() == Some(column))
            .map(|(name, _)| name.as_str())
    }

    /// Collection the model is stored in.
    pub fn collection(&self) -> &str {
        self.settings.collection.as_deref().unwrap_or(&self.name)
    }
}
