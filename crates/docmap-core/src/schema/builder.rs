use super::{Model, Property, PropertyType, Schema};
use crate::{Error, ModelSettings, Result};

use indexmap::IndexMap;

#[derive(Debug, Default)]
pub struct Builder {
    models: Vec<Model>,
}

impl Builder {
    pub fn model(mut self, model: impl Into<Model>) -> Self {
        self.models.push(model.into());
        self
    }

    /// Builds the registry, verifying model names are unique and that every
    /// nested model reference resolves.
    pub fn build(self) -> Result<Schema> {
        let mut models = IndexMap::new();

        for model in self.models {
            if models.contains_key(&model.name) {
                return Err(Error::invalid_schema(format!(
                    "duplicate model name `{}`",
                    model.name
                )));
            }

            models.insert(model.name.clone(), model);
        }

        for model in models.values() {
            for (name, property) in &model.properties {
                verify_references(&models, &model.name, name, &property.ty)?;
            }
        }

        Ok(Schema { models })
    }
}

fn verify_references(
    models: &IndexMap<String, Model>,
    model: &str,
    property: &str,
    ty: &PropertyType,
) -> Result<()> {
    match ty {
        PropertyType::Model(target) if !models.contains_key(target) => Err(Error::invalid_schema(
            format!("property `{model}.{property}` references unknown model `{target}`"),
        )),
        PropertyType::Array(item) => verify_references(models, model, property, item),
        PropertyType::Object(embedded) => {
            for (name, nested) in &embedded.properties {
                verify_references(models, model, &format!("{property}.{name}"), &nested.ty)?;
            }
            Ok(())
        }
        _ => Ok(()),
    }
}

/// Assembles a [`Model`] descriptor.
#[derive(Debug)]
pub struct ModelBuilder {
    model: Model,
}

impl ModelBuilder {
    pub(super) fn new(name: impl Into<String>) -> Self {
        Self {
            model: Model {
                name: name.into(),
                properties: IndexMap::new(),
                settings: ModelSettings::default(),
            },
        }
    }

    pub fn property(mut self, name: impl Into<String>, property: impl Into<Property>) -> Self {
        self.model.properties.insert(name.into(), property.into());
        self
    }

    pub fn settings(mut self, settings: ModelSettings) -> Self {
        self.model.settings = settings;
        self
    }

    /// Stores the model in a collection other than its name.
    pub fn collection(mut self, collection: impl Into<String>) -> Self {
        self.model.settings.collection = Some(collection.into());
        self
    }

    pub fn build(self) -> Model {
        self.model
    }
}

impl From<ModelBuilder> for Model {
    fn from(builder: ModelBuilder) -> Model {
        builder.build()
    }
}
