//! The CRUD operation set.

mod all;
mod count;
mod create;
mod destroy;
mod find;
mod find_or_create;
mod replace;
mod save;
mod update;
mod update_or_create;
mod upsert_with_where;

use crate::{
    coerce::{self, from_database, to_database},
    compile::parse_update_data,
    Connector,
};

use docmap_core::{schema::Model, Options, Policy, Result};

use bson::{Bson, Document};

/// Outcome details of an upsert-style write.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriteInfo {
    /// `Some(true)` when the write inserted a new document, `None` when the
    /// native result did not say.
    pub is_new_instance: Option<bool>,
}

/// Number of documents a bulk write touched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Affected {
    pub count: u64,
}

impl Connector {
    /// Converts caller data into a document ready for insertion. A present
    /// identifier is coerced and stored as `_id`; a missing or `null` one is
    /// dropped so the server generates it.
    fn prepare_insert(&self, model: &Model, mut data: Document, policy: &Policy) -> Result<Document> {
        let id = take_id(model, &mut data);
        let fields = to_database(&self.shared.schema, model, data, policy)?;

        match id {
            Some(id) => Ok(with_leading("_id", coerce::coerce_id(model, id, policy)?, fields)),
            None => Ok(fields),
        }
    }

    /// Builds a native update from a partial payload. Field values inside
    /// `$set` and `$setOnInsert` are coerced; other operators only have
    /// their field names mapped to storage names.
    fn compile_update(&self, model: &Model, data: Document, policy: &Policy) -> Result<Document> {
        parse_update_data(data, policy)
            .into_iter()
            .map(|(operator, value)| -> Result<(String, Bson)> {
                let value = match (operator.as_str(), value) {
                    ("$set" | "$setOnInsert", Bson::Document(fields)) => Bson::Document(
                        to_database(&self.shared.schema, model, fields, policy)?,
                    ),
                    (_, Bson::Document(fields)) => Bson::Document(
                        fields
                            .into_iter()
                            .map(|(name, value)| (model.column_name(&name).to_string(), value))
                            .collect(),
                    ),
                    (_, value) => value,
                };
                Ok((operator, value))
            })
            .collect()
    }

    /// Reshapes a stored document for the caller. `_id` becomes the id
    /// property, or is dropped when the projection excluded the identifier.
    fn read_document(
        &self,
        model: &Model,
        mut document: Document,
        id_included: bool,
        policy: &Policy,
    ) -> Document {
        let id = document.remove("_id");

        let document = match id {
            Some(id) if id_included => with_leading(model.id_name(), id, document),
            _ => document,
        };

        from_database(model, document, policy)
    }

    /// Populates related entities when an include spec is present.
    async fn resolve_includes(
        &self,
        model: &Model,
        documents: Vec<Document>,
        include: Option<&Bson>,
        options: &Options,
    ) -> Result<Vec<Document>> {
        let Some(include) = include else {
            return Ok(documents);
        };

        match &self.shared.include_resolver {
            Some(resolver) => {
                resolver
                    .include(&model.name, documents, include, options)
                    .await
            }
            None => {
                tracing::warn!(
                    model = %model.name,
                    "include requested but no include resolver is registered"
                );
                Ok(documents)
            }
        }
    }
}

/// Removes the identifier from caller data, treating `null` as absent.
fn take_id(model: &Model, data: &mut Document) -> Option<Bson> {
    match data.remove(model.id_name()) {
        Some(Bson::Null | Bson::Undefined) | None => None,
        Some(id) => Some(id),
    }
}

/// A copy of `document` with `key` as its first field.
fn with_leading(key: &str, value: Bson, document: Document) -> Document {
    let mut out = Document::new();
    out.insert(key, value);

    for (name, value) in document {
        if name != key {
            out.insert(name, value);
        }
    }

    out
}

/// Renders an identifier for error messages.
fn display_id(id: &Bson) -> String {
    match id {
        Bson::String(s) => s.clone(),
        Bson::ObjectId(oid) => oid.to_hex(),
        other => other.to_string(),
    }
}
