use super::take_id;
use crate::{coerce::coerce_id, compile::build_where, Connector};

use docmap_core::{driver::operation::FindOneAndUpdate, Error, Options, Result};

use bson::{doc, oid::ObjectId, Bson, Document};

impl Connector {
    /// Updates the first document matching `where_` with `data`, inserting
    /// one when nothing matches, and returns it as stored after the write.
    pub async fn upsert_with_where(
        &self,
        model: &str,
        where_: &Document,
        mut data: Document,
        options: &Options,
    ) -> Result<Document> {
        let model = self.model(model)?;
        let policy = self.policy(model, options);

        let filter = build_where(model, Some(where_), &policy)?;

        let id = take_id(model, &mut data);
        let mut update = self.compile_update(model, data, &policy)?;

        // An explicit identifier only applies to the inserted document
        if let Some(id) = id {
            let oid = coerce_id(model, id, &policy)?;
            match update.get_mut("$setOnInsert") {
                Some(Bson::Document(on_insert)) => {
                    on_insert.insert("_id", oid);
                }
                _ => {
                    update.insert("$setOnInsert", doc! { "_id": oid });
                }
            }
        }

        // An empty update document would replace the matched document
        if update.is_empty() {
            update.insert("$setOnInsert", insert_seed(&filter));
        }

        let op = FindOneAndUpdate::new(filter, update)
            .upsert(true)
            .sort(doc! { "_id": 1 });

        let res = self
            .exec(model, op.into(), options)
            .await?
            .into_find_and_modify()?;

        match res.value {
            Some(value) => Ok(self.read_document(model, value, true, &policy)),
            None => Err(Error::record_not_found(format!(
                "No {} matched or was created by the upsert",
                model.name
            ))),
        }
    }
}

/// Fields an upsert with nothing to set inserts: the filter's equality
/// conditions, or a fresh identifier when there are none.
fn insert_seed(filter: &Document) -> Document {
    let seed: Document = filter
        .iter()
        .filter(|(key, _)| !key.starts_with('$'))
        .filter(|(_, cond)| match cond {
            Bson::Document(spec) => !spec.keys().any(|key| key.starts_with('$')),
            Bson::RegularExpression(_) => false,
            _ => true,
        })
        .map(|(key, cond)| (key.clone(), cond.clone()))
        .collect();

    if seed.is_empty() {
        doc! { "_id": ObjectId::new() }
    } else {
        seed
    }
}
