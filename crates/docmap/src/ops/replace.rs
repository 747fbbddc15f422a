use super::{display_id, take_id, with_leading, WriteInfo};
use crate::{
    coerce::{coerce_id, to_database},
    Connector,
};

use docmap_core::{driver::operation::ReplaceOne, schema::Model, Error, Options, Result};

use bson::{doc, Bson, Document};

impl Connector {
    /// Replaces the document with `data`'s identifier, inserting it when
    /// missing. Data without an identifier is inserted.
    pub async fn replace_or_create(
        &self,
        model: &str,
        data: Document,
        options: &Options,
    ) -> Result<(Document, WriteInfo)> {
        let model_name = model;
        let model = self.model(model_name)?;

        let mut fields = data.clone();
        match take_id(model, &mut fields) {
            Some(id) => self.replace_with_options(model, id, fields, true, options).await,
            None => {
                let id = self.create(model_name, data.clone(), options).await?;
                Ok((
                    with_leading(model.id_name(), id, data),
                    WriteInfo {
                        is_new_instance: Some(true),
                    },
                ))
            }
        }
    }

    /// Replaces the document with identifier `id`. Fails with a
    /// record-not-found error when no such document exists.
    pub async fn replace_by_id(
        &self,
        model: &str,
        id: impl Into<Bson>,
        data: Document,
        options: &Options,
    ) -> Result<Document> {
        let model = self.model(model)?;
        let (document, _) = self
            .replace_with_options(model, id.into(), data, false, options)
            .await?;
        Ok(document)
    }

    async fn replace_with_options(
        &self,
        model: &Model,
        id: Bson,
        mut data: Document,
        upsert: bool,
        options: &Options,
    ) -> Result<(Document, WriteInfo)> {
        let policy = self.policy(model, options);

        // The identifier travels in the filter, never in the replacement
        take_id(model, &mut data);

        let oid = coerce_id(model, id.clone(), &policy)?;
        let replacement = to_database(&self.shared.schema, model, data.clone(), &policy)?;

        let op = ReplaceOne::new(doc! { "_id": oid.clone() }, replacement).upsert(upsert);

        let res = self
            .exec(model, op.into(), options)
            .await?
            .into_updated()?;

        if res.matched_count == 0 && res.upserted_id.is_none() {
            return Err(Error::record_not_found(format!(
                "Could not replace. Object with id {} does not exist!",
                display_id(&id)
            )));
        }

        Ok((
            with_leading(model.id_name(), oid, data),
            WriteInfo {
                is_new_instance: Some(res.upserted_id.is_some()),
            },
        ))
    }
}
