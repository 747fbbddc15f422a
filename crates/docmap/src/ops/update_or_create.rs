use super::{display_id, take_id, with_leading, WriteInfo};
use crate::{coerce::coerce_id, Connector};

use docmap_core::{driver::operation::FindOneAndUpdate, Error, Options, Result};

use bson::{doc, Document};

impl Connector {
    /// Atomically updates the document with `data`'s identifier, inserting
    /// it when missing, and returns the document as stored after the write.
    /// Data without an identifier is inserted.
    pub async fn update_or_create(
        &self,
        model: &str,
        data: Document,
        options: &Options,
    ) -> Result<(Document, WriteInfo)> {
        let model_name = model;
        let model = self.model(model_name)?;
        let policy = self.policy(model, options);

        let mut fields = data.clone();
        let Some(id) = take_id(model, &mut fields) else {
            let id = self.create(model_name, data.clone(), options).await?;
            return Ok((
                with_leading(model.id_name(), id, data),
                WriteInfo {
                    is_new_instance: Some(true),
                },
            ));
        };

        let oid = coerce_id(model, id.clone(), &policy)?;

        let mut update = self.compile_update(model, fields, &policy)?;
        if update.is_empty() {
            update.insert("$setOnInsert", doc! { "_id": oid.clone() });
        }

        let op = FindOneAndUpdate::new(doc! { "_id": oid }, update)
            .upsert(true)
            .sort(doc! { "_id": 1 });

        let res = self
            .exec(model, op.into(), options)
            .await?
            .into_find_and_modify()?;

        let info = WriteInfo {
            is_new_instance: res.upserted(),
        };

        if info.is_new_instance.is_none() {
            tracing::warn!(model = %model.name, "updateOrCreate result format not recognized");
        }

        let Some(value) = res.value else {
            return Err(Error::record_not_found(format!(
                "No {} found for id {}",
                model.name,
                display_id(&id)
            )));
        };

        Ok((self.read_document(model, value, true, &policy), info))
    }
}
