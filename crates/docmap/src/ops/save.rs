use super::{take_id, with_leading, WriteInfo};
use crate::{
    coerce::{coerce_id, to_database},
    Connector,
};

use docmap_core::{
    driver::{operation::UpdateOne, Response},
    Options, Result,
};

use bson::{doc, Document};

impl Connector {
    /// Upserts `data` by its identifier, setting every given field.
    ///
    /// Returns the caller's data together with whether a new document was
    /// inserted. An unrecognized native result is logged and reported as
    /// `is_new_instance: None` rather than failing the call. Data without an
    /// identifier is inserted.
    pub async fn save(
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
            let data = with_leading(model.id_name(), id, data);
            return Ok((
                data,
                WriteInfo {
                    is_new_instance: Some(true),
                },
            ));
        };

        let oid = coerce_id(model, id, &policy)?;
        let fields = to_database(&self.shared.schema, model, fields, &policy)?;

        let update = if fields.is_empty() {
            doc! { "$setOnInsert": { "_id": oid.clone() } }
        } else {
            doc! { "$set": fields }
        };

        let op = UpdateOne::new(doc! { "_id": oid }, update).upsert(true);

        let info = match self.exec(model, op.into(), options).await? {
            Response::Updated(res) => WriteInfo {
                is_new_instance: Some(res.upserted_id.is_some()),
            },
            other => {
                tracing::warn!(
                    model = %model.name,
                    response = other.kind(),
                    "save result format not recognized"
                );
                WriteInfo::default()
            }
        };

        Ok((data, info))
    }
}
