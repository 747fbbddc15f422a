use super::{display_id, take_id, Affected};
use crate::{coerce::coerce_id, compile::build_where, Connector};

use docmap_core::{
    driver::operation::{FindOne, FindOneAndUpdate, UpdateMany},
    Error, Options, Result,
};

use bson::{doc, Bson, Document};

impl Connector {
    /// Applies a partial update to the document with identifier `id` and
    /// returns it as stored after the write.
    ///
    /// Fails with a record-not-found error, without creating anything, when
    /// the identifier does not exist.
    pub async fn update_attributes(
        &self,
        model: &str,
        id: impl Into<Bson>,
        mut data: Document,
        options: &Options,
    ) -> Result<Document> {
        let model = self.model(model)?;
        let policy = self.policy(model, options);

        let id = id.into();
        let oid = coerce_id(model, id.clone(), &policy)?;

        take_id(model, &mut data);
        let update = self.compile_update(model, data, &policy)?;

        let value = if update.is_empty() {
            self.exec(model, FindOne::new(doc! { "_id": oid }).into(), options)
                .await?
                .into_document()?
        } else {
            let op = FindOneAndUpdate::new(doc! { "_id": oid }, update).sort(doc! { "_id": 1 });
            self.exec(model, op.into(), options)
                .await?
                .into_find_and_modify()?
                .value
        };

        match value {
            Some(value) => Ok(self.read_document(model, value, true, &policy)),
            None => Err(Error::record_not_found(format!(
                "No instance with id {} found for {}",
                display_id(&id),
                model.name
            ))),
        }
    }

    /// Applies a partial update to every document matching `where_` and
    /// returns how many matched.
    pub async fn update_all(
        &self,
        model: &str,
        where_: Option<&Document>,
        mut data: Document,
        options: &Options,
    ) -> Result<Affected> {
        let model = self.model(model)?;
        let policy = self.policy(model, options);

        let filter = build_where(model, where_, &policy)?;

        take_id(model, &mut data);
        let update = self.compile_update(model, data, &policy)?;

        if update.is_empty() {
            return Ok(Affected::default());
        }

        let res = self
            .exec(model, UpdateMany::new(filter, update).into(), options)
            .await?
            .into_updated()?;

        Ok(Affected {
            count: res.matched_count,
        })
    }
}
