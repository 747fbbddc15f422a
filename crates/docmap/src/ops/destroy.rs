use super::Affected;
use crate::{coerce::coerce_id, compile::build_where, Connector};

use docmap_core::{
    driver::operation::{DeleteMany, DeleteOne},
    Options, Result,
};

use bson::{doc, Bson, Document};

impl Connector {
    /// Deletes the document with identifier `id`.
    pub async fn destroy(
        &self,
        model: &str,
        id: impl Into<Bson>,
        options: &Options,
    ) -> Result<Affected> {
        let model = self.model(model)?;
        let policy = self.policy(model, options);

        let oid = coerce_id(model, id.into(), &policy)?;

        let res = self
            .exec(model, DeleteOne::new(doc! { "_id": oid }).into(), options)
            .await?
            .into_deleted()?;

        Ok(Affected {
            count: res.deleted_count,
        })
    }

    /// Deletes every document matching `where_`; `None` deletes all of them.
    pub async fn destroy_all(
        &self,
        model: &str,
        where_: Option<&Document>,
        options: &Options,
    ) -> Result<Affected> {
        let model = self.model(model)?;
        let policy = self.policy(model, options);

        let filter = build_where(model, where_, &policy)?;

        let res = self
            .exec(model, DeleteMany::new(filter).into(), options)
            .await?
            .into_deleted()?;

        Ok(Affected {
            count: res.deleted_count,
        })
    }
}
