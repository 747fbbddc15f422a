use crate::{coerce::coerce_id, Connector};

use docmap_core::{driver::operation::FindOne, Options, Result};

use bson::{doc, Bson, Document};

impl Connector {
    /// Finds a single document by identifier.
    pub async fn find(
        &self,
        model: &str,
        id: impl Into<Bson>,
        options: &Options,
    ) -> Result<Option<Document>> {
        let model = self.model(model)?;
        let policy = self.policy(model, options);

        let oid = coerce_id(model, id.into(), &policy)?;

        let document = self
            .exec(model, FindOne::new(doc! { "_id": oid }).into(), options)
            .await?
            .into_document()?;

        Ok(document.map(|document| self.read_document(model, document, true, &policy)))
    }

    /// Returns `true` when a document with identifier `id` exists.
    pub async fn exists(&self, model: &str, id: impl Into<Bson>, options: &Options) -> Result<bool> {
        Ok(self.find(model, id, options).await?.is_some())
    }
}
