use crate::{coerce::coerce_id, Connector};

use docmap_core::{driver::operation::InsertOne, Options, Result};

use bson::{Bson, Document};

impl Connector {
    /// Inserts `data` and returns the identifier of the new document. When
    /// `data` carries no identifier the server generates one.
    pub async fn create(&self, model: &str, data: Document, options: &Options) -> Result<Bson> {
        let model = self.model(model)?;
        let policy = self.policy(model, options);

        let document = self.prepare_insert(model, data, &policy)?;

        let res = self
            .exec(model, InsertOne::new(document).into(), options)
            .await?
            .into_inserted()?;

        coerce_id(model, res.inserted_id, &policy)
    }
}
