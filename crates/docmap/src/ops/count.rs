use crate::{compile::build_where, Connector};

use docmap_core::{
    driver::operation::{CountDocuments, EstimatedDocumentCount},
    Options, Result,
};

use bson::Document;

impl Connector {
    /// Counts documents matching `where_`. An empty filter uses the
    /// collection's metadata count instead of scanning.
    pub async fn count(
        &self,
        model: &str,
        where_: Option<&Document>,
        options: &Options,
    ) -> Result<u64> {
        let model = self.model(model)?;
        let policy = self.policy(model, options);

        let filter = build_where(model, where_, &policy)?;

        let op = if filter.is_empty() {
            EstimatedDocumentCount.into()
        } else {
            CountDocuments::new(filter).into()
        };

        self.exec(model, op, options).await?.into_count()
    }
}
