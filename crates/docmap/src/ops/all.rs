use crate::{
    compile::{build_projection, build_sort, build_where, has_near_filter},
    Connector,
};

use docmap_core::{driver::operation::Find, Filter, Options, Result};

use bson::Document;

impl Connector {
    /// Runs a query and returns every matching document, identifiers
    /// remapped to the model's id property.
    ///
    /// Results are ordered by `filter.order`, or by identifier when none is
    /// given and default sorting is enabled. Geo-proximity queries keep the
    /// server's distance order.
    pub async fn all(&self, model: &str, filter: &Filter, options: &Options) -> Result<Vec<Document>> {
        let model = self.model(model)?;
        let policy = self.policy(model, options);

        let mut find = Find::new(build_where(model, filter.where_.as_ref(), &policy)?);

        let projection = build_projection(model, filter.fields.as_ref());
        find.projection = projection.document;

        if !has_near_filter(filter.where_.as_ref()) {
            let sort = build_sort(model, filter.order.as_ref(), &policy);
            find.sort = (!sort.is_empty()).then_some(sort);
        }

        find.limit = filter.limit.filter(|limit| *limit > 0);
        find.skip = filter.skip.or(filter.offset).filter(|skip| *skip > 0);
        find.collation = options.collation.clone();

        let documents = self
            .exec(model, find.into(), options)
            .await?
            .into_documents()?
            .into_iter()
            .map(|document| self.read_document(model, document, projection.id_included, &policy))
            .collect();

        self.resolve_includes(model, documents, filter.include.as_ref(), options)
            .await
    }
}
