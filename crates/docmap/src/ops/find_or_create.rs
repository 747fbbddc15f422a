use super::{take_id, with_leading};
use crate::{
    compile::{build_projection, build_sort, build_where},
    connector::FindOrCreateStrategy,
    Connector,
};

use docmap_core::{
    driver::operation::FindOneAndUpdate, schema::Model, Error, Filter, Options, Result,
};

use bson::{doc, Document};

impl Connector {
    /// Returns the first document matching `filter`, creating one from
    /// `data` when nothing matches. The flag is `true` when the document was
    /// created.
    ///
    /// With `enable_optimized_find_or_create` this is a single atomic
    /// find-and-upsert; otherwise a query followed by an insert, which can
    /// race with concurrent writers.
    pub async fn find_or_create(
        &self,
        model: &str,
        filter: &Filter,
        data: Document,
        options: &Options,
    ) -> Result<(Document, bool)> {
        match self.shared.find_or_create {
            FindOrCreateStrategy::Atomic => {
                let model = self.model(model)?;
                self.find_or_create_atomic(model, filter, data, options).await
            }
            FindOrCreateStrategy::QueryThenCreate => {
                self.find_or_create_by_query(model, filter, data, options)
                    .await
            }
        }
    }

    async fn find_or_create_atomic(
        &self,
        model: &Model,
        filter: &Filter,
        data: Document,
        options: &Options,
    ) -> Result<(Document, bool)> {
        let policy = self.policy(model, options);

        let query = build_where(model, filter.where_.as_ref(), &policy)?;
        let sort = build_sort(model, filter.order.as_ref(), &policy);
        let projection = build_projection(model, filter.fields.as_ref());
        let document = self.prepare_insert(model, data, &policy)?;

        let mut op = FindOneAndUpdate::new(query, doc! { "$setOnInsert": document }).upsert(true);
        if !sort.is_empty() {
            op = op.sort(sort);
        }
        op.projection = projection.document;

        let res = self
            .exec(model, op.into(), options)
            .await?
            .into_find_and_modify()?;

        let created = res.upserted().unwrap_or_else(|| {
            tracing::warn!(model = %model.name, "findOrCreate result format not recognized");
            false
        });

        let Some(value) = res.value else {
            return Err(Error::record_not_found(format!(
                "No {} matched or was created by findOrCreate",
                model.name
            )));
        };

        let document = self.read_document(model, value, projection.id_included, &policy);
        let document = self
            .resolve_includes(model, vec![document], filter.include.as_ref(), options)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| Error::invalid_result("include resolver dropped the document"))?;

        Ok((document, created))
    }

    async fn find_or_create_by_query(
        &self,
        model_name: &str,
        filter: &Filter,
        data: Document,
        options: &Options,
    ) -> Result<(Document, bool)> {
        let query = Filter {
            limit: Some(1),
            ..filter.clone()
        };

        if let Some(found) = self.all(model_name, &query, options).await?.into_iter().next() {
            return Ok((found, false));
        }

        let model = self.model(model_name)?;
        let id = self.create(model_name, data.clone(), options).await?;

        let mut fields = data;
        take_id(model, &mut fields);

        Ok((with_leading(model.id_name(), id, fields), true))
    }
}
