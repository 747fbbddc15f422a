use crate::Session;
use docmap_core::{
    driver::{operation::ReplaceOne, Response, UpdateResult},
    Error, Result,
};

use mongodb::{options::ReplaceOptions, Collection};

pub(super) async fn execute(
    collection: &Collection<bson::Document>,
    op: ReplaceOne,
    session: Option<&Session>,
) -> Result<Response> {
    let mut options = ReplaceOptions::default();
    options.upsert = Some(op.upsert);

    let action = collection
        .replace_one(op.filter, op.replacement)
        .with_options(options);

    let res = match session {
        Some(session) => action.session(&mut *session.lock().await).await,
        None => action.await,
    }
    .map_err(Error::driver_operation_failed)?;

    Ok(Response::Updated(UpdateResult {
        matched_count: res.matched_count,
        modified_count: res.modified_count,
        upserted_id: res.upserted_id,
    }))
}
