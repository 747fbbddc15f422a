use crate::Session;
use docmap_core::{
    driver::{
        operation::{UpdateMany, UpdateOne},
        Response, UpdateResult,
    },
    Error, Result,
};

use mongodb::{options::UpdateOptions, Collection};

pub(super) async fn execute_one(
    collection: &Collection<bson::Document>,
    op: UpdateOne,
    session: Option<&Session>,
) -> Result<Response> {
    let action = collection
        .update_one(op.filter, op.update)
        .with_options(update_options(op.upsert));

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

pub(super) async fn execute_many(
    collection: &Collection<bson::Document>,
    op: UpdateMany,
    session: Option<&Session>,
) -> Result<Response> {
    let action = collection
        .update_many(op.filter, op.update)
        .with_options(update_options(op.upsert));

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

fn update_options(upsert: bool) -> UpdateOptions {
    let mut options = UpdateOptions::default();
    options.upsert = Some(upsert);
    options
}
