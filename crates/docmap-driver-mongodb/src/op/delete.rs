use crate::Session;
use docmap_core::{
    driver::{
        operation::{DeleteMany, DeleteOne},
        DeleteResult, Response,
    },
    Error, Result,
};

use mongodb::Collection;

pub(super) async fn execute_one(
    collection: &Collection<bson::Document>,
    op: DeleteOne,
    session: Option<&Session>,
) -> Result<Response> {
    let action = collection.delete_one(op.filter);

    let res = match session {
        Some(session) => action.session(&mut *session.lock().await).await,
        None => action.await,
    }
    .map_err(Error::driver_operation_failed)?;

    Ok(Response::Deleted(DeleteResult {
        deleted_count: res.deleted_count,
    }))
}

pub(super) async fn execute_many(
    collection: &Collection<bson::Document>,
    op: DeleteMany,
    session: Option<&Session>,
) -> Result<Response> {
    let action = collection.delete_many(op.filter);

    let res = match session {
        Some(session) => action.session(&mut *session.lock().await).await,
        None => action.await,
    }
    .map_err(Error::driver_operation_failed)?;

    Ok(Response::Deleted(DeleteResult {
        deleted_count: res.deleted_count,
    }))
}
