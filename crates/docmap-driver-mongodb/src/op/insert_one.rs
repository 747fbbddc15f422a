use crate::Session;
use docmap_core::{
    driver::{operation::InsertOne, InsertResult, Response},
    Error, Result,
};

use mongodb::Collection;

pub(super) async fn execute(
    collection: &Collection<bson::Document>,
    op: InsertOne,
    session: Option<&Session>,
) -> Result<Response> {
    let action = collection.insert_one(op.document);

    let res = match session {
        Some(session) => action.session(&mut *session.lock().await).await,
        None => action.await,
    }
    .map_err(Error::driver_operation_failed)?;

    Ok(Response::Inserted(InsertResult {
        inserted_id: res.inserted_id,
    }))
}
