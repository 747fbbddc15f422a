use crate::Session;
use docmap_core::{
    driver::{operation::CountDocuments, Response},
    Error, Result,
};

use mongodb::Collection;

pub(super) async fn execute(
    collection: &Collection<bson::Document>,
    op: CountDocuments,
    session: Option<&Session>,
) -> Result<Response> {
    let action = collection.count_documents(op.filter);

    let count = match session {
        Some(session) => action.session(&mut *session.lock().await).await,
        None => action.await,
    }
    .map_err(Error::driver_operation_failed)?;

    Ok(Response::count(count))
}

pub(super) async fn execute_estimated(collection: &Collection<bson::Document>) -> Result<Response> {
    let count = collection
        .estimated_document_count()
        .await
        .map_err(Error::driver_operation_failed)?;

    Ok(Response::count(count))
}
