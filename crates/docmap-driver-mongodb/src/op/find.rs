use crate::Session;
use docmap_core::{
    driver::{
        operation::{Find, FindOne},
        Response,
    },
    Error, Result,
};

use bson::Document;
use futures::stream::TryStreamExt;
use mongodb::{
    options::{Collation, FindOneOptions, FindOptions},
    Collection,
};

pub(super) async fn execute(
    collection: &Collection<Document>,
    op: Find,
    session: Option<&Session>,
) -> Result<Response> {
    let mut options = FindOptions::default();
    options.projection = op.projection;
    options.sort = op.sort;
    options.limit = op.limit.map(|limit| limit as i64);
    options.skip = op.skip;
    options.collation = op
        .collation
        .map(bson::from_document::<Collation>)
        .transpose()?;

    let documents: Vec<Document> = match session {
        Some(session) => {
            let mut session = session.lock().await;
            let mut cursor = collection
                .find(op.filter)
                .with_options(options)
                .session(&mut *session)
                .await
                .map_err(Error::driver_operation_failed)?;

            cursor
                .stream(&mut *session)
                .try_collect()
                .await
                .map_err(Error::driver_operation_failed)?
        }
        None => collection
            .find(op.filter)
            .with_options(options)
            .await
            .map_err(Error::driver_operation_failed)?
            .try_collect()
            .await
            .map_err(Error::driver_operation_failed)?,
    };

    Ok(Response::Documents(documents))
}

pub(super) async fn execute_one(
    collection: &Collection<Document>,
    op: FindOne,
    session: Option<&Session>,
) -> Result<Response> {
    let mut options = FindOneOptions::default();
    options.projection = op.projection;

    let action = collection.find_one(op.filter).with_options(options);

    let document = match session {
        Some(session) => action.session(&mut *session.lock().await).await,
        None => action.await,
    }
    .map_err(Error::driver_operation_failed)?;

    Ok(Response::Document(document))
}
