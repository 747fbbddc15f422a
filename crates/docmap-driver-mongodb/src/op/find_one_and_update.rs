use crate::Session;
use docmap_core::{
    driver::{operation::FindOneAndUpdate, FindAndModifyResult, Response},
    Error, Result,
};

use bson::{doc, Bson};
use mongodb::Database;

/// Runs `findAndModify` as a raw command.
///
/// The typed `find_one_and_update` helper drops `lastErrorObject`, which is
/// the only place the server reports whether an upsert inserted.
pub(super) async fn execute(
    database: &Database,
    collection: &str,
    op: FindOneAndUpdate,
    session: Option<&Session>,
) -> Result<Response> {
    let mut command = doc! {
        "findAndModify": collection,
        "query": op.filter,
        "update": op.update,
        "new": op.return_new,
        "upsert": op.upsert,
    };

    if let Some(sort) = op.sort {
        command.insert("sort", sort);
    }

    if let Some(projection) = op.projection {
        command.insert("fields", projection);
    }

    let action = database.run_command(command);

    let mut reply = match session {
        Some(session) => action.session(&mut *session.lock().await).await,
        None => action.await,
    }
    .map_err(Error::driver_operation_failed)?;

    let value = match reply.remove("value") {
        Some(Bson::Document(value)) => Some(value),
        _ => None,
    };

    let last_error_object = match reply.remove("lastErrorObject") {
        Some(Bson::Document(leo)) => Some(leo),
        _ => None,
    };

    Ok(Response::FindAndModify(FindAndModifyResult {
        value,
        last_error_object,
    }))
}
