mod count;
mod delete;
mod find;
mod find_one_and_update;
mod insert_one;
mod replace_one;
mod update;

use crate::{Connection, Session};
use docmap_core::{
    driver::{Operation, Response},
    Result,
};

pub(crate) async fn execute(
    conn: &Connection,
    collection: &str,
    op: Operation,
    session: Option<&Session>,
) -> Result<Response> {
    let coll = conn.database.collection::<bson::Document>(collection);

    match op {
        Operation::InsertOne(op) => insert_one::execute(&coll, op, session).await,
        Operation::UpdateOne(op) => update::execute_one(&coll, op, session).await,
        Operation::UpdateMany(op) => update::execute_many(&coll, op, session).await,
        Operation::ReplaceOne(op) => replace_one::execute(&coll, op, session).await,
        Operation::DeleteOne(op) => delete::execute_one(&coll, op, session).await,
        Operation::DeleteMany(op) => delete::execute_many(&coll, op, session).await,
        Operation::FindOne(op) => find::execute_one(&coll, op, session).await,
        Operation::Find(op) => find::execute(&coll, op, session).await,
        Operation::FindOneAndUpdate(op) => {
            find_one_and_update::execute(&conn.database, collection, op, session).await
        }
        Operation::CountDocuments(op) => count::execute(&coll, op, session).await,
        Operation::EstimatedDocumentCount(_) => count::execute_estimated(&coll).await,
    }
}
