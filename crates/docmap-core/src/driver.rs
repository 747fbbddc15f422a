mod response;
pub use response::{DeleteResult, FindAndModifyResult, InsertResult, Response, UpdateResult};

pub mod operation;
pub use operation::Operation;

mod transaction;
pub use transaction::Transaction;

use crate::async_trait;

use std::fmt::Debug;

/// Opens connections to a database server.
#[async_trait]
pub trait Driver: Debug + Send + Sync + 'static {
    /// Establish a new connection.
    async fn connect(&self) -> crate::Result<Box<dyn Connection>>;
}

/// A live storage handle.
#[async_trait]
pub trait Connection: Debug + Send + Sync + 'static {
    /// Execute a native command against `collection`.
    async fn exec(
        &self,
        collection: &str,
        op: Operation,
        transaction: Option<&Transaction>,
    ) -> crate::Result<Response>;

    /// Returns `true` once the underlying topology has been torn down. The
    /// dispatcher reconnects before using a closed connection.
    fn is_closed(&self) -> bool {
        false
    }

    /// Round-trip to the server without touching any collection.
    async fn ping(&self) -> crate::Result<()>;

    async fn disconnect(&self) -> crate::Result<()> {
        Ok(())
    }
}
