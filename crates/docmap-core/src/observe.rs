//! Extension points exposed to code outside the connector.

use crate::{
    async_trait,
    driver::{Operation, Response},
    Error, Options, Result,
};

use bson::{Bson, Document};

/// The context observers see around each dispatched command.
#[derive(Debug)]
pub struct ExecuteContext {
    /// Model the command runs for
    pub model: String,

    /// Resolved collection name
    pub collection: String,

    /// Legacy command name (`insert`, `save`, `findAndModify`, ...)
    pub command: &'static str,

    /// Native command name (`insertOne`, `updateOne`, ...)
    pub native_command: &'static str,

    /// The native request parameters
    pub req: Operation,

    /// The native response. Setting it in `before_execute` skips the native
    /// call and returns this response instead.
    pub res: Option<Response>,

    /// The native error, visible to `after_execute`
    pub error: Option<Error>,

    /// Free-form annotations observers can share between the two hooks
    pub hook_state: Document,
}

/// Observes command dispatch.
///
/// Returning an error from either hook fails the operation with that error.
#[async_trait]
pub trait Observer: Send + Sync + 'static {
    async fn before_execute(&self, cx: &mut ExecuteContext) -> Result<()> {
        let _ = cx;
        Ok(())
    }

    async fn after_execute(&self, cx: &mut ExecuteContext) -> Result<()> {
        let _ = cx;
        Ok(())
    }
}

/// Populates related entities on query results.
#[async_trait]
pub trait IncludeResolver: Send + Sync + 'static {
    /// Returns `documents` with the relations named by `include` populated.
    async fn include(
        &self,
        model: &str,
        documents: Vec<Document>,
        include: &Bson,
        options: &Options,
    ) -> Result<Vec<Document>>;
}

impl ExecuteContext {
    pub fn new(model: &str, collection: &str, req: Operation) -> Self {
        Self {
            model: model.to_string(),
            collection: collection.to_string(),
            command: req.legacy_name(),
            native_command: req.name(),
            req,
            res: None,
            error: None,
            hook_state: Document::new(),
        }
    }
}
