use super::Connector;

use docmap_core::{
    driver::{Operation, Response},
    schema::Model,
    Error, ExecuteContext, Options, Result,
};

impl Connector {
    /// Runs a native command against `model`'s collection, notifying the
    /// registered observers around it.
    pub async fn execute(
        &self,
        model: &str,
        op: impl Into<Operation>,
        options: &Options,
    ) -> Result<Response> {
        let model = self.model(model)?;
        self.exec(model, op.into(), options).await
    }

    pub(crate) async fn exec(
        &self,
        model: &Model,
        op: Operation,
        options: &Options,
    ) -> Result<Response> {
        let collection = model.collection();
        let connection = self.connection().await?;

        let mut cx = ExecuteContext::new(&model.name, collection, op);

        tracing::debug!(
            model = %model.name,
            collection,
            command = cx.native_command,
            "execute"
        );

        for observer in &self.shared.observers {
            observer.before_execute(&mut cx).await?;
        }

        if cx.res.is_none() {
            let res = connection
                .exec(collection, cx.req.clone(), options.transaction.as_ref())
                .await;

            match res {
                Ok(res) => cx.res = Some(res),
                Err(err) => {
                    tracing::debug!(%err, command = cx.native_command, "command failed");
                    cx.error = Some(err);
                }
            }
        }

        for observer in &self.shared.observers {
            observer.after_execute(&mut cx).await?;
        }

        match (cx.error, cx.res) {
            (Some(err), _) => Err(err),
            (None, Some(res)) => Ok(res),
            (None, None) => Err(Error::invalid_result(format!(
                "`{}` produced no response",
                cx.native_command
            ))),
        }
    }
}
