mod op;

mod session;
pub use session::Session;

use docmap_core::{
    async_trait,
    driver::{Operation, Response, Transaction},
    Error, Result, Settings,
};

use bson::doc;
use mongodb::{error::ErrorKind, Client, Database};
use std::sync::atomic::{AtomicBool, Ordering};
use url::Url;

/// Database used when the connection URL names none.
const DEFAULT_DATABASE: &str = "test";

#[derive(Debug)]
pub struct MongoDb {
    url: String,
}

impl MongoDb {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.url())
    }
}

#[async_trait]
impl docmap_core::Driver for MongoDb {
    async fn connect(&self) -> Result<Box<dyn docmap_core::Connection>> {
        Ok(Box::new(Connection::connect(&self.url).await?))
    }
}

#[derive(Debug)]
pub struct Connection {
    client: Client,
    database: Database,

    /// Set once the client has been shut down or no server could be selected
    closed: AtomicBool,
}

impl Connection {
    pub fn new(client: Client, database: Database) -> Self {
        Self {
            client,
            database,
            closed: AtomicBool::new(false),
        }
    }

    pub async fn connect(url: &str) -> Result<Self> {
        let url = Url::parse(url)?;

        if !matches!(url.scheme(), "mongodb" | "mongodb+srv") {
            return Err(Error::invalid_connection_url(format!(
                "connection URL does not have a `mongodb` scheme; url={url}"
            )));
        }

        let client = Client::with_uri_str(url.as_str())
            .await
            .map_err(Error::connection_failed)?;

        let db_name = url
            .path()
            .trim_start_matches('/')
            .split('?')
            .next()
            .filter(|name| !name.is_empty())
            .unwrap_or(DEFAULT_DATABASE);

        let database = client.database(db_name);

        tracing::debug!(database = db_name, "connected to MongoDB");

        Ok(Self::new(client, database))
    }

    /// Starts a session with an open transaction. Pass the returned handle
    /// through `Options::transaction` to run writes inside it.
    pub async fn start_transaction(&self) -> Result<Transaction> {
        let mut session = self
            .client
            .start_session()
            .await
            .map_err(Error::driver_operation_failed)?;

        session
            .start_transaction()
            .await
            .map_err(Error::driver_operation_failed)?;

        Ok(Transaction::new(Session::new(session)))
    }

    fn observe_failure(&self, err: &Error) {
        if is_topology_lost(err) && !self.closed.swap(true, Ordering::AcqRel) {
            tracing::warn!(error = %err, "no MongoDB server available; marking connection closed");
        }
    }

    pub async fn commit_transaction(&self, transaction: &Transaction) -> Result<()> {
        let session = Session::from_transaction(transaction)?;
        let mut session = session.lock().await;
        session
            .commit_transaction()
            .await
            .map_err(Error::driver_operation_failed)
    }

    pub async fn abort_transaction(&self, transaction: &Transaction) -> Result<()> {
        let session = Session::from_transaction(transaction)?;
        let mut session = session.lock().await;
        session
            .abort_transaction()
            .await
            .map_err(Error::driver_operation_failed)
    }
}

#[async_trait]
impl docmap_core::Connection for Connection {
    async fn exec(
        &self,
        collection: &str,
        op: Operation,
        transaction: Option<&Transaction>,
    ) -> Result<Response> {
        let session = transaction.map(Session::from_transaction).transpose()?;
        op::execute(self, collection, op, session)
            .await
            .inspect_err(|err| self.observe_failure(err))
    }

    /// The client pools and re-establishes sockets on its own, so this only
    /// reports a client that was shut down or that lost every server.
    fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    async fn ping(&self) -> Result<()> {
        self.database
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(Error::driver_operation_failed)
            .inspect_err(|err| self.observe_failure(err))?;
        Ok(())
    }

    async fn disconnect(&self) -> Result<()> {
        if !self.closed.swap(true, Ordering::AcqRel) {
            self.client.clone().shutdown().await;
        }
        Ok(())
    }
}

/// Returns `true` when the failure chain holds a server selection timeout.
fn is_topology_lost(err: &Error) -> bool {
    let mut source = Some(err as &(dyn std::error::Error + 'static));

    while let Some(err) = source {
        if let Some(err) = err.downcast_ref::<mongodb::error::Error>() {
            if matches!(*err.kind, ErrorKind::ServerSelection { .. }) {
                return true;
            }
        }
        source = err.source();
    }

    false
}
