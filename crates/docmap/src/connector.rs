mod builder;
pub use builder::Builder;

mod dispatch;

use docmap_core::{
    schema::Model, Connection, Driver, IncludeResolver, Observer, Options, Policy, Result, Schema,
    Settings,
};

use std::sync::{Arc, Mutex};

/// Shared state between all `Connector` clones.
pub(crate) struct Shared {
    pub(crate) schema: Schema,
    pub(crate) settings: Settings,
    driver: Box<dyn Driver>,

    /// The live connection, established lazily. The lock is only held to
    /// read or swap the handle, never across a native call.
    connection: Mutex<Option<Arc<dyn Connection>>>,

    pub(crate) observers: Vec<Arc<dyn Observer>>,
    pub(crate) include_resolver: Option<Arc<dyn IncludeResolver>>,
    pub(crate) find_or_create: FindOrCreateStrategy,
}

/// How `find_or_create` runs, chosen once at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FindOrCreateStrategy {
    /// One atomic find-and-upsert
    Atomic,

    /// A query followed by an insert when nothing matched
    QueryThenCreate,
}

/// Translates abstract queries and writes into native commands.
///
/// Cloning is cheap; all clones share the same connection.
#[derive(Clone)]
pub struct Connector {
    pub(crate) shared: Arc<Shared>,
}

impl Connector {
    pub fn builder() -> Builder {
        Builder::default()
    }

    pub fn schema(&self) -> &Schema {
        &self.shared.schema
    }

    pub fn settings(&self) -> &Settings {
        &self.shared.settings
    }

    /// Resolves the behavior toggles for one call against `model`.
    pub fn policy(&self, model: &Model, options: &Options) -> Policy {
        Policy::resolve(&self.shared.settings, &model.settings, options)
    }

    /// Establishes the connection if there is none, or the current one has
    /// been closed.
    pub async fn connect(&self) -> Result<()> {
        self.connection().await.map(|_| ())
    }

    /// Tears down the connection. The next operation reconnects.
    pub async fn disconnect(&self) -> Result<()> {
        let connection = self.lock_connection().take();

        match connection {
            Some(connection) => connection.disconnect().await,
            None => Ok(()),
        }
    }

    /// Returns `true` while a live connection is held.
    pub fn is_connected(&self) -> bool {
        self.lock_connection()
            .as_ref()
            .is_some_and(|connection| !connection.is_closed())
    }

    /// Round-trips to the server.
    pub async fn ping(&self) -> Result<()> {
        self.connection().await?.ping().await
    }

    pub(crate) fn model(&self, name: &str) -> Result<&Model> {
        self.shared.schema.model(name)
    }

    /// The live connection, reconnecting first when the current one reports
    /// itself closed.
    pub(crate) async fn connection(&self) -> Result<Arc<dyn Connection>> {
        let stale = {
            let mut current = self.lock_connection();
            if let Some(connection) = current.as_ref().filter(|c| !c.is_closed()) {
                return Ok(connection.clone());
            }
            current.take()
        };

        if let Some(stale) = stale {
            tracing::warn!("connection closed; reconnecting");
            if let Err(err) = stale.disconnect().await {
                tracing::debug!(%err, "failed to disconnect stale connection");
            }
        }

        let connection: Arc<dyn Connection> = Arc::from(self.shared.driver.connect().await?);
        tracing::debug!("connected");

        *self.lock_connection() = Some(connection.clone());
        Ok(connection)
    }

    fn lock_connection(&self) -> std::sync::MutexGuard<'_, Option<Arc<dyn Connection>>> {
        // A poisoned lock only means another caller panicked while swapping
        // the handle; the handle itself is still valid.
        self.shared
            .connection
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl std::fmt::Debug for Connector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connector")
            .field("models", &self.shared.schema.models().count())
            .field("driver", &self.shared.driver)
            .field("observers", &self.shared.observers.len())
            .finish()
    }
}
