use super::{Connector, FindOrCreateStrategy, Shared};

use docmap_core::{Driver, IncludeResolver, Observer, Result, Schema, Settings};

use std::sync::{Arc, Mutex};

#[derive(Default)]
pub struct Builder {
    schema: Schema,
    settings: Settings,
    observers: Vec<Arc<dyn Observer>>,
    include_resolver: Option<Arc<dyn IncludeResolver>>,
}

impl Builder {
    pub fn schema(mut self, schema: Schema) -> Self {
        self.schema = schema;
        self
    }

    pub fn settings(mut self, settings: Settings) -> Self {
        self.settings = settings;
        self
    }

    /// Registers an observer notified around every dispatched command.
    /// Observers run in registration order.
    pub fn observer(mut self, observer: impl Observer) -> Self {
        self.observers.push(Arc::new(observer));
        self
    }

    pub fn include_resolver(mut self, resolver: impl IncludeResolver) -> Self {
        self.include_resolver = Some(Arc::new(resolver));
        self
    }

    /// Connects with the built-in MongoDB driver using the URL derived from
    /// the settings.
    #[cfg(feature = "mongodb")]
    pub async fn connect(self) -> Result<Connector> {
        let driver = docmap_driver_mongodb::MongoDb::from_settings(&self.settings);
        let connector = self.build(driver);
        connector.connect().await?;
        Ok(connector)
    }

    /// Builds a connector over `driver`. The connection is established on
    /// first use.
    pub fn build(self, driver: impl Driver) -> Connector {
        let find_or_create = if self.settings.enable_optimized_find_or_create {
            FindOrCreateStrategy::Atomic
        } else {
            FindOrCreateStrategy::QueryThenCreate
        };

        Connector {
            shared: Arc::new(Shared {
                schema: self.schema,
                settings: self.settings,
                driver: Box::new(driver),
                connection: Mutex::new(None),
                observers: self.observers,
                include_resolver: self.include_resolver,
                find_or_create,
            }),
        }
    }
}
