pub mod coerce;

pub mod compile;

mod connector;
pub use connector::{Builder, Connector};

mod ops;
pub use ops::{Affected, WriteInfo};

pub use docmap_core::{
    bson,
    driver::{self, Connection, Driver, Operation, Response, Transaction},
    filter::{Fields, Order},
    schema::{self, Model, Property, PropertyType, ScalarType},
    Error, ExecuteContext, Filter, IncludeResolver, ModelSettings, Observer, Options, Policy,
    Result, Schema, Settings,
};

#[cfg(feature = "mongodb")]
pub use docmap_driver_mongodb::MongoDb;

pub use async_trait::async_trait;
