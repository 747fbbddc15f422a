pub mod driver;
pub use driver::{Connection, Driver};

mod error;
pub use error::Error;

pub mod filter;
pub use filter::Filter;

pub mod observe;
pub use observe::{ExecuteContext, IncludeResolver, Observer};

pub mod schema;
pub use schema::Schema;

pub mod settings;
pub use settings::{ModelSettings, Options, Policy, Settings};

/// A Result type alias that uses docmap's [`Error`] type.
pub type Result<T> = core::result::Result<T, Error>;

pub use async_trait::async_trait;
pub use bson;
