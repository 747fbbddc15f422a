//! The framework-neutral query description.

use bson::{Bson, Document};
use serde::Deserialize;

/// An abstract query: where clause plus cursor modifiers.
///
/// The where clause stays an untyped document tree. Leaves are either
/// literals or single-key operator specs (`{"age": {"gt": 21}}`), and the
/// distinction depends on the property's declared type, so it is resolved by
/// the compiler rather than here.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Filter {
    #[serde(rename = "where")]
    pub where_: Option<Document>,
    pub fields: Option<Fields>,
    pub order: Option<Order>,
    pub limit: Option<u64>,
    pub skip: Option<u64>,
    pub offset: Option<u64>,
    pub include: Option<Bson>,
}

/// Field inclusion/exclusion.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Fields {
    /// Names of the fields to include
    List(Vec<String>),

    /// Field name to a truthy (include) or falsy (exclude) flag
    Map(Document),
}

/// Ordering: either `"name DESC, age"` or `["name DESC", "age"]`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Order {
    One(String),
    Many(Vec<String>),
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn r#where(mut self, where_: Document) -> Self {
        self.where_ = Some(where_);
        self
    }

    pub fn order(mut self, order: impl Into<Order>) -> Self {
        self.order = Some(order.into());
        self
    }

    pub fn fields(mut self, fields: impl Into<Fields>) -> Self {
        self.fields = Some(fields.into());
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn skip(mut self, skip: u64) -> Self {
        self.skip = Some(skip);
        self
    }

    pub fn include(mut self, include: impl Into<Bson>) -> Self {
        self.include = Some(include.into());
        self
    }
}

impl Order {
    /// The individual `name [ASC|DESC]` entries. Comma-joined strings are
    /// split so both forms compile the same way.
    pub fn entries(&self) -> Vec<&str> {
        match self {
            Self::One(order) => order.split(',').collect(),
            Self::Many(entries) => entries.iter().map(String::as_str).collect(),
        }
    }
}

impl From<&str> for Order {
    fn from(order: &str) -> Self {
        Self::One(order.to_string())
    }
}

impl From<String> for Order {
    fn from(order: String) -> Self {
        Self::One(order)
    }
}

impl<S: Into<String>> From<Vec<S>> for Order {
    fn from(entries: Vec<S>) -> Self {
        Self::Many(entries.into_iter().map(Into::into).collect())
    }
}

impl<S: Into<String>> From<Vec<S>> for Fields {
    fn from(fields: Vec<S>) -> Self {
        Self::List(fields.into_iter().map(Into::into).collect())
    }
}

impl From<Document> for Fields {
    fn from(fields: Document) -> Self {
        Self::Map(fields)
    }
}
