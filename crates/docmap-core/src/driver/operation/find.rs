use super::Operation;

use bson::Document;

/// Query a collection. The cursor modifiers (sort, limit, skip, collation)
/// travel with the command and are applied by the connection.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Find {
    pub filter: Document,
    pub projection: Option<Document>,
    pub sort: Option<Document>,
    pub limit: Option<u64>,
    pub skip: Option<u64>,
    pub collation: Option<Document>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FindOne {
    pub filter: Document,
    pub projection: Option<Document>,
}

impl Find {
    pub fn new(filter: Document) -> Self {
        Self {
            filter,
            ..Default::default()
        }
    }
}

impl FindOne {
    pub fn new(filter: Document) -> Self {
        Self {
            filter,
            projection: None,
        }
    }
}

impl From<Find> for Operation {
    fn from(value: Find) -> Self {
        Self::Find(value)
    }
}

impl From<FindOne> for Operation {
    fn from(value: FindOne) -> Self {
        Self::FindOne(value)
    }
}
