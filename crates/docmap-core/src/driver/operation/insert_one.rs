use super::Operation;

use bson::Document;

#[derive(Debug, Clone, PartialEq)]
pub struct InsertOne {
    pub document: Document,
}

impl InsertOne {
    pub fn new(document: Document) -> Self {
        Self { document }
    }
}

impl From<InsertOne> for Operation {
    fn from(value: InsertOne) -> Self {
        Self::InsertOne(value)
    }
}
