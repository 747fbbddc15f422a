use super::Operation;

use bson::Document;

#[derive(Debug, Clone, PartialEq)]
pub struct DeleteOne {
    pub filter: Document,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DeleteMany {
    pub filter: Document,
}

impl DeleteOne {
    pub fn new(filter: Document) -> Self {
        Self { filter }
    }
}

impl DeleteMany {
    pub fn new(filter: Document) -> Self {
        Self { filter }
    }
}

impl From<DeleteOne> for Operation {
    fn from(value: DeleteOne) -> Self {
        Self::DeleteOne(value)
    }
}

impl From<DeleteMany> for Operation {
    fn from(value: DeleteMany) -> Self {
        Self::DeleteMany(value)
    }
}
