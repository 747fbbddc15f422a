use super::Operation;

use bson::Document;

/// Atomic find-and-modify.
#[derive(Debug, Clone, PartialEq)]
pub struct FindOneAndUpdate {
    pub filter: Document,
    pub update: Document,
    pub upsert: bool,

    /// Return the document after the update was applied
    pub return_new: bool,

    pub sort: Option<Document>,
    pub projection: Option<Document>,
}

impl FindOneAndUpdate {
    pub fn new(filter: Document, update: Document) -> Self {
        Self {
            filter,
            update,
            upsert: false,
            return_new: true,
            sort: None,
            projection: None,
        }
    }

    pub fn upsert(mut self, upsert: bool) -> Self {
        self.upsert = upsert;
        self
    }

    pub fn sort(mut self, sort: Document) -> Self {
        self.sort = Some(sort);
        self
    }
}

impl From<FindOneAndUpdate> for Operation {
    fn from(value: FindOneAndUpdate) -> Self {
        Self::FindOneAndUpdate(value)
    }
}
