use super::Operation;

use bson::Document;

/// Exact count of documents matching a filter.
#[derive(Debug, Clone, PartialEq)]
pub struct CountDocuments {
    pub filter: Document,
}

/// Metadata-based count of every document in the collection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EstimatedDocumentCount;

impl CountDocuments {
    pub fn new(filter: Document) -> Self {
        Self { filter }
    }
}

impl From<CountDocuments> for Operation {
    fn from(value: CountDocuments) -> Self {
        Self::CountDocuments(value)
    }
}

impl From<EstimatedDocumentCount> for Operation {
    fn from(value: EstimatedDocumentCount) -> Self {
        Self::EstimatedDocumentCount(value)
    }
}
