use super::Operation;

use bson::Document;

/// Replace a whole document.
#[derive(Debug, Clone, PartialEq)]
pub struct ReplaceOne {
    pub filter: Document,
    pub replacement: Document,
    pub upsert: bool,
}

impl ReplaceOne {
    pub fn new(filter: Document, replacement: Document) -> Self {
        Self {
            filter,
            replacement,
            upsert: false,
        }
    }

    pub fn upsert(mut self, upsert: bool) -> Self {
        self.upsert = upsert;
        self
    }
}

impl From<ReplaceOne> for Operation {
    fn from(value: ReplaceOne) -> Self {
        Self::ReplaceOne(value)
    }
}
