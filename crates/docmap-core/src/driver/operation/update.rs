use super::Operation;

use bson::Document;

#[derive(Debug, Clone, PartialEq)]
pub struct UpdateOne {
    pub filter: Document,
    pub update: Document,
    pub upsert: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UpdateMany {
    pub filter: Document,
    pub update: Document,
    pub upsert: bool,
}

impl UpdateOne {
    pub fn new(filter: Document, update: Document) -> Self {
        Self {
            filter,
            update,
            upsert: false,
        }
    }

    pub fn upsert(mut self, upsert: bool) -> Self {
        self.upsert = upsert;
        self
    }
}

impl UpdateMany {
    pub fn new(filter: Document, update: Document) -> Self {
        Self {
            filter,
            update,
            upsert: false,
        }
    }
}

impl From<UpdateOne> for Operation {
    fn from(value: UpdateOne) -> Self {
        Self::UpdateOne(value)
    }
}

impl From<UpdateMany> for Operation {
    fn from(value: UpdateMany) -> Self {
        Self::UpdateMany(value)
    }
}
