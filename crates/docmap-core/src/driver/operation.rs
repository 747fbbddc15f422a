mod count_documents;
pub use count_documents::{CountDocuments, EstimatedDocumentCount};

mod delete;
pub use delete::{DeleteMany, DeleteOne};

mod find;
pub use find::{Find, FindOne};

mod find_one_and_update;
pub use find_one_and_update::FindOneAndUpdate;

mod insert_one;
pub use insert_one::InsertOne;

mod replace_one;
pub use replace_one::ReplaceOne;

mod update;
pub use update::{UpdateMany, UpdateOne};

/// A native command.
#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    InsertOne(InsertOne),
    UpdateOne(UpdateOne),
    UpdateMany(UpdateMany),
    ReplaceOne(ReplaceOne),
    DeleteOne(DeleteOne),
    DeleteMany(DeleteMany),
    FindOne(FindOne),
    Find(Find),
    FindOneAndUpdate(FindOneAndUpdate),
    CountDocuments(CountDocuments),
    EstimatedDocumentCount(EstimatedDocumentCount),
}

impl Operation {
    /// The native command name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::InsertOne(_) => "insertOne",
            Self::UpdateOne(_) => "updateOne",
            Self::UpdateMany(_) => "updateMany",
            Self::ReplaceOne(_) => "replaceOne",
            Self::DeleteOne(_) => "deleteOne",
            Self::DeleteMany(_) => "deleteMany",
            Self::FindOne(_) => "findOne",
            Self::Find(_) => "find",
            Self::FindOneAndUpdate(_) => "findOneAndUpdate",
            Self::CountDocuments(_) => "countDocuments",
            Self::EstimatedDocumentCount(_) => "estimatedDocumentCount",
        }
    }

    /// The legacy command name reported to observers. Hook subscribers were
    /// written against the older driver verbs and still match on these.
    pub fn legacy_name(&self) -> &'static str {
        match self {
            Self::InsertOne(_) => "insert",
            Self::UpdateOne(_) => "save",
            Self::FindOneAndUpdate(_) => "findAndModify",
            Self::DeleteOne(_) | Self::DeleteMany(_) => "delete",
            Self::ReplaceOne(_) | Self::UpdateMany(_) => "update",
            Self::CountDocuments(_) | Self::EstimatedDocumentCount(_) => "count",
            Self::FindOne(_) | Self::Find(_) => "find",
        }
    }
}
