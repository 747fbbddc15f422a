use crate::{Error, Result};

use bson::{Bson, Document};

/// Native command result.
#[derive(Debug, Clone, PartialEq)]
pub enum Response {
    Inserted(InsertResult),
    Updated(UpdateResult),
    Deleted(DeleteResult),

    /// Result of `findOne`
    Document(Option<Document>),

    /// Result of `find`, after the cursor is drained
    Documents(Vec<Document>),

    /// Result of `findOneAndUpdate`
    FindAndModify(FindAndModifyResult),

    Count(u64),
}

#[derive(Debug, Clone, PartialEq)]
pub struct InsertResult {
    pub inserted_id: Bson,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UpdateResult {
    pub matched_count: u64,
    pub modified_count: u64,
    pub upserted_id: Option<Bson>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DeleteResult {
    pub deleted_count: u64,
}

/// Raw `findAndModify` reply.
///
/// `last_error_object` is kept as the server sent it; callers read
/// `updatedExisting` and `upserted` from it and tolerate its absence.
#[derive(Debug, Clone, PartialEq)]
pub struct FindAndModifyResult {
    pub value: Option<Document>,
    pub last_error_object: Option<Document>,
}

impl Response {
    pub fn count(count: u64) -> Self {
        Self::Count(count)
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Inserted(_) => "Inserted",
            Self::Updated(_) => "Updated",
            Self::Deleted(_) => "Deleted",
            Self::Document(_) => "Document",
            Self::Documents(_) => "Documents",
            Self::FindAndModify(_) => "FindAndModify",
            Self::Count(_) => "Count",
        }
    }

    pub fn into_count(self) -> Result<u64> {
        match self {
            Self::Count(count) => Ok(count),
            other => Err(unexpected("Count", &other)),
        }
    }

    pub fn into_documents(self) -> Result<Vec<Document>> {
        match self {
            Self::Documents(documents) => Ok(documents),
            other => Err(unexpected("Documents", &other)),
        }
    }

    pub fn into_document(self) -> Result<Option<Document>> {
        match self {
            Self::Document(document) => Ok(document),
            other => Err(unexpected("Document", &other)),
        }
    }

    pub fn into_inserted(self) -> Result<InsertResult> {
        match self {
            Self::Inserted(res) => Ok(res),
            other => Err(unexpected("Inserted", &other)),
        }
    }

    pub fn into_deleted(self) -> Result<DeleteResult> {
        match self {
            Self::Deleted(res) => Ok(res),
            other => Err(unexpected("Deleted", &other)),
        }
    }

    pub fn into_updated(self) -> Result<UpdateResult> {
        match self {
            Self::Updated(res) => Ok(res),
            other => Err(unexpected("Updated", &other)),
        }
    }

    pub fn into_find_and_modify(self) -> Result<FindAndModifyResult> {
        match self {
            Self::FindAndModify(res) => Ok(res),
            other => Err(unexpected("FindAndModify", &other)),
        }
    }
}

fn unexpected(expected: &str, actual: &Response) -> Error {
    Error::invalid_result(format!("expected {expected}, got {}", actual.kind()))
}

impl FindAndModifyResult {
    /// `Some(true)` when the command inserted a new document, `None` when the
    /// reply carries no `lastErrorObject`.
    pub fn upserted(&self) -> Option<bool> {
        let leo = self.last_error_object.as_ref()?;

        if let Ok(updated_existing) = leo.get_bool("updatedExisting") {
            return Some(!updated_existing);
        }

        Some(leo.contains_key("upserted"))
    }

    /// The id of the inserted document, if the command upserted.
    pub fn upserted_id(&self) -> Option<&Bson> {
        self.last_error_object.as_ref()?.get("upserted")
    }
}
