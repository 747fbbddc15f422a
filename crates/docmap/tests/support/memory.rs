use super::query::{apply_update, matches, project, seed_from_filter, sort_documents};

use docmap::{
    async_trait,
    bson::{oid::ObjectId, doc, Bson, Document},
    driver::{DeleteResult, FindAndModifyResult, InsertResult, UpdateResult},
    Connection, Driver, Error, Operation, Response, Result, Transaction,
};

use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc, Mutex, MutexGuard,
    },
};

/// An in-memory document store that evaluates the native commands the
/// connector emits.
#[derive(Debug, Clone, Default)]
pub struct Memory {
    state: Arc<Mutex<State>>,
}

#[derive(Debug, Default)]
struct State {
    collections: HashMap<String, Vec<Document>>,

    /// Every command received, in order
    log: Vec<(String, Operation)>,

    connects: usize,

    /// Closed flag of the most recently opened connection
    current: Option<Arc<AtomicBool>>,
}

#[derive(Debug)]
struct MemoryConnection {
    state: Arc<Mutex<State>>,
    closed: Arc<AtomicBool>,
}

impl Memory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stored documents of `collection`, in natural order.
    pub fn documents(&self, collection: &str) -> Vec<Document> {
        self.lock()
            .collections
            .get(collection)
            .cloned()
            .unwrap_or_default()
    }

    pub fn seed(&self, collection: &str, documents: impl IntoIterator<Item = Document>) {
        self.lock()
            .collections
            .entry(collection.to_string())
            .or_default()
            .extend(documents);
    }

    /// Names of the native commands received so far.
    pub fn commands(&self) -> Vec<&'static str> {
        self.lock().log.iter().map(|(_, op)| op.name()).collect()
    }

    /// Removes and returns the logged commands.
    pub fn take_log(&self) -> Vec<(String, Operation)> {
        std::mem::take(&mut self.lock().log)
    }

    pub fn connects(&self) -> usize {
        self.lock().connects
    }

    /// Simulates the server tearing down the current connection.
    pub fn close_connection(&self) {
        if let Some(closed) = &self.lock().current {
            closed.store(true, Ordering::SeqCst);
        }
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap()
    }
}

#[async_trait]
impl Driver for Memory {
    async fn connect(&self) -> Result<Box<dyn Connection>> {
        let closed = Arc::new(AtomicBool::new(false));

        let mut state = self.lock();
        state.connects += 1;
        state.current = Some(closed.clone());

        Ok(Box::new(MemoryConnection {
            state: self.state.clone(),
            closed,
        }))
    }
}

#[async_trait]
impl Connection for MemoryConnection {
    async fn exec(
        &self,
        collection: &str,
        op: Operation,
        _transaction: Option<&Transaction>,
    ) -> Result<Response> {
        let mut state = self.state.lock().unwrap();
        state.log.push((collection.to_string(), op.clone()));

        let documents = state
            .collections
            .entry(collection.to_string())
            .or_default();

        exec(documents, op)
    }

    fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }

    async fn disconnect(&self) -> Result<()> {
        self.closed.store(true, Ordering::SeqCst);
        Ok(())
    }
}

fn exec(documents: &mut Vec<Document>, op: Operation) -> Result<Response> {
    let res = match op {
        Operation::InsertOne(op) => {
            let document = with_id(op.document);
            let id = document.get("_id").cloned().unwrap();
            if documents.iter().any(|existing| existing.get("_id") == Some(&id)) {
                return Err(duplicate_key(&id));
            }
            documents.push(document);
            Response::Inserted(InsertResult { inserted_id: id })
        }
        Operation::UpdateOne(op) => update(documents, &op.filter, &op.update, op.upsert, false),
        Operation::UpdateMany(op) => update(documents, &op.filter, &op.update, op.upsert, true),
        Operation::ReplaceOne(op) => {
            match documents.iter().position(|doc| matches(doc, &op.filter)) {
                Some(index) => {
                    let id = documents[index].get("_id").cloned().unwrap_or(Bson::Null);
                    let mut replacement = doc! { "_id": id };
                    replacement.extend(op.replacement);
                    let modified = documents[index] != replacement;
                    documents[index] = replacement;
                    Response::Updated(UpdateResult {
                        matched_count: 1,
                        modified_count: u64::from(modified),
                        upserted_id: None,
                    })
                }
                None if op.upsert => {
                    let mut document = seed_from_filter(&op.filter);
                    document.extend(op.replacement);
                    let document = with_id(document);
                    let id = document.get("_id").cloned();
                    documents.push(document);
                    Response::Updated(UpdateResult {
                        matched_count: 0,
                        modified_count: 0,
                        upserted_id: id,
                    })
                }
                None => Response::Updated(UpdateResult {
                    matched_count: 0,
                    modified_count: 0,
                    upserted_id: None,
                }),
            }
        }
        Operation::DeleteOne(op) => {
            let deleted_count = match documents.iter().position(|doc| matches(doc, &op.filter)) {
                Some(index) => {
                    documents.remove(index);
                    1
                }
                None => 0,
            };
            Response::Deleted(DeleteResult { deleted_count })
        }
        Operation::DeleteMany(op) => {
            let before = documents.len();
            documents.retain(|doc| !matches(doc, &op.filter));
            Response::Deleted(DeleteResult {
                deleted_count: (before - documents.len()) as u64,
            })
        }
        Operation::FindOne(op) => Response::Document(
            documents
                .iter()
                .find(|doc| matches(doc, &op.filter))
                .cloned()
                .map(|doc| project(doc, op.projection.as_ref())),
        ),
        Operation::Find(op) => {
            let mut found: Vec<Document> = documents
                .iter()
                .filter(|doc| matches(doc, &op.filter))
                .cloned()
                .collect();

            if let Some(sort) = &op.sort {
                sort_documents(&mut found, sort);
            }

            let skip = op.skip.unwrap_or(0) as usize;
            let limit = op.limit.map_or(usize::MAX, |limit| limit as usize);

            Response::Documents(
                found
                    .into_iter()
                    .skip(skip)
                    .take(limit)
                    .map(|doc| project(doc, op.projection.as_ref()))
                    .collect(),
            )
        }
        Operation::FindOneAndUpdate(op) => {
            let mut candidates: Vec<usize> = (0..documents.len())
                .filter(|&index| matches(&documents[index], &op.filter))
                .collect();

            if let Some(sort) = &op.sort {
                let mut sorted: Vec<Document> =
                    candidates.iter().map(|&i| documents[i].clone()).collect();
                sort_documents(&mut sorted, sort);
                candidates = sorted
                    .iter()
                    .filter_map(|doc| documents.iter().position(|d| d == doc))
                    .collect();
            }

            match candidates.first() {
                Some(&index) => {
                    let before = documents[index].clone();
                    apply_update(&mut documents[index], &op.update, false);
                    let value = if op.return_new {
                        documents[index].clone()
                    } else {
                        before
                    };
                    Response::FindAndModify(FindAndModifyResult {
                        value: Some(project(value, op.projection.as_ref())),
                        last_error_object: Some(doc! { "n": 1, "updatedExisting": true }),
                    })
                }
                None if op.upsert => {
                    let mut document = seed_from_filter(&op.filter);
                    apply_update(&mut document, &op.update, true);
                    let document = with_id(document);
                    let id = document.get("_id").cloned().unwrap_or(Bson::Null);
                    documents.push(document.clone());
                    Response::FindAndModify(FindAndModifyResult {
                        value: op
                            .return_new
                            .then(|| project(document, op.projection.as_ref())),
                        last_error_object: Some(doc! {
                            "n": 1,
                            "updatedExisting": false,
                            "upserted": id,
                        }),
                    })
                }
                None => Response::FindAndModify(FindAndModifyResult {
                    value: None,
                    last_error_object: Some(doc! { "n": 0, "updatedExisting": false }),
                }),
            }
        }
        Operation::CountDocuments(op) => Response::Count(
            documents
                .iter()
                .filter(|doc| matches(doc, &op.filter))
                .count() as u64,
        ),
        Operation::EstimatedDocumentCount(_) => Response::Count(documents.len() as u64),
    };

    Ok(res)
}

fn update(
    documents: &mut Vec<Document>,
    filter: &Document,
    update: &Document,
    upsert: bool,
    many: bool,
) -> Response {
    let mut matched_count = 0;
    let mut modified_count = 0;

    for document in documents.iter_mut() {
        if !matches(document, filter) {
            continue;
        }

        matched_count += 1;

        let before = document.clone();
        apply_update(document, update, false);
        if *document != before {
            modified_count += 1;
        }

        if !many {
            break;
        }
    }

    let mut upserted_id = None;

    if matched_count == 0 && upsert {
        let mut document = seed_from_filter(filter);
        apply_update(&mut document, update, true);
        let document = with_id(document);
        upserted_id = document.get("_id").cloned();
        documents.push(document);
    }

    Response::Updated(UpdateResult {
        matched_count,
        modified_count,
        upserted_id,
    })
}

/// Ensures the document has an `_id`, generating one first in field order.
fn with_id(document: Document) -> Document {
    if document.contains_key("_id") {
        return document;
    }

    let mut out = doc! { "_id": ObjectId::new() };
    out.extend(document);
    out
}

fn duplicate_key(id: &Bson) -> Error {
    Error::driver_operation_failed(std::io::Error::new(
        std::io::ErrorKind::AlreadyExists,
        format!("E11000 duplicate key error; _id={id}"),
    ))
}
