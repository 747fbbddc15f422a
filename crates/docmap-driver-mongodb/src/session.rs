use docmap_core::{driver::Transaction, err, Result};

use mongodb::ClientSession;
use tokio::sync::{Mutex, MutexGuard};

/// A MongoDB client session carried inside a [`Transaction`].
#[derive(Debug)]
pub struct Session {
    inner: Mutex<ClientSession>,
}

impl Session {
    pub fn new(session: ClientSession) -> Self {
        Self {
            inner: Mutex::new(session),
        }
    }

    pub(crate) fn from_transaction(transaction: &Transaction) -> Result<&Session> {
        transaction
            .downcast_ref::<Session>()
            .ok_or_else(|| err!("transaction was not started by the MongoDB driver"))
    }

    pub(crate) async fn lock(&self) -> MutexGuard<'_, ClientSession> {
        self.inner.lock().await
    }
}
