use std::{any::Any, fmt, sync::Arc};

/// An opaque transaction context.
///
/// The connector never inspects it; write operations hand it to the
/// connection, which downcasts it to its own session type.
#[derive(Clone)]
pub struct Transaction {
    inner: Arc<dyn Any + Send + Sync>,
}

impl Transaction {
    pub fn new<T: Any + Send + Sync>(session: T) -> Self {
        Self {
            inner: Arc::new(session),
        }
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.inner.downcast_ref()
    }
}

impl fmt::Debug for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transaction").finish_non_exhaustive()
    }
}
