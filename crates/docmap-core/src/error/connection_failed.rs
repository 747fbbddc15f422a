use super::Error;

/// Error when establishing a connection to the database fails.
///
/// Transport and authentication failures during connect land here. They are
/// never retried automatically; the caller re-invokes the operation.
#[derive(Debug)]
pub(super) struct ConnectionFailed {
    inner: Box<dyn std::error::Error + Send + Sync>,
}

impl std::error::Error for ConnectionFailed {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(self.inner.as_ref())
    }
}

impl core::fmt::Display for ConnectionFailed {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "connection failed: {}", self.inner)
    }
}

impl Error {
    /// Creates a connection failure from the driver's error.
    pub fn connection_failed(err: impl std::error::Error + Send + Sync + 'static) -> Error {
        Error::from(super::ErrorKind::ConnectionFailed(ConnectionFailed {
            inner: Box::new(err),
        }))
    }

    /// Returns `true` if this error is a connection failure.
    pub fn is_connection_failed(&self) -> bool {
        self.any_kind(|kind| matches!(kind, super::ErrorKind::ConnectionFailed(_)))
    }
}
