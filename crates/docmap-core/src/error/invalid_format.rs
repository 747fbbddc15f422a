use super::Error;

/// Error when a value cannot be coerced to its declared storage type.
///
/// This occurs when:
/// - A property stored as an `ObjectID` receives a string that is not 24 hex characters
/// - A property stored as `Decimal128` receives a string that is not numeric
/// - An identifier cannot be converted to the id property's declared type
#[derive(Debug)]
pub(super) struct InvalidFormat {
    message: Box<str>,
}

impl std::error::Error for InvalidFormat {}

impl core::fmt::Display for InvalidFormat {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "invalid format: {}", self.message)
    }
}

impl Error {
    /// Creates an invalid format error.
    pub fn invalid_format(message: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::InvalidFormat(InvalidFormat {
            message: message.into().into(),
        }))
    }

    /// Returns `true` if this error is an invalid format error.
    pub fn is_invalid_format(&self) -> bool {
        self.any_kind(|kind| matches!(kind, super::ErrorKind::InvalidFormat(_)))
    }
}
