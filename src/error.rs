use std::fmt;

use crate::transport::TransportError;

/// Failure classification shared by the store and the transport layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Transport unreachable (connection refused, timeout, DNS).
    Network,
    /// The server rejected the request (4xx with a message for the user).
    Validation,
    /// The record no longer exists server-side.
    NotFound,
    /// Catch-all for unexpected transport shapes.
    Unknown,
}

/// Error type for store operations.
///
/// Every variant carries a human-readable message; validation messages come
/// from the server verbatim so the UI can show them inline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    Network(String),
    Validation(String),
    NotFound(String),
    Unknown(String),
}

impl StoreError {
    /// The failure class, for call sites that branch on it.
    pub fn kind(&self) -> ErrorKind {
        match self {
            StoreError::Network(_) => ErrorKind::Network,
            StoreError::Validation(_) => ErrorKind::Validation,
            StoreError::NotFound(_) => ErrorKind::NotFound,
            StoreError::Unknown(_) => ErrorKind::Unknown,
        }
    }
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Network(msg) => write!(f, "network failure: {}", msg),
            StoreError::Validation(msg) => write!(f, "{}", msg),
            StoreError::NotFound(subject) => write!(f, "not found: {}", subject),
            StoreError::Unknown(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<TransportError> for StoreError {
    fn from(err: TransportError) -> Self {
        match err.kind() {
            ErrorKind::Network => StoreError::Network(err.into_message()),
            ErrorKind::Validation => StoreError::Validation(err.into_message()),
            ErrorKind::NotFound => StoreError::NotFound(err.into_message()),
            ErrorKind::Unknown => StoreError::Unknown(err.into_message()),
        }
    }
}
