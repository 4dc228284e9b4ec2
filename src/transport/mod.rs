//! Transport - the injected HTTP-shaped collaborator the store calls.
//!
//! The store is a pure in-process state machine layered over whatever
//! transport is plugged in; this module defines the contract and an
//! in-memory reference implementation. The production HTTP client (base
//! URL, credentials, auth redirects) lives outside this crate.

mod in_memory;

use std::fmt;
use std::future::Future;

use serde_json::Value;

use crate::error::ErrorKind;

pub use in_memory::InMemoryTransport;

/// Error type for transport operations.
///
/// Carries a human-readable message and, when the server supplied one, a
/// status classification the store maps into its own taxonomy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportError {
    kind: ErrorKind,
    message: String,
}

impl TransportError {
    /// Transport unreachable.
    pub fn network(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Network,
            message: message.into(),
        }
    }

    /// The server rejected the request; the message is user-facing.
    pub fn validation(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Validation,
            message: message.into(),
        }
    }

    /// The addressed record does not exist server-side.
    pub fn not_found(subject: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::NotFound,
            message: subject.into(),
        }
    }

    /// Anything the other classifications do not cover.
    pub fn unknown(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Unknown,
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub(crate) fn into_message(self) -> String {
        self.message
    }
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for TransportError {}

/// Filter encoding for read requests.
///
/// Ordered key-value pairs; absent (`None`) and empty values are omitted at
/// insertion time, so a query built from optional form fields only carries
/// the fields the user actually filled in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    params: Vec<(String, String)>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a parameter. Empty values are dropped.
    pub fn with(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        let value = value.to_string();
        if !value.is_empty() {
            self.params.push((key.into(), value));
        }
        self
    }

    /// Add a parameter only when a value is present (and non-empty).
    pub fn with_opt(self, key: impl Into<String>, value: Option<impl ToString>) -> Self {
        match value {
            Some(value) => self.with(key, value),
            None => self,
        }
    }

    pub fn params(&self) -> &[(String, String)] {
        &self.params
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }
}

/// Abstract request surface consumed by the store.
///
/// Implementations must be thread-safe; methods return futures so the store
/// can suspend at the request boundary. All bodies and results are parsed
/// JSON values; the store decodes them into typed resources.
pub trait Transport: Send + Sync {
    /// Read a collection, optionally filtered.
    fn get(
        &self,
        path: &str,
        query: &Query,
    ) -> impl Future<Output = Result<Vec<Value>, TransportError>> + Send;

    /// Create a record; returns the server-confirmed item.
    fn post(
        &self,
        path: &str,
        body: Value,
    ) -> impl Future<Output = Result<Value, TransportError>> + Send;

    /// Replace a record; returns the server-confirmed item.
    fn put(
        &self,
        path: &str,
        body: Value,
    ) -> impl Future<Output = Result<Value, TransportError>> + Send;

    /// Delete a record.
    fn del(&self, path: &str) -> impl Future<Output = Result<(), TransportError>> + Send;
}
