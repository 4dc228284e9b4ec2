//! InMemoryTransport - HashMap-backed fake backend for testing and development.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use serde_json::Value;

use super::{Query, Transport, TransportError};

#[derive(Default)]
struct Inner {
    collections: HashMap<String, Vec<Value>>,
    issued_ids: u64,
    fail_next: Option<TransportError>,
    requests: Vec<String>,
}

/// In-memory transport backed by a HashMap of collections.
///
/// Records are plain JSON objects keyed by their `id` field; `post` assigns
/// a fresh string id when the body has none. Collections are keyed by the
/// request path (e.g. `"/reviews"`). Clone-friendly via Arc, so a handle can
/// seed and inspect while a store issues requests through another.
#[derive(Clone, Default)]
pub struct InMemoryTransport {
    inner: Arc<Mutex<Inner>>,
}

impl InMemoryTransport {
    /// Create an empty transport.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the records behind a collection path.
    pub fn seed(&self, path: &str, records: Vec<Value>) {
        self.inner.lock().collections.insert(path.to_string(), records);
    }

    /// Fail the next request (any verb) with the given error, once.
    pub fn fail_next(&self, err: TransportError) {
        self.inner.lock().fail_next = Some(err);
    }

    /// Request lines seen so far, e.g. `"GET /reviews?rating=5"`.
    pub fn requests(&self) -> Vec<String> {
        self.inner.lock().requests.clone()
    }

    /// Current records behind a collection path.
    pub fn records(&self, path: &str) -> Vec<Value> {
        self.inner
            .lock()
            .collections
            .get(path)
            .cloned()
            .unwrap_or_default()
    }
}

fn request_line(verb: &str, path: &str, query: &Query) -> String {
    if query.is_empty() {
        return format!("{} {}", verb, path);
    }
    let encoded: Vec<String> = query
        .params()
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect();
    format!("{} {}?{}", verb, path, encoded.join("&"))
}

/// Render a record field the way it would appear in a query string.
fn field_as_param(record: &Value, key: &str) -> Option<String> {
    match record.get(key)? {
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

fn split_item_path(path: &str) -> Result<(&str, &str), TransportError> {
    match path.rsplit_once('/') {
        Some((collection, id)) if !collection.is_empty() && !id.is_empty() => {
            Ok((collection, id))
        }
        _ => Err(TransportError::unknown(format!(
            "malformed item path: {}",
            path
        ))),
    }
}

fn record_id(record: &Value) -> Option<String> {
    field_as_param(record, "id")
}

impl Transport for InMemoryTransport {
    async fn get(&self, path: &str, query: &Query) -> Result<Vec<Value>, TransportError> {
        let mut inner = self.inner.lock();
        inner.requests.push(request_line("GET", path, query));
        if let Some(err) = inner.fail_next.take() {
            return Err(err);
        }
        let records = inner.collections.get(path).cloned().unwrap_or_default();
        Ok(records
            .into_iter()
            .filter(|record| {
                query
                    .params()
                    .iter()
                    .all(|(key, expected)| field_as_param(record, key).as_deref() == Some(expected))
            })
            .collect())
    }

    async fn post(&self, path: &str, body: Value) -> Result<Value, TransportError> {
        let mut inner = self.inner.lock();
        inner.requests.push(request_line("POST", path, &Query::new()));
        if let Some(err) = inner.fail_next.take() {
            return Err(err);
        }

        let mut record = match body {
            Value::Object(map) => map,
            _ => {
                return Err(TransportError::validation(
                    "request body must be a JSON object",
                ))
            }
        };

        if record.get("id").map_or(true, Value::is_null) {
            inner.issued_ids += 1;
            record.insert("id".to_string(), Value::String(inner.issued_ids.to_string()));
        }

        let record = Value::Object(record);
        inner
            .collections
            .entry(path.to_string())
            .or_default()
            .push(record.clone());
        Ok(record)
    }

    async fn put(&self, path: &str, body: Value) -> Result<Value, TransportError> {
        let mut inner = self.inner.lock();
        inner.requests.push(request_line("PUT", path, &Query::new()));
        if let Some(err) = inner.fail_next.take() {
            return Err(err);
        }

        let (collection, id) = split_item_path(path)?;
        let mut record = match body {
            Value::Object(map) => map,
            _ => {
                return Err(TransportError::validation(
                    "request body must be a JSON object",
                ))
            }
        };
        record.insert("id".to_string(), Value::String(id.to_string()));
        let record = Value::Object(record);

        let records = inner
            .collections
            .entry(collection.to_string())
            .or_default();
        match records
            .iter_mut()
            .find(|existing| record_id(existing).as_deref() == Some(id))
        {
            Some(slot) => {
                *slot = record.clone();
                Ok(record)
            }
            None => Err(TransportError::not_found(path)),
        }
    }

    async fn del(&self, path: &str) -> Result<(), TransportError> {
        let mut inner = self.inner.lock();
        inner
            .requests
            .push(request_line("DELETE", path, &Query::new()));
        if let Some(err) = inner.fail_next.take() {
            return Err(err);
        }

        let (collection, id) = split_item_path(path)?;
        let records = inner
            .collections
            .entry(collection.to_string())
            .or_default();
        let before = records.len();
        records.retain(|record| record_id(record).as_deref() != Some(id));
        if records.len() == before {
            return Err(TransportError::not_found(path));
        }
        Ok(())
    }
}
