use std::sync::Arc;

use parking_lot::RwLock;
use serde::Serialize;
use serde_json::Value;

use super::patch::apply_patch;
use super::LoadState;
use crate::error::{ErrorKind, StoreError};
use crate::resource::{InsertPosition, Resource};
use crate::transport::{Query, Transport};

#[cfg(feature = "emitter")]
use crate::emitter::ChangeFeed;

struct Inner<R> {
    items: Vec<R>,
    in_flight: usize,
    error: Option<String>,
}

impl<R> Default for Inner<R> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            in_flight: 0,
            error: None,
        }
    }
}

/// Client-side cache of one server-owned resource collection.
///
/// Owns the cached items, a shared load flag, and an error slot; all CRUD
/// goes through the injected [`Transport`]. Updates are optimistic (local
/// merge before confirmation, rollback on failure); creates and removes are
/// confirmed-only, so the collection never holds a provisional item and a
/// failed delete never has to resurrect one.
///
/// Cache state is mutated synchronously before and after the transport
/// suspension point; locks are never held across an await. Clone-friendly
/// via Arc, so one handle can be moved into a spawned operation while
/// others read.
pub struct ResourceStore<R, T> {
    transport: Arc<T>,
    inner: Arc<RwLock<Inner<R>>>,
    #[cfg(feature = "emitter")]
    changes: ChangeFeed,
}

impl<R, T> Clone for ResourceStore<R, T> {
    fn clone(&self) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
            inner: Arc::clone(&self.inner),
            #[cfg(feature = "emitter")]
            changes: self.changes.clone(),
        }
    }
}

impl<R: Resource, T: Transport> ResourceStore<R, T> {
    /// Create an empty store over the given transport.
    pub fn new(transport: T) -> Self {
        Self {
            transport: Arc::new(transport),
            inner: Arc::new(RwLock::new(Inner::default())),
            #[cfg(feature = "emitter")]
            changes: ChangeFeed::new(),
        }
    }

    /// Snapshot of the cached collection.
    pub fn items(&self) -> Vec<R> {
        self.inner.read().items.clone()
    }

    /// The cached item with the given id, if any.
    pub fn get(&self, id: &str) -> Option<R> {
        self.inner
            .read()
            .items
            .iter()
            .find(|item| item.id() == id)
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.inner.read().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().items.is_empty()
    }

    /// Ambient status aggregated over in-flight operations.
    pub fn load_state(&self) -> LoadState {
        let inner = self.inner.read();
        if inner.in_flight > 0 {
            LoadState::Loading
        } else if inner.error.is_some() {
            LoadState::Error
        } else {
            LoadState::Idle
        }
    }

    /// Last recorded failure message, for ambient UI display.
    pub fn error(&self) -> Option<String> {
        self.inner.read().error.clone()
    }

    /// Change notifications for confirmed mutations.
    #[cfg(feature = "emitter")]
    pub fn changes(&self) -> &ChangeFeed {
        &self.changes
    }

    /// Refresh the whole collection from the server.
    ///
    /// On success the cached collection is replaced wholesale, so item
    /// snapshots held by view code go stale. A failed refresh must not
    /// interrupt already rendered UI: the collection is left untouched and
    /// the failure only lands in the error slot and the log.
    pub async fn fetch_all(&self, filter: Query) {
        self.begin();
        match self.transport.get(R::ENDPOINT, &filter).await {
            Ok(values) => match decode_items::<R>(values) {
                Ok(items) => {
                    let count = items.len();
                    self.finish(None, |cached| *cached = items);
                    tracing::debug!("{}: replaced collection, {} items", R::ENDPOINT, count);
                    self.notify("fetched", count.to_string());
                }
                Err(err) => {
                    self.finish(Some(&err), |_| {});
                    tracing::warn!("{}: fetch returned malformed items: {}", R::ENDPOINT, err);
                }
            },
            Err(err) => {
                let err = StoreError::from(err);
                self.finish(Some(&err), |_| {});
                tracing::warn!("{}: fetch failed: {}", R::ENDPOINT, err);
            }
        }
    }

    /// Create a record and cache the server-confirmed item.
    ///
    /// The collection never holds a provisional item: insertion happens
    /// only after confirmation, at the position [`Resource::INSERT`] names.
    /// On failure the collection is untouched and the error is both
    /// recorded and returned, so the call site can keep its form open.
    pub async fn create<P: Serialize>(&self, payload: &P) -> Result<R, StoreError> {
        self.begin();
        let body = match serde_json::to_value(payload) {
            Ok(body) => body,
            Err(err) => {
                let err = StoreError::Unknown(format!("payload failed to encode: {}", err));
                self.finish(Some(&err), |_| {});
                return Err(err);
            }
        };

        match self.transport.post(R::ENDPOINT, body).await {
            Ok(raw) => match decode_item::<R>(raw) {
                Ok(item) => {
                    let confirmed = item.clone();
                    self.finish(None, |items| insert_unique(items, confirmed));
                    self.notify("created", item.id());
                    Ok(item)
                }
                Err(err) => {
                    self.finish(Some(&err), |_| {});
                    Err(err)
                }
            },
            Err(err) => {
                let err = StoreError::from(err);
                self.finish(Some(&err), |_| {});
                Err(err)
            }
        }
    }

    /// Patch a cached item, optimistically.
    ///
    /// The patch (a JSON object of fields) is merged over the cached item
    /// before the request leaves, so the UI shows the new value
    /// immediately. The server response is authoritative and replaces the
    /// optimistic value on success; on failure the pre-patch item is
    /// restored and the error is both recorded and returned. Patching an
    /// id that is not cached is a NotFound error and issues no request.
    pub async fn update<P: Serialize>(&self, id: &str, patch: &P) -> Result<R, StoreError> {
        self.begin();
        let patch_value = match serde_json::to_value(patch) {
            Ok(value) => value,
            Err(err) => {
                let err = StoreError::Unknown(format!("patch failed to encode: {}", err));
                self.finish(Some(&err), |_| {});
                return Err(err);
            }
        };

        // Stage the optimistic merge, keeping the pre-patch value for rollback.
        let staged = {
            let mut inner = self.inner.write();
            match inner.items.iter().position(|item| item.id() == id) {
                None => Err(StoreError::NotFound(format!("{}/{}", R::ENDPOINT, id))),
                Some(pos) => {
                    let previous = inner.items[pos].clone();
                    match apply_patch(&previous, &patch_value) {
                        Ok((optimistic, body)) => {
                            inner.items[pos] = optimistic;
                            Ok((previous, body))
                        }
                        Err(err) => Err(err),
                    }
                }
            }
        };
        let (previous, body) = match staged {
            Ok(staged) => staged,
            Err(err) => {
                self.finish(Some(&err), |_| {});
                return Err(err);
            }
        };

        match self.transport.put(&Self::item_path(id), body).await {
            Ok(raw) => match decode_item::<R>(raw) {
                Ok(item) => {
                    let confirmed = item.clone();
                    self.finish(None, |items| replace_existing(items, confirmed));
                    self.notify("updated", item.id());
                    Ok(item)
                }
                Err(err) => {
                    self.finish(Some(&err), |items| replace_existing(items, previous));
                    Err(err)
                }
            },
            Err(err) => {
                let err = StoreError::from(err);
                self.finish(Some(&err), |items| replace_existing(items, previous));
                Err(err)
            }
        }
    }

    /// Delete a record, dropping the cached item after confirmation.
    ///
    /// No optimistic delete: an erroneous one would have to resurrect a
    /// full record and could lose local edits. A NotFound failure means the
    /// record is already gone server-side and is treated as success.
    pub async fn remove(&self, id: &str) -> Result<(), StoreError> {
        self.begin();
        match self.transport.del(&Self::item_path(id)).await {
            Ok(()) => {
                self.finish(None, |items| items.retain(|item| item.id() != id));
                self.notify("removed", id);
                Ok(())
            }
            Err(err) if err.kind() == ErrorKind::NotFound => {
                self.finish(None, |items| items.retain(|item| item.id() != id));
                self.notify("removed", id);
                Ok(())
            }
            Err(err) => {
                let err = StoreError::from(err);
                self.finish(Some(&err), |_| {});
                Err(err)
            }
        }
    }

    fn item_path(id: &str) -> String {
        format!("{}/{}", R::ENDPOINT, id)
    }

    /// Mark an operation as started: loading, error slot cleared.
    fn begin(&self) {
        let mut inner = self.inner.write();
        inner.in_flight += 1;
        inner.error = None;
    }

    /// Settle an operation in one state transition: apply the collection
    /// mutation, decrement the in-flight count, record any failure.
    fn finish(&self, error: Option<&StoreError>, mutate: impl FnOnce(&mut Vec<R>)) {
        let mut inner = self.inner.write();
        mutate(&mut inner.items);
        inner.in_flight -= 1;
        if let Some(err) = error {
            inner.error = Some(err.to_string());
        }
    }

    #[cfg(feature = "emitter")]
    fn notify(&self, kind: &str, payload: impl Into<String>) {
        let topic = format!("{}:{}", R::ENDPOINT.trim_start_matches('/'), kind);
        self.changes.emit(&topic, payload);
    }

    #[cfg(not(feature = "emitter"))]
    fn notify(&self, _kind: &str, _payload: impl Into<String>) {}
}

/// Replace the item sharing `item`'s id, keeping ids unique; insert per the
/// resource's policy when the id is new.
fn insert_unique<R: Resource>(items: &mut Vec<R>, item: R) {
    if let Some(pos) = items.iter().position(|existing| existing.id() == item.id()) {
        items[pos] = item;
        return;
    }
    match R::INSERT {
        InsertPosition::Prepend => items.insert(0, item),
        InsertPosition::Append => items.push(item),
    }
}

/// Replace the cached item sharing `value`'s id in place. A wholesale
/// refetch may have dropped the id mid-flight; the refetched collection is
/// authoritative then and the value is discarded.
fn replace_existing<R: Resource>(items: &mut [R], value: R) {
    if let Some(pos) = items.iter().position(|item| item.id() == value.id()) {
        items[pos] = value;
    }
}

fn decode_item<R: Resource>(value: Value) -> Result<R, StoreError> {
    serde_json::from_value(value)
        .map_err(|err| StoreError::Unknown(format!("unexpected response shape: {}", err)))
}

fn decode_items<R: Resource>(values: Vec<Value>) -> Result<Vec<R>, StoreError> {
    values.into_iter().map(decode_item).collect()
}
