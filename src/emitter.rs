//! ChangeFeed - post-confirmation change notifications.
//!
//! Stores broadcast `"<collection>:<kind>"` events (`reviews:created`,
//! `cart-items:removed`, ...) after each confirmed mutation so the owning
//! UI context can re-run its view derivers and re-render. Payloads are the
//! changed item's id, or the item count for `:fetched`.

use std::sync::Arc;

use event_emitter_rs::EventEmitter;
use parking_lot::Mutex;

/// Broadcast of confirmed store changes.
///
/// Wraps an `EventEmitter` behind a shared lock so a store and any number
/// of listening contexts can hold clones. Listener dispatch is
/// asynchronous (the emitter runs callbacks on its own thread).
#[derive(Clone)]
pub struct ChangeFeed {
    emitter: Arc<Mutex<EventEmitter>>,
}

impl Default for ChangeFeed {
    fn default() -> Self {
        Self::new()
    }
}

impl ChangeFeed {
    pub fn new() -> Self {
        Self {
            emitter: Arc::new(Mutex::new(EventEmitter::new())),
        }
    }

    /// Register a listener for an event such as `"reviews:created"`.
    pub fn on<F>(&self, event: &str, listener: F)
    where
        F: Fn(String) + Send + Sync + 'static,
    {
        self.emitter.lock().on(event, listener);
    }

    /// Emit an event to all listeners registered for it.
    pub fn emit(&self, event: &str, payload: impl Into<String>) {
        self.emitter.lock().emit(event, payload.into());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::thread;
    use std::time::Duration;

    #[test]
    fn emit_reaches_listener() {
        let feed = ChangeFeed::new();

        let called = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&called);
        feed.on("reviews:created", move |id| {
            assert_eq!(id, "7");
            flag.store(true, Ordering::SeqCst);
        });

        feed.emit("reviews:created", "7");

        // EventEmitter is async, give it time
        thread::sleep(Duration::from_millis(50));
        assert!(called.load(Ordering::SeqCst));
    }

    #[test]
    fn clones_share_listeners() {
        let feed = ChangeFeed::new();
        let observer = feed.clone();

        let called = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&called);
        observer.on("carts:removed", move |_| {
            flag.store(true, Ordering::SeqCst);
        });

        feed.emit("carts:removed", "3");

        thread::sleep(Duration::from_millis(50));
        assert!(called.load(Ordering::SeqCst));
    }
}
