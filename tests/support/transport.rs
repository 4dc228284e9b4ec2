use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use serde_json::Value;
use tokio::sync::Notify;

use optistore::{Query, Transport, TransportError};

#[derive(Default)]
struct Script {
    get: VecDeque<Result<Vec<Value>, TransportError>>,
    post: VecDeque<Result<Value, TransportError>>,
    put: VecDeque<Result<Value, TransportError>>,
    del: VecDeque<Result<(), TransportError>>,
    calls: Vec<String>,
}

struct Gate {
    entered: Arc<Notify>,
    release: Arc<Notify>,
}

/// Transport that replays canned per-verb responses, records request
/// lines, and can hold the next request in flight until released, which is
/// the hook the optimistic-visibility and load-state tests hang on.
#[derive(Clone, Default)]
pub struct ScriptedTransport {
    script: Arc<Mutex<Script>>,
    hold: Arc<Mutex<Option<Gate>>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_get(&self, response: Result<Vec<Value>, TransportError>) {
        self.script.lock().unwrap().get.push_back(response);
    }

    pub fn push_post(&self, response: Result<Value, TransportError>) {
        self.script.lock().unwrap().post.push_back(response);
    }

    pub fn push_put(&self, response: Result<Value, TransportError>) {
        self.script.lock().unwrap().put.push_back(response);
    }

    pub fn push_del(&self, response: Result<(), TransportError>) {
        self.script.lock().unwrap().del.push_back(response);
    }

    /// Request lines seen so far, e.g. `"PUT /reviews/1"`.
    pub fn calls(&self) -> Vec<String> {
        self.script.lock().unwrap().calls.clone()
    }

    /// Hold the next request (any verb) in flight. The first notify fires
    /// once the request has entered the transport; the request resolves
    /// only after the second is notified.
    pub fn hold_next(&self) -> (Arc<Notify>, Arc<Notify>) {
        let entered = Arc::new(Notify::new());
        let release = Arc::new(Notify::new());
        *self.hold.lock().unwrap() = Some(Gate {
            entered: Arc::clone(&entered),
            release: Arc::clone(&release),
        });
        (entered, release)
    }

    fn record(&self, verb: &str, path: &str, query: &Query) {
        let line = if query.is_empty() {
            format!("{} {}", verb, path)
        } else {
            let encoded: Vec<String> = query
                .params()
                .iter()
                .map(|(k, v)| format!("{}={}", k, v))
                .collect();
            format!("{} {}?{}", verb, path, encoded.join("&"))
        };
        self.script.lock().unwrap().calls.push(line);
    }

    async fn wait_if_held(&self) {
        let gate = self.hold.lock().unwrap().take();
        if let Some(gate) = gate {
            gate.entered.notify_one();
            gate.release.notified().await;
        }
    }
}

impl Transport for ScriptedTransport {
    async fn get(&self, path: &str, query: &Query) -> Result<Vec<Value>, TransportError> {
        self.record("GET", path, query);
        self.wait_if_held().await;
        self.script
            .lock()
            .unwrap()
            .get
            .pop_front()
            .expect("no scripted GET response")
    }

    async fn post(&self, path: &str, _body: Value) -> Result<Value, TransportError> {
        self.record("POST", path, &Query::new());
        self.wait_if_held().await;
        self.script
            .lock()
            .unwrap()
            .post
            .pop_front()
            .expect("no scripted POST response")
    }

    async fn put(&self, path: &str, _body: Value) -> Result<Value, TransportError> {
        self.record("PUT", path, &Query::new());
        self.wait_if_held().await;
        self.script
            .lock()
            .unwrap()
            .put
            .pop_front()
            .expect("no scripted PUT response")
    }

    async fn del(&self, path: &str) -> Result<(), TransportError> {
        self.record("DELETE", path, &Query::new());
        self.wait_if_held().await;
        self.script
            .lock()
            .unwrap()
            .del
            .pop_front()
            .expect("no scripted DELETE response")
    }
}
