//! Recording host doubles shared by the unit tests

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{json, Value};
use std::collections::HashMap;

use super::{DebugSession, WatchView};
use crate::error::{ViewerError, ViewerResult};
use crate::watch::WatchSnapshot;

/// Session that records every request and answers from a canned table
pub struct RecordingSession {
    id: String,
    responses: Mutex<HashMap<String, Value>>,
    failing: Mutex<Vec<String>>,
    requests: Mutex<Vec<(String, Value)>>,
}

impl RecordingSession {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            responses: Mutex::new(HashMap::new()),
            failing: Mutex::new(Vec::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn respond(&self, command: &str, body: Value) {
        self.responses.lock().insert(command.to_string(), body);
    }

    pub fn fail(&self, command: &str) {
        self.failing.lock().push(command.to_string());
    }

    pub fn requests(&self) -> Vec<(String, Value)> {
        self.requests.lock().clone()
    }

    pub fn requests_for(&self, command: &str) -> Vec<Value> {
        self.requests
            .lock()
            .iter()
            .filter(|(c, _)| c == command)
            .map(|(_, args)| args.clone())
            .collect()
    }
}

#[async_trait]
impl DebugSession for RecordingSession {
    fn id(&self) -> &str {
        &self.id
    }

    async fn custom_request(&self, command: &str, arguments: Value) -> ViewerResult<Value> {
        self.requests.lock().push((command.to_string(), arguments));
        if self.failing.lock().iter().any(|c| c == command) {
            return Err(ViewerError::host(command, "adapter refused request"));
        }
        Ok(self
            .responses
            .lock()
            .get(command)
            .cloned()
            .unwrap_or_else(|| json!({})))
    }
}

/// View that keeps every snapshot it was given
#[derive(Default)]
pub struct RecordingView {
    snapshots: Mutex<Vec<WatchSnapshot>>,
}

impl RecordingView {
    pub fn snapshots(&self) -> Vec<WatchSnapshot> {
        self.snapshots.lock().clone()
    }

    pub fn refresh_count(&self) -> usize {
        self.snapshots.lock().len()
    }
}

impl WatchView for RecordingView {
    fn refresh(&self, snapshot: WatchSnapshot) {
        self.snapshots.lock().push(snapshot);
    }
}
