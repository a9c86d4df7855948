//! Transcript Replay
//!
//! Feeds a recorded DAP conversation through a tracker, outside any editor.
//! One JSON object per line:
//!
//! ```text
//! {"direction":"toAdapter","message":{"seq":3,"type":"request","command":"scopes","arguments":{"frameId":1}}}
//! {"direction":"fromAdapter","delayMs":20,"message":{"seq":4,"type":"response","request_seq":3,...}}
//! ```
//!
//! Requests the tracker issues itself are answered with the latest response
//! body the adapter gave for the same command in the transcript.

use async_trait::async_trait;
use log::{info, warn};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use crate::adapter::Interception;
use crate::dap::ProtocolMessage;
use crate::error::{ViewerError, ViewerResult};
use crate::extension::Extension;
use crate::host::{DebugSession, WatchView};
use crate::session::SessionInfo;
use crate::watch::WatchSnapshot;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Direction {
    /// Client to adapter
    ToAdapter,
    /// Adapter to client
    FromAdapter,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranscriptEntry {
    pub direction: Direction,
    #[serde(default)]
    pub delay_ms: u64,
    pub message: Value,
}

/// Parse a JSON-lines transcript. Blank lines and `#` comments are skipped.
pub fn parse_transcript(content: &str) -> ViewerResult<Vec<TranscriptEntry>> {
    content
        .lines()
        .enumerate()
        .filter(|(_, line)| {
            let line = line.trim();
            !line.is_empty() && !line.starts_with('#')
        })
        .map(|(index, line)| {
            serde_json::from_str(line).map_err(|e| {
                ViewerError::DeserializationError(format!("line {}: {}", index + 1, e))
            })
        })
        .collect()
}

/// Session answering from the transcript's own responses
pub struct ReplaySession {
    id: String,
    bodies: Mutex<HashMap<String, Value>>,
    issued: Mutex<Vec<String>>,
}

impl ReplaySession {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            bodies: Mutex::new(HashMap::new()),
            issued: Mutex::new(Vec::new()),
        }
    }

    /// Remember the body of a successful response
    pub fn record(&self, message: &Value) {
        if let Ok(ProtocolMessage::Response(response)) = ProtocolMessage::from_value(message) {
            if let (true, Some(body)) = (response.success, response.body) {
                self.bodies.lock().insert(response.command, body);
            }
        }
    }

    /// Commands the tracker sent on its own
    pub fn issued(&self) -> Vec<String> {
        self.issued.lock().clone()
    }
}

#[async_trait]
impl DebugSession for ReplaySession {
    fn id(&self) -> &str {
        &self.id
    }

    async fn custom_request(&self, command: &str, arguments: Value) -> ViewerResult<Value> {
        info!("-> {} {}", command, arguments);
        self.issued.lock().push(command.to_string());
        Ok(self
            .bodies
            .lock()
            .get(command)
            .cloned()
            .unwrap_or_else(|| json!({})))
    }
}

/// Watch view that logs what it would show
#[derive(Debug, Default)]
pub struct LoggingWatchView;

impl WatchView for LoggingWatchView {
    fn refresh(&self, snapshot: WatchSnapshot) {
        let names: Vec<&str> = snapshot.objects.iter().map(|o| o.name.as_str()).collect();
        info!("watch tree: objects={:?} tracked={:?}", names, snapshot.tracked);
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplayReport {
    pub messages: usize,
    pub intercepted: usize,
    pub errors: usize,
    pub issued_requests: Vec<String>,
    pub session: SessionInfo,
}

/// Replay every entry, then flush pending debounced work and report the
/// session state before tearing it down.
pub async fn replay(
    extension: &Extension,
    session_id: &str,
    entries: Vec<TranscriptEntry>,
) -> ViewerResult<ReplayReport> {
    let session = Arc::new(ReplaySession::new(session_id));
    let tracker = extension.create_debug_adapter_tracker(session.clone());
    tracker.on_will_start_session();

    let mut intercepted = 0;
    let mut errors = 0;
    let messages = entries.len();

    for entry in entries {
        if entry.delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(entry.delay_ms)).await;
        }
        match entry.direction {
            Direction::ToAdapter => {
                if tracker.on_will_receive_message(&entry.message) != Interception::Passthrough {
                    intercepted += 1;
                }
            }
            Direction::FromAdapter => {
                let mut message = entry.message;
                session.record(&message);
                if let Err(e) = tracker.on_did_send_message(&mut message).await {
                    warn!("Handling {} failed: {}", message, e);
                    errors += 1;
                }
            }
        }
    }

    tracker.flush().await;
    let report = ReplayReport {
        messages,
        intercepted,
        errors,
        issued_requests: session.issued(),
        session: tracker.session_data().info(),
    };
    tracker.on_exit(None, None);
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::export::ScratchDir;

    const TRANSCRIPT: &str = r#"
# breakpoint in main()
{"direction":"fromAdapter","message":{"seq":1,"type":"event","event":"stopped","body":{"reason":"breakpoint","threadId":1}}}
{"direction":"toAdapter","message":{"seq":2,"type":"request","command":"stackTrace","arguments":{"threadId":1}}}
{"direction":"fromAdapter","message":{"seq":3,"type":"response","request_seq":2,"command":"stackTrace","success":true,"body":{"stackFrames":[{"id":5,"name":"main"}]}}}
{"direction":"toAdapter","message":{"seq":4,"type":"request","command":"scopes","arguments":{"frameId":5}}}
{"direction":"fromAdapter","message":{"seq":5,"type":"response","request_seq":4,"command":"scopes","success":true,"body":{"scopes":[{"name":"Locals","variablesReference":9}]}}}
{"direction":"toAdapter","message":{"seq":6,"type":"request","command":"variables","arguments":{"variablesReference":9}}}
{"direction":"fromAdapter","delayMs":10,"message":{"seq":7,"type":"response","request_seq":6,"command":"variables","success":true,"body":{"variables":[{"name":"img","type":"ndarray","value":"array(...)","evaluateName":"img","variablesReference":12}]}}}
"#;

    #[test]
    fn test_parse_transcript() {
        let entries = parse_transcript(TRANSCRIPT).unwrap();
        assert_eq!(entries.len(), 7);
        assert_eq!(entries[0].direction, Direction::FromAdapter);
        assert_eq!(entries[6].delay_ms, 10);

        let err = parse_transcript("{\"direction\":\"sideways\",\"message\":{}}").unwrap_err();
        assert!(err.to_string().contains("line 1"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_replay_reports_session_state() {
        let dir = tempfile::tempdir().unwrap();
        let scratch = ScratchDir::at(dir.path().join("svifpod")).unwrap();
        let extension = Extension::with_scratch(Config::default(), Arc::new(LoggingWatchView), scratch);

        let report = replay(&extension, "replay", parse_transcript(TRANSCRIPT).unwrap())
            .await
            .unwrap();

        assert_eq!(report.messages, 7);
        // scopes and variables requests; stackTrace is not on the allow-list
        assert_eq!(report.intercepted, 2);
        assert_eq!(report.errors, 0);
        assert_eq!(report.session.current_frame_id, Some(5));
        assert_eq!(report.session.objects, 1);
        assert!(report.issued_requests.iter().all(|c| c == "evaluate"));
        assert!(!extension.sessions().session_exists("replay"));
    }
}
