//! Debug Sessions Holder
//!
//! Per-session data keyed by the host's session id. Entries are created on
//! first use and removed when the session stops or exits.

use dashmap::DashMap;
use log::{debug, info};
use std::sync::Arc;

use super::state::{DebugSessionData, SessionInfo};

#[derive(Debug, Default, Clone)]
pub struct DebugSessionsHolder {
    sessions: Arc<DashMap<String, Arc<DebugSessionData>>>,
}

impl DebugSessionsHolder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Data for a session, created if this is the first lookup
    pub fn active_debug_session_data(&self, session_id: &str) -> Arc<DebugSessionData> {
        if let Some(data) = self.sessions.get(session_id) {
            return Arc::clone(data.value());
        }

        let data = self
            .sessions
            .entry(session_id.to_string())
            .or_insert_with(|| {
                info!("Tracking debug session {}", session_id);
                Arc::new(DebugSessionData::new(session_id))
            });
        Arc::clone(data.value())
    }

    pub fn get(&self, session_id: &str) -> Option<Arc<DebugSessionData>> {
        self.sessions.get(session_id).map(|d| Arc::clone(d.value()))
    }

    /// Forget a session. Returns false if it was not tracked.
    pub fn remove(&self, session_id: &str) -> bool {
        let removed = self.sessions.remove(session_id).is_some();
        if removed {
            debug!("Dropped debug session {}", session_id);
        }
        removed
    }

    pub fn session_exists(&self, session_id: &str) -> bool {
        self.sessions.contains_key(session_id)
    }

    pub fn list_sessions(&self) -> Vec<SessionInfo> {
        self.sessions.iter().map(|s| s.value().info()).collect()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
