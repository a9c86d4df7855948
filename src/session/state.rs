//! Session State
//!
//! Everything this crate remembers about one debug session.

use chrono::{DateTime, Utc};
use parking_lot::{Mutex, MutexGuard};
use serde::{Deserialize, Serialize};

use super::variables::DebugVariablesTracker;
use crate::watch::{CurrentPythonObjectsList, TrackedPythonObjects, WatchSnapshot};

/// Execution status of the debuggee as seen through DAP events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    /// Running, or not yet stopped since the session started
    #[default]
    Running,
    /// Stopped at a breakpoint or after a step
    Paused,
    /// Stop or exit was observed
    Terminated,
}

impl std::fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Running => write!(f, "running"),
            Self::Paused => write!(f, "paused"),
            Self::Terminated => write!(f, "terminated"),
        }
    }
}

/// Mutable part of the session data, guarded by one lock
#[derive(Debug, Default)]
pub struct SessionState {
    pub status: SessionStatus,
    pub debug_variables_tracker: DebugVariablesTracker,
    pub current_python_objects_list: CurrentPythonObjectsList,
    pub tracked_python_objects: TrackedPythonObjects,
}

impl SessionState {
    /// Rebuild the objects list and describe it for the watch view
    pub fn update_objects(&mut self) -> WatchSnapshot {
        let tracked = self.tracked_python_objects.expressions();
        self.current_python_objects_list
            .update(&self.debug_variables_tracker, &tracked);
        self.snapshot()
    }

    pub fn snapshot(&self) -> WatchSnapshot {
        WatchSnapshot {
            objects: self.current_python_objects_list.objects().to_vec(),
            tracked: self.tracked_python_objects.expressions(),
        }
    }

    /// Drop everything gathered during the session
    pub fn reset(&mut self) {
        self.current_python_objects_list.clear();
        self.tracked_python_objects.clear();
        self.debug_variables_tracker.clear();
        self.status = SessionStatus::Terminated;
    }
}

/// Per-session data, shared between the tracker callbacks and debounced tasks
#[derive(Debug)]
pub struct DebugSessionData {
    pub session_id: String,
    pub created_at: DateTime<Utc>,
    last_activity: Mutex<DateTime<Utc>>,
    state: Mutex<SessionState>,
}

impl DebugSessionData {
    pub fn new(session_id: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            session_id: session_id.into(),
            created_at: now,
            last_activity: Mutex::new(now),
            state: Mutex::new(SessionState::default()),
        }
    }

    /// Lock the state and mark the session active
    pub fn state(&self) -> MutexGuard<'_, SessionState> {
        *self.last_activity.lock() = Utc::now();
        self.state.lock()
    }

    pub fn last_activity(&self) -> DateTime<Utc> {
        *self.last_activity.lock()
    }

    pub fn info(&self) -> SessionInfo {
        let state = self.state.lock();
        SessionInfo {
            id: self.session_id.clone(),
            status: state.status,
            current_frame_id: state.debug_variables_tracker.current_frame_id(),
            objects: state.current_python_objects_list.objects().len(),
            tracked: state.tracked_python_objects.expressions(),
            created_at: self.created_at.to_rfc3339(),
            last_activity: self.last_activity().to_rfc3339(),
        }
    }
}

/// Serializable summary of a session
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionInfo {
    pub id: String,
    pub status: SessionStatus,
    pub current_frame_id: Option<i64>,
    pub objects: usize,
    pub tracked: Vec<String>,
    pub created_at: String,
    pub last_activity: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::ScratchDir;

    #[test]
    fn test_reset_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let scratch = ScratchDir::at(dir.path().join("s")).unwrap();
        let data = DebugSessionData::new("s1");
        {
            let mut state = data.state();
            state.tracked_python_objects.track("img", &scratch);
            state.debug_variables_tracker.set_frame_id(Some(5));
            state.status = SessionStatus::Paused;
        }

        data.state().reset();
        data.state().reset();

        let info = data.info();
        assert_eq!(info.status, SessionStatus::Terminated);
        assert!(info.tracked.is_empty());
        assert_eq!(info.current_frame_id, None);
        assert_eq!(info.objects, 0);
    }

    #[test]
    fn test_status_display() {
        assert_eq!(SessionStatus::Paused.to_string(), "paused");
        assert_eq!(SessionStatus::default(), SessionStatus::Running);
    }
}
