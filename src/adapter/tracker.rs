//! Debug Adapter Tracker
//!
//! Watches the DAP traffic of one session through the host's tracker hooks.
//! It follows the inspected frame, keeps the image watch tree current and
//! makes sure the debuggee can evaluate our export expressions.

use log::{debug, trace, warn};
use serde_json::Value;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use super::setup::run_setup;
use crate::config::Config;
use crate::dap::{patch_debug_variable_context, InboundMessage, OutboundMessage};
use crate::debounce::Debouncer;
use crate::error::ViewerResult;
use crate::host::{DebugSession, WatchView};
use crate::session::{DebugSessionData, DebugSessionsHolder, SessionStatus};
use crate::watch::save_all_tracked_objects;

/// Quiet period before the watch tree is rebuilt and, after a scope change,
/// tracked objects saved
pub const SCOPE_CHANGE_DELAY: Duration = Duration::from_millis(500);

/// Quiet period between a `stopped` event and the setup evaluation
pub const SETUP_DELAY: Duration = Duration::from_millis(250);

/// What happened to a client-to-adapter message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interception {
    /// Not ours, nothing done
    Passthrough,
    /// Recorded by the variables tracker
    Observed,
    /// Blank `evaluate` consumed as a frame id update
    FrameIdUpdated(Option<i64>),
}

pub struct DebugAdapterTracker {
    session: Arc<dyn DebugSession>,
    data: Arc<DebugSessionData>,
    sessions: DebugSessionsHolder,
    view: Arc<dyn WatchView>,
    config: Arc<Config>,
    on_scope_change: Debouncer<()>,
    /// Set by scopes responses; the next refresh also saves tracked objects
    save_requested: Arc<AtomicBool>,
    setup: Debouncer<i64>,
}

impl DebugAdapterTracker {
    pub fn new(
        session: Arc<dyn DebugSession>,
        sessions: DebugSessionsHolder,
        view: Arc<dyn WatchView>,
        config: Arc<Config>,
    ) -> Self {
        let data = sessions.active_debug_session_data(session.id());
        let save_requested = Arc::new(AtomicBool::new(false));

        let on_scope_change = {
            let session = Arc::clone(&session);
            let data = Arc::clone(&data);
            let view = Arc::clone(&view);
            let save_requested = Arc::clone(&save_requested);
            Debouncer::new("scope-change", SCOPE_CHANGE_DELAY, move |()| {
                let session = Arc::clone(&session);
                let data = Arc::clone(&data);
                let view = Arc::clone(&view);
                let save_requested = Arc::clone(&save_requested);
                async move {
                    update_watch_tree(&data, view.as_ref());
                    if !save_requested.swap(false, Ordering::SeqCst) {
                        return;
                    }
                    if let Err(e) = save_tracked(session.as_ref(), &data).await {
                        warn!("Saving tracked objects failed: {}", e);
                    }
                }
            })
        };

        let setup = {
            let session = Arc::clone(&session);
            let data = Arc::clone(&data);
            Debouncer::new("setup", SETUP_DELAY, move |thread_id: i64| {
                let session = Arc::clone(&session);
                let data = Arc::clone(&data);
                async move {
                    let frame_id = data.state().debug_variables_tracker.current_frame_id();
                    if let Err(e) = run_setup(session.as_ref(), Some(thread_id), frame_id).await {
                        warn!("Setup after stop of thread {} failed: {}", thread_id, e);
                    }
                }
            })
        };

        Self {
            session,
            data,
            sessions,
            view,
            config,
            on_scope_change,
            save_requested,
            setup,
        }
    }

    pub fn session_data(&self) -> &Arc<DebugSessionData> {
        &self.data
    }

    pub fn on_will_start_session(&self) {
        trace!("onWillStartSession {} ({})", self.session.name(), self.session.id());
    }

    pub fn on_will_stop_session(&self) {
        trace!("onWillStopSession {}", self.session.id());
        self.reset();
    }

    /// Client-to-adapter message
    pub fn on_will_receive_message(&self, message: &Value) -> Interception {
        trace!("onWillReceiveMessage {}", message);
        match InboundMessage::classify(message) {
            InboundMessage::ScopesRequest { seq, frame_id } => {
                self.data
                    .state()
                    .debug_variables_tracker
                    .on_scopes_request(seq, frame_id);
                Interception::Observed
            }
            InboundMessage::VariablesRequest {
                seq,
                variables_reference,
            } => {
                self.data
                    .state()
                    .debug_variables_tracker
                    .on_variables_request(seq, variables_reference);
                Interception::Observed
            }
            InboundMessage::FrameIdSentinel { frame_id } => {
                self.data
                    .state()
                    .debug_variables_tracker
                    .set_frame_id(frame_id);
                Interception::FrameIdUpdated(frame_id)
            }
            InboundMessage::Unhandled => Interception::Passthrough,
        }
    }

    /// Adapter-to-client message. `variables` responses may be patched in
    /// place before the host forwards them.
    pub async fn on_did_send_message(&self, message: &mut Value) -> ViewerResult<()> {
        trace!("onDidSendMessage {}", message);
        match OutboundMessage::classify(message) {
            OutboundMessage::Stopped { thread_id, reason } => {
                debug!("Breakpoint hit ({}) on thread {}", reason, thread_id);
                {
                    let mut state = self.data.state();
                    state.debug_variables_tracker.on_stopped();
                    state.status = SessionStatus::Paused;
                }
                self.setup.call(thread_id);
            }
            OutboundMessage::VariablesResponse {
                request_seq,
                variables,
            } => {
                if self.config.add_view_context_entry_to_debug_variables {
                    patch_debug_variable_context(message);
                }
                self.data
                    .state()
                    .debug_variables_tracker
                    .on_variables_response(request_seq, &variables);
                self.on_scope_change.call(());
            }
            OutboundMessage::Continued { thread_id } => {
                trace!("Continued thread {:?}", thread_id);
                let mut state = self.data.state();
                state.debug_variables_tracker.on_continued();
                state.status = SessionStatus::Running;
            }
            OutboundMessage::ScopesResponse {
                request_seq,
                scopes,
            } => {
                let frame_id = {
                    let mut state = self.data.state();
                    state
                        .debug_variables_tracker
                        .on_scopes_response(request_seq, &scopes);
                    state.debug_variables_tracker.current_frame_id()
                };
                // scope changed, make sure the new frame can run our expressions
                run_setup(self.session.as_ref(), None, frame_id).await?;
                self.save_requested.store(true, Ordering::SeqCst);
                self.on_scope_change.call(());
            }
            OutboundMessage::Unhandled => {}
        }
        Ok(())
    }

    pub fn on_error(&self, error: &dyn std::error::Error) {
        trace!("onError {}: {}", self.session.id(), error);
    }

    pub fn on_exit(&self, code: Option<i32>, signal: Option<&str>) {
        trace!("onExit {} code={:?} signal={:?}", self.session.id(), code, signal);
        self.reset();
    }

    /// Run any pending debounced work now
    pub async fn flush(&self) {
        self.setup.flush().await;
        self.on_scope_change.flush().await;
    }

    fn reset(&self) {
        self.setup.cancel();
        self.on_scope_change.cancel();
        self.save_requested.store(false, Ordering::SeqCst);
        let snapshot = {
            let mut state = self.data.state();
            state.reset();
            state.snapshot()
        };
        self.view.refresh(snapshot);
        self.sessions.remove(self.session.id());
    }
}

fn update_watch_tree(data: &DebugSessionData, view: &dyn WatchView) {
    let snapshot = data.state().update_objects();
    view.refresh(snapshot);
}

async fn save_tracked(session: &dyn DebugSession, data: &DebugSessionData) -> ViewerResult<usize> {
    let (tracked, frame_id) = {
        let state = data.state();
        (
            state.tracked_python_objects.all_tracked().to_vec(),
            state.debug_variables_tracker.current_frame_id(),
        )
    };
    if tracked.is_empty() {
        return Ok(0);
    }
    save_all_tracked_objects(&tracked, session, frame_id).await
}
