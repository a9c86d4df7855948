//! Extension Activation
//!
//! Wires configuration, the session registry, the watch view and the image
//! exporter together. The host creates one `Extension` on activation and asks
//! it for a tracker per debug session.

use log::info;
use std::sync::Arc;

use crate::adapter::DebugAdapterTracker;
use crate::config::Config;
use crate::error::{ViewerError, ViewerResult};
use crate::export::{Command, ImageCodeActionProvider, ScratchDir};
use crate::host::{DebugSession, WatchView};
use crate::session::DebugSessionsHolder;
use crate::watch::TrackedObject;

pub struct Extension {
    config: Arc<Config>,
    sessions: DebugSessionsHolder,
    view: Arc<dyn WatchView>,
    image_provider: ImageCodeActionProvider,
}

impl Extension {
    /// Prepare the scratch directory under the temp dir and start up
    pub fn activate(config: Config, view: Arc<dyn WatchView>) -> ViewerResult<Self> {
        let scratch = ScratchDir::prepare(&config.working_dir_name)?;
        Ok(Self::with_scratch(config, view, scratch))
    }

    pub fn with_scratch(config: Config, view: Arc<dyn WatchView>, scratch: ScratchDir) -> Self {
        info!("svifpod is now active, images go to {:?}", scratch.path());
        Self {
            config: Arc::new(config),
            sessions: DebugSessionsHolder::new(),
            view,
            image_provider: ImageCodeActionProvider::new(scratch),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn sessions(&self) -> &DebugSessionsHolder {
        &self.sessions
    }

    pub fn scratch(&self) -> &ScratchDir {
        self.image_provider.scratch()
    }

    /// Tracker factory the host registers for every debug type we support
    pub fn create_debug_adapter_tracker(&self, session: Arc<dyn DebugSession>) -> DebugAdapterTracker {
        DebugAdapterTracker::new(
            session,
            self.sessions.clone(),
            Arc::clone(&self.view),
            Arc::clone(&self.config),
        )
    }

    /// "View Image" action for the word at `offset`
    pub async fn provide_code_actions(
        &self,
        session: Option<&dyn DebugSession>,
        document_text: &str,
        offset: usize,
    ) -> ViewerResult<Option<Vec<Command>>> {
        self.image_provider
            .provide_code_actions_at(session, document_text, offset)
            .await
    }

    /// Watch tree command: follow an expression across steps
    pub fn track_object(&self, session_id: &str, expression: &str) -> ViewerResult<TrackedObject> {
        let data = self
            .sessions
            .get(session_id)
            .ok_or(ViewerError::NoActiveSession)?;
        let mut state = data.state();
        let tracked = state
            .tracked_python_objects
            .track(expression, self.image_provider.scratch())
            .clone();
        let snapshot = state.update_objects();
        drop(state);
        self.view.refresh(snapshot);
        Ok(tracked)
    }

    /// Watch tree command: stop following an expression
    pub fn untrack_object(&self, session_id: &str, expression: &str) -> ViewerResult<bool> {
        let data = self
            .sessions
            .get(session_id)
            .ok_or(ViewerError::NoActiveSession)?;
        let mut state = data.state();
        let removed = state.tracked_python_objects.untrack(expression);
        let snapshot = state.update_objects();
        drop(state);
        self.view.refresh(snapshot);
        Ok(removed)
    }
}
