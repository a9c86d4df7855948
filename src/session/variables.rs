//! Debug Variables Tracker
//!
//! Follows the scopes/variables request-response pairs that the host
//! exchanges with the adapter, so we know which frame is being inspected and
//! which variables it currently holds.

use log::{debug, trace};
use std::collections::HashMap;

use crate::dap::{Scope, Variable};

/// Which scope a variables reference belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScopeKind {
    Locals,
    Globals,
}

impl ScopeKind {
    fn from_scope(scope: &Scope) -> Option<Self> {
        let hint = scope.presentation_hint.as_deref().unwrap_or_default();
        let name = scope.name.to_ascii_lowercase();
        if hint == "locals" || name.starts_with("local") {
            Some(ScopeKind::Locals)
        } else if name.starts_with("global") {
            Some(ScopeKind::Globals)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ScopeOrigin {
    frame_id: i64,
    kind: ScopeKind,
}

/// Per-session view of the inspected frame and its variables
#[derive(Debug, Default)]
pub struct DebugVariablesTracker {
    /// Frame currently inspected; last write wins
    current_frame_id: Option<i64>,
    /// scopes request seq -> requested frame
    frame_for_scopes_request: HashMap<i64, i64>,
    /// variables request seq -> requested reference
    reference_for_variables_request: HashMap<i64, i64>,
    /// variables reference -> scope it was announced in
    scope_for_reference: HashMap<i64, ScopeOrigin>,
    /// (frame, scope) -> latest variables
    variables: HashMap<(i64, ScopeKind), Vec<Variable>>,
}

impl DebugVariablesTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current_frame_id(&self) -> Option<i64> {
        self.current_frame_id
    }

    /// Push an active frame id from outside the protocol flow
    pub fn set_frame_id(&mut self, frame_id: Option<i64>) {
        debug!("Active frame set to {:?}", frame_id);
        self.current_frame_id = frame_id;
    }

    pub fn on_scopes_request(&mut self, seq: i64, frame_id: i64) {
        trace!("scopes request {} for frame {}", seq, frame_id);
        self.frame_for_scopes_request.insert(seq, frame_id);
    }

    /// A scopes response makes its frame the current one and maps the
    /// announced variables references back to that frame.
    pub fn on_scopes_response(&mut self, request_seq: i64, scopes: &[Scope]) {
        let Some(frame_id) = self.frame_for_scopes_request.remove(&request_seq) else {
            trace!("scopes response {} without a tracked request", request_seq);
            return;
        };

        self.current_frame_id = Some(frame_id);
        for scope in scopes {
            if let Some(kind) = ScopeKind::from_scope(scope) {
                self.scope_for_reference
                    .insert(scope.variables_reference, ScopeOrigin { frame_id, kind });
            }
        }
    }

    pub fn on_variables_request(&mut self, seq: i64, variables_reference: i64) {
        trace!("variables request {} for reference {}", seq, variables_reference);
        self.reference_for_variables_request
            .insert(seq, variables_reference);
    }

    /// Store the variables of a locals/globals scope; nested containers are
    /// not tracked.
    pub fn on_variables_response(&mut self, request_seq: i64, variables: &[Variable]) {
        let Some(reference) = self.reference_for_variables_request.remove(&request_seq) else {
            trace!("variables response {} without a tracked request", request_seq);
            return;
        };
        let Some(origin) = self.scope_for_reference.get(&reference).copied() else {
            return;
        };

        self.variables
            .insert((origin.frame_id, origin.kind), variables.to_vec());
    }

    /// Execution resumed: every frame id and reference is now stale
    pub fn on_continued(&mut self) {
        debug!("Execution continued, dropping frame state");
        self.drop_frame_state();
    }

    /// A new stop. Adapters resume on step requests without a `continued`
    /// event, so frames of the previous stop are dead here too.
    pub fn on_stopped(&mut self) {
        debug!("Execution stopped, dropping frame state of the previous stop");
        self.drop_frame_state();
    }

    fn drop_frame_state(&mut self) {
        self.current_frame_id = None;
        self.frame_for_scopes_request.clear();
        self.reference_for_variables_request.clear();
        self.scope_for_reference.clear();
        self.variables.clear();
    }

    /// Variables of the current frame for one scope
    pub fn variables(&self, kind: ScopeKind) -> &[Variable] {
        self.current_frame_id
            .and_then(|frame_id| self.variables.get(&(frame_id, kind)))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Locals first, then globals not shadowed by a local
    pub fn visible_variables(&self) -> Vec<&Variable> {
        let locals = self.variables(ScopeKind::Locals);
        let globals = self
            .variables(ScopeKind::Globals)
            .iter()
            .filter(|g| !locals.iter().any(|l| l.name == g.name));
        locals.iter().chain(globals).collect()
    }

    pub fn clear(&mut self) {
        self.drop_frame_state();
    }
}
