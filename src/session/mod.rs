//! Session Module
//!
//! Per-debug-session tracking:
//! - Frame and variables bookkeeping from observed DAP traffic
//! - Watch list and tracked objects, scoped to the session
//! - A registry keyed by session id with explicit teardown

pub mod manager;
pub mod state;
pub mod variables;

pub use manager::DebugSessionsHolder;
pub use state::{DebugSessionData, SessionInfo, SessionState, SessionStatus};
pub use variables::{DebugVariablesTracker, ScopeKind};
