//! Debug Adapter Module
//!
//! Hooks the host calls for every debug session:
//! - Interception of the allow-listed DAP messages
//! - Debounced watch tree refresh and tracked object persistence
//! - Debuggee setup when execution stops or the scope changes

pub mod setup;
pub mod tracker;

pub use setup::run_setup;
pub use tracker::{DebugAdapterTracker, Interception, SCOPE_CHANGE_DELAY, SETUP_DELAY};
