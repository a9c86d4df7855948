//! Debug Adapter Protocol Module
//!
//! Decoded DAP messages as seen through the host's tracker callbacks:
//! - Generic request/response/event envelope
//! - Tagged variants for the shapes the tracker reacts to
//! - In-place patching of `variables` responses

pub mod messages;
pub mod patch;
pub mod protocol;

pub use messages::{InboundMessage, OutboundMessage};
pub use patch::{is_viewable_type, patch_debug_variable_context};
pub use protocol::{ProtocolMessage, Scope, Variable};
