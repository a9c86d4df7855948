//! Image Watch Module
//!
//! State behind the image watch tree: the viewable objects of the current
//! frame and the expressions the user tracks across steps.

pub mod objects;
pub mod tracked;

pub use objects::{CurrentPythonObjectsList, WatchItem, WatchSnapshot};
pub use tracked::{save_all_tracked_objects, TrackedObject, TrackedPythonObjects};
