//! Image Export Module
//!
//! Everything needed to turn a debuggee array into a PNG the editor can open:
//! - Scratch directory management
//! - Python expressions for setup and `cv2.imwrite`
//! - The "View Image" code action

pub mod action;
pub mod expression;
pub mod scratch;
pub mod word;

pub use action::{Command, ImageCodeActionProvider};
pub use expression::{build_save_expression, rescale_expression, SETUP_EXPRESSION};
pub use scratch::ScratchDir;
pub use word::word_at;
