//! Tracked Python Objects
//!
//! Expressions the user asked to follow. Their images are re-saved into the
//! scratch directory every time the inspected scope changes.

use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::ViewerResult;
use crate::export::{build_save_expression, ScratchDir};
use crate::host::{self, DebugSession};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackedObject {
    pub expression: String,
    pub save_path: PathBuf,
}

#[derive(Debug, Default)]
pub struct TrackedPythonObjects {
    tracked: Vec<TrackedObject>,
}

impl TrackedPythonObjects {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start tracking an expression; tracking twice is a no-op
    pub fn track(&mut self, expression: &str, scratch: &ScratchDir) -> &TrackedObject {
        if let Some(index) = self.tracked.iter().position(|t| t.expression == expression) {
            return &self.tracked[index];
        }
        info!("Tracking {}", expression);
        self.tracked.push(TrackedObject {
            expression: expression.to_string(),
            save_path: scratch.tracked_image_path(expression),
        });
        &self.tracked[self.tracked.len() - 1]
    }

    pub fn untrack(&mut self, expression: &str) -> bool {
        let before = self.tracked.len();
        self.tracked.retain(|t| t.expression != expression);
        before != self.tracked.len()
    }

    pub fn is_tracked(&self, expression: &str) -> bool {
        self.tracked.iter().any(|t| t.expression == expression)
    }

    pub fn all_tracked(&self) -> &[TrackedObject] {
        &self.tracked
    }

    pub fn expressions(&self) -> Vec<String> {
        self.tracked.iter().map(|t| t.expression.clone()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.tracked.is_empty()
    }

    pub fn clear(&mut self) {
        self.tracked.clear();
    }
}

/// Ask the debuggee to write every tracked object to its image file.
/// Stops at the first failing round trip.
pub async fn save_all_tracked_objects(
    tracked: &[TrackedObject],
    session: &dyn DebugSession,
    frame_id: Option<i64>,
) -> ViewerResult<usize> {
    for object in tracked {
        let expression =
            build_save_expression(&object.expression, &ScratchDir::save_path(&object.save_path));
        let response = host::evaluate(session, &expression, frame_id, "hover").await?;
        debug!("Saved tracked {}: {}", object.expression, response.result);
    }
    Ok(tracked.len())
}
