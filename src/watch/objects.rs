//! Current Python Objects
//!
//! The image-like variables visible in the inspected frame, rebuilt from the
//! variables tracker each time the watch view refreshes.

use serde::{Deserialize, Serialize};

use crate::dap::is_viewable_type;
use crate::session::DebugVariablesTracker;

/// One row of the watch view
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WatchItem {
    pub name: String,
    /// Expression that re-evaluates the object in its frame
    pub expression: String,
    pub type_name: String,
    pub tracked: bool,
}

/// What the watch view is asked to show
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WatchSnapshot {
    pub objects: Vec<WatchItem>,
    pub tracked: Vec<String>,
}

#[derive(Debug, Default)]
pub struct CurrentPythonObjectsList {
    objects: Vec<WatchItem>,
}

impl CurrentPythonObjectsList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild from the tracker, flagging the tracked expressions.
    /// Returns whether the list changed.
    pub fn update(&mut self, tracker: &DebugVariablesTracker, tracked: &[String]) -> bool {
        let objects: Vec<WatchItem> = tracker
            .visible_variables()
            .into_iter()
            .filter_map(|variable| {
                let type_name = variable.type_name.as_deref()?;
                if !is_viewable_type(type_name) {
                    return None;
                }
                let expression = variable.expression().to_string();
                Some(WatchItem {
                    name: variable.name.clone(),
                    tracked: tracked.contains(&expression),
                    expression,
                    type_name: type_name.to_string(),
                })
            })
            .collect();

        let changed = objects != self.objects;
        self.objects = objects;
        changed
    }

    pub fn objects(&self) -> &[WatchItem] {
        &self.objects
    }

    pub fn clear(&mut self) {
        self.objects.clear();
    }
}
