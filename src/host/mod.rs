//! Host Interface
//!
//! The debugging session and the watch view are owned by the host editor.
//! This crate only reads from the session and pushes snapshots to the view.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::dap::protocol::{EvaluateArguments, EvaluateResponseBody};
use crate::error::{ViewerError, ViewerResult};
use crate::watch::WatchSnapshot;

#[cfg(test)]
pub mod mock;

/// Handle on one live debugging connection, provided by the host
#[async_trait]
pub trait DebugSession: Send + Sync {
    /// Host-assigned session identifier
    fn id(&self) -> &str;

    /// Display name of the session
    fn name(&self) -> &str {
        self.id()
    }

    /// Send a DAP request through the host and return the response body
    async fn custom_request(&self, command: &str, arguments: Value) -> ViewerResult<Value>;
}

/// Tree view showing the image-like objects of the current frame
pub trait WatchView: Send + Sync {
    fn refresh(&self, snapshot: WatchSnapshot);
}

/// Issue a request and decode its body
pub async fn request<T: DeserializeOwned>(
    session: &dyn DebugSession,
    command: &str,
    arguments: Value,
) -> ViewerResult<T> {
    let body = session.custom_request(command, arguments).await?;
    serde_json::from_value(body).map_err(|e| ViewerError::malformed(command, e.to_string()))
}

/// Evaluate an expression in a frame (or globally when `frame_id` is None)
pub async fn evaluate(
    session: &dyn DebugSession,
    expression: &str,
    frame_id: Option<i64>,
    context: &str,
) -> ViewerResult<EvaluateResponseBody> {
    let arguments = EvaluateArguments {
        expression: expression.to_string(),
        frame_id,
        context: Some(context.to_string()),
    };
    request(session, "evaluate", serde_json::to_value(arguments)?).await
}
