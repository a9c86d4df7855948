//! Debuggee Setup
//!
//! Imports the modules the export expressions rely on into the frame that is
//! about to be inspected.

use log::debug;

use crate::dap::protocol::{StackTraceArguments, StackTraceResponseBody};
use crate::error::ViewerResult;
use crate::export::SETUP_EXPRESSION;
use crate::host::{self, DebugSession};

/// Run the setup expression in `frame_id`, or in the top frame of
/// `thread_id` when no frame is known yet. Host failures propagate.
pub async fn run_setup(
    session: &dyn DebugSession,
    thread_id: Option<i64>,
    frame_id: Option<i64>,
) -> ViewerResult<()> {
    let frame_id = match (frame_id, thread_id) {
        (Some(frame_id), _) => Some(frame_id),
        (None, Some(thread_id)) => {
            let arguments = StackTraceArguments {
                thread_id,
                levels: Some(1),
            };
            let stack: StackTraceResponseBody =
                host::request(session, "stackTrace", serde_json::to_value(arguments)?).await?;
            stack.stack_frames.first().map(|f| f.id)
        }
        (None, None) => None,
    };

    debug!("Running setup in session {} frame {:?}", session.id(), frame_id);
    host::evaluate(session, SETUP_EXPRESSION, frame_id, "repl").await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::mock::RecordingSession;

    #[tokio::test]
    async fn test_known_frame_skips_stack_lookup() {
        let session = RecordingSession::new("s1");
        run_setup(&session, Some(3), Some(8)).await.unwrap();

        assert!(session.requests_for("stackTrace").is_empty());
        let evaluate = &session.requests_for("evaluate")[0];
        assert_eq!(evaluate["expression"], SETUP_EXPRESSION);
        assert_eq!(evaluate["frameId"], 8);
        assert_eq!(evaluate["context"], "repl");
    }

    #[tokio::test]
    async fn test_thread_resolves_top_frame() {
        let session = RecordingSession::new("s1");
        session.respond("stackTrace", serde_json::json!({"stackFrames": [{"id": 40, "name": "f"}]}));
        run_setup(&session, Some(3), None).await.unwrap();

        let lookup = &session.requests_for("stackTrace")[0];
        assert_eq!(lookup["threadId"], 3);
        assert_eq!(lookup["levels"], 1);
        assert_eq!(session.requests_for("evaluate")[0]["frameId"], 40);
    }

    #[tokio::test]
    async fn test_no_frame_evaluates_globally() {
        let session = RecordingSession::new("s1");
        run_setup(&session, None, None).await.unwrap();
        assert!(session.requests_for("evaluate")[0].get("frameId").is_none());
    }
}
