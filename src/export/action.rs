//! "View Image" Code Action
//!
//! Resolves the selected word against the locals of the top frame, makes the
//! debuggee write that variable to `<scratch>/<name>.png` and returns the
//! command that opens the file beside the editor.

use log::{debug, info};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::path::PathBuf;

use super::expression::build_save_expression;
use super::scratch::ScratchDir;
use super::word::word_at;
use crate::dap::protocol::{
    ScopesResponseBody, StackTraceResponseBody, ThreadsResponseBody, VariablesResponseBody,
};
use crate::error::{ViewerError, ViewerResult};
use crate::host::{self, DebugSession};

/// Host command that opens a file
pub const OPEN_COMMAND: &str = "vscode.open";

/// Title of the offered action
pub const VIEW_IMAGE_TITLE: &str = "View Image";

/// Editor column the image opens in
pub const BESIDE: &str = "beside";

/// A UI command handed back to the host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Command {
    pub command: String,
    pub title: String,
    pub arguments: Vec<Value>,
}

impl Command {
    pub fn view_image(path: &std::path::Path) -> Self {
        Self {
            command: OPEN_COMMAND.to_string(),
            title: VIEW_IMAGE_TITLE.to_string(),
            arguments: vec![json!(path.to_string_lossy()), json!(BESIDE)],
        }
    }
}

pub struct ImageCodeActionProvider {
    scratch: ScratchDir,
}

impl ImageCodeActionProvider {
    pub fn new(scratch: ScratchDir) -> Self {
        Self { scratch }
    }

    pub fn scratch(&self) -> &ScratchDir {
        &self.scratch
    }

    /// Code actions for the word under `offset` in `document_text`
    pub async fn provide_code_actions_at(
        &self,
        session: Option<&dyn DebugSession>,
        document_text: &str,
        offset: usize,
    ) -> ViewerResult<Option<Vec<Command>>> {
        match word_at(document_text, offset) {
            Some(word) => self.provide_code_actions(session, word).await,
            None => Ok(None),
        }
    }

    /// Code actions for a selected variable name. `Ok(None)` when there is
    /// no session or no variable of that name in the top frame's first scope.
    pub async fn provide_code_actions(
        &self,
        session: Option<&dyn DebugSession>,
        selected: &str,
    ) -> ViewerResult<Option<Vec<Command>>> {
        let Some(session) = session else {
            return Ok(None);
        };

        let threads: ThreadsResponseBody = host::request(session, "threads", json!({})).await?;
        let main_thread = threads
            .threads
            .first()
            .ok_or_else(|| ViewerError::malformed("threads", "no threads"))?
            .id;

        let stack: StackTraceResponseBody =
            host::request(session, "stackTrace", json!({ "threadId": main_thread })).await?;
        let frame_id = stack
            .stack_frames
            .first()
            .ok_or_else(|| ViewerError::malformed("stackTrace", "no stack frames"))?
            .id;

        let scopes: ScopesResponseBody =
            host::request(session, "scopes", json!({ "frameId": frame_id })).await?;
        let local = scopes
            .scopes
            .first()
            .ok_or_else(|| ViewerError::malformed("scopes", "no scopes"))?;

        let variables: VariablesResponseBody = host::request(
            session,
            "variables",
            json!({ "variablesReference": local.variables_reference }),
        )
        .await?;

        let Some(target) = variables.variables.iter().find(|v| v.name == selected) else {
            debug!("No variable named {} in frame {}", selected, frame_id);
            return Ok(None);
        };

        let path: PathBuf = self.scratch.image_path(&target.name);
        let expression = build_save_expression(target.expression(), &ScratchDir::save_path(&path));
        let result = host::evaluate(session, &expression, Some(frame_id), "hover").await?;
        info!("evaluate {} result: {}", expression, result.result);

        Ok(Some(vec![Command::view_image(&path)]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::mock::RecordingSession;

    fn session_with_locals(variables: Value) -> RecordingSession {
        let session = RecordingSession::new("s1");
        session.respond("threads", json!({"threads": [{"id": 3, "name": "MainThread"}, {"id": 9, "name": "worker"}]}));
        session.respond("stackTrace", json!({"stackFrames": [{"id": 11, "name": "main"}, {"id": 12, "name": "<module>"}]}));
        session.respond("scopes", json!({"scopes": [{"name": "Locals", "variablesReference": 21}, {"name": "Globals", "variablesReference": 22}]}));
        session.respond("variables", json!({ "variables": variables }));
        session.respond("evaluate", json!({"result": "True"}));
        session
    }

    fn provider() -> (tempfile::TempDir, ImageCodeActionProvider) {
        let dir = tempfile::tempdir().unwrap();
        let scratch = ScratchDir::at(dir.path().join("svifpod")).unwrap();
        (dir, ImageCodeActionProvider::new(scratch))
    }

    #[tokio::test]
    async fn test_no_session_no_action() {
        let (_dir, provider) = provider();
        let actions = provider.provide_code_actions(None, "img").await.unwrap();
        assert!(actions.is_none());
    }

    #[tokio::test]
    async fn test_unmatched_selection_no_action() {
        let (_dir, provider) = provider();
        let session = session_with_locals(json!([{"name": "frame", "type": "ndarray", "evaluateName": "frame"}]));

        let actions = provider.provide_code_actions(Some(&session), "img").await.unwrap();
        assert!(actions.is_none());
        assert!(session.requests_for("evaluate").is_empty());
    }

    #[tokio::test]
    async fn test_matched_selection_exports_and_offers_view() {
        let (_dir, provider) = provider();
        let session = session_with_locals(json!([
            {"name": "n", "type": "int", "evaluateName": "n"},
            {"name": "img", "type": "ndarray", "evaluateName": "self.img"}
        ]));

        let actions = provider
            .provide_code_actions(Some(&session), "img")
            .await
            .unwrap()
            .unwrap();

        let commands: Vec<String> = session.requests().into_iter().map(|(c, _)| c).collect();
        assert_eq!(commands, vec!["threads", "stackTrace", "scopes", "variables", "evaluate"]);
        assert_eq!(session.requests_for("stackTrace")[0]["threadId"], 3);
        assert_eq!(session.requests_for("scopes")[0]["frameId"], 11);
        assert_eq!(session.requests_for("variables")[0]["variablesReference"], 21);

        let evaluate = &session.requests_for("evaluate")[0];
        let expression = evaluate["expression"].as_str().unwrap();
        assert!(expression.starts_with("cv2.imwrite('"));
        assert!(expression.contains("img.png'"));
        assert!(expression.contains(
            "self.img * 255.0 if (self.img.dtype == np.float64 or self.img.dtype == np.float32) else self.img"
        ));
        assert_eq!(evaluate["frameId"], 11);
        assert_eq!(evaluate["context"], "hover");

        assert_eq!(actions.len(), 1);
        assert_eq!(actions[0].command, OPEN_COMMAND);
        assert_eq!(actions[0].title, VIEW_IMAGE_TITLE);
        let expected = provider.scratch().image_path("img");
        assert_eq!(actions[0].arguments[0], json!(expected.to_string_lossy()));
        assert_eq!(actions[0].arguments[1], json!(BESIDE));
    }

    #[tokio::test]
    async fn test_word_under_cursor() {
        let (_dir, provider) = provider();
        let session = session_with_locals(json!([{"name": "img", "type": "ndarray", "evaluateName": "img"}]));

        let actions = provider
            .provide_code_actions_at(Some(&session), "cv2.imshow('w', img)", 17)
            .await
            .unwrap();
        assert_eq!(actions.map(|a| a.len()), Some(1));
    }

    #[tokio::test]
    async fn test_host_failure_propagates() {
        let (_dir, provider) = provider();
        let session = session_with_locals(json!([{"name": "img", "type": "ndarray", "evaluateName": "img"}]));
        session.fail("evaluate");

        let result = provider.provide_code_actions(Some(&session), "img").await;
        assert!(matches!(result, Err(ViewerError::Host { .. })));
    }
}
