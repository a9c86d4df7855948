//! Variable Context Patch
//!
//! Marks image-like entries of a `variables` response so the host can offer
//! the "view image" menu on them directly from its variables pane.

use serde_json::Value;

/// Key the host reads to decide which context menu entries apply
pub const VARIABLE_MENU_CONTEXT_KEY: &str = "__vscodeVariableMenuContext";

/// Context value attached to viewable variables
pub const VIEWABLE_CONTEXT: &str = "viewableInImageViewer";

/// Python types we know how to turn into an image
const VIEWABLE_TYPES: &[&str] = &["ndarray", "Image", "JpegImageFile", "PngImageFile", "Tensor", "Figure"];

/// Whether a variable of this reported type can be shown as an image
pub fn is_viewable_type(type_name: &str) -> bool {
    VIEWABLE_TYPES.contains(&type_name)
}

/// Inject the menu context into every viewable variable of a `variables`
/// response. Returns the number of entries patched.
pub fn patch_debug_variable_context(message: &mut Value) -> usize {
    let Some(variables) = message
        .get_mut("body")
        .and_then(|body| body.get_mut("variables"))
        .and_then(Value::as_array_mut)
    else {
        return 0;
    };

    let mut patched = 0;
    for variable in variables.iter_mut() {
        let viewable = variable
            .get("type")
            .and_then(Value::as_str)
            .map(is_viewable_type)
            .unwrap_or(false);

        if let (true, Some(entry)) = (viewable, variable.as_object_mut()) {
            entry.insert(
                VARIABLE_MENU_CONTEXT_KEY.to_string(),
                Value::String(VIEWABLE_CONTEXT.to_string()),
            );
            patched += 1;
        }
    }
    patched
}
