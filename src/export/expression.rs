//! Python expressions evaluated in the debuggee

/// Makes `cv2` and `np` resolvable in the inspected frame
pub const SETUP_EXPRESSION: &str = "import cv2, numpy as np";

/// Floating point arrays hold values in [0, 1]; scale them to [0, 255]
/// before `cv2.imwrite`, leave everything else as is.
pub fn rescale_expression(evaluate_name: &str) -> String {
    format!(
        "{vn} * 255.0 if ({vn}.dtype == np.float64 or {vn}.dtype == np.float32) else {vn}",
        vn = evaluate_name
    )
}

/// `cv2.imwrite('<save_path>', <rescaled value>)`
pub fn build_save_expression(evaluate_name: &str, save_path: &str) -> String {
    format!(
        "cv2.imwrite('{}', {})",
        save_path.replace('\'', "\\'"),
        rescale_expression(evaluate_name)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_expression() {
        assert_eq!(
            build_save_expression("img", "/tmp/svifpod/img.png"),
            "cv2.imwrite('/tmp/svifpod/img.png', img * 255.0 if (img.dtype == np.float64 or img.dtype == np.float32) else img)"
        );
    }

    #[test]
    fn test_quote_in_path_is_escaped() {
        let expression = build_save_expression("a", "/tmp/o'neil/a.png");
        assert!(expression.starts_with(r"cv2.imwrite('/tmp/o\'neil/a.png', "));
    }
}
