use regex::Regex;
use std::sync::LazyLock;

// Python identifier, as the editor's default word pattern sees it
static WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[A-Za-z_][A-Za-z0-9_]*").unwrap());

/// Identifier touching the byte `offset` of `text`, if any
pub fn word_at(text: &str, offset: usize) -> Option<&str> {
    WORD.find_iter(text)
        .find(|m| m.start() <= offset && offset <= m.end())
        .map(|m| m.as_str())
}
