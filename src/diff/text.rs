//! Unified line diffs.

use similar::TextDiff;

/// Lines of context around each hunk
const CONTEXT_LINES: usize = 3;

/// Render a unified diff of `old` against `new` with `--- old` / `+++ new`
/// headers. Returns an empty string when the texts are equal.
#[must_use]
pub fn unified_diff(old: &str, new: &str) -> String {
    if old == new {
        return String::new();
    }
    TextDiff::from_lines(old, new)
        .unified_diff()
        .context_radius(CONTEXT_LINES)
        .header("old", "new")
        .to_string()
}
