//! Semantic line filter
//!
//! Classification is line-local: no block comments, no nesting awareness.
//! A statement split across three physical lines counts three times.

use crate::markers::Markers;

/// Ordered lines that survived filtering
pub type SemanticLines = Vec<String>;

/// Check whether a single raw line carries meaning
#[must_use]
pub fn is_semantic_line(line: &str, markers: &Markers) -> bool {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return false;
    }
    if trimmed.starts_with(markers.comment.as_str()) {
        return false;
    }
    !trimmed.contains(markers.instrumentation.as_str())
}

/// Keep only the semantic lines of `raw`, preserving order
#[must_use]
pub fn semantic_lines<S: AsRef<str>>(raw: &[S], markers: &Markers) -> SemanticLines {
    raw.iter()
        .map(AsRef::as_ref)
        .filter(|line| is_semantic_line(line, markers))
        .map(str::to_string)
        .collect()
}

/// Count lines that mention `marker` anywhere
#[must_use]
pub fn count_mentions<S: AsRef<str>>(lines: &[S], marker: &str) -> usize {
    lines
        .iter()
        .filter(|line| line.as_ref().contains(marker))
        .count()
}
