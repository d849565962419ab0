//! Applying suggested fixes to source text.

use std::cmp::Reverse;

use rowan::TextRange;

/// Replacement of one source range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edit {
    pub range: TextRange,
    pub replacement: String,
}

impl Edit {
    pub fn new(range: TextRange, replacement: impl Into<String>) -> Self {
        Self {
            range,
            replacement: replacement.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixOutcome {
    pub text: String,
    pub applied: usize,
    /// Edits that overlap an earlier edit and were left out.
    pub skipped: Vec<Edit>,
}

/// Applies edits in source order, outer edits first when two start together.
/// An edit overlapping one already applied is skipped.
pub fn apply_edits(source: &str, mut edits: Vec<Edit>) -> FixOutcome {
    edits.sort_by_key(|e| (e.range.start(), Reverse(e.range.end())));

    let mut text = String::with_capacity(source.len());
    let mut cursor = 0usize;
    let mut applied = 0;
    let mut skipped = Vec::new();

    for edit in edits {
        let start: usize = edit.range.start().into();
        let end: usize = edit.range.end().into();
        let out_of_bounds = end > source.len()
            || !source.is_char_boundary(start)
            || !source.is_char_boundary(end);
        if start < cursor || out_of_bounds {
            skipped.push(edit);
            continue;
        }
        text.push_str(&source[cursor..start]);
        text.push_str(&edit.replacement);
        cursor = end;
        applied += 1;
    }
    text.push_str(&source[cursor..]);

    if !skipped.is_empty() {
        tracing::debug!(skipped = skipped.len(), "overlapping edits left out");
    }

    FixOutcome {
        text,
        applied,
        skipped,
    }
}
