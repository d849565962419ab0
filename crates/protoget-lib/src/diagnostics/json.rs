//! Machine-readable output in the shape of `go vet -json`.
//!
//! ```json
//! { "example.com/app": { "getters": [ { "posn": "app.go:7:14", "message": "...",
//!   "suggested_fixes": [ { "message": "...", "edits": [ ... ] } ] } ] } }
//! ```

use indexmap::IndexMap;
use serde::Serialize;

use super::Diagnostics;
use crate::line_index::LineIndex;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JsonEdit {
    pub filename: String,
    pub start: u32,
    pub end: u32,
    pub new: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JsonFix {
    pub message: String,
    pub edits: Vec<JsonEdit>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JsonDiagnostic {
    pub posn: String,
    pub message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub suggested_fixes: Vec<JsonFix>,
}

/// Findings grouped by package path, then analyzer name.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct JsonReport {
    packages: IndexMap<String, IndexMap<String, Vec<JsonDiagnostic>>>,
}

impl JsonReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds the diagnostics of one file. Files without diagnostics add nothing.
    pub fn add(
        &mut self,
        package: &str,
        analyzer: &str,
        filename: &str,
        source: &str,
        diagnostics: &Diagnostics,
    ) {
        if diagnostics.is_empty() {
            return;
        }
        let index = LineIndex::new(source);
        let entries = self
            .packages
            .entry(package.to_owned())
            .or_default()
            .entry(analyzer.to_owned())
            .or_default();

        for diag in diagnostics {
            let pos = index.line_col(diag.range().start());
            let suggested_fixes = diag
                .fix()
                .map(|fix| JsonFix {
                    message: fix.description().to_owned(),
                    edits: vec![JsonEdit {
                        filename: filename.to_owned(),
                        start: diag.range().start().into(),
                        end: diag.range().end().into(),
                        new: fix.replacement().to_owned(),
                    }],
                })
                .into_iter()
                .collect();
            entries.push(JsonDiagnostic {
                posn: format!("{filename}:{}:{}", pos.line, pos.col),
                message: diag.message().to_owned(),
                suggested_fixes,
            });
        }
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
