//! Finds direct field reads on generated protobuf messages in Go code and
//! rewrites them to getter calls.
//!
//! The pipeline for a set of packages:
//! - `load` - reads packages from disk into a `Program`
//! - `types` - resolves the static type of expressions
//! - `analyze` - the getter rewrite analysis, one traversal per file
//! - `diagnostics` - findings, rendering and JSON output
//! - `fix` - applies suggested fixes to source text

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod analyze;
pub mod diagnostics;
pub mod fix;
pub mod load;
pub mod program;
pub mod types;

mod line_index;

#[cfg(test)]
mod load_tests;
#[cfg(test)]
mod test_utils;

use std::path::PathBuf;

pub use analyze::{ANALYZER_NAME, analyze};
pub use diagnostics::{DiagnosticKind, Diagnostics, DiagnosticsPrinter, JsonReport, Severity};
pub use fix::{Edit, FixOutcome, apply_edits};
pub use line_index::{LineCol, LineIndex};
pub use load::{LoadOptions, load};
pub use program::{FileId, Program};

/// Errors that can occur while loading sources.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("no Go files matched `{0}`")]
    NoGoFiles(String),

    #[error(transparent)]
    Syntax(#[from] protoget_syntax::Error),
}

/// Result type for loading operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Diagnostics of one analyzed file.
#[derive(Debug)]
pub struct FileReport {
    pub file: FileId,
    pub diagnostics: Diagnostics,
}

/// Type-checks the program and analyzes every target file.
pub fn lint(program: &Program) -> Vec<FileReport> {
    let types = types::check(program);

    program
        .targets()
        .map(|id| {
            let source = program.file(id).source();
            let mut diagnostics = analyze(source, &types.file(id));
            for range in source.error_ranges() {
                diagnostics.report(DiagnosticKind::SyntaxError, range).emit();
            }
            diagnostics.sort();
            FileReport {
                file: id,
                diagnostics,
            }
        })
        .collect()
}

/// Analyzes a single self-contained file.
pub fn lint_source(text: &str) -> Result<Diagnostics> {
    let mut program = Program::new();
    let id = program.add_file("main", "main.go", text)?;
    program.set_target(id, true);
    Ok(lint(&program)
        .into_iter()
        .next()
        .map(|report| report.diagnostics)
        .unwrap_or_default())
}
