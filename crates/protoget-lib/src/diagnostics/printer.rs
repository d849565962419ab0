//! Builder-pattern printer for rendering diagnostics.

use std::fmt::Write;
use std::ops::Range;

use annotate_snippets::{AnnotationKind, Group, Level, Patch, Renderer, Snippet};
use rowan::TextRange;

use super::Diagnostics;
use super::message::{DiagnosticMessage, Severity};
use crate::line_index::LineIndex;

/// Builder for rendering the diagnostics of one file.
///
/// Without a source text, diagnostics are printed with their byte ranges only.
pub struct DiagnosticsPrinter<'d, 's> {
    diagnostics: &'d Diagnostics,
    source: Option<&'s str>,
    path: Option<&'s str>,
    colored: bool,
    short: bool,
}

impl<'d, 's> DiagnosticsPrinter<'d, 's> {
    pub fn new(diagnostics: &'d Diagnostics) -> Self {
        Self {
            diagnostics,
            source: None,
            path: None,
            colored: false,
            short: false,
        }
    }

    pub fn source(mut self, source: &'s str) -> Self {
        self.source = Some(source);
        self
    }

    /// File name shown in `-->` lines and short output.
    pub fn path(mut self, path: &'s str) -> Self {
        self.path = Some(path);
        self
    }

    pub fn colored(mut self, value: bool) -> Self {
        self.colored = value;
        self
    }

    /// One `path:line:col: message` line per diagnostic, like `go vet`.
    pub fn short(mut self, value: bool) -> Self {
        self.short = value;
        self
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        self.format(&mut out).expect("String write never fails");
        out
    }

    pub fn format(&self, w: &mut impl Write) -> std::fmt::Result {
        match self.source {
            None => self.write_ranges(w),
            Some(source) if self.short => self.write_lines(w, source),
            Some(source) => self.write_snippets(w, source),
        }
    }

    fn write_snippets(&self, w: &mut impl Write, source: &str) -> std::fmt::Result {
        let renderer = if self.colored {
            Renderer::styled()
        } else {
            Renderer::plain()
        };

        for (i, diag) in self.diagnostics.iter().enumerate() {
            if i > 0 {
                w.write_char('\n')?;
            }
            let report = self.snippet_report(diag, source);
            write!(w, "{}", renderer.render(&report))?;
        }
        Ok(())
    }

    /// Title with the annotated source, plus a patch preview when fixable.
    fn snippet_report<'a>(&self, diag: &'a DiagnosticMessage, source: &'a str) -> Vec<Group<'a>>
    where
        's: 'a,
    {
        let span = byte_span(diag.range(), source.len());

        let mut snippet = Snippet::source(source).line_start(1).annotation(
            AnnotationKind::Primary
                .span(span.clone())
                .label(diag.message()),
        );
        if let Some(path) = self.path {
            snippet = snippet.path(path);
        }

        let mut groups = vec![level(diag.severity()).primary_title(diag.message()).element(snippet)];
        if let Some(fix) = diag.fix() {
            let preview = Snippet::source(source)
                .line_start(1)
                .patch(Patch::new(span, fix.replacement()));
            groups.push(Level::HELP.secondary_title(fix.description()).element(preview));
        }
        groups
    }

    fn write_lines(&self, w: &mut impl Write, source: &str) -> std::fmt::Result {
        let index = LineIndex::new(source);
        for diag in self.diagnostics {
            if let Some(path) = self.path {
                write!(w, "{path}:")?;
            }
            let pos = index.line_col(diag.range().start());
            writeln!(w, "{}:{}: {}", pos.line, pos.col, diag.message())?;
        }
        Ok(())
    }

    fn write_ranges(&self, w: &mut impl Write) -> std::fmt::Result {
        for (i, diag) in self.diagnostics.iter().enumerate() {
            if i > 0 {
                w.write_char('\n')?;
            }
            write!(w, "{diag}")?;
        }
        Ok(())
    }
}

fn level(severity: Severity) -> Level<'static> {
    match severity {
        Severity::Error => Level::ERROR,
        Severity::Warning => Level::WARNING,
    }
}

/// Empty ranges are widened to one byte so they stay visible.
fn byte_span(range: TextRange, len: usize) -> Range<usize> {
    let start = usize::from(range.start());
    let end = usize::from(range.end());
    if start < end {
        start..end
    } else {
        start..(start + 1).min(len)
    }
}
