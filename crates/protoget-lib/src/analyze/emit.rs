//! Turns rewrites into deduplicated diagnostics.

use rowan::TextRange;

use super::chain::Rewrite;
use crate::diagnostics::{DiagnosticKind, Diagnostics};

/// Remembers the last reported range so that inner parts of an already
/// reported chain are not reported again.
#[derive(Debug, Default)]
pub struct Emitter {
    last: Option<TextRange>,
}

impl Emitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reports `rewrite` as a finding with one fix. Returns whether it was reported.
    pub fn emit(&mut self, diagnostics: &mut Diagnostics, rewrite: Rewrite) -> bool {
        let Rewrite {
            literal,
            accessor,
            range,
        } = rewrite;

        if literal.is_empty() || accessor.is_empty() || literal == accessor {
            return false;
        }
        if let Some(last) = self.last
            && (last.start() == range.start() || last.contains_range(range))
        {
            return false;
        }

        tracing::trace!(?range, %literal, %accessor, "field read without getter");
        diagnostics
            .report(DiagnosticKind::FieldReadWithoutGetter, range)
            .message(format!("{literal:?} should be {accessor:?}"))
            .fix(format!("should replace {literal:?} with {accessor:?}"), accessor)
            .emit();
        self.last = Some(range);
        true
    }
}
