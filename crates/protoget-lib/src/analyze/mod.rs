//! The getter rewrite analysis.
//!
//! One preorder traversal per file:
//! - `suppress` - write targets and `&` operands, never rewritten
//! - `classify` - is an expression a pointer to a generated message
//! - `chain` - literal and accessor forms of a selector chain
//! - `emit` - deduplication and diagnostic construction

mod chain;
mod classify;
mod emit;
mod suppress;

#[cfg(test)]
mod analyze_tests;

use protoget_syntax::ast::{Expr, Selector};
use protoget_syntax::{SourceFile, SyntaxNode};

use crate::diagnostics::Diagnostics;
use crate::types::TypeInfo;

pub use chain::{Chain, Rewrite, Root, Segment, Text, rewrite};
pub use classify::{MESSAGE_STATE, is_accessor_field, is_message};
pub use emit::Emitter;
pub use suppress::Suppressed;

/// Name under which findings are grouped in machine-readable output.
pub const ANALYZER_NAME: &str = "getters";

/// Finds direct field reads on generated messages in one file.
pub fn analyze<T: TypeInfo>(source: &SourceFile, types: &T) -> Diagnostics {
    let mut pass = Pass {
        types,
        suppressed: Suppressed::new(),
        emitter: Emitter::new(),
        diagnostics: Diagnostics::new(),
    };
    for node in source.root().preorder() {
        pass.visit(node);
    }
    pass.diagnostics
}

struct Pass<'a, T> {
    types: &'a T,
    suppressed: Suppressed,
    emitter: Emitter,
    diagnostics: Diagnostics,
}

impl<T: TypeInfo> Pass<'_, T> {
    fn visit(&mut self, node: SyntaxNode<'_>) {
        if !is_read(self.types, &mut self.suppressed, node) {
            return;
        }
        if let Some(rewrite) = rewrite(self.types, node) {
            self.emitter.emit(&mut self.diagnostics, rewrite);
        }
    }
}

/// Whether `node` reads a message field or calls a method on a message, and
/// is not suppressed. Records the writes and opaque calls `node` introduces.
fn is_read<T: TypeInfo>(types: &T, suppressed: &mut Suppressed, node: SyntaxNode<'_>) -> bool {
    if suppressed.record_writes(node) {
        return false;
    }
    let read = match Expr::cast(node) {
        Expr::Call(call) => {
            let on_message = call
                .function()
                .and_then(Selector::cast)
                .and_then(|callee| callee.operand())
                .is_some_and(|receiver| is_message(types, receiver));
            if !on_message {
                suppressed.record_opaque_call(call);
            }
            on_message
        }
        Expr::Selector(selector) => match (selector.operand(), selector.field_name()) {
            (Some(operand), Some(field)) => is_accessor_field(types, operand, field),
            _ => false,
        },
        _ => false,
    };
    read && !suppressed.contains(node)
}
