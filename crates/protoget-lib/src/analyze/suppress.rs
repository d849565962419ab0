//! Start offsets of expressions that are written to or have their address taken.
//!
//! A field access whose start offset is in the set is never rewritten. The set
//! only grows during a traversal. Since traversal is preorder, statements and
//! calls record their targets before the field accesses inside them are seen.

use std::collections::HashSet;

use protoget_syntax::SyntaxNode;
use protoget_syntax::ast::{Assign, Call, Expr, IncDec, Paren, RangeClause, ShortVarDecl, Unary};
use rowan::TextSize;

#[derive(Debug, Default)]
pub struct Suppressed {
    starts: HashSet<TextSize>,
}

impl Suppressed {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, node: SyntaxNode<'_>) -> bool {
        self.starts.contains(&node.start())
    }

    pub fn insert(&mut self, offset: TextSize) {
        self.starts.insert(offset);
    }

    /// Records the targets of `node` if it writes to or takes the address of
    /// expressions. Returns `false` for any other node.
    pub fn record_writes(&mut self, node: SyntaxNode<'_>) -> bool {
        let targets = if let Some(assign) = Assign::cast(node) {
            assign.left()
        } else if let Some(decl) = ShortVarDecl::cast(node) {
            decl.left()
        } else if let Some(clause) = RangeClause::cast(node) {
            if clause.is_define() {
                return true;
            }
            clause.left()
        } else if let Some(step) = IncDec::cast(node) {
            step.operand().into_iter().collect()
        } else if let Some(unary) = Unary::cast(node).filter(Unary::is_address_of) {
            unary.operand().into_iter().collect()
        } else {
            return false;
        };

        for target in targets {
            self.insert(unparen(target).start());
        }
        true
    }

    /// Records a call that is not a method call on a message: its `&` arguments
    /// may be mutated by the callee, and the call itself is not a field read.
    pub fn record_opaque_call(&mut self, call: Call<'_>) {
        for arg in call.arguments() {
            if let Expr::Unary(unary) = Expr::cast(arg)
                && unary.is_address_of()
                && let Some(operand) = unary.operand()
            {
                self.insert(unparen(operand).start());
            }
        }
        self.insert(call.syntax().start());
    }
}

/// `((x))` is the same target as `x`.
fn unparen(mut node: SyntaxNode<'_>) -> SyntaxNode<'_> {
    while let Some(inner) = Paren::cast(node).and_then(|paren| paren.inner()) {
        node = inner;
    }
    node
}
