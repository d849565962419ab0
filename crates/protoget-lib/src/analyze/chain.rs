//! Selector chains and their accessor rewrite.
//!
//! A chain is a root followed by segments, built by descending through the
//! leftmost operand of a field access. Both textual forms are rendered from
//! the same chain, so the accessor form can never double a `Get` prefix or
//! drop a subscript. Text copied into the chain (subscripts, call arguments,
//! opaque roots) has its own message reads rewritten, so one edit covers the
//! whole expression.

use std::fmt::Write;

use protoget_syntax::SyntaxNode;
use protoget_syntax::ast::{Call, Expr, Index, Selector};
use rowan::{TextRange, TextSize};

use super::classify::is_accessor_field;
use super::is_read;
use super::suppress::Suppressed;
use crate::types::TypeInfo;

/// Where a chain starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Root<'t> {
    Ident(&'t str),
    /// Source text kept as written: an opaque call or a nested form the
    /// rewriter does not descend into.
    Verbatim(Text<'t>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment<'t> {
    /// `.Name`, or `.GetName()` when `accessor` is set.
    Field { name: &'t str, accessor: bool },
    /// `[subscript]`.
    Index(Text<'t>),
    /// `.Method(args)`. `args` includes the parentheses.
    Call { method: &'t str, args: Text<'t> },
}

/// Source text copied into both forms. In the accessor form, the message
/// reads inside it are rewritten as well.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Text<'t> {
    literal: &'t str,
    accessor: Option<String>,
}

impl<'t> Text<'t> {
    /// Text without message reads.
    pub fn plain(literal: &'t str) -> Self {
        Self {
            literal,
            accessor: None,
        }
    }

    /// Text of `node`. Returns `None` if a message read inside it cannot be
    /// rewritten.
    pub fn of<T: TypeInfo>(types: &T, node: SyntaxNode<'t>) -> Option<Self> {
        let literal = node.text();
        let offset = |at: TextSize| usize::from(at - node.start());

        let mut suppressed = Suppressed::new();
        let mut accessor = String::new();
        let mut copied = node.start();
        for inner in node.preorder() {
            if inner.start() < copied || !is_read(types, &mut suppressed, inner) {
                continue;
            }
            let Some(rewrite) = rewrite(types, inner) else {
                tracing::debug!(range = ?inner.range(), "unsupported read in copied text");
                return None;
            };
            accessor.push_str(literal.get(offset(copied)..offset(inner.start()))?);
            accessor.push_str(&rewrite.accessor);
            copied = inner.end();
        }

        if copied == node.start() {
            return Some(Self::plain(literal));
        }
        accessor.push_str(literal.get(offset(copied)..)?);
        Some(Self {
            literal,
            accessor: Some(accessor),
        })
    }

    fn render(&self, getters: bool) -> &str {
        match &self.accessor {
            Some(accessor) if getters => accessor.as_str(),
            _ => self.literal,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chain<'t> {
    pub root: Root<'t>,
    pub segments: Vec<Segment<'t>>,
}

impl<'t> Chain<'t> {
    pub fn new(root: Root<'t>) -> Self {
        Self {
            root,
            segments: Vec::new(),
        }
    }

    pub fn push(&mut self, segment: Segment<'t>) {
        self.segments.push(segment);
    }

    /// The chain as written.
    pub fn literal(&self) -> String {
        self.render(false)
    }

    /// The chain with every accessor field read through its getter.
    pub fn accessor(&self) -> String {
        self.render(true)
    }

    fn render(&self, getters: bool) -> String {
        let mut out = match &self.root {
            Root::Ident(name) => (*name).to_owned(),
            Root::Verbatim(text) => text.render(getters).to_owned(),
        };
        for segment in &self.segments {
            let written = match segment {
                Segment::Field {
                    name,
                    accessor: true,
                } if getters => write!(out, ".Get{name}()"),
                Segment::Field { name, .. } => write!(out, ".{name}"),
                Segment::Index(subscript) => write!(out, "[{}]", subscript.render(getters)),
                Segment::Call { method, args } => write!(out, ".{method}{}", args.render(getters)),
            };
            written.expect("String write never fails");
        }
        out
    }
}

/// Both forms of a rewritable expression and the source range they replace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rewrite {
    pub literal: String,
    pub accessor: String,
    pub range: TextRange,
}

/// Rewrites a field access or a method call on a message.
///
/// Returns `None` for shapes the rewriter does not support.
pub fn rewrite<T: TypeInfo>(types: &T, node: SyntaxNode<'_>) -> Option<Rewrite> {
    let chain = match Expr::cast(node) {
        Expr::Selector(selector) => field_chain(types, selector)?,
        Expr::Call(call) => call_chain(types, call)?,
        _ => return None,
    };
    Some(Rewrite {
        literal: chain.literal(),
        accessor: chain.accessor(),
        range: node.range(),
    })
}

/// Chain for `operand.Field`.
pub fn field_chain<'t, T: TypeInfo>(types: &T, selector: Selector<'t>) -> Option<Chain<'t>> {
    let operand = selector.operand()?;
    let name = selector.field_name()?;
    let mut chain = base(types, operand)?;
    chain.push(Segment::Field {
        name,
        accessor: is_accessor_field(types, operand, name),
    });
    Some(chain)
}

fn base<'t, T: TypeInfo>(types: &T, node: SyntaxNode<'t>) -> Option<Chain<'t>> {
    match Expr::cast(node) {
        Expr::Ident(ident) => Some(Chain::new(Root::Ident(ident.name()))),
        Expr::Selector(selector) => field_chain(types, selector)
            .or_else(|| Text::of(types, node).map(|text| Chain::new(Root::Verbatim(text)))),
        Expr::Index(index) => index_chain(types, index),
        Expr::Call(call) => call_chain(types, call),
        other => {
            tracing::debug!(
                kind = other.syntax().kind(),
                range = ?node.range(),
                "unsupported selector base"
            );
            None
        }
    }
}

fn index_chain<'t, T: TypeInfo>(types: &T, index: Index<'t>) -> Option<Chain<'t>> {
    let subscript = Text::of(types, index.index()?)?;
    let mut chain = base(types, index.operand()?)?;
    chain.push(Segment::Index(subscript));
    Some(chain)
}

/// Chain ending in a call. Method calls extend their receiver's chain; any
/// other call is an opaque root.
fn call_chain<'t, T: TypeInfo>(types: &T, call: Call<'t>) -> Option<Chain<'t>> {
    let function = call.function()?;
    let Some(selector) = Selector::cast(function) else {
        return Some(Chain::new(Root::Verbatim(Text::of(types, call.syntax())?)));
    };

    let mut chain = base(types, selector.operand()?)?;
    chain.push(Segment::Call {
        method: selector.field_name()?,
        args: Text::of(types, call.argument_list()?)?,
    });
    Some(chain)
}
