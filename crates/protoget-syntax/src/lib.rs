//! Go syntax layer for protoget.
//!
//! Parses Go sources with tree-sitter and exposes typed wrappers over the
//! concrete tree:
//! - `node` - `SyntaxNode`, a tree-sitter node paired with its source text
//! - `ast` - typed wrappers (`Selector`, `Call`, `Assign`, ...) and the closed `Expr` enum
//!
//! The tree is immutable once parsed. Analyses only read it.

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod ast;
mod node;

#[cfg(test)]
mod lib_tests;

use arborium_tree_sitter as tree_sitter;
use rowan::TextRange;

pub use node::{Preorder, SyntaxNode};

/// Errors that can occur while parsing Go sources.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to load the Go grammar: {0}")]
    Language(#[from] tree_sitter::LanguageError),

    #[error("parser aborted before producing a tree")]
    ParseAborted,
}

pub type Result<T> = std::result::Result<T, Error>;

/// A parsed Go source file. Owns both the text and the tree.
pub struct SourceFile {
    text: String,
    tree: tree_sitter::Tree,
}

impl SourceFile {
    pub fn parse(text: impl Into<String>) -> Result<Self> {
        let text = text.into();
        let mut parser = tree_sitter::Parser::new();
        parser.set_language(&go_language())?;
        let tree = parser.parse(&text, None).ok_or(Error::ParseAborted)?;
        Ok(Self { text, tree })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn root(&self) -> SyntaxNode<'_> {
        SyntaxNode::new(self.tree.root_node(), &self.text)
    }

    pub fn has_errors(&self) -> bool {
        self.tree.root_node().has_error()
    }

    /// Outermost ERROR and MISSING nodes, in source order.
    pub fn error_ranges(&self) -> Vec<TextRange> {
        let mut ranges: Vec<TextRange> = Vec::new();
        for node in self.root().preorder() {
            if !node.is_error() {
                continue;
            }
            let range = node.range();
            if ranges.last().is_some_and(|last| last.contains_range(range)) {
                continue;
            }
            ranges.push(range);
        }
        ranges
    }

    /// Name from the `package` clause.
    pub fn package_name(&self) -> Option<&str> {
        self.root()
            .named_children()
            .into_iter()
            .find(|n| n.kind() == "package_clause")?
            .first_named_child()
            .map(|ident| ident.text())
    }

    pub fn imports(&self) -> Vec<ast::ImportSpec<'_>> {
        self.root()
            .preorder()
            .filter_map(ast::ImportSpec::cast)
            .collect()
    }

    /// Whether the file carries the standard `// Code generated ... DO NOT EDIT.`
    /// marker ahead of its package clause.
    pub fn is_generated(&self) -> bool {
        for line in self.text.lines() {
            let line = line.trim_end();
            if line.starts_with("package ") {
                return false;
            }
            if line.starts_with("// Code generated ") && line.ends_with(" DO NOT EDIT.") {
                return true;
            }
        }
        false
    }
}

impl std::fmt::Debug for SourceFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SourceFile")
            .field("len", &self.text.len())
            .field("has_errors", &self.has_errors())
            .finish()
    }
}

fn go_language() -> tree_sitter::Language {
    arborium_go::language().into()
}
