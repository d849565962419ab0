//! Source-aware handle over tree-sitter nodes.

use arborium_tree_sitter as tree_sitter;
use rowan::{TextRange, TextSize};

/// A tree-sitter node paired with the text it was parsed from.
///
/// Cheap to copy. Comments are extras in the Go grammar and are skipped by the
/// child accessors, so wrappers never see them.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct SyntaxNode<'t> {
    raw: tree_sitter::Node<'t>,
    source: &'t str,
}

impl<'t> SyntaxNode<'t> {
    pub(crate) fn new(raw: tree_sitter::Node<'t>, source: &'t str) -> Self {
        Self { raw, source }
    }

    fn wrap(&self, raw: tree_sitter::Node<'t>) -> Self {
        Self::new(raw, self.source)
    }

    pub fn raw(&self) -> tree_sitter::Node<'t> {
        self.raw
    }

    pub fn kind(&self) -> &'static str {
        self.raw.kind()
    }

    pub fn is_named(&self) -> bool {
        self.raw.is_named()
    }

    pub fn is_error(&self) -> bool {
        self.raw.is_error() || self.raw.is_missing()
    }

    pub fn text(&self) -> &'t str {
        &self.source[self.raw.start_byte()..self.raw.end_byte()]
    }

    pub fn start(&self) -> TextSize {
        TextSize::from(self.raw.start_byte() as u32)
    }

    pub fn end(&self) -> TextSize {
        TextSize::from(self.raw.end_byte() as u32)
    }

    pub fn range(&self) -> TextRange {
        TextRange::new(self.start(), self.end())
    }

    pub fn parent(&self) -> Option<Self> {
        self.raw.parent().map(|n| self.wrap(n))
    }

    /// Child stored under a grammar field, e.g. `operand` of a selector.
    pub fn field(&self, name: &str) -> Option<Self> {
        self.raw.child_by_field_name(name).map(|n| self.wrap(n))
    }

    /// All children stored under a repeated grammar field, e.g. the names of
    /// `a, b int`.
    pub fn fields(&self, name: &str) -> Vec<Self> {
        let mut cursor = self.raw.walk();
        self.raw
            .children_by_field_name(name, &mut cursor)
            .filter(|n| n.kind() != "comment")
            .map(|n| self.wrap(n))
            .collect()
    }

    pub fn named_children(&self) -> Vec<Self> {
        let mut cursor = self.raw.walk();
        self.raw
            .named_children(&mut cursor)
            .filter(|n| n.kind() != "comment")
            .map(|n| self.wrap(n))
            .collect()
    }

    pub fn first_named_child(&self) -> Option<Self> {
        self.named_children().into_iter().next()
    }

    /// Whether an anonymous token with exactly this text is a direct child.
    pub fn has_token(&self, token: &str) -> bool {
        let mut cursor = self.raw.walk();
        let found = self
            .raw
            .children(&mut cursor)
            .any(|n| !n.is_named() && n.kind() == token);
        found
    }

    /// Depth-first, parent-before-children walk over this subtree.
    pub fn preorder(&self) -> Preorder<'t> {
        Preorder {
            cursor: self.raw.walk(),
            source: self.source,
            done: false,
        }
    }
}

impl std::fmt::Debug for SyntaxNode<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}@{}..{}",
            self.kind(),
            u32::from(self.start()),
            u32::from(self.end())
        )
    }
}

/// Preorder iterator over named nodes. Anonymous tokens are skipped.
pub struct Preorder<'t> {
    cursor: tree_sitter::TreeCursor<'t>,
    source: &'t str,
    done: bool,
}

impl<'t> Preorder<'t> {
    fn advance(&mut self) {
        if self.cursor.goto_first_child() {
            return;
        }
        loop {
            if self.cursor.goto_next_sibling() {
                return;
            }
            if !self.cursor.goto_parent() {
                self.done = true;
                return;
            }
        }
    }
}

impl<'t> Iterator for Preorder<'t> {
    type Item = SyntaxNode<'t>;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.done {
            let node = self.cursor.node();
            self.advance();
            if node.is_named() && node.kind() != "comment" {
                return Some(SyntaxNode::new(node, self.source));
            }
        }
        None
    }
}
