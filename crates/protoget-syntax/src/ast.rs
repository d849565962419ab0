//! Typed AST wrappers over tree-sitter nodes.
//!
//! Each struct wraps a `SyntaxNode` and provides typed accessors.
//! Cast succeeds only for the matching node kind; missing children show up as
//! `None` because tree-sitter recovers from malformed input.

use crate::node::SyntaxNode;

macro_rules! ast_node {
    ($name:ident, $($kind:literal)|+) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub struct $name<'t>(SyntaxNode<'t>);

        impl<'t> $name<'t> {
            pub fn cast(node: SyntaxNode<'t>) -> Option<Self> {
                matches!(node.kind(), $($kind)|+).then_some(Self(node))
            }

            pub fn syntax(&self) -> SyntaxNode<'t> {
                self.0
            }
        }
    };
}

ast_node!(Ident, "identifier");
ast_node!(Selector, "selector_expression");
ast_node!(Index, "index_expression");
ast_node!(Call, "call_expression");
ast_node!(Unary, "unary_expression");
ast_node!(Paren, "parenthesized_expression");
ast_node!(
    Literal,
    "int_literal"
        | "float_literal"
        | "imaginary_literal"
        | "rune_literal"
        | "interpreted_string_literal"
        | "raw_string_literal"
        | "true"
        | "false"
        | "nil"
        | "iota"
);
ast_node!(Assign, "assignment_statement");
ast_node!(ShortVarDecl, "short_var_declaration");
ast_node!(IncDec, "inc_statement" | "dec_statement");
ast_node!(RangeClause, "range_clause");
ast_node!(ImportSpec, "import_spec");

/// Expression shapes the analyzers distinguish.
///
/// The set is closed: anything else lands in `Unsupported`, which callers
/// must handle explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expr<'t> {
    Ident(Ident<'t>),
    Selector(Selector<'t>),
    Index(Index<'t>),
    Call(Call<'t>),
    Unary(Unary<'t>),
    Paren(Paren<'t>),
    Literal(Literal<'t>),
    Unsupported(SyntaxNode<'t>),
}

impl<'t> Expr<'t> {
    pub fn cast(node: SyntaxNode<'t>) -> Self {
        match node.kind() {
            "identifier" => Expr::Ident(Ident(node)),
            "selector_expression" => Expr::Selector(Selector(node)),
            "index_expression" => Expr::Index(Index(node)),
            "call_expression" => Expr::Call(Call(node)),
            "unary_expression" => Expr::Unary(Unary(node)),
            "parenthesized_expression" => Expr::Paren(Paren(node)),
            _ => match Literal::cast(node) {
                Some(lit) => Expr::Literal(lit),
                None => Expr::Unsupported(node),
            },
        }
    }

    pub fn syntax(&self) -> SyntaxNode<'t> {
        match self {
            Expr::Ident(n) => n.syntax(),
            Expr::Selector(n) => n.syntax(),
            Expr::Index(n) => n.syntax(),
            Expr::Call(n) => n.syntax(),
            Expr::Unary(n) => n.syntax(),
            Expr::Paren(n) => n.syntax(),
            Expr::Literal(n) => n.syntax(),
            Expr::Unsupported(n) => *n,
        }
    }
}

impl<'t> Ident<'t> {
    pub fn name(&self) -> &'t str {
        self.0.text()
    }

    pub fn is_blank(&self) -> bool {
        self.name() == "_"
    }
}

impl<'t> Selector<'t> {
    pub fn operand(&self) -> Option<SyntaxNode<'t>> {
        self.0.field("operand")
    }

    pub fn field_name(&self) -> Option<&'t str> {
        self.0.field("field").map(|f| f.text())
    }
}

impl<'t> Index<'t> {
    pub fn operand(&self) -> Option<SyntaxNode<'t>> {
        self.0.field("operand")
    }

    pub fn index(&self) -> Option<SyntaxNode<'t>> {
        self.0.field("index")
    }
}

impl<'t> Call<'t> {
    pub fn function(&self) -> Option<SyntaxNode<'t>> {
        self.0.field("function")
    }

    /// The parenthesized argument list, delimiters included.
    pub fn argument_list(&self) -> Option<SyntaxNode<'t>> {
        self.0.field("arguments")
    }

    pub fn arguments(&self) -> Vec<SyntaxNode<'t>> {
        self.argument_list()
            .map(|list| list.named_children())
            .unwrap_or_default()
    }
}

impl<'t> Unary<'t> {
    pub fn operator(&self) -> Option<&'t str> {
        self.0.field("operator").map(|op| op.text())
    }

    pub fn operand(&self) -> Option<SyntaxNode<'t>> {
        self.0.field("operand")
    }

    pub fn is_address_of(&self) -> bool {
        self.operator() == Some("&")
    }
}

impl<'t> Paren<'t> {
    pub fn inner(&self) -> Option<SyntaxNode<'t>> {
        self.0.first_named_child()
    }
}

impl<'t> Assign<'t> {
    pub fn left(&self) -> Vec<SyntaxNode<'t>> {
        expression_list(self.0.field("left"))
    }

    pub fn right(&self) -> Vec<SyntaxNode<'t>> {
        expression_list(self.0.field("right"))
    }

    /// `=`, `+=`, `<<=`, ...
    pub fn operator(&self) -> Option<&'t str> {
        self.0.field("operator").map(|op| op.text())
    }
}

impl<'t> ShortVarDecl<'t> {
    pub fn left(&self) -> Vec<SyntaxNode<'t>> {
        expression_list(self.0.field("left"))
    }

    pub fn right(&self) -> Vec<SyntaxNode<'t>> {
        expression_list(self.0.field("right"))
    }
}

impl<'t> IncDec<'t> {
    pub fn operand(&self) -> Option<SyntaxNode<'t>> {
        self.0.first_named_child()
    }
}

impl<'t> RangeClause<'t> {
    pub fn left(&self) -> Vec<SyntaxNode<'t>> {
        expression_list(self.0.field("left"))
    }

    pub fn right(&self) -> Option<SyntaxNode<'t>> {
        self.0.field("right")
    }

    /// `for k, v := range xs` declares; `for k, v = range xs` assigns.
    pub fn is_define(&self) -> bool {
        self.0.has_token(":=")
    }
}

impl<'t> ImportSpec<'t> {
    /// Explicit local name: an identifier, `.` or `_`.
    pub fn name(&self) -> Option<&'t str> {
        self.0.field("name").map(|n| n.text())
    }

    /// Import path without quotes.
    pub fn path(&self) -> Option<&'t str> {
        let raw = self.0.field("path")?.text();
        Some(raw.trim_matches(|c| c == '"' || c == '`'))
    }
}

fn expression_list(list: Option<SyntaxNode<'_>>) -> Vec<SyntaxNode<'_>> {
    match list {
        Some(list) if list.kind() == "expression_list" => list.named_children(),
        Some(single) => vec![single],
        None => Vec::new(),
    }
}
