//! Static types for Go expressions.
//!
//! A lightweight resolver: enough of Go's type system to answer "what is the
//! static type of this expression" for selectors, indexing and calls over
//! declared structs, without loading foreign packages.
//!
//! - `arena` - interned type representation and go/types-style type strings
//! - `check` - package collection and body walking that fills the `TypeTable`

mod arena;
mod check;
mod scope;


use std::collections::HashMap;

use protoget_syntax::SyntaxNode;
use rowan::TextRange;

use crate::program::FileId;

pub use arena::{Field, NamedType, StructType, TypeArena, TypeId, TypeKind};
pub use check::check;

/// Resolves static types of expressions in one source file.
///
/// The analyzer only depends on this trait, so any front end able to type Go
/// expressions can drive it.
pub trait TypeInfo {
    fn arena(&self) -> &TypeArena;

    /// Static type of the expression, or `None` when it cannot be resolved.
    fn type_of(&self, expr: SyntaxNode<'_>) -> Option<TypeId>;
}

/// Expression types for a whole program, keyed by file and source range.
#[derive(Debug, Default)]
pub struct TypeTable {
    arena: TypeArena,
    exprs: HashMap<(FileId, TextRange), TypeId>,
}

impl TypeTable {
    pub fn arena(&self) -> &TypeArena {
        &self.arena
    }

    pub fn get(&self, file: FileId, range: TextRange) -> Option<TypeId> {
        self.exprs.get(&(file, range)).copied()
    }

    pub fn len(&self) -> usize {
        self.exprs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exprs.is_empty()
    }

    /// View restricted to one file.
    pub fn file(&self, file: FileId) -> FileTypes<'_> {
        FileTypes { table: self, file }
    }
}

/// `TypeInfo` for a single file of a checked program.
#[derive(Clone, Copy)]
pub struct FileTypes<'a> {
    table: &'a TypeTable,
    file: FileId,
}

impl TypeInfo for FileTypes<'_> {
    fn arena(&self) -> &TypeArena {
        &self.table.arena
    }

    fn type_of(&self, expr: SyntaxNode<'_>) -> Option<TypeId> {
        self.table.get(self.file, expr.range())
    }
}
