//! Lexical scopes for body walking.

use std::collections::HashMap;

use super::arena::TypeId;

/// What a name denotes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Binding {
    /// A variable, constant, or function value of the given type.
    Value(TypeId),
    /// A type name.
    Type(TypeId),
    /// A name whose type could not be resolved. Still shadows outer bindings.
    Unknown,
}

#[derive(Debug, Default)]
pub(super) struct Scopes {
    stack: Vec<HashMap<String, Binding>>,
}

impl Scopes {
    pub fn push(&mut self) {
        self.stack.push(HashMap::new());
    }

    pub fn pop(&mut self) {
        self.stack.pop();
    }

    pub fn clear(&mut self) {
        self.stack.clear();
    }

    pub fn bind(&mut self, name: &str, binding: Binding) {
        if name == "_" {
            return;
        }
        if let Some(scope) = self.stack.last_mut() {
            scope.insert(name.to_owned(), binding);
        }
    }

    pub fn bind_value(&mut self, name: &str, ty: Option<TypeId>) {
        self.bind(name, ty.map_or(Binding::Unknown, Binding::Value));
    }

    /// Innermost binding for `name`, if any local scope declares it.
    pub fn lookup(&self, name: &str) -> Option<Binding> {
        self.stack
            .iter()
            .rev()
            .find_map(|scope| scope.get(name).copied())
    }
}
