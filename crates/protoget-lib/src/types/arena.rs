//! Interned Go types.

use std::collections::HashMap;

use indexmap::IndexMap;

/// Handle into a `TypeArena`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeId(u32);

impl TypeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeKind {
    /// Predeclared types: `int`, `string`, `bool`, `error`, ...
    Basic(&'static str),
    Named(NamedType),
    Pointer(TypeId),
    Slice(TypeId),
    Array(String, TypeId),
    Map(TypeId, TypeId),
    Chan(TypeId),
    Struct(StructType),
    /// Function type; only results matter for typing calls.
    Signature(Vec<TypeId>),
    /// Results of a multi-value call, consumed by `a, b := f()`.
    Tuple(Vec<TypeId>),
    Interface,
}

/// A defined type. `underlying` is `None` for types from packages that were
/// not loaded, which makes them opaque.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedType {
    pub package: String,
    pub name: String,
    pub underlying: Option<TypeId>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StructType {
    /// Declaration order is significant.
    pub fields: IndexMap<String, Field>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub name: String,
    pub ty: TypeId,
    pub embedded: bool,
}

impl StructType {
    pub fn first(&self) -> Option<&Field> {
        self.fields.first().map(|(_, field)| field)
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.get(name)
    }
}

#[derive(Debug, Default)]
pub struct TypeArena {
    kinds: Vec<TypeKind>,
    basics: HashMap<&'static str, TypeId>,
    pointers: HashMap<TypeId, TypeId>,
    slices: HashMap<TypeId, TypeId>,
}

impl TypeArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn kind(&self, id: TypeId) -> &TypeKind {
        &self.kinds[id.index()]
    }

    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }

    pub fn alloc(&mut self, kind: TypeKind) -> TypeId {
        let id = TypeId(self.kinds.len() as u32);
        self.kinds.push(kind);
        id
    }

    pub fn basic(&mut self, name: &'static str) -> TypeId {
        if let Some(&id) = self.basics.get(name) {
            return id;
        }
        let id = self.alloc(TypeKind::Basic(name));
        self.basics.insert(name, id);
        id
    }

    pub fn pointer(&mut self, elem: TypeId) -> TypeId {
        if let Some(&id) = self.pointers.get(&elem) {
            return id;
        }
        let id = self.alloc(TypeKind::Pointer(elem));
        self.pointers.insert(elem, id);
        id
    }

    pub fn slice(&mut self, elem: TypeId) -> TypeId {
        if let Some(&id) = self.slices.get(&elem) {
            return id;
        }
        let id = self.alloc(TypeKind::Slice(elem));
        self.slices.insert(elem, id);
        id
    }

    pub fn named(&mut self, package: &str, name: &str) -> TypeId {
        self.alloc(TypeKind::Named(NamedType {
            package: package.to_owned(),
            name: name.to_owned(),
            underlying: None,
        }))
    }

    pub fn set_underlying(&mut self, named: TypeId, underlying: TypeId) {
        if let TypeKind::Named(n) = &mut self.kinds[named.index()] {
            n.underlying = Some(underlying);
        }
    }

    /// Underlying type as defined by Go: named types resolve through their
    /// declaration, everything else is its own underlying type.
    pub fn underlying(&self, id: TypeId) -> Option<TypeId> {
        let mut current = id;
        // Named chains (`type A B`) are resolved at declaration time, but
        // guard against cycles from malformed input.
        for _ in 0..16 {
            match self.kind(current) {
                TypeKind::Named(named) => current = named.underlying?,
                _ => return Some(current),
            }
        }
        None
    }

    pub fn as_named(&self, id: TypeId) -> Option<&NamedType> {
        match self.kind(id) {
            TypeKind::Named(named) => Some(named),
            _ => None,
        }
    }

    pub fn as_struct(&self, id: TypeId) -> Option<&StructType> {
        match self.kind(self.underlying(id)?) {
            TypeKind::Struct(s) => Some(s),
            _ => None,
        }
    }

    /// Pointer element, looking through named pointer types.
    pub fn pointer_elem(&self, id: TypeId) -> Option<TypeId> {
        match self.kind(self.underlying(id)?) {
            TypeKind::Pointer(elem) => Some(*elem),
            _ => None,
        }
    }

    /// Type string in go/types notation, package-qualified by import path.
    pub fn type_string(&self, id: TypeId) -> String {
        let mut out = String::new();
        self.write_type(&mut out, id, 0);
        out
    }

    fn write_type(&self, out: &mut String, id: TypeId, depth: usize) {
        if depth > 32 {
            out.push_str("...");
            return;
        }
        match self.kind(id) {
            TypeKind::Basic(name) => out.push_str(name),
            TypeKind::Named(named) => {
                if !named.package.is_empty() {
                    out.push_str(&named.package);
                    out.push('.');
                }
                out.push_str(&named.name);
            }
            TypeKind::Pointer(elem) => {
                out.push('*');
                self.write_type(out, *elem, depth + 1);
            }
            TypeKind::Slice(elem) => {
                out.push_str("[]");
                self.write_type(out, *elem, depth + 1);
            }
            TypeKind::Array(len, elem) => {
                out.push('[');
                out.push_str(len);
                out.push(']');
                self.write_type(out, *elem, depth + 1);
            }
            TypeKind::Map(key, value) => {
                out.push_str("map[");
                self.write_type(out, *key, depth + 1);
                out.push(']');
                self.write_type(out, *value, depth + 1);
            }
            TypeKind::Chan(elem) => {
                out.push_str("chan ");
                self.write_type(out, *elem, depth + 1);
            }
            TypeKind::Struct(s) => {
                out.push_str("struct{");
                for (i, field) in s.fields.values().enumerate() {
                    if i > 0 {
                        out.push_str("; ");
                    }
                    if !field.embedded {
                        out.push_str(&field.name);
                        out.push(' ');
                    }
                    self.write_type(out, field.ty, depth + 1);
                }
                out.push('}');
            }
            TypeKind::Signature(results) => {
                out.push_str("func()");
                self.write_list(out, results, depth);
            }
            TypeKind::Tuple(items) => self.write_list(out, items, depth),
            TypeKind::Interface => out.push_str("interface{}"),
        }
    }

    fn write_list(&self, out: &mut String, items: &[TypeId], depth: usize) {
        match items {
            [] => {}
            [single] => {
                out.push(' ');
                self.write_type(out, *single, depth + 1);
            }
            many => {
                out.push_str(" (");
                for (i, item) in many.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    self.write_type(out, *item, depth + 1);
                }
                out.push(')');
            }
        }
    }
}
