//! Package collection and body walking.
//!
//! Checking runs in phases over the whole program so that declarations are
//! visible regardless of file or package order:
//! 1. declare every named type
//! 2. resolve aliases, then underlying types
//! 3. function and method signatures
//! 4. package-level variables and constants
//! 5. function bodies, with lexical scopes

use std::collections::{HashMap, HashSet};

use protoget_syntax::SyntaxNode;
use protoget_syntax::ast::{RangeClause, ShortVarDecl};
use rowan::TextRange;

use super::TypeTable;
use super::arena::{Field, StructType, TypeArena, TypeId, TypeKind};
use super::scope::{Binding, Scopes};
use crate::program::{FileId, PackageId, Program};

const UNIVERSE_TYPES: &[&str] = &[
    "bool",
    "string",
    "int",
    "int8",
    "int16",
    "int32",
    "int64",
    "uint",
    "uint8",
    "uint16",
    "uint32",
    "uint64",
    "uintptr",
    "byte",
    "rune",
    "float32",
    "float64",
    "complex64",
    "complex128",
    "error",
    "any",
];

/// Foreign packages whose exported names are aliases for another package's
/// types. The protobuf runtime re-exports its internal implementation.
const PACKAGE_ALIASES: &[(&str, &str)] = &[(
    "google.golang.org/protobuf/runtime/protoimpl",
    "google.golang.org/protobuf/internal/impl",
)];

const INVALID: &str = "invalid type";

/// Type-check every file of the program.
pub fn check(program: &Program) -> TypeTable {
    let mut checker = Checker::new(program);
    checker.declare_types();
    checker.declare_funcs();
    checker.declare_vars();
    checker.walk_bodies();

    tracing::trace!(
        files = program.len(),
        typed = checker.exprs.len(),
        "type check finished"
    );

    TypeTable {
        arena: checker.arena,
        exprs: checker.exprs,
    }
}

struct Checker<'p> {
    program: &'p Program,
    arena: TypeArena,
    exprs: HashMap<(FileId, TextRange), TypeId>,
    /// Package-level names, indexed by `PackageId`.
    members: Vec<HashMap<String, Binding>>,
    /// Methods keyed by the receiver's base named type.
    methods: HashMap<TypeId, HashMap<String, TypeId>>,
    /// Opaque named types from packages that were not loaded.
    foreign: HashMap<(String, String), TypeId>,

    file: FileId,
    package: PackageId,
    imports: HashMap<String, String>,
    dot_imports: Vec<String>,
    scopes: Scopes,
}

impl<'p> Checker<'p> {
    fn new(program: &'p Program) -> Self {
        let members = program.packages().map(|_| HashMap::new()).collect();
        Self {
            program,
            arena: TypeArena::new(),
            exprs: HashMap::new(),
            members,
            methods: HashMap::new(),
            foreign: HashMap::new(),
            file: FileId::default(),
            package: PackageId::default(),
            imports: HashMap::new(),
            dot_imports: Vec::new(),
            scopes: Scopes::default(),
        }
    }

    fn enter_file(&mut self, file: FileId) {
        let go_file = self.program.file(file);
        self.file = file;
        self.package = go_file.package();
        self.imports.clear();
        self.dot_imports.clear();
        self.scopes.clear();

        for spec in go_file.source().imports() {
            let Some(path) = spec.path() else {
                continue;
            };
            match spec.name() {
                Some(".") => self.dot_imports.push(path.to_owned()),
                Some("_") => {}
                Some(alias) => {
                    self.imports.insert(alias.to_owned(), path.to_owned());
                }
                None => {
                    let alias = self.default_import_name(path);
                    self.imports.insert(alias, path.to_owned());
                }
            }
        }
    }

    fn default_import_name(&self, path: &str) -> String {
        if let Some(pkg) = self.program.package_by_path(path) {
            let name = self.program.package(pkg).name();
            if !name.is_empty() {
                return name.to_owned();
            }
        }
        let mut segments = path.rsplit('/');
        let mut last = segments.next().unwrap_or(path);
        let is_major_version =
            last.len() > 1 && last.starts_with('v') && last[1..].chars().all(|c| c.is_ascii_digit());
        if is_major_version && let Some(prev) = segments.next() {
            last = prev;
        }
        let last = last.split(".v").next().unwrap_or(last);
        last.rsplit('-').next().unwrap_or(last).to_owned()
    }

    fn top_level(&self, file: FileId) -> Vec<SyntaxNode<'p>> {
        self.program.file(file).source().root().named_children()
    }

    // Phase 1 and 2

    fn declare_types(&mut self) {
        let mut aliases = Vec::new();
        let mut specs = Vec::new();

        for file in self.program.file_ids() {
            self.enter_file(file);
            let package_path = self.program.package(self.package).path().to_owned();
            for decl in self.top_level(file) {
                if decl.kind() != "type_declaration" {
                    continue;
                }
                for spec in decl.named_children() {
                    let Some(name) = spec.field("name").map(|n| n.text()) else {
                        continue;
                    };
                    match spec.kind() {
                        "type_spec" => {
                            let named = self.arena.named(&package_path, name);
                            self.members[self.package.index()]
                                .insert(name.to_owned(), Binding::Type(named));
                            specs.push((file, spec, named));
                        }
                        "type_alias" => aliases.push((file, spec, name)),
                        _ => {}
                    }
                }
            }
        }

        for (file, spec, name) in aliases {
            self.enter_file(file);
            let binding = spec
                .field("type")
                .and_then(|t| self.resolve_type(t))
                .map_or(Binding::Unknown, Binding::Type);
            self.members[self.package.index()].insert(name.to_owned(), binding);
        }

        for (file, spec, named) in specs {
            self.enter_file(file);
            let underlying = spec
                .field("type")
                .and_then(|t| self.resolve_type(t))
                .unwrap_or_else(|| self.arena.basic(INVALID));
            self.arena.set_underlying(named, underlying);
        }
    }

    // Phase 3

    fn declare_funcs(&mut self) {
        for file in self.program.file_ids() {
            self.enter_file(file);
            for decl in self.top_level(file) {
                match decl.kind() {
                    "function_declaration" => {
                        let Some(name) = decl.field("name").map(|n| n.text()) else {
                            continue;
                        };
                        let sig = self.signature(decl);
                        self.members[self.package.index()]
                            .insert(name.to_owned(), Binding::Value(sig));
                    }
                    "method_declaration" => {
                        let Some(name) = decl.field("name").map(|n| n.text()) else {
                            continue;
                        };
                        let Some(base) = self.receiver_base(decl) else {
                            continue;
                        };
                        let sig = self.signature(decl);
                        self.methods
                            .entry(base)
                            .or_default()
                            .insert(name.to_owned(), sig);
                    }
                    _ => {}
                }
            }
        }
    }

    fn receiver_base(&mut self, method: SyntaxNode<'p>) -> Option<TypeId> {
        let param = method
            .field("receiver")?
            .named_children()
            .into_iter()
            .find(|p| p.kind() == "parameter_declaration")?;
        let mut ty = param.field("type")?;
        loop {
            match ty.kind() {
                "pointer_type" | "parenthesized_type" => ty = ty.first_named_child()?,
                "generic_type" => ty = ty.field("type")?,
                _ => break,
            }
        }
        match self.members[self.package.index()].get(ty.text()) {
            Some(Binding::Type(id)) => Some(*id),
            _ => None,
        }
    }

    // Phase 4

    fn declare_vars(&mut self) {
        for file in self.program.file_ids() {
            self.enter_file(file);
            for decl in self.top_level(file) {
                if !matches!(decl.kind(), "var_declaration" | "const_declaration") {
                    continue;
                }
                for (name, ty) in self.spec_bindings(decl) {
                    self.members[self.package.index()]
                        .insert(name.to_owned(), ty.map_or(Binding::Unknown, Binding::Value));
                }
            }
        }
    }

    /// Names declared by a `var`/`const` declaration with their types.
    fn spec_bindings(&mut self, decl: SyntaxNode<'p>) -> Vec<(&'p str, Option<TypeId>)> {
        let mut specs = Vec::new();
        for child in decl.named_children() {
            match child.kind() {
                "var_spec" | "const_spec" => specs.push(child),
                "var_spec_list" | "const_spec_list" => specs.extend(
                    child
                        .named_children()
                        .into_iter()
                        .filter(|s| matches!(s.kind(), "var_spec" | "const_spec")),
                ),
                _ => {}
            }
        }

        let mut bindings = Vec::new();
        for spec in specs {
            let names = spec.fields("name");
            let declared = spec.field("type").and_then(|t| self.resolve_type(t));
            let values = spec
                .field("value")
                .map(|list| list.named_children())
                .unwrap_or_default();
            let inferred = self.value_types(&values, names.len());
            for (i, name) in names.iter().enumerate() {
                let ty = declared.or_else(|| inferred.get(i).copied().flatten());
                bindings.push((name.text(), ty));
            }
        }
        bindings
    }

    // Phase 5

    fn walk_bodies(&mut self) {
        for file in self.program.file_ids() {
            self.enter_file(file);
            for decl in self.top_level(file) {
                if matches!(decl.kind(), "function_declaration" | "method_declaration") {
                    self.walk_func(decl);
                }
            }
        }
    }

    fn walk_func(&mut self, func: SyntaxNode<'p>) {
        self.scopes.clear();
        self.scopes.push();
        self.bind_params(func.field("receiver"));
        self.bind_params(func.field("parameters"));
        self.bind_params(func.field("result"));
        if let Some(body) = func.field("body") {
            self.walk(body);
        }
        self.scopes.pop();
    }

    fn bind_params(&mut self, list: Option<SyntaxNode<'p>>) {
        let Some(list) = list else {
            return;
        };
        if list.kind() != "parameter_list" {
            return;
        }
        for param in list.named_children() {
            let ty = param.field("type").and_then(|t| self.resolve_type(t));
            let ty = match param.kind() {
                "parameter_declaration" => ty,
                "variadic_parameter_declaration" => ty.map(|t| self.arena.slice(t)),
                _ => continue,
            };
            for name in param.fields("name") {
                self.scopes.bind_value(name.text(), ty);
            }
        }
    }

    fn walk(&mut self, node: SyntaxNode<'p>) {
        match node.kind() {
            "block"
            | "if_statement"
            | "for_statement"
            | "expression_switch_statement"
            | "select_statement"
            | "expression_case"
            | "default_case"
            | "communication_case" => {
                self.scopes.push();
                self.walk_children(node);
                self.scopes.pop();
            }
            "type_switch_statement" => self.type_switch(node),
            "short_var_declaration" => self.short_var_decl(node),
            "var_declaration" | "const_declaration" => {
                for (name, ty) in self.spec_bindings(node) {
                    self.scopes.bind_value(name, ty);
                }
            }
            "range_clause" => self.range_clause(node),
            "type_declaration" => self.local_types(node),
            "function_declaration" | "method_declaration" => self.walk_func(node),
            kind if is_expression(kind) => {
                self.expr(node);
            }
            _ => self.walk_children(node),
        }
    }

    fn walk_children(&mut self, node: SyntaxNode<'p>) {
        for child in node.named_children() {
            self.walk(child);
        }
    }

    fn short_var_decl(&mut self, node: SyntaxNode<'p>) {
        let Some(decl) = ShortVarDecl::cast(node) else {
            return;
        };
        let left = decl.left();
        let types = self.value_types(&decl.right(), left.len());
        for (i, target) in left.iter().enumerate() {
            if target.kind() == "identifier" {
                self.scopes
                    .bind_value(target.text(), types.get(i).copied().flatten());
            }
        }
    }

    /// Types of right-hand sides, spreading multi-value calls and comma-ok
    /// forms over `want` targets.
    fn value_types(&mut self, values: &[SyntaxNode<'p>], want: usize) -> Vec<Option<TypeId>> {
        let types: Vec<Option<TypeId>> = values.iter().map(|v| self.expr(*v)).collect();
        if values.len() != 1 || want < 2 {
            return types;
        }

        let single = types[0];
        if let Some(ty) = single
            && let TypeKind::Tuple(items) = self.arena.kind(ty)
        {
            return items.iter().map(|t| Some(*t)).collect();
        }

        let ok = self.arena.basic("bool");
        let mut spread = vec![single, Some(ok)];
        spread.resize(want, None);
        spread
    }

    fn range_clause(&mut self, node: SyntaxNode<'p>) {
        let Some(clause) = RangeClause::cast(node) else {
            return;
        };
        let ranged = clause.right().and_then(|r| self.expr(r));
        let (key, value) = self.range_types(ranged);

        if !clause.is_define() {
            for target in clause.left() {
                self.expr(target);
            }
            return;
        }

        for (i, target) in clause.left().iter().enumerate() {
            if target.kind() == "identifier" {
                self.scopes
                    .bind_value(target.text(), if i == 0 { key } else { value });
            }
        }
    }

    fn range_types(&mut self, ranged: Option<TypeId>) -> (Option<TypeId>, Option<TypeId>) {
        let Some(under) = ranged.and_then(|t| self.arena.underlying(t)) else {
            return (None, None);
        };
        let int = self.arena.basic("int");
        match self.arena.kind(under).clone() {
            TypeKind::Slice(elem) | TypeKind::Array(_, elem) => (Some(int), Some(elem)),
            TypeKind::Map(key, value) => (Some(key), Some(value)),
            TypeKind::Chan(elem) => (Some(elem), None),
            TypeKind::Pointer(elem) => match self.arena.underlying(elem).map(|u| self.arena.kind(u)) {
                Some(TypeKind::Array(_, elem)) => (Some(int), Some(*elem)),
                _ => (None, None),
            },
            TypeKind::Basic("string") => {
                let rune = self.arena.basic("rune");
                (Some(int), Some(rune))
            }
            TypeKind::Basic(_) => (ranged, None),
            _ => (None, None),
        }
    }

    fn type_switch(&mut self, node: SyntaxNode<'p>) {
        self.scopes.push();
        if let Some(init) = node.field("initializer") {
            self.walk(init);
        }
        let switched = node.field("value").and_then(|v| self.expr(v));
        let alias = node
            .field("alias")
            .and_then(|list| list.first_named_child())
            .map(|ident| ident.text());

        for case in node.named_children() {
            if !matches!(case.kind(), "type_case" | "default_case") {
                continue;
            }
            self.scopes.push();
            let case_types = case.fields("type");
            if let Some(alias) = alias {
                let ty = match case_types.as_slice() {
                    [single] => self.resolve_type(*single),
                    _ => switched,
                };
                self.scopes.bind_value(alias, ty);
            }
            for child in case.named_children() {
                if !case_types.contains(&child) {
                    self.walk(child);
                }
            }
            self.scopes.pop();
        }
        self.scopes.pop();
    }

    fn local_types(&mut self, decl: SyntaxNode<'p>) {
        let package_path = self.program.package(self.package).path().to_owned();
        for spec in decl.named_children() {
            let Some(name) = spec.field("name").map(|n| n.text()) else {
                continue;
            };
            let ty = spec.field("type");
            match spec.kind() {
                "type_spec" => {
                    let named = self.arena.named(&package_path, name);
                    self.scopes.bind(name, Binding::Type(named));
                    let underlying = ty
                        .and_then(|t| self.resolve_type(t))
                        .unwrap_or_else(|| self.arena.basic(INVALID));
                    self.arena.set_underlying(named, underlying);
                }
                "type_alias" => {
                    let binding = ty
                        .and_then(|t| self.resolve_type(t))
                        .map_or(Binding::Unknown, Binding::Type);
                    self.scopes.bind(name, binding);
                }
                _ => {}
            }
        }
    }

    // Expressions

    fn expr(&mut self, node: SyntaxNode<'p>) -> Option<TypeId> {
        let ty = self.expr_type(node);
        if let Some(ty) = ty {
            self.exprs.insert((self.file, node.range()), ty);
        }
        ty
    }

    fn expr_opt(&mut self, node: Option<SyntaxNode<'p>>) -> Option<TypeId> {
        node.and_then(|n| self.expr(n))
    }

    fn expr_type(&mut self, node: SyntaxNode<'p>) -> Option<TypeId> {
        match node.kind() {
            "identifier" => self.lookup_value(node.text()),
            "selector_expression" => self.selector(node),
            "index_expression" => {
                let operand = self.expr_opt(node.field("operand"));
                self.expr_opt(node.field("index"));
                self.element(operand?)
            }
            "slice_expression" => {
                let operand = self.expr_opt(node.field("operand"));
                for part in ["start", "end", "capacity"] {
                    self.expr_opt(node.field(part));
                }
                self.sliced(operand?)
            }
            "call_expression" => self.call(node),
            "unary_expression" => {
                let operand = self.expr_opt(node.field("operand"));
                match node.field("operator").map(|op| op.text()) {
                    Some("&") => operand.map(|t| self.arena.pointer(t)),
                    Some("*") => self.arena.pointer_elem(operand?),
                    Some("<-") => match self.arena.kind(self.arena.underlying(operand?)?) {
                        TypeKind::Chan(elem) => Some(*elem),
                        _ => None,
                    },
                    Some("!") => Some(self.arena.basic("bool")),
                    _ => operand,
                }
            }
            "binary_expression" => {
                let left = self.expr_opt(node.field("left"));
                let right = self.expr_opt(node.field("right"));
                match node.field("operator").map(|op| op.text()) {
                    Some("==" | "!=" | "<" | "<=" | ">" | ">=" | "&&" | "||") => {
                        Some(self.arena.basic("bool"))
                    }
                    Some("<<" | ">>") => left,
                    _ => left.or(right),
                }
            }
            "parenthesized_expression" => self.expr_opt(node.first_named_child()),
            "composite_literal" => {
                let ty = node.field("type").and_then(|t| self.resolve_type(t));
                if let Some(body) = node.field("body") {
                    self.walk(body);
                }
                ty
            }
            "func_literal" => {
                let sig = self.signature(node);
                self.scopes.push();
                self.bind_params(node.field("parameters"));
                self.bind_params(node.field("result"));
                if let Some(body) = node.field("body") {
                    self.walk(body);
                }
                self.scopes.pop();
                Some(sig)
            }
            "type_assertion_expression" | "type_conversion_expression" => {
                self.expr_opt(node.field("operand"));
                node.field("type").and_then(|t| self.resolve_type(t))
            }
            "int_literal" | "iota" => Some(self.arena.basic("int")),
            "float_literal" => Some(self.arena.basic("float64")),
            "imaginary_literal" => Some(self.arena.basic("complex128")),
            "rune_literal" => Some(self.arena.basic("rune")),
            "interpreted_string_literal" | "raw_string_literal" => {
                Some(self.arena.basic("string"))
            }
            "true" | "false" => Some(self.arena.basic("bool")),
            _ => {
                self.walk_children(node);
                None
            }
        }
    }

    fn selector(&mut self, node: SyntaxNode<'p>) -> Option<TypeId> {
        let operand = node.field("operand")?;
        let name = node.field("field")?.text();

        if let Some(path) = self.package_qualifier(operand) {
            return self.package_value(&path, name);
        }

        let base = self.expr(operand)?;
        self.member(base, name)
    }

    /// Import path when `node` is an identifier naming an imported package.
    fn package_qualifier(&self, node: SyntaxNode<'p>) -> Option<String> {
        if node.kind() != "identifier" {
            return None;
        }
        let name = node.text();
        if self.scopes.lookup(name).is_some()
            || self.members[self.package.index()].contains_key(name)
        {
            return None;
        }
        self.imports.get(name).cloned()
    }

    fn package_value(&self, path: &str, name: &str) -> Option<TypeId> {
        let pkg = self.program.package_by_path(path)?;
        match self.members[pkg.index()].get(name) {
            Some(Binding::Value(ty)) => Some(*ty),
            _ => None,
        }
    }

    /// Field or method `name` on `ty`, following pointers and promoted
    /// members of embedded fields breadth-first.
    fn member(&self, ty: TypeId, name: &str) -> Option<TypeId> {
        let mut seen = HashSet::new();
        let mut level = vec![ty];

        while !level.is_empty() {
            let mut next = Vec::new();
            for ty in level {
                let base = match self.arena.kind(ty) {
                    TypeKind::Pointer(elem) => *elem,
                    _ => ty,
                };
                if !seen.insert(base) {
                    continue;
                }
                if let Some(method) = self.methods.get(&base).and_then(|m| m.get(name)) {
                    return Some(*method);
                }
                let Some(fields) = self.arena.as_struct(base) else {
                    continue;
                };
                if let Some(field) = fields.field(name) {
                    return Some(field.ty);
                }
                next.extend(fields.fields.values().filter(|f| f.embedded).map(|f| f.ty));
            }
            level = next;
        }
        None
    }

    fn element(&mut self, ty: TypeId) -> Option<TypeId> {
        let under = self.arena.underlying(ty)?;
        match self.arena.kind(under) {
            TypeKind::Slice(elem) | TypeKind::Array(_, elem) => Some(*elem),
            TypeKind::Map(_, value) => Some(*value),
            TypeKind::Pointer(elem) => match self.arena.kind(self.arena.underlying(*elem)?) {
                TypeKind::Array(_, elem) => Some(*elem),
                _ => None,
            },
            TypeKind::Basic("string") => Some(self.arena.basic("byte")),
            _ => None,
        }
    }

    fn sliced(&mut self, ty: TypeId) -> Option<TypeId> {
        let under = self.arena.underlying(ty)?;
        let elem = match self.arena.kind(under) {
            TypeKind::Array(_, elem) => *elem,
            TypeKind::Pointer(ptr) => match self.arena.kind(self.arena.underlying(*ptr)?) {
                TypeKind::Array(_, elem) => *elem,
                _ => return None,
            },
            _ => return Some(ty),
        };
        Some(self.arena.slice(elem))
    }

    fn call(&mut self, node: SyntaxNode<'p>) -> Option<TypeId> {
        let args = node
            .field("arguments")
            .map(|list| list.named_children())
            .unwrap_or_default();
        let Some(function) = node.field("function") else {
            for arg in args {
                self.expr(arg);
            }
            return None;
        };

        if function.kind() == "identifier"
            && self.lookup_value(function.text()).is_none()
            && self.lookup_type(function.text()).is_none()
            && let Some(result) = self.builtin(function.text(), &args)
        {
            return result;
        }

        if let Some(target) = self.conversion_target(function) {
            for arg in args {
                self.expr(arg);
            }
            return Some(target);
        }

        let callee = self.expr(function);
        for arg in args {
            self.expr(arg);
        }

        let results = match self.arena.kind(self.arena.underlying(callee?)?) {
            TypeKind::Signature(results) => results.clone(),
            _ => return None,
        };
        match results.as_slice() {
            [] => None,
            [single] => Some(*single),
            _ => Some(self.arena.alloc(TypeKind::Tuple(results))),
        }
    }

    /// Result type of a builtin call. `None` when `name` is not a builtin.
    fn builtin(&mut self, name: &str, args: &[SyntaxNode<'p>]) -> Option<Option<TypeId>> {
        let first = args.first().copied();
        let (result, rest) = match name {
            "new" => {
                let ty = first.and_then(|t| self.resolve_type(t));
                (ty.map(|t| self.arena.pointer(t)), args.get(1..))
            }
            "make" => (first.and_then(|t| self.resolve_type(t)), args.get(1..)),
            "append" | "min" | "max" => (first.and_then(|a| self.expr(a)), args.get(1..)),
            "len" | "cap" | "copy" => (Some(self.arena.basic("int")), Some(args)),
            "real" | "imag" => (Some(self.arena.basic("float64")), Some(args)),
            "complex" => (Some(self.arena.basic("complex128")), Some(args)),
            "recover" => (Some(self.arena.basic("any")), Some(args)),
            "panic" | "print" | "println" | "delete" | "close" | "clear" => (None, Some(args)),
            _ => return None,
        };
        for arg in rest.unwrap_or_default() {
            self.expr(*arg);
        }
        Some(result)
    }

    /// Target type when the callee denotes a type, making the call a conversion.
    fn conversion_target(&mut self, function: SyntaxNode<'p>) -> Option<TypeId> {
        match function.kind() {
            "identifier" => self.lookup_type(function.text()),
            "selector_expression" => {
                let path = self.package_qualifier(function.field("operand")?)?;
                let name = function.field("field")?.text();
                self.loaded_type(&path, name)
            }
            "parenthesized_expression" => {
                let inner = function.first_named_child()?;
                if inner.kind() == "unary_expression"
                    && inner.field("operator").map(|op| op.text()) == Some("*")
                {
                    let elem = self.type_expr(inner.field("operand")?)?;
                    return Some(self.arena.pointer(elem));
                }
                self.type_expr(inner)
            }
            "slice_type" | "array_type" | "map_type" | "pointer_type" | "qualified_type"
            | "channel_type" | "function_type" | "interface_type" => self.resolve_type(function),
            _ => None,
        }
    }

    /// Like `resolve_type`, but only for nodes that cannot be values.
    fn type_expr(&mut self, node: SyntaxNode<'p>) -> Option<TypeId> {
        match node.kind() {
            "identifier" | "selector_expression" => self.conversion_target(node),
            _ => self.resolve_type(node),
        }
    }

    // Names

    fn lookup_value(&self, name: &str) -> Option<TypeId> {
        match self.scopes.lookup(name) {
            Some(Binding::Value(ty)) => return Some(ty),
            Some(_) => return None,
            None => {}
        }
        match self.members[self.package.index()].get(name) {
            Some(Binding::Value(ty)) => return Some(*ty),
            Some(_) => return None,
            None => {}
        }
        self.dot_imports
            .iter()
            .find_map(|path| self.package_value(path, name))
    }

    fn lookup_type(&mut self, name: &str) -> Option<TypeId> {
        match self.scopes.lookup(name) {
            Some(Binding::Type(ty)) => return Some(ty),
            Some(_) => return None,
            None => {}
        }
        match self.members[self.package.index()].get(name) {
            Some(Binding::Type(ty)) => return Some(*ty),
            Some(_) => return None,
            None => {}
        }
        if let Some(ty) = self
            .dot_imports
            .iter()
            .find_map(|path| self.loaded_type(path, name))
        {
            return Some(ty);
        }
        let universe = UNIVERSE_TYPES.iter().find(|t| **t == name)?;
        Some(self.arena.basic(*universe))
    }

    /// Type `name` declared by the loaded package at `path`.
    fn loaded_type(&self, path: &str, name: &str) -> Option<TypeId> {
        let pkg = self.program.package_by_path(path)?;
        match self.members[pkg.index()].get(name) {
            Some(Binding::Type(ty)) => Some(*ty),
            _ => None,
        }
    }

    /// Type `name` of the package at `path` in a type position. Packages that
    /// were not loaded yield opaque named types.
    fn package_type(&mut self, path: &str, name: &str) -> Option<TypeId> {
        if self.program.package_by_path(path).is_some() {
            return self.loaded_type(path, name);
        }

        let path = PACKAGE_ALIASES
            .iter()
            .find(|(from, _)| *from == path)
            .map_or(path, |(_, to)| *to);
        let key = (path.to_owned(), name.to_owned());
        if let Some(ty) = self.foreign.get(&key) {
            return Some(*ty);
        }
        let ty = self.arena.named(path, name);
        self.foreign.insert(key, ty);
        Some(ty)
    }

    // Type syntax

    fn resolve_type(&mut self, node: SyntaxNode<'p>) -> Option<TypeId> {
        match node.kind() {
            "type_identifier" | "identifier" => self.lookup_type(node.text()),
            "qualified_type" => {
                let package = node.field("package")?.text();
                let name = node.field("name")?.text();
                let path = self.imports.get(package)?.clone();
                self.package_type(&path, name)
            }
            "selector_expression" => {
                let package = node.field("operand")?;
                let name = node.field("field")?.text();
                let path = self.imports.get(package.text())?.clone();
                self.package_type(&path, name)
            }
            "pointer_type" => {
                let elem = self.resolve_type(node.first_named_child()?)?;
                Some(self.arena.pointer(elem))
            }
            "slice_type" => {
                let elem = self.resolve_type(node.field("element")?)?;
                Some(self.arena.slice(elem))
            }
            "array_type" | "implicit_length_array_type" => {
                let len = node.field("length").map_or("...", |l| l.text()).to_owned();
                let elem = self.resolve_type(node.field("element")?)?;
                Some(self.arena.alloc(TypeKind::Array(len, elem)))
            }
            "map_type" => {
                let key = self.resolve_type(node.field("key")?)?;
                let value = self.resolve_type(node.field("value")?)?;
                Some(self.arena.alloc(TypeKind::Map(key, value)))
            }
            "channel_type" => {
                let elem = self.resolve_type(node.field("value")?)?;
                Some(self.arena.alloc(TypeKind::Chan(elem)))
            }
            "struct_type" => Some(self.struct_type(node)),
            "interface_type" => Some(self.arena.alloc(TypeKind::Interface)),
            "function_type" => Some(self.signature(node)),
            "generic_type" => self.resolve_type(node.field("type")?),
            "parenthesized_type" => self.resolve_type(node.first_named_child()?),
            _ => None,
        }
    }

    fn struct_type(&mut self, node: SyntaxNode<'p>) -> TypeId {
        let mut fields = StructType::default();
        let decls = node
            .named_children()
            .into_iter()
            .filter(|n| n.kind() == "field_declaration_list")
            .flat_map(|list| list.named_children())
            .filter(|n| n.kind() == "field_declaration");

        for decl in decls {
            let Some(type_node) = decl.field("type") else {
                continue;
            };
            let resolved = self.resolve_type(type_node);
            let ty = resolved.unwrap_or_else(|| self.arena.basic(INVALID));
            let names = decl.fields("name");

            if names.is_empty() {
                let ty = if decl.has_token("*") {
                    self.arena.pointer(ty)
                } else {
                    ty
                };
                let name = embedded_name(type_node).to_owned();
                fields.fields.insert(
                    name.clone(),
                    Field {
                        name,
                        ty,
                        embedded: true,
                    },
                );
                continue;
            }

            for name in names {
                fields.fields.insert(
                    name.text().to_owned(),
                    Field {
                        name: name.text().to_owned(),
                        ty,
                        embedded: false,
                    },
                );
            }
        }

        self.arena.alloc(TypeKind::Struct(fields))
    }

    fn signature(&mut self, node: SyntaxNode<'p>) -> TypeId {
        let mut results = Vec::new();
        if let Some(result) = node.field("result") {
            if result.kind() == "parameter_list" {
                for param in result.named_children() {
                    let ty = param
                        .field("type")
                        .and_then(|t| self.resolve_type(t))
                        .unwrap_or_else(|| self.arena.basic(INVALID));
                    let count = param.fields("name").len().max(1);
                    results.extend(std::iter::repeat_n(ty, count));
                }
            } else {
                let ty = self
                    .resolve_type(result)
                    .unwrap_or_else(|| self.arena.basic(INVALID));
                results.push(ty);
            }
        }
        self.arena.alloc(TypeKind::Signature(results))
    }
}

/// Field name introduced by an embedded type: `pkg.Base` and `*Base` embed `Base`.
fn embedded_name(type_node: SyntaxNode<'_>) -> &str {
    let mut node = type_node;
    loop {
        let next = match node.kind() {
            "qualified_type" => node.field("name"),
            "generic_type" => node.field("type"),
            "pointer_type" => node.first_named_child(),
            _ => None,
        };
        match next {
            Some(inner) => node = inner,
            None => return node.text(),
        }
    }
}

fn is_expression(kind: &str) -> bool {
    matches!(
        kind,
        "identifier"
            | "selector_expression"
            | "index_expression"
            | "slice_expression"
            | "call_expression"
            | "unary_expression"
            | "binary_expression"
            | "parenthesized_expression"
            | "composite_literal"
            | "func_literal"
            | "type_assertion_expression"
            | "type_conversion_expression"
            | "type_instantiation_expression"
            | "int_literal"
            | "float_literal"
            | "imaginary_literal"
            | "rune_literal"
            | "interpreted_string_literal"
            | "raw_string_literal"
            | "true"
            | "false"
            | "nil"
            | "iota"
    )
}
