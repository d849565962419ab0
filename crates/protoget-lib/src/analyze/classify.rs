//! Recognizes generated protobuf message types.

use protoget_syntax::SyntaxNode;

use crate::types::{StructType, TypeInfo, TypeKind};

/// Type of the first field embedded by protoc-gen-go in every message struct.
/// `protoimpl.MessageState` is an alias of this type.
pub const MESSAGE_STATE: &str = "google.golang.org/protobuf/internal/impl.MessageState";

/// Whether `expr` is a pointer to a generated message.
pub fn is_message<T: TypeInfo>(types: &T, expr: SyntaxNode<'_>) -> bool {
    message_struct(types, expr).is_some()
}

/// Whether `operand.field` reads an exported field of a generated message,
/// i.e. a field that has a `GetField()` accessor.
///
/// Methods and unexported fields (`state`, `sizeCache`, ...) have no accessor.
pub fn is_accessor_field<T: TypeInfo>(types: &T, operand: SyntaxNode<'_>, field: &str) -> bool {
    let Some(message) = message_struct(types, operand) else {
        return false;
    };
    message.field(field).is_some() && is_exported(field)
}

fn message_struct<'a, T: TypeInfo>(types: &'a T, expr: SyntaxNode<'_>) -> Option<&'a StructType> {
    let arena = types.arena();
    let ty = types.type_of(expr)?;
    let TypeKind::Pointer(elem) = arena.kind(ty) else {
        return None;
    };
    arena.as_named(*elem)?;
    let fields = arena.as_struct(*elem)?;
    let first = fields.first()?;
    (arena.type_string(first.ty) == MESSAGE_STATE).then_some(fields)
}

fn is_exported(name: &str) -> bool {
    name.chars().next().is_some_and(char::is_uppercase)
}
