//! Linked type references
//!
//! A [`TypeRef`] is what a field's type provider resolves to once the
//! registry is linked. Declared types are referenced by [`TypeId`] only, so
//! a struct may contain itself (directly or through other types) without
//! owning cycles.

use std::fmt;

use super::{Primitive, TypeId, TypeRegistry};
use crate::reflect::Value;

/// Iteration order of set and map values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ContainerVariant {
    /// Insertion order
    #[default]
    Ordered,
    /// Natural order of elements (sets) or keys (maps)
    Sorted,
}

/// Closed set of field kinds the builder dispatches on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// Any primitive
    Primitive,
    /// Declared enum
    Enum,
    /// Declared struct, union or exception
    Message,
    /// `list<T>`
    List,
    /// `set<T>`
    Set,
    /// `map<K,V>`
    Map,
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FieldKind::Primitive => "primitive",
            FieldKind::Enum => "enum",
            FieldKind::Message => "message",
            FieldKind::List => "list",
            FieldKind::Set => "set",
            FieldKind::Map => "map",
        })
    }
}

/// Resolved type of a field or container item
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeRef {
    /// Primitive type
    Primitive(Primitive),
    /// Declared enum
    Enum(TypeId),
    /// Declared struct, union or exception
    Message(TypeId),
    /// List of items
    List(Box<TypeRef>),
    /// Set of items
    Set(Box<TypeRef>, ContainerVariant),
    /// Map from keys to values
    Map(Box<TypeRef>, Box<TypeRef>, ContainerVariant),
}

impl TypeRef {
    /// Kind used for builder dispatch
    pub fn kind(&self) -> FieldKind {
        match self {
            TypeRef::Primitive(_) => FieldKind::Primitive,
            TypeRef::Enum(_) => FieldKind::Enum,
            TypeRef::Message(_) => FieldKind::Message,
            TypeRef::List(_) => FieldKind::List,
            TypeRef::Set(..) => FieldKind::Set,
            TypeRef::Map(..) => FieldKind::Map,
        }
    }

    /// Check if this is a list, set or map
    pub fn is_container(&self) -> bool {
        matches!(self, TypeRef::List(_) | TypeRef::Set(..) | TypeRef::Map(..))
    }

    /// Item type of a list or set, value type of a map
    pub fn item(&self) -> Option<&TypeRef> {
        match self {
            TypeRef::List(item) | TypeRef::Set(item, _) | TypeRef::Map(_, item, _) => Some(item),
            _ => None,
        }
    }

    /// Key type of a map
    pub fn key(&self) -> Option<&TypeRef> {
        match self {
            TypeRef::Map(key, _, _) => Some(key),
            _ => None,
        }
    }

    /// Declared ordering of a set or map; lists and scalars are always ordered
    pub fn variant(&self) -> ContainerVariant {
        match self {
            TypeRef::Set(_, variant) | TypeRef::Map(_, _, variant) => *variant,
            _ => ContainerVariant::Ordered,
        }
    }

    /// Referenced message type, if this is one
    pub fn message_id(&self) -> Option<TypeId> {
        match self {
            TypeRef::Message(id) => Some(*id),
            _ => None,
        }
    }

    /// Deep check that `value` is an instance of this type.
    ///
    /// Enum and message values are matched by qualified type name, so values
    /// built against another registry holding the same schema are accepted.
    pub fn accepts(&self, value: &Value, registry: &TypeRegistry) -> bool {
        match (self, value) {
            (TypeRef::Primitive(p), v) => p.accepts(v),
            (TypeRef::Enum(id), Value::Enum(e)) => registry
                .enum_descriptor(*id)
                .is_some_and(|d| d.qualified_name() == e.type_name()),
            (TypeRef::Message(id), Value::Message(m)) => registry
                .message(*id)
                .is_some_and(|d| d.qualified_name() == m.qualified_name()),
            (TypeRef::List(item), Value::List(items)) => {
                items.iter().all(|v| item.accepts(v, registry))
            }
            (TypeRef::Set(item, _), Value::Set(items)) => {
                items.iter().all(|v| item.accepts(v, registry))
            }
            (TypeRef::Map(key, item, _), Value::Map(entries)) => entries
                .iter()
                .all(|(k, v)| key.accepts(k, registry) && item.accepts(v, registry)),
            _ => false,
        }
    }

    /// IDL spelling of the type, e.g. `map<string,calc.Point>`
    pub fn type_name(&self, registry: &TypeRegistry) -> String {
        match self {
            TypeRef::Primitive(p) => p.type_name().to_string(),
            TypeRef::Enum(id) | TypeRef::Message(id) => registry
                .get(*id)
                .map(|t| t.qualified_name().to_string())
                .unwrap_or_else(|| id.to_string()),
            TypeRef::List(item) => format!("list<{}>", item.type_name(registry)),
            TypeRef::Set(item, _) => format!("set<{}>", item.type_name(registry)),
            TypeRef::Map(key, item, _) => {
                format!("map<{},{}>", key.type_name(registry), item.type_name(registry))
            }
        }
    }
}
