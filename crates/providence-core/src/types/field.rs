//! Field model

use std::fmt;

use super::{Annotations, FieldKind, TypeRef};
use crate::reflect::Value;

/// IDL keywords that cannot be used as field names
pub const RESERVED_FIELD_NAMES: &[&str] = &[
    "binary", "bool", "byte", "const", "double", "enum", "exception", "extends", "false", "i16",
    "i32", "i64", "include", "list", "map", "namespace", "oneway", "optional", "required",
    "service", "set", "string", "struct", "throws", "true", "typedef", "union", "void",
];

/// Field requirement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Requirement {
    /// Must be present for the message to be valid
    Required,
    /// May be absent, and absence is meaningful
    Optional,
    /// Neither keyword given
    #[default]
    Default,
}

impl Requirement {
    /// Keyword as written in the IDL (empty for the default)
    pub fn label(&self) -> &'static str {
        match self {
            Requirement::Required => "required",
            Requirement::Optional => "optional",
            Requirement::Default => "",
        }
    }
}

/// Declared default of a field, linked against the field type.
///
/// Message-typed defaults stay a template of field ids and their defaults;
/// records are only materialized once the registry they belong to exists.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldDefault {
    /// Default of a primitive, enum or container field
    Value(Value),
    /// Fields to set on a default message, in literal order
    Message(Vec<(i32, FieldDefault)>),
}

/// One declared field of a struct, union or exception
#[derive(Debug, Clone)]
pub struct Field {
    id: i32,
    name: String,
    requirement: Requirement,
    type_ref: TypeRef,
    default: Option<FieldDefault>,
    annotations: Annotations,
    comment: Option<String>,
}

impl Field {
    pub(crate) fn new(
        id: i32,
        name: String,
        requirement: Requirement,
        type_ref: TypeRef,
        default: Option<FieldDefault>,
        annotations: Annotations,
        comment: Option<String>,
    ) -> Self {
        Self {
            id,
            name,
            requirement,
            type_ref,
            default,
            annotations,
            comment,
        }
    }

    /// Field id
    pub fn id(&self) -> i32 {
        self.id
    }

    /// Field name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Field requirement
    pub fn requirement(&self) -> Requirement {
        self.requirement
    }

    /// Resolved field type
    pub fn type_ref(&self) -> &TypeRef {
        &self.type_ref
    }

    /// Dispatch kind of the field type
    pub fn kind(&self) -> FieldKind {
        self.type_ref.kind()
    }

    /// Declared default value of a non-message field
    pub fn default_value(&self) -> Option<&Value> {
        match &self.default {
            Some(FieldDefault::Value(value)) => Some(value),
            _ => None,
        }
    }

    /// Declared default of a message field, as a template
    pub fn message_default(&self) -> Option<&[(i32, FieldDefault)]> {
        match &self.default {
            Some(FieldDefault::Message(fields)) => Some(fields),
            _ => None,
        }
    }

    /// Field annotations
    pub fn annotations(&self) -> &Annotations {
        &self.annotations
    }

    /// Documentation comment
    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    /// Value read when the field is not set: the declared default, else the
    /// intrinsic zero of a primitive type. Message defaults are not
    /// included, see [`message_default`](Self::message_default).
    pub fn fallback_value(&self) -> Option<&Value> {
        self.default_value().or_else(|| match &self.type_ref {
            TypeRef::Primitive(p) => p.default_value(),
            _ => None,
        })
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: ", self.id)?;
        if self.requirement != Requirement::Default {
            write!(f, "{} ", self.requirement.label())?;
        }
        write!(f, "{}", self.name)
    }
}

pub(crate) fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}
