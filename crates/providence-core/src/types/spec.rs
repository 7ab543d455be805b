//! Declaration specs handed over by the schema loader
//!
//! The IDL parser produces these from a document. Type references are kept
//! by name ([`TypeSpec::Named`]) and only resolved when the registry is
//! linked, which is what lets mutually recursive declarations be added in
//! any order.

use super::{Annotations, ConstValue, MessageVariant, Primitive, Requirement};

/// Unresolved field type, the type provider of a field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeSpec {
    /// Primitive type
    Primitive(Primitive),
    /// Declared type by name, qualified or relative to the declaring package
    Named(String),
    /// `list<T>`
    List(Box<TypeSpec>),
    /// `set<T>`
    Set(Box<TypeSpec>),
    /// `map<K,V>`
    Map(Box<TypeSpec>, Box<TypeSpec>),
}

impl TypeSpec {
    /// Reference a declared type by name
    pub fn named(name: impl Into<String>) -> Self {
        TypeSpec::Named(name.into())
    }

    /// `list<item>`
    pub fn list(item: TypeSpec) -> Self {
        TypeSpec::List(Box::new(item))
    }

    /// `set<item>`
    pub fn set(item: TypeSpec) -> Self {
        TypeSpec::Set(Box::new(item))
    }

    /// `map<key,value>`
    pub fn map(key: TypeSpec, value: TypeSpec) -> Self {
        TypeSpec::Map(Box::new(key), Box::new(value))
    }

    /// Parse a primitive name, falling back to a named reference
    pub fn parse_simple(name: &str) -> Self {
        Primitive::parse(name)
            .map(TypeSpec::Primitive)
            .unwrap_or_else(|| TypeSpec::named(name))
    }
}

impl From<Primitive> for TypeSpec {
    fn from(p: Primitive) -> Self {
        TypeSpec::Primitive(p)
    }
}

/// One declared field
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    /// Field id
    pub id: i32,
    /// Field name
    pub name: String,
    /// Requirement (defaults to [`Requirement::Default`])
    pub requirement: Requirement,
    /// Type provider
    pub type_spec: TypeSpec,
    /// Declared default literal
    pub default: Option<ConstValue>,
    /// Field annotations
    pub annotations: Annotations,
    /// Documentation comment
    pub comment: Option<String>,
}

impl FieldSpec {
    /// Create a field with default requirement and no default value
    pub fn new(id: i32, name: impl Into<String>, type_spec: impl Into<TypeSpec>) -> Self {
        Self {
            id,
            name: name.into(),
            requirement: Requirement::Default,
            type_spec: type_spec.into(),
            default: None,
            annotations: Annotations::new(),
            comment: None,
        }
    }

    /// Mark as required
    pub fn required(mut self) -> Self {
        self.requirement = Requirement::Required;
        self
    }

    /// Mark as optional
    pub fn optional(mut self) -> Self {
        self.requirement = Requirement::Optional;
        self
    }

    /// Set the default literal
    pub fn default_value(mut self, value: ConstValue) -> Self {
        self.default = Some(value);
        self
    }

    /// Add an annotation
    pub fn annotate(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.annotations.insert(key, value);
        self
    }

    /// Set the documentation comment
    pub fn comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }
}

/// A struct, union or exception declaration
#[derive(Debug, Clone, PartialEq)]
pub struct MessageSpec {
    /// Documentation comment
    pub comment: Option<String>,
    /// Package-qualified name, e.g. `calc.Operation`
    pub name: String,
    /// Struct, union or exception
    pub variant: MessageVariant,
    /// Fields in declared order
    pub fields: Vec<FieldSpec>,
    /// Type annotations
    pub annotations: Annotations,
}

impl MessageSpec {
    /// Create an empty declaration
    pub fn new(name: impl Into<String>, variant: MessageVariant) -> Self {
        Self {
            comment: None,
            name: name.into(),
            variant,
            fields: Vec::new(),
            annotations: Annotations::new(),
        }
    }

    /// `struct name { }`
    pub fn structure(name: impl Into<String>) -> Self {
        Self::new(name, MessageVariant::Struct)
    }

    /// `union name { }`
    pub fn union(name: impl Into<String>) -> Self {
        Self::new(name, MessageVariant::Union)
    }

    /// `exception name { }`
    pub fn exception(name: impl Into<String>) -> Self {
        Self::new(name, MessageVariant::Exception)
    }

    /// Append a field
    pub fn field(mut self, field: FieldSpec) -> Self {
        self.fields.push(field);
        self
    }

    /// Add an annotation
    pub fn annotate(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.annotations.insert(key, value);
        self
    }

    /// Set the documentation comment
    pub fn comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }
}

/// An enum declaration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumSpec {
    /// Documentation comment
    pub comment: Option<String>,
    /// Package-qualified name
    pub name: String,
    /// `(name, value)` pairs in declared order
    pub values: Vec<(String, i32)>,
    /// Type annotations
    pub annotations: Annotations,
}

impl EnumSpec {
    /// Create an enum with no values
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            comment: None,
            name: name.into(),
            values: Vec::new(),
            annotations: Annotations::new(),
        }
    }

    /// Append a value
    pub fn value(mut self, name: impl Into<String>, value: i32) -> Self {
        self.values.push((name.into(), value));
        self
    }

    /// Set the documentation comment
    pub fn comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }
}

/// One service method
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodSpec {
    /// Method name
    pub name: String,
    /// Fire-and-forget call without a response
    pub oneway: bool,
    /// Name of the request (parameter) struct
    pub request: String,
    /// Name of the response union, absent for oneway methods
    pub response: Option<String>,
}

impl MethodSpec {
    /// Method with a request and a response type
    pub fn new(name: impl Into<String>, request: impl Into<String>, response: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            oneway: false,
            request: request.into(),
            response: Some(response.into()),
        }
    }

    /// Oneway method with only a request type
    pub fn oneway(name: impl Into<String>, request: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            oneway: true,
            request: request.into(),
            response: None,
        }
    }
}

/// A service declaration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceSpec {
    /// Documentation comment
    pub comment: Option<String>,
    /// Package-qualified name
    pub name: String,
    /// Name of the extended service
    pub extends: Option<String>,
    /// Methods in declared order
    pub methods: Vec<MethodSpec>,
}

impl ServiceSpec {
    /// Create a service with no methods
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            comment: None,
            name: name.into(),
            extends: None,
            methods: Vec::new(),
        }
    }

    /// Extend another service
    pub fn extends(mut self, name: impl Into<String>) -> Self {
        self.extends = Some(name.into());
        self
    }

    /// Append a method
    pub fn method(mut self, method: MethodSpec) -> Self {
        self.methods.push(method);
        self
    }
}
