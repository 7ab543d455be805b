//! Error types for schema construction, reflective access and validation

use thiserror::Error;

use crate::types::FieldKind;

/// Errors detected while declaring or linking a schema.
///
/// These are fatal to the type being constructed and always name the
/// offending type, field or value.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum SchemaError {
    /// The same qualified name was declared twice
    #[error("Duplicate type declaration: {name}")]
    DuplicateType {
        /// Qualified type name
        name: String,
    },

    /// A type name that is not a (dotted) identifier
    #[error("Invalid type name: {name:?}")]
    InvalidTypeName {
        /// Offending name
        name: String,
    },

    /// Two fields share an id
    #[error("Duplicate field id {id} in {type_name}")]
    DuplicateFieldId {
        /// Declaring type
        type_name: String,
        /// Field id
        id: i32,
    },

    /// Two fields share a name
    #[error("Duplicate field name {field} in {type_name}")]
    DuplicateFieldName {
        /// Declaring type
        type_name: String,
        /// Field name
        field: String,
    },

    /// Field name is not an identifier
    #[error("Invalid field name {field:?} in {type_name}")]
    InvalidFieldName {
        /// Declaring type
        type_name: String,
        /// Field name
        field: String,
    },

    /// Field name collides with an IDL keyword
    #[error("Reserved field name {field} in {type_name}")]
    ReservedFieldName {
        /// Declaring type
        type_name: String,
        /// Field name
        field: String,
    },

    /// Union fields are never required
    #[error("Union field {field} in {type_name} cannot be required")]
    RequiredUnionField {
        /// Declaring type
        type_name: String,
        /// Field name
        field: String,
    },

    /// Two enum values share a numeric value
    #[error("Duplicate enum value {value} in {type_name}")]
    DuplicateEnumValue {
        /// Enum type
        type_name: String,
        /// Numeric value
        value: i32,
    },

    /// Two enum values share a name
    #[error("Duplicate enum name {name} in {type_name}")]
    DuplicateEnumName {
        /// Enum type
        type_name: String,
        /// Value name
        name: String,
    },

    /// A type reference names nothing declared
    #[error("Unresolved type {name} referenced from {type_name}")]
    UnresolvedType {
        /// Referencing type
        type_name: String,
        /// Referenced name
        name: String,
    },

    /// A type reference names a declaration of the wrong kind
    #[error("Type {name} referenced from {type_name} is a {kind}, expected {expected}")]
    WrongTypeKind {
        /// Referencing type
        type_name: String,
        /// Referenced name
        name: String,
        /// Kind actually declared
        kind: &'static str,
        /// Kind required at the reference
        expected: &'static str,
    },

    /// A default value does not fit the field's type
    #[error("Invalid default for field {field} in {type_name}: {reason}")]
    InvalidDefault {
        /// Declaring type
        type_name: String,
        /// Field name
        field: String,
        /// Why the literal was rejected
        reason: String,
    },

    /// Compact encoding was requested but the struct does not qualify
    /// (strict mode only, otherwise the request is dropped)
    #[error("Type {type_name} requested compact encoding but {reason}")]
    NotCompactible {
        /// Declaring type
        type_name: String,
        /// First violated rule
        reason: String,
    },

    /// Two methods of one service share a name
    #[error("Duplicate method {method} in service {type_name}")]
    DuplicateMethod {
        /// Service name
        type_name: String,
        /// Method name
        method: String,
    },

    /// A service method is malformed
    #[error("Invalid method {method} in service {type_name}: {reason}")]
    InvalidMethod {
        /// Service name
        type_name: String,
        /// Method name
        method: String,
        /// Why the method was rejected
        reason: String,
    },

    /// A service (transitively) extends itself
    #[error("Circular extends chain through service {type_name}")]
    CircularExtends {
        /// Service name
        type_name: String,
    },
}

/// Errors raised by builder operations used against the wrong kind of field.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ReflectError {
    /// The accessor does not apply to the field's declared kind
    #[error("Illegal operation {operation} on {kind} field {field} in {type_name}")]
    IllegalOperation {
        /// Declaring type
        type_name: String,
        /// Field name
        field: String,
        /// Attempted operation
        operation: &'static str,
        /// Declared kind of the field
        kind: FieldKind,
    },

    /// The value does not match the field's declared type
    #[error("Type mismatch for field {field} in {type_name}: expected {expected}, got {actual}")]
    TypeMismatch {
        /// Declaring type
        type_name: String,
        /// Field name
        field: String,
        /// Declared type
        expected: String,
        /// Kind of the supplied value
        actual: &'static str,
    },

    /// No field with this id (only for operations that must hand back a
    /// field-specific object)
    #[error("No field with id {id} in {type_name}")]
    UnknownField {
        /// Declaring type
        type_name: String,
        /// Field id
        id: i32,
    },
}

/// Errors reported by [`MessageBuilder::validate`](crate::MessageBuilder::validate).
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// One or more required fields have no value
    #[error("Missing required fields {} in {type_name}", fields.join(", "))]
    MissingRequired {
        /// Message type
        type_name: String,
        /// Names of every missing field, in declared order
        fields: Vec<String>,
    },

    /// A union has no field set
    #[error("No union field set in {type_name}")]
    NoUnionField {
        /// Union type
        type_name: String,
    },
}
