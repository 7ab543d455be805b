//! Providence core
//!
//! Reflective record runtime for IDL-declared types:
//! - `types`: descriptors for enums, structs, unions, exceptions and
//!   services, linked into a shared [`TypeRegistry`]
//! - `reflect`: immutable [`Message`] records, their [`MessageBuilder`]s and
//!   enum values, all accessed uniformly through [`FieldAccess`]
//!
//! A schema loader declares types on a [`TypeRegistryBuilder`] and links
//! them once; records and builders then share the registry read-only.
//!
//! # Usage
//!
//! ```rust,ignore
//! use providence_core::{FieldAccess, TypeRegistry};
//! use providence_core::types::{FieldSpec, MessageSpec, Primitive};
//!
//! let mut schema = TypeRegistry::builder();
//! schema.declare_message(
//!     MessageSpec::structure("calc.Point")
//!         .field(FieldSpec::new(1, "x", Primitive::I32).required())
//!         .field(FieldSpec::new(2, "y", Primitive::I32).required()),
//! )?;
//! let registry = schema.build()?;
//!
//! let mut point = registry.builder_for("calc.Point").unwrap();
//! point.set(1, 3)?.set(2, 4)?;
//! let point = point.build_valid()?;
//! assert!(point.has(1));
//! ```

#![warn(missing_docs)]

pub mod error;
pub mod reflect;
pub mod types;

pub use error::{ReflectError, SchemaError, ValidationError};
pub use reflect::{
    EnumBuilder, EnumValue, FieldAccess, Message, MessageBuilder, MessageType, Value, ValueMap,
    ValueSet,
};
pub use types::{
    EnumDescriptor, Field, MessageDescriptor, MessageVariant, SchemaConfig, TypeId, TypeRef,
    TypeRegistry, TypeRegistryBuilder,
};
