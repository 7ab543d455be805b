//! Descriptor model
//!
//! Everything describing a schema: declaration specs as handed over by the
//! loader, and the linked, immutable descriptors held by the
//! [`TypeRegistry`].

mod annotation;
mod config;
mod constant;
mod enums;
mod field;
mod message;
mod primitive;
mod registry;
mod service;
mod spec;
mod type_ref;

pub use annotation::{Annotation, Annotations};
pub use config::{SchemaConfig, MAX_COMPACT_FIELDS};
pub use constant::ConstValue;
pub use enums::EnumDescriptor;
pub use field::{Field, FieldDefault, Requirement, RESERVED_FIELD_NAMES};
pub use message::{MessageDescriptor, MessageVariant};
pub use primitive::Primitive;
pub use registry::{DeclaredType, TypeId, TypeRegistry, TypeRegistryBuilder};
pub use service::{ServiceDescriptor, ServiceMethod};
pub use spec::{EnumSpec, FieldSpec, MessageSpec, MethodSpec, ServiceSpec, TypeSpec};
pub use type_ref::{ContainerVariant, FieldKind, TypeRef};
