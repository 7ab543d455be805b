//! Reflective runtime
//!
//! Values, immutable records, builders and enum values. Every operation
//! here is driven by the descriptors of a linked
//! [`TypeRegistry`](crate::types::TypeRegistry), so records of any declared
//! type can be created, read and edited without generated code.

mod access;
mod builder;
mod display;
mod enum_value;
mod message;
mod message_type;
mod value;

pub use access::FieldAccess;
pub use builder::MessageBuilder;
pub use enum_value::{EnumBuilder, EnumValue};
pub use message::Message;
pub use message_type::MessageType;
pub use value::{Value, ValueMap, ValueSet};
