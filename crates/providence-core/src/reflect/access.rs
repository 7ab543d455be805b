//! Uniform field access shared by records and builders

use std::borrow::Cow;

use log::trace;

use super::{Message, MessageType, Value};
use crate::types::{Field, FieldDefault, MessageDescriptor, TypeRef};

/// Read access to the fields of a message by id.
///
/// Implemented by [`Message`](super::Message) and
/// [`MessageBuilder`](super::MessageBuilder); generated record types
/// implement it too, so codecs and printers work on any of them. Ids not
/// declared on the type are never an error: they read as absent.
pub trait FieldAccess {
    /// Type of the message
    fn message_type(&self) -> &MessageType;

    /// Number of items of a container field, 1 or 0 for other fields
    fn count(&self, id: i32) -> usize;

    /// Value of a field: the present value, else the declared default, else
    /// the intrinsic zero of a primitive field
    fn get(&self, id: i32) -> Option<Cow<'_, Value>>;

    /// Check if a field has an explicitly set, non-empty value.
    ///
    /// Defaults do not count as present.
    fn has(&self, id: i32) -> bool {
        self.count(id) > 0
    }

    /// Descriptor of the message type
    fn descriptor(&self) -> &MessageDescriptor {
        self.message_type().descriptor()
    }

    /// Check that no field is set after the first unset one, in declared
    /// order. Only such instances can use the compact encoding.
    fn is_compact(&self) -> bool {
        let mut gap = false;
        for field in self.descriptor().fields() {
            if self.has(field.id()) {
                if gap {
                    return false;
                }
            } else {
                gap = true;
            }
        }
        true
    }

    /// See [`MessageDescriptor::is_simple`]
    fn is_simple(&self) -> bool {
        self.descriptor().is_simple()
    }

    /// See [`MessageDescriptor::is_compactible`]
    fn is_compactible(&self) -> bool {
        self.descriptor().is_compactible()
    }
}

/// Declared default or intrinsic zero of a field, the fallback of `get`.
///
/// A message default is built from its template on every call.
pub(crate) fn fallback(ty: &MessageType, id: i32) -> Option<Cow<'_, Value>> {
    let field = ty.descriptor().field_by_id(id)?;
    if let (Some(template), TypeRef::Message(nested)) = (field.message_default(), field.type_ref()) {
        let message = instantiate(&ty.nested(*nested), template);
        return Some(Cow::Owned(Value::Message(message)));
    }
    field.fallback_value().map(Cow::Borrowed)
}

fn instantiate(ty: &MessageType, template: &[(i32, FieldDefault)]) -> Message {
    let mut builder = ty.builder();
    for (id, default) in template {
        let value = match (default, ty.descriptor().field_by_id(*id).map(Field::type_ref)) {
            (FieldDefault::Value(value), _) => value.clone(),
            (FieldDefault::Message(inner), Some(TypeRef::Message(nested))) => {
                Value::Message(instantiate(&ty.nested(*nested), inner))
            }
            _ => continue,
        };
        if let Err(err) = builder.set(*id, value) {
            trace!("skipping default of field {id}: {err}");
        }
    }
    builder.build()
}
