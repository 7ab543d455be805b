//! Immutable records
//!
//! A [`Message`] is a message type plus a sparse map from field id to value.
//! Records are produced by [`MessageBuilder::build`](super::MessageBuilder::build),
//! never change afterwards, and can be shared across threads freely.
//!
//! Equality, hashing and ordering are driven by field ids, not by how values
//! happen to be stored or by declaration order: two records of the same
//! qualified type are equal when every field id is either absent in both or
//! present with equal values in both. Records built from different revisions
//! of a schema compare on the ids either revision knows.

use std::borrow::Cow;
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};
use std::hash::{Hash, Hasher};

use once_cell::sync::OnceCell;
use rustc_hash::FxHasher;

use super::access::fallback;
use super::{FieldAccess, MessageBuilder, MessageType, Value};
use crate::types::Field;

/// Stored field values. A union holds at most one value by construction.
#[derive(Debug, Clone)]
pub(crate) enum Fields {
    Struct(BTreeMap<i32, Value>),
    Union(Option<Box<(i32, Value)>>),
}

impl Fields {
    fn stored(&self, id: i32) -> Option<&Value> {
        match self {
            Fields::Struct(values) => values.get(&id),
            Fields::Union(Some(slot)) if slot.0 == id => Some(&slot.1),
            Fields::Union(_) => None,
        }
    }

    /// Present values in ascending id order
    fn present(&self) -> Box<dyn Iterator<Item = (i32, &Value)> + '_> {
        match self {
            Fields::Struct(values) => Box::new(
                values
                    .iter()
                    .map(|(id, value)| (*id, value))
                    .filter(|(_, value)| value.count() > 0),
            ),
            Fields::Union(slot) => Box::new(
                slot.iter()
                    .map(|slot| (slot.0, &slot.1))
                    .filter(|(_, value)| value.count() > 0),
            ),
        }
    }
}

/// An immutable struct, union or exception instance
#[derive(Clone)]
pub struct Message {
    ty: MessageType,
    fields: Fields,
    hash: OnceCell<u64>,
}

impl Message {
    pub(crate) fn from_parts(ty: MessageType, fields: Fields) -> Self {
        Self {
            ty,
            fields,
            hash: OnceCell::new(),
        }
    }

    pub(crate) fn fields(&self) -> &Fields {
        &self.fields
    }

    /// Qualified name of the message type
    pub fn qualified_name(&self) -> &str {
        self.descriptor().qualified_name()
    }

    /// Present value of a field, without default fallback
    pub fn value(&self, id: i32) -> Option<&Value> {
        self.fields.stored(id).filter(|v| v.count() > 0)
    }

    /// Present fields with their values, in declared order
    pub fn present_fields(&self) -> impl Iterator<Item = (&Field, &Value)> {
        self.descriptor()
            .fields()
            .iter()
            .filter_map(move |field| self.value(field.id()).map(|value| (field, value)))
    }

    /// The field currently set on a union
    pub fn union_field(&self) -> Option<&Field> {
        match &self.fields {
            Fields::Union(Some(slot)) if slot.1.count() > 0 => {
                self.descriptor().field_by_id(slot.0)
            }
            _ => None,
        }
    }

    /// Builder pre-loaded with this record's values
    pub fn mutate(&self) -> MessageBuilder {
        MessageBuilder::from_message(self)
    }

    /// Message text of an exception record
    pub fn exception_message(&self) -> Option<&str> {
        let field = self.descriptor().message_field()?;
        self.value(field.id()).and_then(Value::as_str)
    }

    fn compute_hash(&self) -> u64 {
        let mut hasher = FxHasher::default();
        self.qualified_name().hash(&mut hasher);
        for (id, value) in self.fields.present() {
            id.hash(&mut hasher);
            value.hash(&mut hasher);
        }
        hasher.finish()
    }
}

impl FieldAccess for Message {
    fn message_type(&self) -> &MessageType {
        &self.ty
    }

    fn count(&self, id: i32) -> usize {
        self.fields.stored(id).map_or(0, Value::count)
    }

    fn get(&self, id: i32) -> Option<Cow<'_, Value>> {
        match self.value(id) {
            Some(value) => Some(Cow::Borrowed(value)),
            None => fallback(&self.ty, id),
        }
    }
}

impl PartialEq for Message {
    fn eq(&self, other: &Self) -> bool {
        let (ours, theirs) = (self.descriptor(), other.descriptor());
        if ours.qualified_name() != theirs.qualified_name() || ours.variant() != theirs.variant() {
            return false;
        }
        self.fields.present().eq(other.fields.present())
    }
}

impl Eq for Message {}

impl Hash for Message {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(*self.hash.get_or_init(|| self.compute_hash()));
    }
}

impl PartialOrd for Message {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Message {
    fn cmp(&self, other: &Self) -> Ordering {
        let (ours, theirs) = (self.descriptor(), other.descriptor());
        ours.qualified_name()
            .cmp(theirs.qualified_name())
            .then(ours.variant().cmp(&theirs.variant()))
            .then_with(|| {
                let ids: BTreeSet<i32> = ours
                    .fields()
                    .iter()
                    .chain(theirs.fields())
                    .map(Field::id)
                    .collect();
                // absent sorts before present
                ids.into_iter()
                    .map(|id| self.value(id).cmp(&other.value(id)))
                    .find(|ordering| ordering.is_ne())
                    .unwrap_or(Ordering::Equal)
            })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::types::{ConstValue, FieldSpec, MessageSpec, Primitive, TypeRegistry, TypeSpec};

    fn registry() -> Arc<TypeRegistry> {
        let mut builder = TypeRegistry::builder();
        builder
            .declare_message(
                MessageSpec::structure("calc.Point")
                    .annotate("compact", "")
                    .field(FieldSpec::new(1, "x", Primitive::I32).required())
                    .field(FieldSpec::new(2, "y", Primitive::I32).required())
                    .field(FieldSpec::new(3, "label", Primitive::String).optional()),
            )
            .unwrap();
        builder
            .declare_message(
                MessageSpec::structure("calc.Shape")
                    .field(FieldSpec::new(1, "name", Primitive::String))
                    .field(
                        FieldSpec::new(2, "sides", Primitive::I32)
                            .default_value(ConstValue::Integer(4)),
                    )
                    .field(FieldSpec::new(3, "points", TypeSpec::list(TypeSpec::named("Point")))),
            )
            .unwrap();
        builder
            .declare_message(
                MessageSpec::exception("calc.Oops")
                    .annotate("message", "text")
                    .field(FieldSpec::new(1, "text", Primitive::String)),
            )
            .unwrap();
        builder.build().unwrap()
    }

    fn point(registry: &Arc<TypeRegistry>, x: i32, y: i32) -> Message {
        let mut b = registry.builder_for("calc.Point").unwrap();
        b.set(1, Value::I32(x)).unwrap().set(2, Value::I32(y)).unwrap();
        b.build()
    }

    #[test]
    fn test_has_tracks_explicit_presence() {
        let registry = registry();
        let shape = registry.builder_for("calc.Shape").unwrap().build();

        assert!(!shape.has(1));
        assert_eq!(shape.get(1).as_deref(), Some(&Value::from("")));
        assert!(!shape.has(2));
        assert_eq!(shape.get(2).as_deref(), Some(&Value::I32(4)));
        assert!(!shape.has(3));
        assert_eq!(shape.get(3), None);
        assert_eq!(shape.count(99), 0);
        assert_eq!(shape.get(99), None);
    }

    #[test]
    fn test_empty_container_is_absent() {
        let registry = registry();
        let mut b = registry.builder_for("calc.Shape").unwrap();
        b.set(3, Value::List(vec![])).unwrap();
        let shape = b.build();
        assert!(!shape.has(3));
        assert_eq!(shape.count(3), 0);
        assert_eq!(shape, registry.builder_for("calc.Shape").unwrap().build());
    }

    #[test]
    fn test_equal_records_hash_equally() {
        let registry = registry();
        let a = point(&registry, 3, 4);
        let mut b = registry.builder_for("calc.Point").unwrap();
        b.set(2, Value::I32(4)).unwrap().set(1, Value::I32(3)).unwrap();
        let b = b.build();

        assert_eq!(a, b);
        let hash = |m: &Message| {
            let mut h = FxHasher::default();
            m.hash(&mut h);
            h.finish()
        };
        assert_eq!(hash(&a), hash(&b));
        assert_ne!(a, point(&registry, 4, 3));
    }

    #[test]
    fn test_ordering_by_field_id() {
        let registry = registry();
        let small = point(&registry, 1, 9);
        let large = point(&registry, 2, 0);
        assert!(small < large);

        let mut partial = registry.builder_for("calc.Point").unwrap();
        partial.set(1, Value::I32(1)).unwrap();
        assert!(partial.build() < small);
    }

    #[test]
    fn test_present_fields_in_declared_order() {
        let registry = registry();
        let mut b = registry.builder_for("calc.Point").unwrap();
        b.set(3, Value::from("origin")).unwrap().set(1, Value::I32(0)).unwrap();
        let p = b.build();
        let names: Vec<_> = p.present_fields().map(|(f, _)| f.name()).collect();
        assert_eq!(names, vec!["x", "label"]);
        assert!(p.is_simple());
        assert!(p.is_compactible());
        assert!(!p.is_compact());
    }

    #[test]
    fn test_exception_message() {
        let registry = registry();
        let mut b = registry.builder_for("calc.Oops").unwrap();
        b.set(1, Value::from("division by zero")).unwrap();
        assert_eq!(b.build().exception_message(), Some("division by zero"));
        assert_eq!(point(&registry, 0, 0).exception_message(), None);
    }

    #[test]
    fn test_records_are_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Message>();
        assert_send_sync::<Arc<TypeRegistry>>();
    }
}
