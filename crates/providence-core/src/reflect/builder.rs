//! Message builders
//!
//! A [`MessageBuilder`] stages field values for one message type and
//! materializes an immutable [`Message`] on [`build`](MessageBuilder::build).
//! A message-typed field may hold a nested builder instead of a finished
//! value, so deep edits through [`mutator`](MessageBuilder::mutator) never
//! build intermediate records.
//!
//! Per field the state moves `unset -> set -> unset`, or for message fields
//! `unset -> building -> set` once the record is built. Unions stage at most
//! one field; setting another one replaces it.

use std::borrow::Cow;
use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, BTreeSet};

use log::trace;

use super::access::fallback;
use super::message::Fields;
use super::{FieldAccess, Message, MessageType, Value};
use crate::error::{ReflectError, ValidationError};
use crate::types::{Field, FieldKind, TypeRef};

/// A staged field: a finished value or a nested builder
#[derive(Debug, Clone)]
enum Slot {
    Value(Value),
    Builder(Box<MessageBuilder>),
}

impl Slot {
    fn count(&self) -> usize {
        match self {
            Slot::Value(value) => value.count(),
            Slot::Builder(_) => 1,
        }
    }

    fn build(&self) -> Value {
        match self {
            Slot::Value(value) => value.clone(),
            Slot::Builder(builder) => Value::Message(builder.build()),
        }
    }
}

/// Staged values; the union form can only ever hold one field
#[derive(Debug, Clone)]
enum Staging {
    Struct(BTreeMap<i32, Slot>),
    Union(Option<(i32, Slot)>),
}

impl Staging {
    fn slot(&self, id: i32) -> Option<&Slot> {
        match self {
            Staging::Struct(slots) => slots.get(&id),
            Staging::Union(Some((current, slot))) if *current == id => Some(slot),
            Staging::Union(_) => None,
        }
    }

    fn slot_mut(&mut self, id: i32) -> Option<&mut Slot> {
        match self {
            Staging::Struct(slots) => slots.get_mut(&id),
            Staging::Union(Some((current, slot))) if *current == id => Some(slot),
            Staging::Union(_) => None,
        }
    }

    fn take(&mut self, id: i32) -> Option<Slot> {
        match self {
            Staging::Struct(slots) => slots.remove(&id),
            Staging::Union(current) => match current {
                Some((set, _)) if *set == id => current.take().map(|(_, slot)| slot),
                _ => None,
            },
        }
    }

    /// Store a slot, replacing the current union field if any
    fn put(&mut self, id: i32, slot: Slot) -> &mut Slot {
        match self {
            Staging::Struct(slots) => match slots.entry(id) {
                Entry::Occupied(mut entry) => {
                    entry.insert(slot);
                    entry.into_mut()
                }
                Entry::Vacant(entry) => entry.insert(slot),
            },
            Staging::Union(current) => &mut current.insert((id, slot)).1,
        }
    }
}

impl From<&Fields> for Staging {
    fn from(fields: &Fields) -> Self {
        match fields {
            Fields::Struct(values) => Staging::Struct(
                values
                    .iter()
                    .map(|(&id, value)| (id, Slot::Value(value.clone())))
                    .collect(),
            ),
            Fields::Union(current) => Staging::Union(
                current
                    .as_deref()
                    .map(|(id, value)| (*id, Slot::Value(value.clone()))),
            ),
        }
    }
}

/// Mutable staging area for a message
#[derive(Debug, Clone)]
pub struct MessageBuilder {
    ty: MessageType,
    staged: Staging,
    modified: BTreeSet<i32>,
}

impl MessageBuilder {
    /// Empty builder for a message type
    pub fn new(ty: MessageType) -> Self {
        let staged = if ty.descriptor().is_union() {
            Staging::Union(None)
        } else {
            Staging::Struct(BTreeMap::new())
        };
        Self {
            ty,
            staged,
            modified: BTreeSet::new(),
        }
    }

    pub(crate) fn from_message(message: &Message) -> Self {
        Self {
            ty: message.message_type().clone(),
            staged: Staging::from(message.fields()),
            modified: BTreeSet::new(),
        }
    }

    /// Ids of the fields touched since the builder was created
    pub fn modified(&self) -> &BTreeSet<i32> {
        &self.modified
    }

    /// Check if a field was touched since the builder was created
    pub fn is_modified(&self, id: i32) -> bool {
        self.modified.contains(&id)
    }

    /// Replace a field's value. On a union this also unsets the previously
    /// set field.
    ///
    /// Unknown ids are ignored. A value that is not an instance of the
    /// field's declared type is a [`ReflectError::TypeMismatch`].
    pub fn set(&mut self, id: i32, value: impl Into<Value>) -> Result<&mut Self, ReflectError> {
        let value = value.into();
        let ty = self.ty.clone();
        let Some(field) = ty.descriptor().field_by_id(id) else {
            trace!("ignoring set of unknown field {id} on {}", ty.descriptor().qualified_name());
            return Ok(self);
        };
        check_value(&ty, field, field.type_ref(), &value)?;

        self.staged.put(id, Slot::Value(value));
        self.modified.insert(id);
        Ok(self)
    }

    /// Append an item to a list or set field, creating the collection on
    /// first use.
    ///
    /// Any other field kind is a [`ReflectError::IllegalOperation`].
    pub fn add_to(&mut self, id: i32, item: impl Into<Value>) -> Result<&mut Self, ReflectError> {
        let item = item.into();
        let ty = self.ty.clone();
        let Some(field) = ty.descriptor().field_by_id(id) else {
            trace!("ignoring add_to of unknown field {id} on {}", ty.descriptor().qualified_name());
            return Ok(self);
        };
        let item_type = match field.type_ref() {
            TypeRef::List(item_type) | TypeRef::Set(item_type, _) => item_type,
            _ => return Err(illegal_operation(&ty, field, "add_to")),
        };
        check_value(&ty, field, item_type, &item)?;

        let mut pending = Some(item);
        if let Some(Slot::Value(existing)) = self.staged.slot_mut(id) {
            match existing {
                Value::List(items) => items.extend(pending.take()),
                Value::Set(items) => items.extend(pending.take()),
                _ => {}
            }
        }
        if let Some(item) = pending {
            let collection = match field.kind() {
                FieldKind::List => Value::List(vec![item]),
                _ => Value::Set(std::iter::once(item).collect()),
            };
            self.staged.put(id, Slot::Value(collection));
        }
        self.modified.insert(id);
        Ok(self)
    }

    /// Unset a field
    pub fn clear(&mut self, id: i32) -> &mut Self {
        if self.descriptor().field_by_id(id).is_none() {
            trace!("ignoring clear of unknown field {id} on {}", self.descriptor().qualified_name());
            return self;
        }
        self.staged.take(id);
        self.modified.insert(id);
        self
    }

    /// Nested builder for a message field.
    ///
    /// A set value is promoted into a builder pre-loaded with it; an unset
    /// field gets a fresh builder. The nested builder stays staged here and
    /// is built along with this one.
    pub fn mutator(&mut self, id: i32) -> Result<&mut MessageBuilder, ReflectError> {
        let ty = self.ty.clone();
        let field = ty
            .descriptor()
            .field_by_id(id)
            .ok_or_else(|| ReflectError::UnknownField {
                type_name: ty.descriptor().qualified_name().to_string(),
                id,
            })?;
        let TypeRef::Message(nested_id) = field.type_ref() else {
            return Err(illegal_operation(&ty, field, "mutator"));
        };

        let nested = match self.staged.take(id) {
            Some(Slot::Builder(builder)) => builder,
            Some(Slot::Value(Value::Message(message))) => Box::new(message.mutate()),
            _ => Box::new(ty.nested(*nested_id).builder()),
        };
        self.modified.insert(id);
        if let Slot::Builder(builder) = self.staged.put(id, Slot::Builder(nested)) {
            return Ok(builder.as_mut());
        }
        Err(illegal_operation(&ty, field, "mutator"))
    }

    /// Combine the present fields of `other` into this builder.
    ///
    /// Scalars are overwritten, lists appended to, sets unioned, maps
    /// overlaid, and message fields merged recursively. Fields unknown to
    /// this type, or whose value does not fit the declared type, are skipped.
    /// A record of another message type is not merged at all.
    pub fn merge(&mut self, other: &Message) -> &mut Self {
        let ty = self.ty.clone();
        if other.qualified_name() != ty.descriptor().qualified_name() {
            trace!(
                "skipping merge of {} into {}",
                other.qualified_name(),
                ty.descriptor().qualified_name()
            );
            return self;
        }
        for (source, value) in other.present_fields() {
            let id = source.id();
            let Some(field) = ty.descriptor().field_by_id(id) else {
                trace!("skipping unknown field {id} merging into {}", ty.descriptor().qualified_name());
                continue;
            };
            if !field.type_ref().accepts(value, ty.registry()) {
                trace!(
                    "skipping {} value for field {} merging into {}",
                    value.kind_name(),
                    field.name(),
                    ty.descriptor().qualified_name()
                );
                continue;
            }

            match value {
                Value::Message(nested) if self.has(id) => {
                    if let Ok(builder) = self.mutator(id) {
                        builder.merge(nested);
                    }
                }
                Value::List(_) | Value::Set(_) | Value::Map(_) => self.extend(id, value),
                _ => {
                    self.staged.put(id, Slot::Value(value.clone()));
                }
            }
            self.modified.insert(id);
        }
        self
    }

    fn extend(&mut self, id: i32, value: &Value) {
        if let Some(Slot::Value(existing)) = self.staged.slot_mut(id) {
            match (existing, value) {
                (Value::List(ours), Value::List(theirs)) => {
                    ours.extend(theirs.iter().cloned());
                    return;
                }
                (Value::Set(ours), Value::Set(theirs)) => {
                    ours.extend(theirs.iter().cloned());
                    return;
                }
                (Value::Map(ours), Value::Map(theirs)) => {
                    ours.extend(theirs.iter().map(|(k, v)| (k.clone(), v.clone())));
                    return;
                }
                _ => {}
            }
        }
        self.staged.put(id, Slot::Value(value.clone()));
    }

    /// Check required fields (structs and exceptions) or that a field is
    /// set (unions), reporting every missing required field at once
    pub fn validate(&self) -> Result<(), ValidationError> {
        let descriptor = self.descriptor();
        if descriptor.is_union() {
            return match &self.staged {
                Staging::Union(Some((_, slot))) if slot.count() > 0 => Ok(()),
                _ => Err(ValidationError::NoUnionField {
                    type_name: descriptor.qualified_name().to_string(),
                }),
            };
        }

        let missing: Vec<String> = descriptor
            .required_fields()
            .filter(|field| !self.has(field.id()))
            .map(|field| field.name().to_string())
            .collect();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::MissingRequired {
                type_name: descriptor.qualified_name().to_string(),
                fields: missing,
            })
        }
    }

    /// Non-failing form of [`validate`](Self::validate)
    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    /// Materialize the staged values, building nested builders and sorting
    /// containers declared sorted. Does not validate.
    pub fn build(&self) -> Message {
        let descriptor = self.descriptor();
        let materialize = |id: i32, slot: &Slot| {
            let value = slot.build();
            match descriptor.field_by_id(id) {
                Some(field) => value.ordered_as(field.type_ref().variant()),
                None => value,
            }
        };
        let fields = match &self.staged {
            Staging::Struct(slots) => Fields::Struct(
                slots
                    .iter()
                    .map(|(&id, slot)| (id, materialize(id, slot)))
                    .collect(),
            ),
            Staging::Union(current) => Fields::Union(
                current
                    .as_ref()
                    .map(|(id, slot)| Box::new((*id, materialize(*id, slot)))),
            ),
        };
        Message::from_parts(self.ty.clone(), fields)
    }

    /// Validate, then build
    pub fn build_valid(&self) -> Result<Message, ValidationError> {
        self.validate()?;
        Ok(self.build())
    }
}

impl FieldAccess for MessageBuilder {
    fn message_type(&self) -> &MessageType {
        &self.ty
    }

    fn count(&self, id: i32) -> usize {
        self.staged.slot(id).map_or(0, Slot::count)
    }

    fn get(&self, id: i32) -> Option<Cow<'_, Value>> {
        match self.staged.slot(id) {
            Some(Slot::Value(value)) if value.count() > 0 => Some(Cow::Borrowed(value)),
            Some(Slot::Builder(builder)) => Some(Cow::Owned(Value::Message(builder.build()))),
            _ => fallback(&self.ty, id),
        }
    }
}

fn check_value(
    ty: &MessageType,
    field: &Field,
    expected: &TypeRef,
    value: &Value,
) -> Result<(), ReflectError> {
    if expected.accepts(value, ty.registry()) {
        return Ok(());
    }
    Err(ReflectError::TypeMismatch {
        type_name: ty.descriptor().qualified_name().to_string(),
        field: field.name().to_string(),
        expected: expected.type_name(ty.registry()),
        actual: value.kind_name(),
    })
}

fn illegal_operation(ty: &MessageType, field: &Field, operation: &'static str) -> ReflectError {
    ReflectError::IllegalOperation {
        type_name: ty.descriptor().qualified_name().to_string(),
        field: field.name().to_string(),
        operation,
        kind: field.kind(),
    }
}
