//! Field values
//!
//! [`Value`] is the dynamic representation of anything a field can hold.
//! Equality, ordering and hashing are total so values can be set elements
//! and map keys: doubles compare by IEEE total order, sets and maps compare
//! and hash without regard to iteration order, lists are order-sensitive.

use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

use indexmap::{IndexMap, IndexSet};
use rustc_hash::{FxBuildHasher, FxHasher};

use super::{EnumValue, Message};
use crate::types::ContainerVariant;

/// Set value, iterating in insertion order unless sorted at build time
pub type ValueSet = IndexSet<Value, FxBuildHasher>;

/// Map value, iterating in insertion order unless sorted at build time
pub type ValueMap = IndexMap<Value, Value, FxBuildHasher>;

/// A field value
#[derive(Debug, Clone)]
pub enum Value {
    /// The single value of `void`
    Void,
    /// `bool`
    Bool(bool),
    /// `byte`
    Byte(i8),
    /// `i16`
    I16(i16),
    /// `i32`
    I32(i32),
    /// `i64`
    I64(i64),
    /// `double`
    Double(f64),
    /// `string`
    String(String),
    /// `binary`
    Binary(Vec<u8>),
    /// Enum value
    Enum(EnumValue),
    /// Nested struct, union or exception
    Message(Message),
    /// `list<T>`
    List(Vec<Value>),
    /// `set<T>`
    Set(ValueSet),
    /// `map<K,V>`
    Map(ValueMap),
}

impl Value {
    /// Short name of the value's kind, for diagnostics
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Void => "void",
            Value::Bool(_) => "bool",
            Value::Byte(_) => "byte",
            Value::I16(_) => "i16",
            Value::I32(_) => "i32",
            Value::I64(_) => "i64",
            Value::Double(_) => "double",
            Value::String(_) => "string",
            Value::Binary(_) => "binary",
            Value::Enum(_) => "enum",
            Value::Message(_) => "message",
            Value::List(_) => "list",
            Value::Set(_) => "set",
            Value::Map(_) => "map",
        }
    }

    /// Number of items of a container, 1 for anything else
    pub fn count(&self) -> usize {
        match self {
            Value::List(items) => items.len(),
            Value::Set(items) => items.len(),
            Value::Map(entries) => entries.len(),
            _ => 1,
        }
    }

    /// Check if this is a list, set or map
    pub fn is_container(&self) -> bool {
        matches!(self, Value::List(_) | Value::Set(_) | Value::Map(_))
    }

    /// `bool` payload
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Integer payload of any width
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Byte(v) => Some(i64::from(*v)),
            Value::I16(v) => Some(i64::from(*v)),
            Value::I32(v) => Some(i64::from(*v)),
            Value::I64(v) => Some(*v),
            _ => None,
        }
    }

    /// `double` payload
    pub fn as_double(&self) -> Option<f64> {
        match self {
            Value::Double(d) => Some(*d),
            _ => None,
        }
    }

    /// `string` payload
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// `binary` payload
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Binary(b) => Some(b),
            _ => None,
        }
    }

    /// Enum payload
    pub fn as_enum(&self) -> Option<&EnumValue> {
        match self {
            Value::Enum(e) => Some(e),
            _ => None,
        }
    }

    /// Nested message payload
    pub fn as_message(&self) -> Option<&Message> {
        match self {
            Value::Message(m) => Some(m),
            _ => None,
        }
    }

    /// List items
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    /// Set items
    pub fn as_set(&self) -> Option<&ValueSet> {
        match self {
            Value::Set(items) => Some(items),
            _ => None,
        }
    }

    /// Map entries
    pub fn as_map(&self) -> Option<&ValueMap> {
        match self {
            Value::Map(entries) => Some(entries),
            _ => None,
        }
    }

    /// Apply a declared container ordering: sorted sets and maps are put in
    /// natural order of elements or keys, everything else is returned as is.
    pub(crate) fn ordered_as(self, variant: ContainerVariant) -> Value {
        match (self, variant) {
            (Value::Set(mut items), ContainerVariant::Sorted) => {
                items.sort();
                Value::Set(items)
            }
            (Value::Map(mut entries), ContainerVariant::Sorted) => {
                entries.sort_keys();
                Value::Map(entries)
            }
            (value, _) => value,
        }
    }

    fn rank(&self) -> u8 {
        match self {
            Value::Void => 0,
            Value::Bool(_) => 1,
            Value::Byte(_) => 2,
            Value::I16(_) => 3,
            Value::I32(_) => 4,
            Value::I64(_) => 5,
            Value::Double(_) => 6,
            Value::String(_) => 7,
            Value::Binary(_) => 8,
            Value::Enum(_) => 9,
            Value::Message(_) => 10,
            Value::List(_) => 11,
            Value::Set(_) => 12,
            Value::Map(_) => 13,
        }
    }
}

/// Hash of a single item, combined order-insensitively for sets and maps
fn item_hash<T: Hash + ?Sized>(item: &T) -> u64 {
    let mut hasher = FxHasher::default();
    item.hash(&mut hasher);
    hasher.finish()
}

fn sorted_items(items: &ValueSet) -> Vec<&Value> {
    let mut sorted: Vec<_> = items.iter().collect();
    sorted.sort();
    sorted
}

fn sorted_entries(entries: &ValueMap) -> Vec<(&Value, &Value)> {
    let mut sorted: Vec<_> = entries.iter().collect();
    sorted.sort();
    sorted
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Void, Value::Void) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Byte(a), Value::Byte(b)) => a == b,
            (Value::I16(a), Value::I16(b)) => a == b,
            (Value::I32(a), Value::I32(b)) => a == b,
            (Value::I64(a), Value::I64(b)) => a == b,
            (Value::Double(a), Value::Double(b)) => a.total_cmp(b) == Ordering::Equal,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Binary(a), Value::Binary(b)) => a == b,
            (Value::Enum(a), Value::Enum(b)) => a == b,
            (Value::Message(a), Value::Message(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            // IndexSet and IndexMap equality ignores iteration order
            (Value::Set(a), Value::Set(b)) => a == b,
            (Value::Map(a), Value::Map(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.rank().hash(state);
        match self {
            Value::Void => {}
            Value::Bool(v) => v.hash(state),
            Value::Byte(v) => v.hash(state),
            Value::I16(v) => v.hash(state),
            Value::I32(v) => v.hash(state),
            Value::I64(v) => v.hash(state),
            Value::Double(v) => v.to_bits().hash(state),
            Value::String(v) => v.hash(state),
            Value::Binary(v) => v.hash(state),
            Value::Enum(v) => v.hash(state),
            Value::Message(v) => v.hash(state),
            Value::List(items) => items.hash(state),
            Value::Set(items) => {
                items.len().hash(state);
                items
                    .iter()
                    .fold(0u64, |acc, item| acc.wrapping_add(item_hash(item)))
                    .hash(state);
            }
            Value::Map(entries) => {
                entries.len().hash(state);
                entries
                    .iter()
                    .fold(0u64, |acc, entry| acc.wrapping_add(item_hash(&entry)))
                    .hash(state);
            }
        }
    }
}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Value {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Value::Void, Value::Void) => Ordering::Equal,
            (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
            (Value::Byte(a), Value::Byte(b)) => a.cmp(b),
            (Value::I16(a), Value::I16(b)) => a.cmp(b),
            (Value::I32(a), Value::I32(b)) => a.cmp(b),
            (Value::I64(a), Value::I64(b)) => a.cmp(b),
            (Value::Double(a), Value::Double(b)) => a.total_cmp(b),
            (Value::String(a), Value::String(b)) => a.cmp(b),
            (Value::Binary(a), Value::Binary(b)) => a.cmp(b),
            (Value::Enum(a), Value::Enum(b)) => a.cmp(b),
            (Value::Message(a), Value::Message(b)) => a.cmp(b),
            (Value::List(a), Value::List(b)) => a.cmp(b),
            (Value::Set(a), Value::Set(b)) => sorted_items(a).cmp(&sorted_items(b)),
            (Value::Map(a), Value::Map(b)) => sorted_entries(a).cmp(&sorted_entries(b)),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i8> for Value {
    fn from(v: i8) -> Self {
        Value::Byte(v)
    }
}

impl From<i16> for Value {
    fn from(v: i16) -> Self {
        Value::I16(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::I32(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::I64(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Double(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Value::Binary(v)
    }
}

impl From<EnumValue> for Value {
    fn from(v: EnumValue) -> Self {
        Value::Enum(v)
    }
}

impl From<Message> for Value {
    fn from(v: Message) -> Self {
        Value::Message(v)
    }
}

impl From<Vec<Value>> for Value {
    fn from(v: Vec<Value>) -> Self {
        Value::List(v)
    }
}

impl From<ValueSet> for Value {
    fn from(v: ValueSet) -> Self {
        Value::Set(v)
    }
}

impl From<ValueMap> for Value {
    fn from(v: ValueMap) -> Self {
        Value::Map(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set_of(items: &[i32]) -> Value {
        Value::Set(items.iter().map(|&i| Value::I32(i)).collect())
    }

    fn map_of(entries: &[(&str, i32)]) -> Value {
        Value::Map(
            entries
                .iter()
                .map(|&(k, v)| (Value::from(k), Value::I32(v)))
                .collect(),
        )
    }

    #[test]
    fn test_count_tracks_container_size() {
        assert_eq!(Value::I32(0).count(), 1);
        assert_eq!(Value::from("").count(), 1);
        assert_eq!(Value::List(vec![]).count(), 0);
        assert_eq!(set_of(&[1, 2, 3]).count(), 3);
        assert_eq!(map_of(&[("a", 1)]).count(), 1);
    }

    #[test]
    fn test_sets_and_maps_ignore_order() {
        assert_eq!(set_of(&[1, 2, 3]), set_of(&[3, 1, 2]));
        assert_eq!(item_hash(&set_of(&[1, 2, 3])), item_hash(&set_of(&[3, 1, 2])));
        assert_eq!(set_of(&[1, 2]).cmp(&set_of(&[2, 1])), Ordering::Equal);

        assert_eq!(map_of(&[("a", 1), ("b", 2)]), map_of(&[("b", 2), ("a", 1)]));
        assert_eq!(
            item_hash(&map_of(&[("a", 1), ("b", 2)])),
            item_hash(&map_of(&[("b", 2), ("a", 1)]))
        );
        assert_ne!(map_of(&[("a", 1)]), map_of(&[("a", 2)]));
    }

    #[test]
    fn test_lists_are_order_sensitive() {
        let a = Value::List(vec![Value::I32(1), Value::I32(2)]);
        let b = Value::List(vec![Value::I32(2), Value::I32(1)]);
        assert_ne!(a, b);
        assert!(a < b);
    }

    #[test]
    fn test_doubles_are_totally_ordered() {
        let nan = Value::Double(f64::NAN);
        assert_eq!(nan, nan.clone());
        assert_eq!(item_hash(&nan), item_hash(&nan.clone()));
        assert!(Value::Double(-1.0) < Value::Double(0.5));
        assert_ne!(Value::Double(0.0), Value::Double(-0.0));
    }

    #[test]
    fn test_different_kinds_never_equal() {
        assert_ne!(Value::I32(1), Value::I64(1));
        assert!(Value::Bool(true) < Value::Byte(0));
    }

    #[test]
    fn test_sorted_variant_orders_items() {
        let sorted = set_of(&[3, 1, 2]).ordered_as(ContainerVariant::Sorted);
        let items: Vec<_> = sorted.as_set().unwrap().iter().cloned().collect();
        assert_eq!(items, vec![Value::I32(1), Value::I32(2), Value::I32(3)]);

        let ordered = set_of(&[3, 1, 2]).ordered_as(ContainerVariant::Ordered);
        let items: Vec<_> = ordered.as_set().unwrap().iter().cloned().collect();
        assert_eq!(items, vec![Value::I32(3), Value::I32(1), Value::I32(2)]);

        let map = map_of(&[("b", 1), ("a", 2)]).ordered_as(ContainerVariant::Sorted);
        let keys: Vec<_> = map.as_map().unwrap().keys().filter_map(Value::as_str).collect();
        assert_eq!(keys, vec!["a", "b"]);
    }
}
