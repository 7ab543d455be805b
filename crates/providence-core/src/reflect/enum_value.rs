//! Enum runtime

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::types::EnumDescriptor;

/// One value of a declared enum.
///
/// Carries the qualified name of its type, so values are self-describing and
/// cheap to clone. Two values are equal when they belong to the same type
/// and have the same numeric value.
#[derive(Debug, Clone)]
pub struct EnumValue {
    type_name: Arc<str>,
    name: Arc<str>,
    value: i32,
}

impl EnumValue {
    pub(crate) fn new(type_name: Arc<str>, name: &str, value: i32) -> Self {
        Self {
            type_name,
            name: Arc::from(name),
            value,
        }
    }

    /// Qualified name of the enum type
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Value name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Numeric value
    pub fn value(&self) -> i32 {
        self.value
    }
}

impl PartialEq for EnumValue {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value && self.type_name == other.type_name
    }
}

impl Eq for EnumValue {}

impl Hash for EnumValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.type_name.hash(state);
        self.value.hash(state);
    }
}

impl PartialOrd for EnumValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for EnumValue {
    fn cmp(&self, other: &Self) -> Ordering {
        self.type_name
            .cmp(&other.type_name)
            .then(self.value.cmp(&other.value))
    }
}

impl fmt::Display for EnumValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Builder resolving an enum value by number or name
#[derive(Debug, Clone)]
pub struct EnumBuilder<'a> {
    descriptor: &'a EnumDescriptor,
    value: Option<EnumValue>,
}

impl<'a> EnumBuilder<'a> {
    pub(crate) fn new(descriptor: &'a EnumDescriptor) -> Self {
        Self {
            descriptor,
            value: None,
        }
    }

    /// Resolve by numeric value; an unknown value leaves the builder empty
    pub fn set_by_value(&mut self, value: i32) -> &mut Self {
        self.value = self.descriptor.find_by_value(value).cloned();
        self
    }

    /// Resolve by name; an unknown name leaves the builder empty
    pub fn set_by_name(&mut self, name: &str) -> &mut Self {
        self.value = self.descriptor.find_by_name(name).cloned();
        self
    }

    /// Drop the resolved value
    pub fn clear(&mut self) -> &mut Self {
        self.value = None;
        self
    }

    /// Check if a value was resolved
    pub fn is_valid(&self) -> bool {
        self.value.is_some()
    }

    /// The resolved value
    pub fn build(&self) -> Option<EnumValue> {
        self.value.clone()
    }
}
