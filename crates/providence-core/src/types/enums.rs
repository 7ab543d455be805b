//! Enum descriptors

use std::sync::Arc;

use rustc_hash::FxHashMap;

use super::{Annotations, EnumSpec, TypeId};
use crate::error::SchemaError;
use crate::reflect::{EnumBuilder, EnumValue};

/// Closed value table of a declared enum, addressable by value and by name
#[derive(Debug, Clone)]
pub struct EnumDescriptor {
    id: TypeId,
    qualified_name: Arc<str>,
    comment: Option<String>,
    values: Vec<EnumValue>,
    by_value: FxHashMap<i32, usize>,
    by_name: FxHashMap<String, usize>,
    annotations: Annotations,
}

impl EnumDescriptor {
    pub(crate) fn new(id: TypeId, spec: EnumSpec) -> Result<Self, SchemaError> {
        let qualified_name: Arc<str> = Arc::from(spec.name.as_str());
        let mut values = Vec::with_capacity(spec.values.len());
        let mut by_value = FxHashMap::default();
        let mut by_name = FxHashMap::default();

        for (index, (name, value)) in spec.values.into_iter().enumerate() {
            if by_value.insert(value, index).is_some() {
                return Err(SchemaError::DuplicateEnumValue {
                    type_name: spec.name,
                    value,
                });
            }
            if by_name.insert(name.clone(), index).is_some() {
                return Err(SchemaError::DuplicateEnumName {
                    type_name: spec.name,
                    name,
                });
            }
            values.push(EnumValue::new(Arc::clone(&qualified_name), &name, value));
        }

        Ok(Self {
            id,
            qualified_name,
            comment: spec.comment,
            values,
            by_value,
            by_name,
            annotations: spec.annotations,
        })
    }

    /// Registry id of this type
    pub fn id(&self) -> TypeId {
        self.id
    }

    /// Package-qualified name
    pub fn qualified_name(&self) -> &str {
        &self.qualified_name
    }

    /// Documentation comment
    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    /// Values in declared order
    pub fn values(&self) -> &[EnumValue] {
        &self.values
    }

    /// Find the value with this numeric value
    pub fn find_by_value(&self, value: i32) -> Option<&EnumValue> {
        self.by_value.get(&value).map(|&i| &self.values[i])
    }

    /// Find the value with this name
    pub fn find_by_name(&self, name: &str) -> Option<&EnumValue> {
        self.by_name.get(name).map(|&i| &self.values[i])
    }

    /// Type annotations
    pub fn annotations(&self) -> &Annotations {
        &self.annotations
    }

    /// Start an enum builder for this type
    pub fn builder(&self) -> EnumBuilder<'_> {
        EnumBuilder::new(self)
    }
}
