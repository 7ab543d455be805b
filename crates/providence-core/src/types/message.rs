//! Struct, union and exception descriptors

use std::fmt;

use rustc_hash::FxHashMap;

use super::{Annotation, Annotations, Field, FieldKind, FieldSpec, Requirement, TypeId};

/// Kind of declared message type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MessageVariant {
    /// Plain record; valid when every required field is set
    Struct,
    /// Exactly one field set
    Union,
    /// Record that can be thrown from a service method
    Exception,
}

impl fmt::Display for MessageVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            MessageVariant::Struct => "struct",
            MessageVariant::Union => "union",
            MessageVariant::Exception => "exception",
        })
    }
}

/// Descriptor of a declared struct, union or exception.
///
/// Built once when the registry is linked and shared read-only by every
/// record and builder of the type.
#[derive(Debug, Clone)]
pub struct MessageDescriptor {
    id: TypeId,
    qualified_name: String,
    variant: MessageVariant,
    comment: Option<String>,
    fields: Vec<Field>,
    by_id: FxHashMap<i32, usize>,
    by_name: FxHashMap<String, usize>,
    annotations: Annotations,
    compactible: bool,
    simple: bool,
}

impl MessageDescriptor {
    pub(crate) fn new(
        id: TypeId,
        qualified_name: String,
        variant: MessageVariant,
        comment: Option<String>,
        fields: Vec<Field>,
        annotations: Annotations,
        compactible: bool,
    ) -> Self {
        let by_id = fields.iter().enumerate().map(|(i, f)| (f.id(), i)).collect();
        let by_name = fields
            .iter()
            .enumerate()
            .map(|(i, f)| (f.name().to_string(), i))
            .collect();
        let simple = fields
            .iter()
            .all(|f| matches!(f.kind(), FieldKind::Primitive | FieldKind::Enum));
        Self {
            id,
            qualified_name,
            variant,
            comment,
            fields,
            by_id,
            by_name,
            annotations,
            compactible,
            simple,
        }
    }

    /// Registry id of this type
    pub fn id(&self) -> TypeId {
        self.id
    }

    /// Package-qualified name, e.g. `calc.Operation`
    pub fn qualified_name(&self) -> &str {
        &self.qualified_name
    }

    /// Name without the package
    pub fn name(&self) -> &str {
        split_qualified(&self.qualified_name).1
    }

    /// Declaring package, if the name is qualified
    pub fn package(&self) -> Option<&str> {
        split_qualified(&self.qualified_name).0
    }

    /// Struct, union or exception
    pub fn variant(&self) -> MessageVariant {
        self.variant
    }

    /// Documentation comment
    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    /// Fields in declared order
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Look up a field by id
    pub fn field_by_id(&self, id: i32) -> Option<&Field> {
        self.by_id.get(&id).map(|&i| &self.fields[i])
    }

    /// Look up a field by name
    pub fn field_by_name(&self, name: &str) -> Option<&Field> {
        self.by_name.get(name).map(|&i| &self.fields[i])
    }

    /// Required fields in declared order
    pub fn required_fields(&self) -> impl Iterator<Item = &Field> {
        self.fields
            .iter()
            .filter(|f| f.requirement() == Requirement::Required)
    }

    /// Type annotations
    pub fn annotations(&self) -> &Annotations {
        &self.annotations
    }

    /// Check if no field is a container or a nested message
    pub fn is_simple(&self) -> bool {
        self.simple
    }

    /// Check if the type qualifies for the compact encoding
    pub fn is_compactible(&self) -> bool {
        self.compactible
    }

    /// Check if this is a union
    pub fn is_union(&self) -> bool {
        self.variant == MessageVariant::Union
    }

    /// Check if this is an exception
    pub fn is_exception(&self) -> bool {
        self.variant == MessageVariant::Exception
    }

    /// Field carrying the message text of an exception: the one named by the
    /// `message` annotation, else a field called `message`.
    pub fn message_field(&self) -> Option<&Field> {
        if !self.is_exception() {
            return None;
        }
        match self.annotations.annotation(Annotation::Message) {
            Some(name) => self.field_by_name(name),
            None => self.field_by_name("message"),
        }
    }
}

/// First compact-eligibility rule a declaration breaks, if any.
///
/// Only structs qualify; they need at most `max_fields` fields with ids
/// `1..=N` in declared order, and no required field after an optional one.
pub(crate) fn compact_violation(
    variant: MessageVariant,
    fields: &[FieldSpec],
    max_fields: usize,
) -> Option<String> {
    if variant != MessageVariant::Struct {
        return Some(format!("it is a {variant}"));
    }
    if fields.len() > max_fields {
        return Some(format!("it has {} fields (max {max_fields})", fields.len()));
    }
    let mut seen_optional = false;
    for (index, field) in fields.iter().enumerate() {
        let expected = index as i32 + 1;
        if field.id != expected {
            return Some(format!("field {} has id {}, expected {expected}", field.name, field.id));
        }
        match field.requirement {
            Requirement::Optional => seen_optional = true,
            Requirement::Required if seen_optional => {
                return Some(format!("required field {} follows an optional field", field.name));
            }
            _ => {}
        }
    }
    None
}

/// Split `pkg.sub.Name` into `(Some("pkg.sub"), "Name")`
pub(crate) fn split_qualified(name: &str) -> (Option<&str>, &str) {
    match name.rsplit_once('.') {
        Some((package, short)) => (Some(package), short),
        None => (None, name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Primitive;

    fn i32_field(id: i32, name: &str) -> FieldSpec {
        FieldSpec::new(id, name, Primitive::I32)
    }

    #[test]
    fn test_required_before_optional_is_compact() {
        let fields = vec![i32_field(1, "a").required(), i32_field(2, "b").optional()];
        assert_eq!(compact_violation(MessageVariant::Struct, &fields, 10), None);
    }

    #[test]
    fn test_required_after_optional_is_not_compact() {
        let fields = vec![i32_field(1, "a").optional(), i32_field(2, "b").required()];
        assert_eq!(
            compact_violation(MessageVariant::Struct, &fields, 10),
            Some("required field b follows an optional field".to_string())
        );
    }

    #[test]
    fn test_id_gap_is_not_compact() {
        let fields = vec![i32_field(1, "a"), i32_field(3, "c")];
        assert_eq!(
            compact_violation(MessageVariant::Struct, &fields, 10),
            Some("field c has id 3, expected 2".to_string())
        );
    }

    #[test]
    fn test_too_many_fields_is_not_compact() {
        let fields: Vec<_> = (1..=11).map(|i| i32_field(i, &format!("f{i}"))).collect();
        assert!(compact_violation(MessageVariant::Struct, &fields, 10).is_some());
        assert!(compact_violation(MessageVariant::Struct, &fields[..10], 10).is_none());
    }

    #[test]
    fn test_only_structs_are_compact() {
        let fields = vec![i32_field(1, "a")];
        assert!(compact_violation(MessageVariant::Union, &fields, 10).is_some());
        assert!(compact_violation(MessageVariant::Exception, &fields, 10).is_some());
    }

    #[test]
    fn test_split_qualified() {
        assert_eq!(split_qualified("calc.Point"), (Some("calc"), "Point"));
        assert_eq!(split_qualified("a.b.Point"), (Some("a.b"), "Point"));
        assert_eq!(split_qualified("Point"), (None, "Point"));
    }
}
