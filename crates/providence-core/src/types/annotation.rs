//! Declaration annotations
//!
//! Annotations are free-form `key = "value"` pairs attached to types and
//! fields. The core interprets three keys, everything else is carried for
//! code generators and codecs.

use std::collections::BTreeMap;

use super::ContainerVariant;

/// Annotation keys interpreted by the core
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Annotation {
    /// On a struct: request the compact encoding
    Compact,
    /// On a container field: `"sorted"` or `"ordered"`
    Container,
    /// On an exception: name of the field holding the message text
    Message,
}

impl Annotation {
    /// Key as written in the IDL
    pub fn tag(&self) -> &'static str {
        match self {
            Annotation::Compact => "compact",
            Annotation::Container => "container",
            Annotation::Message => "message",
        }
    }
}

/// String to string annotation map, ordered by key
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Annotations {
    entries: BTreeMap<String, String>,
}

impl Annotations {
    /// Create an empty annotation set
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace an annotation
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), value.into());
    }

    /// Value of an arbitrary key
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Value of a known annotation
    pub fn annotation(&self, annotation: Annotation) -> Option<&str> {
        self.get(annotation.tag())
    }

    /// Check whether a known annotation is present (with any value)
    pub fn has(&self, annotation: Annotation) -> bool {
        self.entries.contains_key(annotation.tag())
    }

    /// Container ordering requested by the `container` annotation
    pub fn container_variant(&self) -> ContainerVariant {
        match self.annotation(Annotation::Container) {
            Some(value) if value.eq_ignore_ascii_case("sorted") => ContainerVariant::Sorted,
            _ => ContainerVariant::Ordered,
        }
    }

    /// Iterate annotations by key
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of annotations
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if there are no annotations
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Annotations {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_container_variant() {
        let sorted: Annotations = [("container", "SORTED")].into_iter().collect();
        let ordered: Annotations = [("container", "ordered")].into_iter().collect();

        assert_eq!(sorted.container_variant(), ContainerVariant::Sorted);
        assert_eq!(ordered.container_variant(), ContainerVariant::Ordered);
        assert_eq!(Annotations::new().container_variant(), ContainerVariant::Ordered);
    }

    #[test]
    fn test_known_and_custom_keys() {
        let mut annotations = Annotations::new();
        annotations.insert("compact", "");
        annotations.insert("java.implements", "Serializable");

        assert!(annotations.has(Annotation::Compact));
        assert!(!annotations.has(Annotation::Message));
        assert_eq!(annotations.get("java.implements"), Some("Serializable"));
        assert_eq!(annotations.len(), 2);
    }
}
