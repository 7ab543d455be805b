//! Handle to a message type within a linked registry

use std::fmt;
use std::sync::Arc;

use super::MessageBuilder;
use crate::types::{MessageDescriptor, TypeId, TypeRegistry};

/// A message type together with the registry it was declared in.
///
/// Every record and builder holds one. Cloning is an `Arc` bump.
#[derive(Clone)]
pub struct MessageType {
    registry: Arc<TypeRegistry>,
    id: TypeId,
}

impl MessageType {
    /// Handle for `id`, if it names a message type of `registry`
    pub fn new(registry: &Arc<TypeRegistry>, id: TypeId) -> Option<Self> {
        registry.message(id)?;
        Some(Self {
            registry: Arc::clone(registry),
            id,
        })
    }

    /// Handle for an id taken from a linked field type of the same registry
    pub(crate) fn nested(&self, id: TypeId) -> Self {
        Self {
            registry: Arc::clone(&self.registry),
            id,
        }
    }

    /// Registry id
    pub fn id(&self) -> TypeId {
        self.id
    }

    /// Registry the type was declared in
    pub fn registry(&self) -> &Arc<TypeRegistry> {
        &self.registry
    }

    /// Message descriptor
    pub fn descriptor(&self) -> &MessageDescriptor {
        self.registry.message_unchecked(self.id)
    }

    /// Empty builder for this type
    pub fn builder(&self) -> MessageBuilder {
        MessageBuilder::new(self.clone())
    }
}

impl PartialEq for MessageType {
    fn eq(&self, other: &Self) -> bool {
        (Arc::ptr_eq(&self.registry, &other.registry) && self.id == other.id)
            || self.descriptor().qualified_name() == other.descriptor().qualified_name()
    }
}

impl Eq for MessageType {}

impl fmt::Debug for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MessageType")
            .field("name", &self.descriptor().qualified_name())
            .field("id", &self.id)
            .finish()
    }
}
