//! Service descriptors

use rustc_hash::{FxHashMap, FxHashSet};

use super::{TypeId, TypeRegistry};

/// One method of a service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceMethod {
    name: String,
    oneway: bool,
    request: TypeId,
    response: Option<TypeId>,
}

impl ServiceMethod {
    pub(crate) fn new(name: String, oneway: bool, request: TypeId, response: Option<TypeId>) -> Self {
        Self {
            name,
            oneway,
            request,
            response,
        }
    }

    /// Method name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Check if the call has no response
    pub fn is_oneway(&self) -> bool {
        self.oneway
    }

    /// Parameter struct
    pub fn request_type(&self) -> TypeId {
        self.request
    }

    /// Response union (success plus declared exceptions)
    pub fn response_type(&self) -> Option<TypeId> {
        self.response
    }
}

/// Descriptor of a declared service
#[derive(Debug, Clone)]
pub struct ServiceDescriptor {
    id: TypeId,
    qualified_name: String,
    comment: Option<String>,
    extends: Option<TypeId>,
    methods: Vec<ServiceMethod>,
    by_name: FxHashMap<String, usize>,
}

impl ServiceDescriptor {
    pub(crate) fn new(
        id: TypeId,
        qualified_name: String,
        comment: Option<String>,
        extends: Option<TypeId>,
        methods: Vec<ServiceMethod>,
    ) -> Self {
        let by_name = methods
            .iter()
            .enumerate()
            .map(|(i, m)| (m.name.clone(), i))
            .collect();
        Self {
            id,
            qualified_name,
            comment,
            extends,
            methods,
            by_name,
        }
    }

    /// Registry id of this service
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

    /// Extended service
    pub fn extends(&self) -> Option<TypeId> {
        self.extends
    }

    /// Methods declared directly on this service
    pub fn methods(&self) -> &[ServiceMethod] {
        &self.methods
    }

    /// Find a method here or on an extended service
    pub fn method<'a>(&'a self, name: &str, registry: &'a TypeRegistry) -> Option<&'a ServiceMethod> {
        let mut current = Some(self);
        while let Some(service) = current {
            if let Some(&i) = service.by_name.get(name) {
                return Some(&service.methods[i]);
            }
            current = service.extends.and_then(|id| registry.service(id));
        }
        None
    }

    /// All callable methods, own methods first, then inherited ones not
    /// overridden by name
    pub fn all_methods<'a>(&'a self, registry: &'a TypeRegistry) -> Vec<&'a ServiceMethod> {
        let mut seen = FxHashSet::default();
        let mut methods = Vec::new();
        let mut current = Some(self);
        while let Some(service) = current {
            for method in &service.methods {
                if seen.insert(method.name()) {
                    methods.push(method);
                }
            }
            current = service.extends.and_then(|id| registry.service(id));
        }
        methods
    }
}
