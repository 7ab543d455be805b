//! Type registry: the arena holding every declared type of a schema
//!
//! Declarations are added through [`TypeRegistryBuilder`], each reserving a
//! [`TypeId`]. Field types are kept as unresolved providers until
//! [`TypeRegistryBuilder::build`] links them, so declaration order does not
//! matter and types may reference each other cyclically. The linked
//! registry is immutable and shared behind an `Arc` by every record.

use std::fmt;
use std::sync::Arc;

use log::{debug, warn};
use rustc_hash::{FxHashMap, FxHashSet};

use super::field::{is_identifier, RESERVED_FIELD_NAMES};
use super::message::{compact_violation, split_qualified};
use super::{
    ConstValue, EnumDescriptor, EnumSpec, Field, FieldDefault, MessageDescriptor, MessageSpec, MessageVariant,
    Requirement, SchemaConfig, ServiceDescriptor, ServiceMethod, ServiceSpec, TypeRef, TypeSpec,
};
use crate::error::SchemaError;
use crate::reflect::{MessageBuilder, MessageType, Value, ValueMap, ValueSet};

/// Index of a declared type in its registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeId(pub(crate) u32);

impl TypeId {
    /// Position in the registry
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeId({})", self.0)
    }
}

/// A linked declaration
#[derive(Debug, Clone)]
pub enum DeclaredType {
    /// Enum
    Enum(EnumDescriptor),
    /// Struct, union or exception
    Message(MessageDescriptor),
    /// Service
    Service(ServiceDescriptor),
}

impl DeclaredType {
    /// Package-qualified name
    pub fn qualified_name(&self) -> &str {
        match self {
            DeclaredType::Enum(d) => d.qualified_name(),
            DeclaredType::Message(d) => d.qualified_name(),
            DeclaredType::Service(d) => d.qualified_name(),
        }
    }

    /// Declaration keyword
    pub fn kind_name(&self) -> &'static str {
        match self {
            DeclaredType::Enum(_) => "enum",
            DeclaredType::Message(d) => variant_keyword(d.variant()),
            DeclaredType::Service(_) => "service",
        }
    }
}

fn variant_keyword(variant: MessageVariant) -> &'static str {
    match variant {
        MessageVariant::Struct => "struct",
        MessageVariant::Union => "union",
        MessageVariant::Exception => "exception",
    }
}

/// Immutable, linked set of declared types
#[derive(Debug)]
pub struct TypeRegistry {
    types: Vec<DeclaredType>,
    by_name: FxHashMap<String, TypeId>,
    config: SchemaConfig,
}

impl TypeRegistry {
    /// Start declaring types with the default configuration
    pub fn builder() -> TypeRegistryBuilder {
        TypeRegistryBuilder::new()
    }

    /// Get a declaration by id
    pub fn get(&self, id: TypeId) -> Option<&DeclaredType> {
        self.types.get(id.index())
    }

    /// Look up a type id by qualified name
    pub fn lookup(&self, name: &str) -> Option<TypeId> {
        self.by_name.get(name).copied()
    }

    /// Get a declaration by qualified name
    pub fn get_by_name(&self, name: &str) -> Option<&DeclaredType> {
        self.lookup(name).and_then(|id| self.get(id))
    }

    /// Get a message descriptor by id
    pub fn message(&self, id: TypeId) -> Option<&MessageDescriptor> {
        match self.get(id) {
            Some(DeclaredType::Message(d)) => Some(d),
            _ => None,
        }
    }

    /// Get an enum descriptor by id
    pub fn enum_descriptor(&self, id: TypeId) -> Option<&EnumDescriptor> {
        match self.get(id) {
            Some(DeclaredType::Enum(d)) => Some(d),
            _ => None,
        }
    }

    /// Get a service descriptor by id
    pub fn service(&self, id: TypeId) -> Option<&ServiceDescriptor> {
        match self.get(id) {
            Some(DeclaredType::Service(d)) => Some(d),
            _ => None,
        }
    }

    /// Get a message descriptor by id, panicking if it doesn't exist
    ///
    /// # Panics
    ///
    /// Panics if the id is not a message type of this registry. Ids taken
    /// from a linked [`TypeRef::Message`] of the same registry always are.
    pub fn message_unchecked(&self, id: TypeId) -> &MessageDescriptor {
        match self.get(id) {
            Some(DeclaredType::Message(d)) => d,
            _ => panic!("{id} is not a message type"),
        }
    }

    /// Handle to a message type by qualified name
    pub fn message_type(self: &Arc<Self>, name: &str) -> Option<MessageType> {
        MessageType::new(self, self.lookup(name)?)
    }

    /// Fresh builder for a message type by qualified name
    pub fn builder_for(self: &Arc<Self>, name: &str) -> Option<MessageBuilder> {
        self.message_type(name).map(|ty| ty.builder())
    }

    /// Configuration the registry was built with
    pub fn config(&self) -> &SchemaConfig {
        &self.config
    }

    /// Declarations in declaration order
    pub fn iter(&self) -> impl Iterator<Item = (TypeId, &DeclaredType)> {
        self.types
            .iter()
            .enumerate()
            .map(|(i, t)| (TypeId(i as u32), t))
    }

    /// Number of declared types
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Check if nothing is declared
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

/// Pending declaration, linked in [`TypeRegistryBuilder::build`]
#[derive(Debug)]
enum Declaration {
    Enum(EnumDescriptor),
    Message { spec: MessageSpec, compactible: bool },
    Service(ServiceSpec),
}

impl Declaration {
    fn kind_name(&self) -> &'static str {
        match self {
            Declaration::Enum(_) => "enum",
            Declaration::Message { spec, .. } => variant_keyword(spec.variant),
            Declaration::Service(_) => "service",
        }
    }
}

/// Schema-loader entry point collecting declarations before linking
#[derive(Debug, Default)]
pub struct TypeRegistryBuilder {
    config: SchemaConfig,
    decls: Vec<Declaration>,
    by_name: FxHashMap<String, TypeId>,
}

impl TypeRegistryBuilder {
    /// Create a builder with the default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder with custom configuration
    pub fn with_config(config: SchemaConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Id reserved for a qualified name, if declared
    pub fn lookup(&self, name: &str) -> Option<TypeId> {
        self.by_name.get(name).copied()
    }

    /// Declare an enum
    pub fn declare_enum(&mut self, spec: EnumSpec) -> Result<TypeId, SchemaError> {
        let id = self.reserve(&spec.name)?;
        let descriptor = EnumDescriptor::new(id, spec)?;
        self.by_name.insert(descriptor.qualified_name().to_string(), id);
        self.decls.push(Declaration::Enum(descriptor));
        Ok(id)
    }

    /// Declare a struct, union or exception.
    ///
    /// Field ids, names and requirements are checked here, compact
    /// eligibility is decided here; type references wait for the link pass.
    pub fn declare_message(&mut self, spec: MessageSpec) -> Result<TypeId, SchemaError> {
        let id = self.reserve(&spec.name)?;
        self.check_fields(&spec)?;
        let compactible = self.check_compact(&spec)?;
        self.by_name.insert(spec.name.clone(), id);
        self.decls.push(Declaration::Message { spec, compactible });
        Ok(id)
    }

    /// Declare a service
    pub fn declare_service(&mut self, spec: ServiceSpec) -> Result<TypeId, SchemaError> {
        let id = self.reserve(&spec.name)?;
        let mut names = FxHashSet::default();
        for method in &spec.methods {
            if !names.insert(method.name.as_str()) {
                return Err(SchemaError::DuplicateMethod {
                    type_name: spec.name.clone(),
                    method: method.name.clone(),
                });
            }
        }
        self.by_name.insert(spec.name.clone(), id);
        self.decls.push(Declaration::Service(spec));
        Ok(id)
    }

    /// Resolve every type reference and default value, producing the
    /// immutable registry
    pub fn build(self) -> Result<Arc<TypeRegistry>, SchemaError> {
        let linker = Linker {
            decls: &self.decls,
            by_name: &self.by_name,
        };

        let mut types = Vec::with_capacity(self.decls.len());
        for (index, decl) in self.decls.iter().enumerate() {
            let id = TypeId(index as u32);
            types.push(match decl {
                Declaration::Enum(descriptor) => DeclaredType::Enum(descriptor.clone()),
                Declaration::Message { spec, compactible } => {
                    DeclaredType::Message(linker.link_message(id, spec, *compactible)?)
                }
                Declaration::Service(spec) => DeclaredType::Service(linker.link_service(id, spec)?),
            });
        }
        check_extends_cycles(&types)?;

        debug!("linked type registry with {} declared types", types.len());
        Ok(Arc::new(TypeRegistry {
            types,
            by_name: self.by_name,
            config: self.config,
        }))
    }

    fn reserve(&self, name: &str) -> Result<TypeId, SchemaError> {
        if name.is_empty() || !name.split('.').all(is_identifier) {
            return Err(SchemaError::InvalidTypeName {
                name: name.to_string(),
            });
        }
        if self.by_name.contains_key(name) {
            return Err(SchemaError::DuplicateType {
                name: name.to_string(),
            });
        }
        Ok(TypeId(self.decls.len() as u32))
    }

    fn check_fields(&self, spec: &MessageSpec) -> Result<(), SchemaError> {
        let mut ids = FxHashSet::default();
        let mut names = FxHashSet::default();
        for field in &spec.fields {
            if !is_identifier(&field.name) {
                return Err(SchemaError::InvalidFieldName {
                    type_name: spec.name.clone(),
                    field: field.name.clone(),
                });
            }
            if self.config.check_reserved_names
                && RESERVED_FIELD_NAMES.contains(&field.name.as_str())
            {
                return Err(SchemaError::ReservedFieldName {
                    type_name: spec.name.clone(),
                    field: field.name.clone(),
                });
            }
            if !ids.insert(field.id) {
                return Err(SchemaError::DuplicateFieldId {
                    type_name: spec.name.clone(),
                    id: field.id,
                });
            }
            if !names.insert(field.name.as_str()) {
                return Err(SchemaError::DuplicateFieldName {
                    type_name: spec.name.clone(),
                    field: field.name.clone(),
                });
            }
            if spec.variant == MessageVariant::Union && field.requirement == Requirement::Required {
                return Err(SchemaError::RequiredUnionField {
                    type_name: spec.name.clone(),
                    field: field.name.clone(),
                });
            }
        }
        Ok(())
    }

    fn check_compact(&self, spec: &MessageSpec) -> Result<bool, SchemaError> {
        if !spec.annotations.has(super::Annotation::Compact) {
            return Ok(false);
        }
        match compact_violation(spec.variant, &spec.fields, self.config.max_compact_fields) {
            None => Ok(true),
            Some(reason) if self.config.strict_compact => Err(SchemaError::NotCompactible {
                type_name: spec.name.clone(),
                reason,
            }),
            Some(reason) => {
                warn!("{} requested compact encoding but {reason}; ignoring", spec.name);
                Ok(false)
            }
        }
    }
}

/// Resolves type providers and default literals against all declarations
struct Linker<'a> {
    decls: &'a [Declaration],
    by_name: &'a FxHashMap<String, TypeId>,
}

impl Linker<'_> {
    /// Names resolve relative to the declaring package first, then as
    /// fully qualified names.
    fn lookup(&self, name: &str, package: Option<&str>) -> Option<TypeId> {
        if let Some(package) = package {
            if let Some(&id) = self.by_name.get(&format!("{package}.{name}")) {
                return Some(id);
            }
        }
        self.by_name.get(name).copied()
    }

    fn lookup_message(
        &self,
        name: &str,
        owner: &str,
        package: Option<&str>,
    ) -> Result<TypeId, SchemaError> {
        let id = self
            .lookup(name, package)
            .ok_or_else(|| SchemaError::UnresolvedType {
                type_name: owner.to_string(),
                name: name.to_string(),
            })?;
        match &self.decls[id.index()] {
            Declaration::Message { .. } => Ok(id),
            other => Err(SchemaError::WrongTypeKind {
                type_name: owner.to_string(),
                name: name.to_string(),
                kind: other.kind_name(),
                expected: "struct, union or exception",
            }),
        }
    }

    fn resolve(
        &self,
        spec: &TypeSpec,
        owner: &str,
        package: Option<&str>,
        variant: super::ContainerVariant,
    ) -> Result<TypeRef, SchemaError> {
        use super::ContainerVariant::Ordered;

        Ok(match spec {
            TypeSpec::Primitive(p) => TypeRef::Primitive(*p),
            TypeSpec::Named(name) => {
                let id = self
                    .lookup(name, package)
                    .ok_or_else(|| SchemaError::UnresolvedType {
                        type_name: owner.to_string(),
                        name: name.clone(),
                    })?;
                match &self.decls[id.index()] {
                    Declaration::Enum(_) => TypeRef::Enum(id),
                    Declaration::Message { .. } => TypeRef::Message(id),
                    Declaration::Service(_) => {
                        return Err(SchemaError::WrongTypeKind {
                            type_name: owner.to_string(),
                            name: name.clone(),
                            kind: "service",
                            expected: "enum or message type",
                        })
                    }
                }
            }
            TypeSpec::List(item) => {
                TypeRef::List(Box::new(self.resolve(item, owner, package, Ordered)?))
            }
            TypeSpec::Set(item) => {
                TypeRef::Set(Box::new(self.resolve(item, owner, package, Ordered)?), variant)
            }
            TypeSpec::Map(key, item) => TypeRef::Map(
                Box::new(self.resolve(key, owner, package, Ordered)?),
                Box::new(self.resolve(item, owner, package, Ordered)?),
                variant,
            ),
        })
    }

    fn link_message(
        &self,
        id: TypeId,
        spec: &MessageSpec,
        compactible: bool,
    ) -> Result<MessageDescriptor, SchemaError> {
        let package = split_qualified(&spec.name).0;
        let mut fields = Vec::with_capacity(spec.fields.len());
        for field in &spec.fields {
            let variant = field.annotations.container_variant();
            let type_ref = self.resolve(&field.type_spec, &spec.name, package, variant)?;
            let default = match &field.default {
                Some(literal) => Some(self.convert_default(literal, &type_ref).map_err(|reason| {
                    SchemaError::InvalidDefault {
                        type_name: spec.name.clone(),
                        field: field.name.clone(),
                        reason,
                    }
                })?),
                None => None,
            };
            fields.push(Field::new(
                field.id,
                field.name.clone(),
                field.requirement,
                type_ref,
                default,
                field.annotations.clone(),
                field.comment.clone(),
            ));
        }
        Ok(MessageDescriptor::new(
            id,
            spec.name.clone(),
            spec.variant,
            spec.comment.clone(),
            fields,
            spec.annotations.clone(),
            compactible,
        ))
    }

    fn link_service(&self, id: TypeId, spec: &ServiceSpec) -> Result<ServiceDescriptor, SchemaError> {
        let package = split_qualified(&spec.name).0;
        let extends = match &spec.extends {
            Some(name) => {
                let parent = self
                    .lookup(name, package)
                    .ok_or_else(|| SchemaError::UnresolvedType {
                        type_name: spec.name.clone(),
                        name: name.clone(),
                    })?;
                if let Declaration::Service(_) = &self.decls[parent.index()] {
                    Some(parent)
                } else {
                    return Err(SchemaError::WrongTypeKind {
                        type_name: spec.name.clone(),
                        name: name.clone(),
                        kind: self.decls[parent.index()].kind_name(),
                        expected: "service",
                    });
                }
            }
            None => None,
        };

        let mut methods = Vec::with_capacity(spec.methods.len());
        for method in &spec.methods {
            if method.oneway && method.response.is_some() {
                return Err(SchemaError::InvalidMethod {
                    type_name: spec.name.clone(),
                    method: method.name.clone(),
                    reason: "oneway methods have no response".to_string(),
                });
            }
            let request = self.lookup_message(&method.request, &spec.name, package)?;
            let response = match &method.response {
                Some(name) => Some(self.lookup_message(name, &spec.name, package)?),
                None => None,
            };
            methods.push(ServiceMethod::new(method.name.clone(), method.oneway, request, response));
        }

        Ok(ServiceDescriptor::new(
            id,
            spec.name.clone(),
            spec.comment.clone(),
            extends,
            methods,
        ))
    }

    /// Convert a default literal for a field. A message default is a map
    /// literal keyed by field name, linked into a template.
    fn convert_default(&self, literal: &ConstValue, ty: &TypeRef) -> Result<FieldDefault, String> {
        let TypeRef::Message(id) = ty else {
            return self.convert(literal, ty).map(FieldDefault::Value);
        };
        let Declaration::Message { spec, .. } = &self.decls[id.index()] else {
            return Err(format!("{id} is not a message type"));
        };
        let ConstValue::Map(entries) = literal else {
            return Err(format!("{} is not a valid {}", literal.kind_name(), spec.name));
        };
        if spec.variant == MessageVariant::Union && entries.len() > 1 {
            return Err(format!("union {} default sets more than one field", spec.name));
        }

        let package = split_qualified(&spec.name).0;
        let mut fields = Vec::with_capacity(entries.len());
        for (key, value) in entries {
            let name = match key {
                ConstValue::String(name) | ConstValue::Identifier(name) => name,
                other => return Err(format!("{} is not a field of {}", other.kind_name(), spec.name)),
            };
            let field = spec
                .fields
                .iter()
                .find(|field| &field.name == name)
                .ok_or_else(|| format!("no field {name} in {}", spec.name))?;
            let variant = field.annotations.container_variant();
            let field_type = self
                .resolve(&field.type_spec, &spec.name, package, variant)
                .map_err(|err| err.to_string())?;
            fields.push((field.id, self.convert_default(value, &field_type)?));
        }
        Ok(FieldDefault::Message(fields))
    }

    /// Convert a default literal to a value of the field's type
    fn convert(&self, literal: &ConstValue, ty: &TypeRef) -> Result<Value, String> {
        match (ty, literal) {
            (TypeRef::Primitive(p), literal) => literal.to_primitive(*p),
            (TypeRef::Enum(id), literal) => {
                let Declaration::Enum(descriptor) = &self.decls[id.index()] else {
                    return Err(format!("{id} is not an enum"));
                };
                let found = match literal {
                    ConstValue::Identifier(name) => {
                        let short = name.rsplit('.').next().unwrap_or(name);
                        descriptor.find_by_name(short)
                    }
                    ConstValue::Integer(value) => i32::try_from(*value)
                        .ok()
                        .and_then(|v| descriptor.find_by_value(v)),
                    other => {
                        return Err(format!(
                            "{} is not a valid {}",
                            other.kind_name(),
                            descriptor.qualified_name()
                        ))
                    }
                };
                found.cloned().map(Value::Enum).ok_or_else(|| {
                    format!("no such value in enum {}", descriptor.qualified_name())
                })
            }
            (TypeRef::Message(_), _) => {
                Err("message defaults inside containers are not supported".to_string())
            }
            (TypeRef::List(item), ConstValue::List(items)) => items
                .iter()
                .map(|v| self.convert(v, item))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::List),
            (TypeRef::Set(item, _), ConstValue::List(items)) => items
                .iter()
                .map(|v| self.convert(v, item))
                .collect::<Result<ValueSet, _>>()
                .map(|set| Value::Set(set).ordered_as(ty.variant())),
            (TypeRef::Map(key, item, _), ConstValue::Map(entries)) => entries
                .iter()
                .map(|(k, v)| Ok((self.convert(k, key)?, self.convert(v, item)?)))
                .collect::<Result<ValueMap, String>>()
                .map(|map| Value::Map(map).ordered_as(ty.variant())),
            (ty, literal) => Err(format!("{} is not a valid {}", literal.kind_name(), ty.kind())),
        }
    }
}

/// Reject services whose extends chain loops back on itself
fn check_extends_cycles(types: &[DeclaredType]) -> Result<(), SchemaError> {
    for declared in types {
        let DeclaredType::Service(service) = declared else {
            continue;
        };
        let mut current = service.extends();
        let mut steps = 0;
        while let Some(parent) = current {
            steps += 1;
            if parent == service.id() || steps > types.len() {
                return Err(SchemaError::CircularExtends {
                    type_name: service.qualified_name().to_string(),
                });
            }
            current = match &types[parent.index()] {
                DeclaredType::Service(s) => s.extends(),
                _ => None,
            };
        }
    }
    Ok(())
}
