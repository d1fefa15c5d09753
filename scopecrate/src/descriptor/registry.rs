//! Startup-time registry of entity descriptors.
//!
//! Every consistency rule that doesn't depend on a request is checked here,
//! once, so that a broken registration stops the process at boot instead of
//! failing individual requests later.

use std::collections::{BTreeSet, HashMap};

use super::{EntityDescriptor, Ownership};
use crate::core::ScopedResource;
use crate::errors::EngineError;

/// Immutable map from entity type name to its descriptor.
#[derive(Debug, Default)]
pub struct EntityRegistry {
    descriptors: HashMap<String, EntityDescriptor>,
}

impl EntityRegistry {
    #[must_use]
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    /// Look up a descriptor by entity type.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::UnknownEntity`] for unregistered types.
    pub fn describe(&self, entity_type: &str) -> Result<&EntityDescriptor, EngineError> {
        self.descriptors
            .get(entity_type)
            .ok_or_else(|| EngineError::UnknownEntity(entity_type.to_string()))
    }

    pub(crate) fn get(&self, entity_type: &str) -> Option<&EntityDescriptor> {
        self.descriptors.get(entity_type)
    }

    pub fn entity_types(&self) -> impl Iterator<Item = &str> {
        self.descriptors.keys().map(String::as_str)
    }
}

#[derive(Debug, Default)]
pub struct RegistryBuilder {
    descriptors: Vec<EntityDescriptor>,
}

impl RegistryBuilder {
    /// Register a resource using its own [`ScopedResource::describe`] and
    /// [`ScopedResource::related_lookup`].
    #[must_use]
    pub fn register<R: ScopedResource>(mut self) -> Self {
        let descriptor = R::describe().with_related_lookup(R::related_lookup);
        self.descriptors.push(descriptor);
        self
    }

    /// Register a hand-built descriptor.
    #[must_use]
    pub fn descriptor(mut self, descriptor: EntityDescriptor) -> Self {
        self.descriptors.push(descriptor);
        self
    }

    /// Validate all descriptors and freeze the registry.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Configuration`] when:
    /// - an entity type is registered twice
    /// - an entity declares no tenant ownership
    /// - a relation has no native `{name}_id` join key, or targets an unregistered entity
    /// - a declared default order field is not a native field
    /// - a direct tenant field is missing, or transitive ownership doesn't reach a tenant
    pub fn build(self) -> Result<EntityRegistry, EngineError> {
        let mut descriptors = HashMap::with_capacity(self.descriptors.len());
        for descriptor in self.descriptors {
            let entity_type = descriptor.entity_type().to_string();
            if descriptors.insert(entity_type.clone(), descriptor).is_some() {
                return Err(EngineError::configuration(format!(
                    "entity type '{entity_type}' registered twice"
                )));
            }
        }

        let registry = EntityRegistry { descriptors };
        for descriptor in registry.descriptors.values() {
            validate_descriptor(&registry, descriptor)?;
            validate_ownership_chain(&registry, descriptor)?;
        }

        tracing::debug!(
            entity_types = ?registry.descriptors.keys().collect::<Vec<_>>(),
            "Entity registry built"
        );
        Ok(registry)
    }
}

fn validate_descriptor(
    registry: &EntityRegistry,
    descriptor: &EntityDescriptor,
) -> Result<(), EngineError> {
    let entity_type = descriptor.entity_type();

    for relation in descriptor.relations() {
        let join_key = relation.join_key();
        if descriptor.native_field(&join_key).is_none() {
            return Err(EngineError::configuration(format!(
                "relation '{}' on '{entity_type}' has no standard id column '{join_key}'",
                relation.name
            )));
        }
        if registry.get(&relation.foreign_entity).is_none() {
            return Err(EngineError::configuration(format!(
                "relation '{}' on '{entity_type}' targets unregistered entity '{}'",
                relation.name, relation.foreign_entity
            )));
        }
    }

    if let Some(order) = descriptor.declared_default_order()
        && descriptor.native_field(order).is_none()
    {
        return Err(EngineError::configuration(format!(
            "default order field '{order}' is not a native field of '{entity_type}'"
        )));
    }

    if let Some(flag) = descriptor.soft_delete_field()
        && descriptor.native_field(flag).is_none()
    {
        return Err(EngineError::configuration(format!(
            "soft delete field '{flag}' is not a native field of '{entity_type}'"
        )));
    }

    match descriptor.ownership() {
        None => Err(EngineError::configuration(format!(
            "entity '{entity_type}' declares no tenant ownership"
        ))),
        Some(Ownership::Direct { tenant_field }) if descriptor.native_field(tenant_field).is_none() => {
            Err(EngineError::configuration(format!(
                "tenant field '{tenant_field}' is not a native field of '{entity_type}'"
            )))
        }
        Some(Ownership::Via { relation }) if descriptor.relation_field(relation).is_none() => {
            Err(EngineError::configuration(format!(
                "ownership of '{entity_type}' goes through unknown relation '{relation}'"
            )))
        }
        Some(_) => Ok(()),
    }
}

/// Follow `Via` ownership until an entity that owns rows itself; reject cycles.
fn validate_ownership_chain(
    registry: &EntityRegistry,
    descriptor: &EntityDescriptor,
) -> Result<(), EngineError> {
    let mut seen = BTreeSet::new();
    let mut current = descriptor;
    while let Some(Ownership::Via { relation }) = current.ownership() {
        if !seen.insert(current.entity_type().to_string()) {
            return Err(EngineError::configuration(format!(
                "ownership of '{}' is cyclic",
                descriptor.entity_type()
            )));
        }
        let next = current
            .relation_field(relation)
            .and_then(|r| registry.get(&r.foreign_entity))
            .ok_or_else(|| {
                EngineError::configuration(format!(
                    "ownership relation '{relation}' of '{}' cannot be resolved",
                    current.entity_type()
                ))
            })?;
        current = next;
    }
    Ok(())
}
