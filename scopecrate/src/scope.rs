//! # Tenant Access Scope
//!
//! Every collection query is restricted to the acting principal's tenant. The
//! scope predicate is computed here from the entity's declared
//! [`Ownership`] and is a required argument of
//! [`ScopedSelect`](crate::core::query::ScopedSelect), so no query can be built
//! without it.
//!
//! ```text
//! Direct      projects.organization_id = :tenant
//! TenantRoot  organizations.id = :tenant
//! Via         chats INNER JOIN projects AS scope_1 ON scope_1.id = chats.project_id
//!             WHERE scope_1.organization_id = :tenant
//! ```

use sea_orm::{
    JoinType,
    sea_query::{Alias, Expr, SimpleExpr},
};
use uuid::Uuid;

use crate::core::query::JoinSpec;
use crate::descriptor::{EntityDescriptor, EntityRegistry, Ownership};
use crate::errors::EngineError;

/// The acting identity, as supplied by the authentication layer.
pub trait AccessPrincipal {
    /// Tenant (organization) the principal acts for, if one can be resolved.
    fn tenant_id(&self) -> Option<Uuid>;
}

impl AccessPrincipal for Uuid {
    fn tenant_id(&self) -> Option<Uuid> {
        Some(*self)
    }
}

impl<P: AccessPrincipal + ?Sized> AccessPrincipal for &P {
    fn tenant_id(&self) -> Option<Uuid> {
        (**self).tenant_id()
    }
}

/// Requested access level. All levels currently produce the same predicate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AccessLevel {
    #[default]
    Read,
    Write,
    Admin,
}

/// A resolved tenant predicate for one entity type.
#[derive(Debug, Clone)]
pub struct AccessScope {
    entity_type: String,
    tenant_id: Uuid,
    level: AccessLevel,
    joins: Vec<JoinSpec>,
    condition: SimpleExpr,
}

impl AccessScope {
    /// Resolve the scope of `principal` over `descriptor`.
    ///
    /// # Errors
    ///
    /// [`EngineError::MissingTenantContext`] when the principal has no tenant;
    /// [`EngineError::Configuration`] if the ownership chain can't be followed.
    pub fn resolve<P>(
        principal: &P,
        registry: &EntityRegistry,
        descriptor: &EntityDescriptor,
        level: AccessLevel,
    ) -> Result<Self, EngineError>
    where
        P: AccessPrincipal + ?Sized,
    {
        let tenant_id = principal
            .tenant_id()
            .ok_or(EngineError::MissingTenantContext)?;

        let max_depth = registry.entity_types().count();
        let mut joins = Vec::new();
        let mut current = descriptor;
        let mut current_ref = descriptor.table().to_string();

        let condition = loop {
            match current.ownership() {
                Some(Ownership::Direct { tenant_field }) => {
                    break Expr::col((Alias::new(&current_ref), Alias::new(tenant_field))).eq(tenant_id);
                }
                Some(Ownership::TenantRoot) => {
                    break Expr::col((Alias::new(&current_ref), Alias::new(current.id_field())))
                        .eq(tenant_id);
                }
                Some(Ownership::Via { relation }) => {
                    if joins.len() >= max_depth {
                        return Err(EngineError::configuration(format!(
                            "ownership of '{}' is cyclic",
                            descriptor.entity_type()
                        )));
                    }
                    let link = current.relation_field(relation).ok_or_else(|| {
                        EngineError::configuration(format!(
                            "ownership relation '{relation}' missing on '{}'",
                            current.entity_type()
                        ))
                    })?;
                    let parent = registry.describe(&link.foreign_entity).map_err(|_| {
                        EngineError::configuration(format!(
                            "ownership of '{}' reaches unregistered entity '{}'",
                            current.entity_type(),
                            link.foreign_entity
                        ))
                    })?;

                    let alias = format!("scope_{}", joins.len() + 1);
                    joins.push(JoinSpec {
                        join_type: JoinType::InnerJoin,
                        table: parent.table().to_string(),
                        alias: alias.clone(),
                        alias_column: parent.id_field().to_string(),
                        from: current_ref,
                        from_column: link.join_key(),
                    });
                    current = parent;
                    current_ref = alias;
                }
                None => {
                    return Err(EngineError::configuration(format!(
                        "entity '{}' declares no tenant ownership",
                        current.entity_type()
                    )));
                }
            }
        };

        tracing::debug!(
            entity_type = descriptor.entity_type(),
            tenant_id = %tenant_id,
            ?level,
            joins = joins.len(),
            "Access scope resolved"
        );

        Ok(Self {
            entity_type: descriptor.entity_type().to_string(),
            tenant_id,
            level,
            joins,
            condition,
        })
    }

    #[must_use]
    pub fn entity_type(&self) -> &str {
        &self.entity_type
    }

    #[must_use]
    pub fn tenant_id(&self) -> Uuid {
        self.tenant_id
    }

    #[must_use]
    pub fn level(&self) -> AccessLevel {
        self.level
    }

    /// Inner joins to the tenant-owning ancestor, outermost last.
    #[must_use]
    pub fn joins(&self) -> &[JoinSpec] {
        &self.joins
    }

    #[must_use]
    pub fn condition(&self) -> &SimpleExpr {
        &self.condition
    }
}
