//! Classify a clause attribute against an entity descriptor.

use crate::descriptor::{EntityDescriptor, EntityRegistry, FieldKind, RelationField};
use crate::errors::FilterError;

#[derive(Debug, Clone, Copy)]
pub enum ResolvedField<'a> {
    Native {
        name: &'a str,
        kind: FieldKind,
    },
    Relation {
        relation: &'a RelationField,
        foreign: &'a EntityDescriptor,
    },
}

/// Resolve `attribute` on `descriptor`.
///
/// The denylist is checked first so a secret column can never be reached,
/// even if it also exists as a native field.
///
/// # Errors
///
/// [`FilterError::DeniedField`], [`FilterError::UnknownField`], or
/// [`FilterError::MissingRelationTarget`] if the registry lost the foreign
/// entity (impossible for a validated registry).
pub fn resolve_field<'a>(
    registry: &'a EntityRegistry,
    descriptor: &'a EntityDescriptor,
    attribute: &str,
) -> Result<ResolvedField<'a>, FilterError> {
    if descriptor.is_denied(attribute) {
        return Err(FilterError::DeniedField(attribute.to_string()));
    }

    if let Some(field) = descriptor.native_field(attribute) {
        return Ok(ResolvedField::Native {
            name: &field.name,
            kind: field.kind,
        });
    }

    if let Some(relation) = descriptor.relation_field(attribute) {
        let foreign = registry.get(&relation.foreign_entity).ok_or_else(|| {
            FilterError::MissingRelationTarget {
                relation: relation.name.clone(),
                entity_type: relation.foreign_entity.clone(),
            }
        })?;
        return Ok(ResolvedField::Relation { relation, foreign });
    }

    Err(FilterError::UnknownField(attribute.to_string()))
}
