use sea_orm::{EntityTrait, sea_query::SimpleExpr};

use crate::descriptor::{EntityDescriptor, LookupTarget, identifier_lookup};
use crate::errors::FilterError;

/// A public entity representation that can be listed through
/// [`CollectionQueryEngine`](crate::CollectionQueryEngine).
///
/// ```rust,ignore
/// impl ScopedResource for Project {
///     type EntityType = project::Entity;
///     const ENTITY_TYPE: &'static str = "project";
///
///     fn describe() -> EntityDescriptor {
///         EntityDescriptor::from_entity::<project::Entity>(Self::ENTITY_TYPE)
///             .relation("owner", "user")
///             .owned_directly("organization_id")
///             .soft_delete("deleted")
///     }
/// }
/// ```
pub trait ScopedResource: Sized + Send + Sync
where
    Self: From<<Self::EntityType as EntityTrait>::Model>,
{
    type EntityType: EntityTrait<Model: Sync> + Sync;

    /// Registry key of the entity type, also used as the foreign entity name in
    /// other descriptors' relations.
    const ENTITY_TYPE: &'static str;

    /// Static schema of the entity. The default derives native fields from
    /// the Sea-ORM columns and declares nothing else, which the registry
    /// rejects: every entity needs at least a tenant ownership.
    #[must_use]
    fn describe() -> EntityDescriptor {
        EntityDescriptor::from_entity::<Self::EntityType>(Self::ENTITY_TYPE)
    }

    /// Predicate used when another entity filters through a relation to this
    /// one, e.g. `owner:smith` on a project matched against users.
    ///
    /// Defaults to equality against the identifier.
    ///
    /// # Errors
    ///
    /// A [`FilterError`] rejects the whole filter.
    fn related_lookup(target: &LookupTarget<'_>, value: &str) -> Result<SimpleExpr, FilterError> {
        identifier_lookup(target, value)
    }
}
