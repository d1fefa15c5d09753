use std::sync::Arc;

use sea_orm::{ConnectionTrait, DatabaseBackend, EntityTrait, Select};

use super::query::ScopedSelect;
use super::traits::ScopedResource;
use crate::config::EngineConfig;
use crate::descriptor::EntityRegistry;
use crate::errors::EngineError;
use crate::filtering::{PagePlan, compile_filter, resolve_order_field};
use crate::models::{CollectionRequest, CollectionResponse};
use crate::scope::{AccessPrincipal, AccessScope};

/// Lists tenant-scoped, filtered, ordered pages of registered entities.
///
/// Holds nothing but the immutable registry and configuration; clone it
/// freely into request handlers.
#[derive(Debug, Clone)]
pub struct CollectionQueryEngine {
    registry: Arc<EntityRegistry>,
    config: EngineConfig,
}

impl CollectionQueryEngine {
    #[must_use]
    pub fn new(registry: Arc<EntityRegistry>) -> Self {
        Self::with_config(registry, EngineConfig::default())
    }

    #[must_use]
    pub fn with_config(registry: Arc<EntityRegistry>, config: EngineConfig) -> Self {
        Self { registry, config }
    }

    #[must_use]
    pub fn registry(&self) -> &EntityRegistry {
        &self.registry
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Build the scoped, filtered and ordered query of a request without
    /// running it.
    ///
    /// # Errors
    ///
    /// [`EngineError::UnknownEntity`], [`EngineError::MissingTenantContext`] or
    /// [`EngineError::Configuration`]. Filter problems are not errors: the
    /// filter matches nothing instead.
    pub fn plan<E, P>(
        &self,
        entity_type: &str,
        base: Select<E>,
        request: &CollectionRequest<P>,
        backend: DatabaseBackend,
    ) -> Result<(ScopedSelect<E>, PagePlan), EngineError>
    where
        E: EntityTrait,
        P: AccessPrincipal,
    {
        let descriptor = self.registry.describe(entity_type)?;
        let scope = AccessScope::resolve(&request.principal, &self.registry, descriptor, request.access)?;
        let mut query = ScopedSelect::from_select(base, descriptor, &scope)?;

        if let Some(filter) = request.filter.as_deref() {
            let compiled = compile_filter(filter, &self.registry, descriptor, backend, &self.config);
            query = query.filter(compiled);
        }

        let order_field = resolve_order_field(descriptor, request.order_by.as_deref());
        let plan = PagePlan::new(request.page, request.per_page, &self.config);

        tracing::debug!(
            entity_type,
            order_by = order_field,
            order_dir = ?request.order_dir,
            page = plan.page,
            per_page = plan.per_page,
            "Collection query planned"
        );

        Ok((query.order_by(order_field, request.order_dir), plan))
    }

    /// List one page of `R`.
    ///
    /// Runs a count over the scoped and filtered query, then fetches the page.
    ///
    /// # Errors
    ///
    /// See [`CollectionQueryEngine::plan`]; store failures are returned as
    /// [`EngineError::Database`].
    pub async fn list<R, C, P>(
        &self,
        db: &C,
        request: &CollectionRequest<P>,
    ) -> Result<CollectionResponse<R>, EngineError>
    where
        R: ScopedResource,
        C: ConnectionTrait,
        P: AccessPrincipal,
    {
        self.list_from(db, R::EntityType::find(), request).await
    }

    /// Like [`CollectionQueryEngine::list`], starting from a caller-built base
    /// query. The base can only be narrowed further; tenant scope and
    /// soft-delete exclusion still apply.
    ///
    /// # Panics
    ///
    /// If `base` carries raw `and_where`/`or_where` chains; sea-query can't mix
    /// them with the scope condition. Narrow the base with
    /// [`QueryFilter::filter`](sea_orm::QueryFilter::filter) instead.
    ///
    /// # Errors
    ///
    /// See [`CollectionQueryEngine::list`].
    pub async fn list_from<R, C, P>(
        &self,
        db: &C,
        base: Select<R::EntityType>,
        request: &CollectionRequest<P>,
    ) -> Result<CollectionResponse<R>, EngineError>
    where
        R: ScopedResource,
        C: ConnectionTrait,
        P: AccessPrincipal,
    {
        let (query, plan) = self.plan(R::ENTITY_TYPE, base, request, db.get_database_backend())?;

        let total_count = query.count(db).await?;
        let total_pages = plan.total_pages(total_count);
        let models = query.fetch_page(db, plan).await?;

        tracing::debug!(
            entity_type = R::ENTITY_TYPE,
            total_count,
            total_pages,
            returned = models.len(),
            "Collection listed"
        );

        Ok(CollectionResponse {
            items: models.into_iter().map(R::from).collect(),
            page: plan.page,
            per_page: plan.per_page,
            total_pages,
        })
    }
}
