use sea_orm::{
    ConnectionTrait, DbErr, EntityName, EntityTrait, JoinType, PaginatorTrait, QueryFilter,
    QuerySelect, QueryTrait, Select,
    sea_query::{Alias, Expr, Order},
};

use crate::descriptor::EntityDescriptor;
use crate::errors::EngineError;
use crate::filtering::{CompiledFilter, PagePlan};
use crate::models::OrderDirection;
use crate::scope::AccessScope;

/// A join of `table AS alias ON alias.alias_column = from.from_column`.
#[derive(Debug, Clone, PartialEq)]
pub struct JoinSpec {
    pub join_type: JoinType,
    pub table: String,
    pub alias: String,
    pub alias_column: String,
    pub from: String,
    pub from_column: String,
}

impl JoinSpec {
    fn apply<E: EntityTrait>(&self, select: &mut Select<E>) {
        QueryTrait::query(select).join_as(
            self.join_type,
            Alias::new(&self.table),
            Alias::new(&self.alias),
            Expr::col((Alias::new(&self.alias), Alias::new(&self.alias_column)))
                .equals((Alias::new(&self.from), Alias::new(&self.from_column))),
        );
    }
}

/// A select that is tenant-scoped from construction.
///
/// The only constructors take an [`AccessScope`]; the scope's joins and
/// predicate (and the soft-delete exclusion) are applied before anything else
/// can touch the query.
#[derive(Debug, Clone)]
pub struct ScopedSelect<E: EntityTrait> {
    select: Select<E>,
    table: String,
    id_field: String,
}

impl<E: EntityTrait> ScopedSelect<E> {
    /// # Errors
    ///
    /// [`EngineError::Configuration`] if `scope` was resolved for another entity type.
    pub fn new(descriptor: &EntityDescriptor, scope: &AccessScope) -> Result<Self, EngineError> {
        Self::from_select(E::find(), descriptor, scope)
    }

    /// Scope a caller-built base query (extra joins, preset conditions).
    ///
    /// Conditions on `select` must come from [`QueryFilter::filter`]; sea-query
    /// panics when raw `and_where`/`or_where` chains meet the scope condition.
    ///
    /// # Errors
    ///
    /// [`EngineError::Configuration`] if `scope` was resolved for another entity
    /// type, or `descriptor` doesn't describe `E`'s table.
    pub fn from_select(
        mut select: Select<E>,
        descriptor: &EntityDescriptor,
        scope: &AccessScope,
    ) -> Result<Self, EngineError> {
        if scope.entity_type() != descriptor.entity_type() {
            return Err(EngineError::configuration(format!(
                "access scope for '{}' applied to '{}'",
                scope.entity_type(),
                descriptor.entity_type()
            )));
        }
        if E::default().table_name() != descriptor.table() {
            return Err(EngineError::configuration(format!(
                "descriptor '{}' does not describe table '{}'",
                descriptor.entity_type(),
                E::default().table_name()
            )));
        }

        for join in scope.joins() {
            join.apply(&mut select);
        }
        select = select.filter(scope.condition().clone());

        if let Some(flag) = descriptor.soft_delete_field() {
            select = select.filter(
                Expr::col((Alias::new(descriptor.table()), Alias::new(flag))).eq(false),
            );
        }

        Ok(Self {
            select,
            table: descriptor.table().to_string(),
            id_field: descriptor.id_field().to_string(),
        })
    }

    /// AND a compiled filter onto the scoped query. Narrows only.
    #[must_use]
    pub fn filter(mut self, compiled: CompiledFilter) -> Self {
        for join in &compiled.joins {
            join.apply(&mut self.select);
        }
        self.select = self.select.filter(compiled.condition);
        self
    }

    /// Rows matching scope and filter.
    ///
    /// # Errors
    ///
    /// Propagates the store error.
    pub async fn count<C>(&self, db: &C) -> Result<u64, DbErr>
    where
        C: ConnectionTrait,
        E::Model: Sync,
    {
        PaginatorTrait::count(self.select.clone(), db).await
    }

    /// Order by a native column, with the identifier as tie-breaker so that
    /// pages are stable.
    #[must_use]
    pub fn order_by(mut self, field: &str, direction: OrderDirection) -> Self {
        let table = Alias::new(&self.table);
        QueryTrait::query(&mut self.select)
            .order_by((table.clone(), Alias::new(field)), Order::from(direction));
        if field != self.id_field {
            QueryTrait::query(&mut self.select)
                .order_by((table, Alias::new(&self.id_field)), Order::Asc);
        }
        self
    }

    /// Fetch one page.
    ///
    /// # Errors
    ///
    /// Propagates the store error.
    pub async fn fetch_page<C: ConnectionTrait>(
        self,
        db: &C,
        plan: PagePlan,
    ) -> Result<Vec<E::Model>, DbErr> {
        self.select
            .offset(plan.offset())
            .limit(plan.limit())
            .all(db)
            .await
    }

    /// The underlying statement, e.g. for `build(backend)` in logs or tests.
    #[must_use]
    pub fn into_select(self) -> Select<E> {
        self.select
    }
}
