//! Related-lookup predicates.
//!
//! When a filter clause names a relation (`owner:smith`), the engine joins the
//! foreign table under an alias and asks the *foreign* entity how a free-text
//! value should match one of its rows. That answer is the entity's
//! [`RelatedLookupFn`], set through
//! [`ScopedResource::related_lookup`](crate::ScopedResource::related_lookup).

use sea_orm::{
    DatabaseBackend,
    sea_query::{Alias, Expr, Func, SimpleExpr},
};
use uuid::Uuid;

use super::{EntityDescriptor, FieldKind};
use crate::errors::FilterError;
use crate::filtering::conditions::build_like_condition;

/// Builds the predicate matching `value` against a joined foreign row.
pub type RelatedLookupFn = fn(&LookupTarget<'_>, &str) -> Result<SimpleExpr, FilterError>;

/// The joined foreign table as seen by a related-lookup function.
pub struct LookupTarget<'a> {
    descriptor: &'a EntityDescriptor,
    alias: &'a str,
    backend: DatabaseBackend,
}

impl<'a> LookupTarget<'a> {
    pub(crate) fn new(
        descriptor: &'a EntityDescriptor,
        alias: &'a str,
        backend: DatabaseBackend,
    ) -> Self {
        Self {
            descriptor,
            alias,
            backend,
        }
    }

    #[must_use]
    pub fn descriptor(&self) -> &EntityDescriptor {
        self.descriptor
    }

    #[must_use]
    pub fn backend(&self) -> DatabaseBackend {
        self.backend
    }

    /// A native column of the foreign entity, qualified with the join alias.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::UnknownField`] if the foreign entity has no such
    /// native field, and [`FilterError::DeniedField`] for denylisted fields.
    pub fn column(&self, field: &str) -> Result<SimpleExpr, FilterError> {
        if self.descriptor.is_denied(field) {
            return Err(FilterError::DeniedField(field.to_string()));
        }
        if self.descriptor.native_field(field).is_none() {
            return Err(FilterError::UnknownField(field.to_string()));
        }
        Ok(Expr::col((Alias::new(self.alias), Alias::new(field))).into())
    }

    /// Case-insensitive match of `expr` against a filter value.
    #[must_use]
    pub fn contains(&self, expr: SimpleExpr, value: &str) -> SimpleExpr {
        build_like_condition(expr, value)
    }

    /// `left || ' ' || right`, spelled for the active backend.
    #[must_use]
    pub fn concat_with_space(&self, left: SimpleExpr, right: SimpleExpr) -> SimpleExpr {
        match self.backend {
            DatabaseBackend::MySql => Func::cust(Alias::new("CONCAT"))
                .args([left, Expr::val(" ").into(), right])
                .into(),
            _ => Expr::cust_with_exprs("$1 || ' ' || $2", [left, right]),
        }
    }
}

/// Default related lookup: equality against the foreign identifier.
///
/// # Errors
///
/// Returns [`FilterError::InvalidValue`] when the value is not a UUID.
pub fn identifier_lookup(target: &LookupTarget<'_>, value: &str) -> Result<SimpleExpr, FilterError> {
    let id_field = target.descriptor().id_field();
    let uid = Uuid::parse_str(value.trim()).map_err(|_| FilterError::InvalidValue {
        field: id_field.to_string(),
        kind: FieldKind::Uuid,
        value: value.to_string(),
    })?;
    Ok(Expr::col((Alias::new(target.alias), Alias::new(id_field))).eq(uid))
}
