use serde::{Deserialize, Serialize};
use serde_with::{NoneAsEmptyString, serde_as};
use utoipa::{IntoParams, ToSchema};

use crate::filtering::parse_order;
use crate::scope::AccessLevel;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum OrderDirection {
    #[default]
    Asc,
    Desc,
}

/// One listing request, already authenticated.
///
/// Page and page size are defaulted and clamped by the engine; see
/// [`PagePlan`](crate::filtering::PagePlan).
#[derive(Debug, Clone)]
pub struct CollectionRequest<P> {
    pub principal: P,
    pub access: AccessLevel,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    pub order_by: Option<String>,
    pub order_dir: OrderDirection,
    pub filter: Option<String>,
}

impl<P> CollectionRequest<P> {
    pub fn new(principal: P) -> Self {
        Self {
            principal,
            access: AccessLevel::default(),
            page: None,
            per_page: None,
            order_by: None,
            order_dir: OrderDirection::default(),
            filter: None,
        }
    }

    #[must_use]
    pub fn page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    #[must_use]
    pub fn per_page(mut self, per_page: u32) -> Self {
        self.per_page = Some(per_page);
        self
    }

    #[must_use]
    pub fn order_by(mut self, field: impl Into<String>, direction: OrderDirection) -> Self {
        self.order_by = Some(field.into());
        self.order_dir = direction;
        self
    }

    #[must_use]
    pub fn filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    #[must_use]
    pub fn access(mut self, level: AccessLevel) -> Self {
        self.access = level;
        self
    }
}

/// One page of a collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CollectionResponse<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub per_page: u32,
    /// Derived from the store's row count, hence wider than `page`.
    pub total_pages: u64,
}

/// Query parameters for listing a collection.
///
/// # Filtering
/// `filter` is a space separated list of `attribute:value` clauses:
/// - **Contains (case-insensitive):** `name:john`
/// - **Wildcards:** `email:*@acme.com`
/// - **Comparisons:** `created_at:>=2024-01-01`, `budget:<1000`, `status:!=closed`
/// - **Quoted values:** `name:"John Smith"`
/// - **Groups:** `(name:John surname:Doe) title:Manager` matches rows with
///   both name and surname, or with the title
///
/// An invalid filter returns an empty page.
///
/// # Pagination
/// `page` is 1-based, `per_page` defaults to 25. Empty values count as absent.
#[serde_as]
#[derive(Debug, Clone, Default, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct CollectionParams {
    /// Filter expression.
    ///
    /// Example: `(name:John surname:Doe) title:Manager`
    #[param(example = "(name:John surname:Doe) title:Manager")]
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub filter: Option<String>,
    /// Page number (1-based).
    #[param(example = 1)]
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub page: Option<u32>,
    /// Number of items per page.
    #[param(example = 25)]
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub per_page: Option<u32>,
    /// Field to order by. Unknown fields fall back to the default order.
    #[param(example = "created_at")]
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub order_by: Option<String>,
    /// `asc` or `desc`.
    #[param(example = "desc")]
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub order_dir: Option<String>,
}

impl CollectionParams {
    /// Attach the authenticated principal.
    pub fn into_request<P>(self, principal: P) -> CollectionRequest<P> {
        CollectionRequest {
            principal,
            access: AccessLevel::Read,
            page: self.page,
            per_page: self.per_page,
            order_by: self.order_by,
            order_dir: self.order_dir.as_deref().map(parse_order).unwrap_or_default(),
            filter: self.filter,
        }
    }
}
