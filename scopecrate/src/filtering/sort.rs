use sea_orm::sea_query::Order;

use crate::descriptor::EntityDescriptor;
use crate::models::OrderDirection;

/// Convert a sort order string to [`OrderDirection`]. `desc` in any case is
/// descending, anything else ascending.
#[must_use]
pub fn parse_order(sort_order: &str) -> OrderDirection {
    if sort_order.trim().eq_ignore_ascii_case("desc") {
        OrderDirection::Desc
    } else {
        OrderDirection::Asc
    }
}

impl From<OrderDirection> for Order {
    fn from(direction: OrderDirection) -> Self {
        match direction {
            OrderDirection::Asc => Self::Asc,
            OrderDirection::Desc => Self::Desc,
        }
    }
}

/// Resolve the column to order by.
///
/// Only native, non-denied fields qualify; relation names, unknown names and
/// secret columns fall back to the entity's default order field.
#[must_use]
pub fn resolve_order_field<'a>(descriptor: &'a EntityDescriptor, order_by: Option<&str>) -> &'a str {
    order_by
        .map(str::trim)
        .filter(|name| !descriptor.is_denied(name))
        .and_then(|name| descriptor.native_field(name))
        .map_or_else(|| descriptor.default_order_field(), |field| field.name.as_str())
}
