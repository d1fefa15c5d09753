//! # Filter Language
//!
//! Turns a free-text filter string into a Sea-ORM [`Condition`](sea_orm::Condition)
//! for one entity type.
//!
//! ## Syntax
//!
//! ```text
//! name:John                 case-insensitive contains
//! email:*@acme.com          wildcard, `*` is any run of characters
//! age:>=30                  comparison: <= >= != < >
//! name:"John Smith"         quoted values keep their spaces
//! owner:smith               relation, matched by the foreign entity's lookup
//! (name:John surname:Doe) title:Manager
//! ```
//!
//! Clauses outside parentheses form one AND-set, each parenthesized group is
//! another AND-set, and the sets are OR-ed together. Only one level of
//! grouping exists.
//!
//! ## Fail-closed
//!
//! Any problem with any clause (bad syntax, unknown or secret field, a value
//! that doesn't coerce) makes the *whole* filter match nothing. A broken
//! filter is never partially applied and never dropped.
//!
//! ## Components
//!
//! - [`tokenizer`]: quote-aware splitting and group markers
//! - [`clause`]: `attribute:[operator]value` parsing
//! - [`resolver`]: native / relation / denied classification
//! - [`conditions`]: per-kind value coercion and predicates
//! - [`grouping`]: OR-of-ANDs assembly, [`compile_filter`]
//! - [`sort`] and [`pagination`]: ordering and page window

pub mod clause;
pub mod conditions;
pub mod grouping;
pub mod pagination;
pub mod resolver;
pub mod sort;
pub mod tokenizer;

pub use clause::{Operator, ParsedClause, parse_clause};
pub use conditions::{PredicateCompiler, build_like_condition, parse_timestamp};
pub use grouping::{CompiledFilter, compile_filter};
pub use pagination::{PagePlan, total_pages};
pub use sort::{parse_order, resolve_order_field};
pub use tokenizer::{FilterElement, Grouping, group_elements, tokenize};
