// Scoped collection listing: the resource trait, the tenant-scoped query
// builder and the orchestrating engine.

pub mod engine;
pub mod query;
pub mod traits;

pub use engine::CollectionQueryEngine;
pub use query::{JoinSpec, ScopedSelect};
pub use traits::ScopedResource;
