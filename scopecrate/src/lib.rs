//! Tenant-scoped collection queries for Sea-ORM backed APIs.
//!
//! ```rust,ignore
//! let registry = EntityRegistry::builder()
//!     .register::<Organization>()
//!     .register::<User>()
//!     .register::<Project>()
//!     .build()?;
//! let engine = CollectionQueryEngine::new(Arc::new(registry));
//!
//! let request = CollectionRequest::new(&current_user)
//!     .page(2)
//!     .filter("(name:apollo owner:smith) created_at:>=2024-01-01");
//! let page = engine.list::<Project, _, _>(&db, &request).await?;
//! ```

pub mod config;
pub mod core;
pub mod descriptor;
pub mod errors;
pub mod filtering;
pub mod models;
pub mod scope;

pub use config::EngineConfig;
pub use crate::core::{CollectionQueryEngine, ScopedResource, ScopedSelect};
pub use descriptor::{EntityDescriptor, EntityRegistry, FieldKind, LookupTarget, Ownership};
pub use errors::{EngineError, FilterError};
pub use models::{CollectionParams, CollectionRequest, CollectionResponse, OrderDirection};
pub use scope::{AccessLevel, AccessPrincipal, AccessScope};
pub use serde_with;
