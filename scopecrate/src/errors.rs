//! # Error Handling for Collection Queries
//!
//! Two kinds of failure exist in this crate and they are kept strictly apart:
//!
//! - [`FilterError`]: anything wrong with a caller-supplied filter string
//!   (syntax, unknown or secret fields, values that don't coerce). These never
//!   leave the engine. The whole filter is replaced by a constant-false
//!   predicate and the caller sees an empty page.
//! - [`EngineError`]: wiring bugs (a principal without a tenant, an entity that
//!   was never registered, a bad descriptor) and backing-store failures. These
//!   are returned to the caller unchanged.
//!
//! `EngineError` converts into an Axum response. Internal details are logged
//! with `tracing` and never sent to the client.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sea_orm::DbErr;
use serde::Serialize;
use thiserror::Error;

use crate::descriptor::FieldKind;
use crate::filtering::clause::Operator;

/// Errors propagated out of [`CollectionQueryEngine::list`](crate::CollectionQueryEngine::list)
/// and out of registry construction.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The acting principal has no resolvable tenant identifier.
    #[error("principal has no tenant context")]
    MissingTenantContext,

    /// `list` was called for an entity type the registry doesn't know.
    #[error("entity type '{0}' is not registered")]
    UnknownEntity(String),

    /// An entity descriptor is inconsistent. Raised while building the registry.
    #[error("invalid entity configuration: {0}")]
    Configuration(String),

    /// The backing store failed. Passed through untouched, no retries.
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl EngineError {
    pub(crate) fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    fn status_code(&self) -> StatusCode {
        match self {
            Self::UnknownEntity(_) => StatusCode::NOT_FOUND,
            Self::MissingTenantContext | Self::Configuration(_) | Self::Database(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Get the user-facing error message (sanitized)
    fn user_message(&self) -> String {
        match self {
            Self::UnknownEntity(entity_type) => format!("{entity_type} not found"),
            Self::Database(_) => "A database error occurred".to_string(),
            Self::MissingTenantContext | Self::Configuration(_) => {
                "Internal Server Error".to_string()
            }
        }
    }

    fn log_internal(&self) {
        match self {
            Self::Database(internal) => {
                tracing::error!(error = ?internal, "Database error occurred");
            }
            Self::MissingTenantContext => {
                tracing::error!("Collection query issued without tenant context");
            }
            Self::Configuration(details) => {
                tracing::error!(details = %details, "Entity configuration error");
            }
            Self::UnknownEntity(entity_type) => {
                tracing::debug!(entity_type = %entity_type, "Unknown entity type requested");
            }
        }
    }
}

/// Error response sent to users (sanitized)
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

impl IntoResponse for EngineError {
    fn into_response(self) -> Response {
        self.log_internal();

        let status = self.status_code();
        let response = ErrorResponse {
            error: self.user_message(),
        };

        (status, Json(response)).into_response()
    }
}

/// Why a filter was rejected. Only ever logged; the caller sees an empty page.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FilterError {
    #[error("filter exceeds {max} characters")]
    TooLong { max: usize },

    #[error("unterminated quote in filter")]
    UnterminatedQuote,

    #[error("unquoted '#' at the start of a filter word")]
    CommentMarker,

    #[error("unbalanced grouping parentheses")]
    UnbalancedGroups,

    #[error("no ':' separator in clause '{0}'")]
    MissingSeparator(String),

    #[error("empty attribute in clause '{0}'")]
    EmptyAttribute(String),

    #[error("field '{0}' is not searchable")]
    DeniedField(String),

    #[error("unknown field '{0}'")]
    UnknownField(String),

    #[error("operator {operator:?} is not supported on {kind:?} field '{field}'")]
    UnsupportedOperator {
        field: String,
        kind: FieldKind,
        operator: Operator,
    },

    #[error("operator {operator:?} is not supported on relation '{relation}'")]
    UnsupportedRelationOperator { relation: String, operator: Operator },

    #[error("value '{value}' is not a valid {kind:?} for field '{field}'")]
    InvalidValue {
        field: String,
        kind: FieldKind,
        value: String,
    },

    #[error("relation '{relation}' targets unregistered entity '{entity_type}'")]
    MissingRelationTarget { relation: String, entity_type: String },
}
