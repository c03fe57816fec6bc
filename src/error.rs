//! Unified error types for the service.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use strum::{Display, IntoStaticStr};
use thiserror::Error;
use utoipa::ToSchema;

/// Unified error type for startup and wiring.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration loading error.
    #[error("configuration error: {0}")]
    Config(#[from] envy::Error),

    /// Configuration loaded but failed validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Database pool construction error.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Input rejected before anything is stored.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Name length outside the accepted range.
    #[error("name must be between {min} and {max} characters, got {actual}")]
    NameLength {
        /// Minimum length.
        min: usize,
        /// Maximum length.
        max: usize,
        /// Length received.
        actual: usize,
    },

    /// Quantity outside the accepted range.
    #[error("quantity must be between {min} and {max}, got {actual}")]
    QuantityRange {
        /// Minimum quantity.
        min: i64,
        /// Maximum quantity.
        max: i64,
        /// Quantity received.
        actual: i64,
    },

    /// Request body could not be decoded.
    #[error("invalid request body: {0}")]
    Body(String),
}

/// Item registry errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// Input failed validation.
    #[error(transparent)]
    Invalid(#[from] ValidationError),

    /// No item with this identifier.
    #[error("item {id} not found")]
    NotFound {
        /// The identifier looked up.
        id: String,
    },

    /// The id generator kept returning identifiers already in use.
    #[error("no unused identifier after {attempts} attempts")]
    IdSpaceExhausted {
        /// Attempts made.
        attempts: u32,
    },
}

/// Category of a failed database probe.
///
/// Only the category is ever shown to clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum ProbeFailure {
    /// Probe or pool acquisition exceeded its deadline.
    Timeout,
    /// Network-level failure.
    Io,
    /// TLS negotiation failure.
    Tls,
    /// Unexpected wire protocol message.
    Protocol,
    /// The server answered with an error.
    Database,
    /// Connection string or options are unusable.
    Configuration,
    /// The pool has been closed.
    PoolClosed,
    /// Anything else the driver reports.
    Other,
}

impl std::error::Error for ProbeFailure {}

impl ProbeFailure {
    /// Metric label / response category.
    pub fn as_str(&self) -> &'static str {
        self.into()
    }
}

impl From<&sqlx::Error> for ProbeFailure {
    fn from(err: &sqlx::Error) -> Self {
        match err {
            sqlx::Error::PoolTimedOut => ProbeFailure::Timeout,
            sqlx::Error::Io(_) => ProbeFailure::Io,
            sqlx::Error::Tls(_) => ProbeFailure::Tls,
            sqlx::Error::Protocol(_) => ProbeFailure::Protocol,
            sqlx::Error::Database(_) => ProbeFailure::Database,
            sqlx::Error::Configuration(_) => ProbeFailure::Configuration,
            sqlx::Error::PoolClosed => ProbeFailure::PoolClosed,
            _ => ProbeFailure::Other,
        }
    }
}

/// JSON error body returned by every failing route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    /// Short human-readable description.
    pub detail: String,
}

/// Errors surfaced at the HTTP boundary.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Client sent invalid input.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Requested item does not exist.
    #[error("Item not found")]
    NotFound,

    /// Database probe failed.
    #[error("db error: {0}")]
    Dependency(#[from] ProbeFailure),

    /// Metrics recorder is not installed.
    #[error("metrics disabled")]
    MetricsDisabled,

    /// Server-side failure with no client-facing detail.
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<RegistryError> for ApiError {
    fn from(err: RegistryError) -> Self {
        match err {
            RegistryError::Invalid(e) => ApiError::Validation(e),
            RegistryError::NotFound { .. } => ApiError::NotFound,
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl ApiError {
    /// HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::NotFound | ApiError::MetricsDisabled => StatusCode::NOT_FOUND,
            ApiError::Dependency(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let detail = match &self {
            ApiError::Internal(reason) => {
                tracing::error!("Internal error: {}", reason);
                "internal error".to_string()
            }
            _ => self.to_string(),
        };

        (status, Json(ErrorBody { detail })).into_response()
    }
}

/// Convenient Result type alias.
pub type Result<T> = std::result::Result<T, Error>;
