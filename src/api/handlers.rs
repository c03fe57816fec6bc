//! HTTP API handlers.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use chrono::{SecondsFormat, Utc};
use metrics_exporter_prometheus::PrometheusHandle;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::{ApiError, ErrorBody, ValidationError};
use crate::meta::BuildMetadata;
use crate::probe::DbProbe;
use crate::registry::{Item, ItemRegistry, NewItem};

/// Application state shared with handlers.
#[derive(Clone)]
pub struct AppState {
    /// Service name reported at `/`.
    pub service_name: Arc<str>,
    /// Build metadata resolved at startup.
    pub meta: Arc<BuildMetadata>,
    /// Item store.
    pub registry: ItemRegistry,
    /// Database liveness probe.
    pub db: Arc<dyn DbProbe>,
    /// Prometheus handle, when the recorder is installed.
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    /// Create new app state.
    pub fn new(
        service_name: impl Into<Arc<str>>,
        meta: BuildMetadata,
        registry: ItemRegistry,
        db: Arc<dyn DbProbe>,
    ) -> Self {
        Self {
            service_name: service_name.into(),
            meta: Arc::new(meta),
            registry,
            db,
            metrics: None,
        }
    }

    /// Attach a Prometheus handle so `/metrics` renders.
    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }
}

/// Simple status message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct StatusMessage {
    /// Greeting.
    pub status: String,
}

/// Database probe response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct DbStatus {
    /// Always "ok" on success.
    pub db: String,
}

/// Paths advertised by the root endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Endpoints {
    /// Health check path.
    pub health: String,
    /// Build metadata path.
    pub meta: String,
}

/// Root endpoint response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct RootResponse {
    /// Service name.
    pub service: String,
    /// Current time, ISO-8601 UTC.
    pub now_utc: String,
    /// Well-known endpoints.
    pub endpoints: Endpoints,
    /// Free-form notes.
    pub notes: String,
}

/// Health check handler - always returns 200.
#[utoipa::path(
    get,
    path = "/healthz",
    tag = "health",
    responses((status = 200, description = "Service is up", body = StatusMessage))
)]
pub async fn healthz() -> Json<StatusMessage> {
    Json(StatusMessage {
        status: "Hello World".to_string(),
    })
}

/// Build metadata handler.
#[utoipa::path(
    get,
    path = "/_meta",
    tag = "health",
    responses((status = 200, description = "Build metadata", body = std::collections::HashMap<String, String>))
)]
pub async fn meta(State(state): State<AppState>) -> Json<BuildMetadata> {
    Json(state.meta.as_ref().clone())
}

/// Root handler - service name, time, and pointers to other endpoints.
#[utoipa::path(
    get,
    path = "/",
    tag = "health",
    responses((status = 200, description = "Service overview", body = RootResponse))
)]
pub async fn root(State(state): State<AppState>) -> Json<RootResponse> {
    Json(RootResponse {
        service: state.service_name.to_string(),
        now_utc: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
        endpoints: Endpoints {
            health: "/healthz".to_string(),
            meta: "/_meta".to_string(),
        },
        notes: "Use /v1/items to create and fetch items; /_db checks the database.".to_string(),
    })
}

/// Database probe handler - one round-trip per call.
#[utoipa::path(
    get,
    path = "/_db",
    tag = "health",
    responses(
        (status = 200, description = "Database reachable", body = DbStatus),
        (status = 500, description = "Database unreachable", body = ErrorBody)
    )
)]
pub async fn db(State(state): State<AppState>) -> Result<Json<DbStatus>, ApiError> {
    state.db.ping().await?;
    Ok(Json(DbStatus {
        db: "ok".to_string(),
    }))
}

/// Namaste handler.
#[utoipa::path(
    get,
    path = "/v1/namaste",
    tag = "v1",
    responses((status = 200, description = "Greeting", body = StatusMessage))
)]
pub async fn namaste() -> Json<StatusMessage> {
    Json(StatusMessage {
        status: "Namaste World".to_string(),
    })
}

/// Create an item.
#[utoipa::path(
    post,
    path = "/v1/items",
    tag = "v1",
    request_body = NewItem,
    responses(
        (status = 201, description = "Item created", body = Item),
        (status = 422, description = "Invalid input", body = ErrorBody)
    )
)]
pub async fn create_item(
    State(state): State<AppState>,
    payload: Result<Json<NewItem>, JsonRejection>,
) -> Result<(StatusCode, Json<Item>), ApiError> {
    let Json(new_item) =
        payload.map_err(|rejection| ValidationError::Body(rejection.body_text()))?;
    let item = state.registry.create(new_item)?;
    Ok((StatusCode::CREATED, Json(item)))
}

/// Fetch an item by identifier.
#[utoipa::path(
    get,
    path = "/v1/items/{item_id}",
    tag = "v1",
    params(("item_id" = String, Path, description = "Item identifier")),
    responses(
        (status = 200, description = "Item found", body = Item),
        (status = 404, description = "Item not found", body = ErrorBody)
    )
)]
pub async fn get_item(
    State(state): State<AppState>,
    Path(item_id): Path<String>,
) -> Result<Json<Item>, ApiError> {
    Ok(Json(state.registry.get(&item_id)?))
}

/// Prometheus exposition handler.
pub async fn metrics(State(state): State<AppState>) -> Result<String, ApiError> {
    state
        .metrics
        .as_ref()
        .map(PrometheusHandle::render)
        .ok_or(ApiError::MetricsDisabled)
}
