//! HTTP API route definitions.

use std::time::Instant;

use axum::{
    extract::{MatchedPath, Request},
    http::{HeaderValue, Method},
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
    Router,
};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

use super::docs::openapi_json;
use super::handlers::{create_item, db, get_item, healthz, meta, metrics, namaste, root, AppState};
use crate::metrics::record_http_latency;

/// Create the API router. Each route is registered exactly once.
pub fn create_router(state: AppState, allowed_origins: &[String]) -> Router {
    Router::new()
        // Health endpoints
        .route("/", get(root))
        .route("/healthz", get(healthz))
        .route("/_meta", get(meta))
        .route("/_db", get(db))
        // Versioned API
        .route("/v1/namaste", get(namaste))
        .route("/v1/items", post(create_item))
        .route("/v1/items/:item_id", get(get_item))
        // Observability
        .route("/metrics", get(metrics))
        .route("/openapi.json", get(openapi_json))
        .route_layer(middleware::from_fn(track_latency))
        .with_state(state)
        .layer(cors_layer(allowed_origins))
        .layer(TraceLayer::new_for_http())
}

/// CORS policy: listed origins, or any origin when the list is empty.
/// Credentials are never allowed.
pub fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    let allow_origin = if origins.is_empty() {
        AllowOrigin::from(Any)
    } else {
        AllowOrigin::list(origins)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers(Any)
        .allow_credentials(false)
}

async fn track_latency(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let endpoint = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_owned())
        .unwrap_or_else(|| "unmatched".to_string());

    let response = next.run(req).await;
    record_http_latency(start, &endpoint);
    response
}
