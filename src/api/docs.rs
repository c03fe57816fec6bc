//! OpenAPI description of the HTTP surface.

use axum::Json;
use utoipa::OpenApi;

use super::handlers::{DbStatus, Endpoints, RootResponse, StatusMessage};
use crate::error::ErrorBody;
use crate::registry::{Item, NewItem};

/// OpenAPI document for every public route.
#[derive(OpenApi)]
#[openapi(
    info(title = "snjv-api", description = "Health, build metadata, and in-memory items"),
    paths(
        super::handlers::healthz,
        super::handlers::meta,
        super::handlers::root,
        super::handlers::db,
        super::handlers::namaste,
        super::handlers::create_item,
        super::handlers::get_item,
    ),
    components(schemas(
        StatusMessage,
        DbStatus,
        Endpoints,
        RootResponse,
        Item,
        NewItem,
        ErrorBody
    )),
    tags(
        (name = "health", description = "Liveness and deployment info"),
        (name = "v1", description = "Item API")
    )
)]
pub struct ApiDoc;

/// Serve the OpenAPI document.
pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
