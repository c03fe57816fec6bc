//! HTTP API module: health, metadata, items, and the database probe.

pub mod docs;
pub mod handlers;
pub mod routes;

pub use docs::ApiDoc;
pub use handlers::AppState;
pub use routes::create_router;
