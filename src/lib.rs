//! Minimal HTTP service: health, build metadata, and an in-memory item registry.
//!
//! Items are created through `POST /v1/items` and fetched by identifier. They
//! live only as long as the process. A `/_db` probe checks that the configured
//! Postgres database answers a `SELECT 1`.
//!
//! # Modules
//!
//! - [`config`]: Configuration loading from environment
//! - [`error`]: Unified error types
//! - [`registry`]: Item storage and identifier generation
//! - [`probe`]: Database liveness probe
//! - [`meta`]: Build metadata
//! - [`api`]: HTTP routes and handlers
//! - [`metrics`]: Prometheus metrics
//! - [`utils`]: Utility functions

pub mod api;
pub mod config;
pub mod error;
pub mod meta;
pub mod metrics;
pub mod probe;
pub mod registry;
pub mod utils;

pub use config::Config;
pub use error::{Error, Result};
