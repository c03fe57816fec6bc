//! In-memory item registry.
//!
//! This module handles:
//! - Item types and input validation
//! - Pluggable identifier generation
//! - Concurrency-safe storage and lookup

pub mod id;
pub mod item;
pub mod store;

pub use id::{IdGenerator, RandomIdGenerator, SequentialIdGenerator, ID_LEN};
pub use item::{Item, NewItem};
pub use store::ItemRegistry;
