//! Identifier generation.

use std::fmt::Debug;
use std::sync::atomic::{AtomicU64, Ordering};

use uuid::Uuid;

/// Length of generated identifiers.
pub const ID_LEN: usize = 12;

/// Source of candidate item identifiers.
///
/// Candidates need not be unique; the registry rejects ones already in use
/// and asks again.
pub trait IdGenerator: Send + Sync + Debug {
    /// Produce the next candidate identifier.
    fn next_id(&self) -> String;
}

/// First 12 hex characters of a random v4 UUID.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomIdGenerator;

impl IdGenerator for RandomIdGenerator {
    fn next_id(&self) -> String {
        let mut id = Uuid::new_v4().simple().to_string();
        id.truncate(ID_LEN);
        id
    }
}

/// Deterministic counter-based identifiers, zero-padded to [`ID_LEN`].
#[derive(Debug)]
pub struct SequentialIdGenerator {
    prefix: String,
    next: AtomicU64,
}

impl SequentialIdGenerator {
    /// Create a generator starting at 1 with the given prefix.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: AtomicU64::new(1),
        }
    }
}

impl Default for SequentialIdGenerator {
    fn default() -> Self {
        Self::new("item")
    }
}

impl IdGenerator for SequentialIdGenerator {
    fn next_id(&self) -> String {
        let n = self.next.fetch_add(1, Ordering::Relaxed);
        let width = ID_LEN.saturating_sub(self.prefix.len());
        format!("{}{:0width$}", self.prefix, n, width = width)
    }
}
