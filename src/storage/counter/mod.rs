//! Per-URL like counters.
//!
//! Both implementations perform each operation as one indivisible step per key, so concurrent
//! increments on the same key are never lost.

pub mod memory;
pub mod postgres;

pub use memory::InMemoryCounterStore;
pub use postgres::PostgresCounterStore;

use crate::domain::normalize::CanonicalKey;
use async_trait::async_trait;
use thiserror::Error;

/// Highest like count a record can reach through increments.
pub const LIKES_CEILING: u32 = 100_000;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("stored like count {0} is out of range")]
    InvalidCount(i64),
}

#[async_trait]
pub trait CounterStore: Send + Sync + 'static {
    /// Returns the current count, creating the record with a count of 0 if it does not exist.
    async fn read_or_init(&self, key: &CanonicalKey) -> Result<u32, StoreError>;

    /// Adds one to the count (capped at [`LIKES_CEILING`]) and returns the new value.
    /// Creates the record with a count of 1 if it does not exist.
    async fn increment_or_init(&self, key: &CanonicalKey) -> Result<u32, StoreError>;

    /// Cheap liveness check used by the health endpoint.
    async fn ping(&self) -> Result<(), StoreError>;
}
