//! In-process counter store, used by tests and by the server when no database is configured.

use crate::domain::normalize::CanonicalKey;
use crate::storage::counter::{CounterStore, StoreError, LIKES_CEILING};
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::Mutex;

#[derive(Default)]
pub struct InMemoryCounterStore {
    counts: Mutex<HashMap<String, u32>>,
}

impl InMemoryCounterStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of materialized records.
    pub async fn len(&self) -> usize {
        self.counts.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.counts.lock().await.is_empty()
    }

    /// Current count for `key`, without creating a record.
    pub async fn count(&self, key: &str) -> Option<u32> {
        self.counts.lock().await.get(key).copied()
    }

    /// Seeds a record directly, bypassing the ceiling.
    pub async fn insert(&self, key: impl Into<String>, count: u32) {
        self.counts.lock().await.insert(key.into(), count);
    }
}

#[async_trait]
impl CounterStore for InMemoryCounterStore {
    async fn read_or_init(&self, key: &CanonicalKey) -> Result<u32, StoreError> {
        let mut counts = self.counts.lock().await;
        Ok(*counts.entry(key.as_str().to_string()).or_insert(0))
    }

    async fn increment_or_init(&self, key: &CanonicalKey) -> Result<u32, StoreError> {
        let mut counts = self.counts.lock().await;
        let count = counts.entry(key.as_str().to_string()).or_insert(0);
        if *count < LIKES_CEILING {
            *count += 1;
        }
        Ok(*count)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::normalize::normalize_url;
    use std::sync::Arc;

    fn key(raw: &str) -> CanonicalKey {
        normalize_url(raw).unwrap()
    }

    #[tokio::test]
    async fn read_materializes_a_zero_record() {
        let store = InMemoryCounterStore::new();
        let k = key("http://example.com/foo");

        assert_eq!(store.count("example.com/foo").await, None);
        assert_eq!(store.read_or_init(&k).await.unwrap(), 0);
        assert_eq!(store.count("example.com/foo").await, Some(0));
        assert_eq!(store.read_or_init(&k).await.unwrap(), 0);
        assert_eq!(store.increment_or_init(&k).await.unwrap(), 1);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn increments_are_sequential() {
        let store = InMemoryCounterStore::new();
        let k = key("https://example.com/post");
        for expected in 1..=25 {
            assert_eq!(store.increment_or_init(&k).await.unwrap(), expected);
        }
        assert_eq!(store.read_or_init(&k).await.unwrap(), 25);
    }

    #[tokio::test]
    async fn increments_saturate_at_ceiling() {
        let store = InMemoryCounterStore::new();
        let k = key("https://example.com/popular");
        store.insert(k.as_str(), LIKES_CEILING - 1).await;

        assert_eq!(store.increment_or_init(&k).await.unwrap(), LIKES_CEILING);
        assert_eq!(store.increment_or_init(&k).await.unwrap(), LIKES_CEILING);
        assert_eq!(store.read_or_init(&k).await.unwrap(), LIKES_CEILING);
    }

    #[tokio::test]
    async fn count_has_no_side_effects() {
        let store = InMemoryCounterStore::new();
        assert_eq!(store.count("example.com").await, None);
        assert!(store.is_empty().await);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_increments_are_exact() {
        let store = Arc::new(InMemoryCounterStore::new());
        let k = key("http://example.com/race");

        let tasks: Vec<_> = (0..64)
            .map(|_| {
                let store = store.clone();
                let k = k.clone();
                tokio::spawn(async move { store.increment_or_init(&k).await.unwrap() })
            })
            .collect();

        let mut seen = Vec::new();
        for t in tasks {
            seen.push(t.await.unwrap());
        }
        seen.sort_unstable();

        assert_eq!(seen, (1..=64).collect::<Vec<u32>>());
        assert_eq!(store.read_or_init(&k).await.unwrap(), 64);
    }
}
