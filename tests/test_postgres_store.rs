//! PostgreSQL counter store tests.
//!
//! Need a reachable database: set `DATABASE_URL` (a `.env` file works too). Without it every
//! test returns early. Each test uses its own key prefix so runs can share a database.

use std::sync::Arc;
use url_likes::storage::CounterStore;
use url_likes::{normalize_url, CanonicalKey, PostgresCounterStore, LIKES_CEILING};

async fn store() -> Option<PostgresCounterStore> {
    dotenv::dotenv().ok();
    let url = std::env::var("DATABASE_URL").ok()?;
    Some(
        PostgresCounterStore::connect(&url, 8)
            .await
            .expect("DATABASE_URL is set but the database is unreachable"),
    )
}

/// Stored count, read directly from the table.
async fn stored(store: &PostgresCounterStore, key: &CanonicalKey) -> Option<i32> {
    sqlx::query_scalar("SELECT likes FROM url_likes WHERE url = $1")
        .bind(key.as_str())
        .fetch_optional(store.pool())
        .await
        .unwrap()
}

/// A key nobody else has used yet.
async fn fresh_key(store: &PostgresCounterStore, test: &str) -> CanonicalKey {
    let nonce = chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default();
    let key = normalize_url(&format!("https://tests.example.com/{}/{}", test, nonce)).unwrap();
    sqlx::query("DELETE FROM url_likes WHERE url = $1")
        .bind(key.as_str())
        .execute(store.pool())
        .await
        .unwrap();
    key
}

#[tokio::test]
async fn read_materializes_zero_row() {
    let Some(store) = store().await else { return };
    let key = fresh_key(&store, "read").await;

    assert_eq!(stored(&store, &key).await, None);
    assert_eq!(store.read_or_init(&key).await.unwrap(), 0);
    assert_eq!(stored(&store, &key).await, Some(0));
    assert_eq!(store.read_or_init(&key).await.unwrap(), 0);
    assert_eq!(store.increment_or_init(&key).await.unwrap(), 1);
}

#[tokio::test]
async fn sequential_increments() {
    let Some(store) = store().await else { return };
    let key = fresh_key(&store, "sequential").await;

    for expected in 1..=10 {
        assert_eq!(store.increment_or_init(&key).await.unwrap(), expected);
    }
    assert_eq!(store.read_or_init(&key).await.unwrap(), 10);
}

#[tokio::test]
async fn increments_stop_at_ceiling() {
    let Some(store) = store().await else { return };
    let key = fresh_key(&store, "ceiling").await;

    sqlx::query("INSERT INTO url_likes (url, likes) VALUES ($1, $2)")
        .bind(key.as_str())
        .bind(LIKES_CEILING as i32 - 1)
        .execute(store.pool())
        .await
        .unwrap();

    assert_eq!(store.increment_or_init(&key).await.unwrap(), LIKES_CEILING);
    assert_eq!(store.increment_or_init(&key).await.unwrap(), LIKES_CEILING);
    assert_eq!(store.read_or_init(&key).await.unwrap(), LIKES_CEILING);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_increments_are_exact() {
    let Some(store) = store().await else { return };
    let store = Arc::new(store);
    let key = fresh_key(&store, "concurrent").await;

    let tasks: Vec<_> = (0..50)
        .map(|_| {
            let store = store.clone();
            let key = key.clone();
            tokio::spawn(async move { store.increment_or_init(&key).await.unwrap() })
        })
        .collect();

    let mut seen = Vec::new();
    for t in tasks {
        seen.push(t.await.unwrap());
    }
    seen.sort_unstable();

    assert_eq!(seen, (1..=50).collect::<Vec<u32>>());
    assert_eq!(store.read_or_init(&key).await.unwrap(), 50);
}

#[tokio::test]
async fn ping_succeeds() {
    let Some(store) = store().await else { return };
    store.ping().await.unwrap();
    assert!(store.count_rows().await.unwrap() >= 0);
}
