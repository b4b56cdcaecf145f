//! Persistent counter store implementation using PostgreSQL.

use crate::domain::normalize::CanonicalKey;
use crate::storage::counter::{CounterStore, StoreError, LIKES_CEILING};
use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

/// A counter store backed by a PostgreSQL connection pool.
///
/// One row per canonical URL in `url_likes (url TEXT PRIMARY KEY, likes INTEGER)`.
#[derive(Clone)]
pub struct PostgresCounterStore {
    pool: PgPool,
}

impl PostgresCounterStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connects a new pool and makes sure the likes table exists.
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;
        let store = Self::new(pool);
        store.ensure_schema().await?;
        Ok(store)
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS url_likes (
                url TEXT PRIMARY KEY,
                likes INTEGER NOT NULL DEFAULT 0 CHECK (likes >= 0)
            )",
        )
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Total number of stored rows.
    pub async fn count_rows(&self) -> Result<i64, StoreError> {
        let n: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM url_likes")
            .fetch_one(&self.pool)
            .await?;
        Ok(n)
    }
}

fn to_count(likes: i32) -> Result<u32, StoreError> {
    u32::try_from(likes).map_err(|_| StoreError::InvalidCount(likes.into()))
}

fn ceiling() -> i32 {
    // 100_000 always fits.
    LIKES_CEILING as i32
}

#[async_trait]
impl CounterStore for PostgresCounterStore {
    async fn read_or_init(&self, key: &CanonicalKey) -> Result<u32, StoreError> {
        sqlx::query(
            "INSERT INTO url_likes (url, likes) VALUES ($1, 0) ON CONFLICT (url) DO NOTHING",
        )
        .bind(key.as_str())
        .execute(&self.pool)
        .await?;

        // Rows are never deleted, so the row inserted (or found) above is still there.
        let likes: i32 = sqlx::query_scalar("SELECT likes FROM url_likes WHERE url = $1")
            .bind(key.as_str())
            .fetch_one(&self.pool)
            .await?;
        to_count(likes)
    }

    async fn increment_or_init(&self, key: &CanonicalKey) -> Result<u32, StoreError> {
        // Single statement: insert-or-increment, skipping the write once the ceiling is reached.
        let updated: Option<i32> = sqlx::query_scalar(
            "INSERT INTO url_likes AS t (url, likes) VALUES ($1, 1)
             ON CONFLICT (url) DO UPDATE SET likes = t.likes + 1
             WHERE t.likes < $2
             RETURNING likes",
        )
        .bind(key.as_str())
        .bind(ceiling())
        .fetch_optional(&self.pool)
        .await?;

        if let Some(likes) = updated {
            return to_count(likes);
        }

        let likes: i32 = sqlx::query_scalar("SELECT likes FROM url_likes WHERE url = $1")
            .bind(key.as_str())
            .fetch_one(&self.pool)
            .await?;
        to_count(likes)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
