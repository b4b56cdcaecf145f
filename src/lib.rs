pub mod app;
pub mod domain;
pub mod infra;
pub mod storage;
pub mod transport;

// Convenience re-exports (keeps call-sites clean)
pub use app::likes_service::{LikesError, LikesOutcome, LikesService};
pub use domain::{normalize_url, CanonicalKey, RequestValidator, ValidationConfig};
pub use infra::config::{AppConfig, StoreConfig};
pub use storage::{CounterStore, InMemoryCounterStore, PostgresCounterStore, LIKES_CEILING};
