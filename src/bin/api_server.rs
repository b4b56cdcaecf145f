// src/bin/api_server.rs

use std::sync::Arc;
use url_likes::infra::logging;
use url_likes::storage::CounterStore;
use url_likes::transport;
use url_likes::{
    AppConfig, InMemoryCounterStore, LikesService, PostgresCounterStore, RequestValidator,
    StoreConfig,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Loads .env first so RUST_LOG from it applies to the subscriber.
    let config = AppConfig::from_env()?;
    logging::init_logging();

    // --- Counter store initialization ---
    let store: Arc<dyn CounterStore> = match &config.store {
        StoreConfig::Postgres {
            database_url,
            max_connections,
        } => {
            tracing::info!(max_connections, "connecting to PostgreSQL counter store");
            Arc::new(PostgresCounterStore::connect(database_url, *max_connections).await?)
        }
        StoreConfig::InMemory => {
            tracing::warn!("IN_MEMORY_STORE enabled: like counts are lost on restart");
            Arc::new(InMemoryCounterStore::new())
        }
    };

    tracing::info!(
        same_domain_protection = config.validation.same_domain_protection,
        base64_urls = config.validation.base64_urls,
        "request validation configured"
    );
    let service = LikesService::new(RequestValidator::new(config.validation.clone()), store);
    let app_state = transport::http::AppState::new(service);

    // --- API server initialization ---
    let app = transport::http::create_router(app_state).merge(
        SwaggerUi::new("/swagger-ui")
            .url("/api-docs/openapi.json", transport::http::ApiDoc::openapi()),
    );
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!("API server listening on http://{}", config.bind_addr);
    tracing::info!("Swagger UI available at http://{}/swagger-ui", config.bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("shutdown signal received");
        })
        .await?;

    tracing::info!("graceful shutdown complete");
    Ok(())
}
