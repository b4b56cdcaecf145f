use crate::transport::http::handlers::common::panic_response;
use crate::transport::http::handlers::{health, likes, root};
use crate::transport::http::types::{AppState, HealthResponse, LikesRequest, LikesResponse};
use axum::http::{header, HeaderValue, Method};
use axum::routing::{get, post};
use axum::Router;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::set_header::SetResponseHeaderLayer;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        root::root_handler,
        likes::likes_handler,
        health::healthcheck_handler
    ),
    components(schemas(LikesRequest, LikesResponse, HealthResponse))
)]
pub struct ApiDoc;

pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
}

pub fn create_router(app_state: AppState) -> Router {
    Router::new()
        .route(
            "/",
            get(root::root_handler)
                .options(root::preflight_handler)
                .fallback(root::not_found_handler),
        )
        // Non-POST methods still reach the likes handler so they get the JSON 405.
        .route(
            "/api",
            post(likes::likes_handler)
                .options(root::preflight_handler)
                .fallback(likes::likes_handler),
        )
        .route("/health", get(health::healthcheck_handler))
        .fallback(root::not_found_handler)
        .with_state(app_state)
        // Innermost first: panics become JSON before the CORS headers are added.
        .layer(CatchPanicLayer::custom(panic_response))
        // CorsLayer only advertises these on preflight; every response carries them.
        .layer(SetResponseHeaderLayer::if_not_present(
            header::ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static("GET, POST, OPTIONS"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static("Content-Type"),
        ))
        .layer(cors_layer())
}
