use crate::transport::http::handlers::common::error_response;
use axum::http::{Method, StatusCode};
use axum::response::{IntoResponse, Response};

#[utoipa::path(
    get,
    path = "/",
    responses((status = 200, description = "Plain-text greeting", body = String))
)]
pub async fn root_handler() -> &'static str {
    "hello and welcome"
}

/// CORS preflight without the `Origin` headers the CORS layer answers on its own.
pub async fn preflight_handler() -> StatusCode {
    StatusCode::OK
}

pub async fn not_found_handler(method: Method) -> Response {
    if method == Method::OPTIONS {
        return StatusCode::OK.into_response();
    }
    error_response(StatusCode::NOT_FOUND, "Endpoint not found")
}
