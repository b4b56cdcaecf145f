use crate::transport::http::types::LikesResponse;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use std::any::Any;

pub fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(LikesResponse::error(message))).into_response()
}

/// Converts a handler panic into the same JSON shape as every other failure.
pub fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic payload");
    tracing::error!(detail, "request handler panicked");
    error_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
}
