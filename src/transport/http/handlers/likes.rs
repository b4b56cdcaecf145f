use crate::domain::request::IncomingRequest;
use crate::transport::http::handlers::common::error_response;
use crate::transport::http::types::{AppState, LikesRequest, LikesResponse};
use axum::body::Bytes;
use axum::extract::rejection::BytesRejection;
use axum::extract::{RawQuery, State};
use axum::http::{header, HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Json;

#[utoipa::path(
    post,
    path = "/api",
    params(
        ("method" = String, Query, description = "`read` or `update` (case-insensitive)")
    ),
    request_body = LikesRequest,
    responses(
        (status = 200, description = "Current like count for the normalized URL", body = LikesResponse),
        (status = 400, description = "Bad query parameter, body or URL", body = LikesResponse),
        (status = 403, description = "Same-domain protection rejected the request", body = LikesResponse),
        (status = 405, description = "Only POST is accepted", body = LikesResponse),
        (status = 413, description = "Body larger than the server limit", body = LikesResponse),
        (status = 500, description = "Counter store failure", body = LikesResponse)
    )
)]
pub async fn likes_handler(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    let body = match body {
        Ok(body) => body,
        Err(rejection) => {
            tracing::debug!(error = %rejection, "likes request body rejected");
            return error_response(rejection.status(), rejection.body_text());
        }
    };

    let host = headers
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .or_else(|| uri.authority().map(|a| a.as_str()));

    let request = IncomingRequest {
        method: &method,
        query: query.as_deref(),
        host,
        body: &body,
    };

    match state.likes_service.handle(&request).await {
        Ok(outcome) => {
            tracing::debug!(
                operation = outcome.operation.as_str(),
                url = %outcome.url,
                likes = outcome.likes,
                "likes request served"
            );
            (StatusCode::OK, Json(LikesResponse::ok(outcome.url, outcome.likes))).into_response()
        }
        Err(e) => {
            tracing::debug!(code = e.code(), status = %e.status(), "likes request rejected");
            error_response(e.status(), e.public_message())
        }
    }
}
