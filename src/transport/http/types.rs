use crate::app::likes_service::LikesService;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

#[derive(Clone)]
pub struct AppState {
    pub likes_service: Arc<LikesService>,
}

impl AppState {
    pub fn new(likes_service: LikesService) -> Self {
        Self {
            likes_service: Arc::new(likes_service),
        }
    }
}

/// Body of `POST /api`. Only documents the shape; the handler validates raw bytes itself so
/// that each malformed-body case gets its own message.
#[derive(Deserialize, Serialize, Debug, ToSchema)]
pub struct LikesRequest {
    /// URL to read or like (base64 of the URL when the server runs with `BASE64_URLS=true`).
    pub url: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct LikesResponse {
    pub success: bool,
    /// Canonical key the count is stored under.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub likes: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl LikesResponse {
    pub fn ok(url: String, likes: u32) -> Self {
        Self {
            success: true,
            url: Some(url),
            likes: Some(likes),
            message: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            url: None,
            likes: None,
            message: Some(message.into()),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, ToSchema)]
pub struct HealthResponse {
    /// `ok` or `unhealthy`.
    pub status: String,
    /// RFC 3339 time the check ran.
    pub timestamp: String,
}
