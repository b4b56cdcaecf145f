//! The likes pipeline.
//!
//! Validates the raw request, normalizes the URL, then reads or increments its counter.
//! Every failure comes back as a [`LikesError`] that already knows its HTTP status.

use crate::domain::normalize::{normalize_url, NormalizationError};
use crate::domain::request::{IncomingRequest, Operation, RequestValidator, ValidationError};
use crate::storage::counter::{CounterStore, StoreError};
use axum::http::StatusCode;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LikesError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Normalization(#[from] NormalizationError),
    #[error("Database operation failed")]
    Store(#[from] StoreError),
}

impl LikesError {
    pub fn status(&self) -> StatusCode {
        match self {
            LikesError::Validation(ValidationError::MethodNotAllowed) => {
                StatusCode::METHOD_NOT_ALLOWED
            }
            LikesError::Validation(ValidationError::DomainNotAllowed) => StatusCode::FORBIDDEN,
            LikesError::Validation(_) | LikesError::Normalization(_) => StatusCode::BAD_REQUEST,
            LikesError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            LikesError::Validation(e) => e.code(),
            LikesError::Normalization(e) => e.code(),
            LikesError::Store(_) => "store_failed",
        }
    }

    /// Message safe to show to the caller. Store errors never expose their cause.
    pub fn public_message(&self) -> String {
        self.to_string()
    }
}

/// Result of a successful read or update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LikesOutcome {
    pub operation: Operation,
    pub url: String,
    pub likes: u32,
}

pub struct LikesService {
    validator: RequestValidator,
    store: Arc<dyn CounterStore>,
}

impl LikesService {
    pub fn new(validator: RequestValidator, store: Arc<dyn CounterStore>) -> Self {
        Self { validator, store }
    }

    pub fn store(&self) -> &Arc<dyn CounterStore> {
        &self.store
    }

    pub async fn handle(&self, request: &IncomingRequest<'_>) -> Result<LikesOutcome, LikesError> {
        let validated = self.validator.validate(request)?;
        let key = normalize_url(&validated.url)?;

        let likes = match validated.operation {
            Operation::Read => self.store.read_or_init(&key).await,
            Operation::Update => self.store.increment_or_init(&key).await,
        }
        .map_err(|e| {
            tracing::error!(error = %e, key = %key, "counter store operation failed");
            e
        })?;

        Ok(LikesOutcome {
            operation: validated.operation,
            url: key.into_string(),
            likes,
        })
    }
}
