//! URL normalization and request validation. Pure logic, no I/O.

pub mod normalize;
pub mod request;

pub use normalize::{normalize_url, CanonicalKey, NormalizationError, MAX_URL_LENGTH};
pub use request::{
    IncomingRequest, Operation, RequestValidator, ValidatedRequest, ValidationConfig,
    ValidationError,
};
