//! URL normalization: raw URL string -> canonical key used as the counter's primary key.

use std::fmt;
use thiserror::Error;
use url::Url;

/// Longest raw URL accepted, in characters.
pub const MAX_URL_LENGTH: usize = 65_536;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NormalizationError {
    #[error("URL exceeds maximum length of 65,536 characters")]
    TooLong { length: usize },
    #[error("Malformed URL")]
    Malformed,
    #[error("Invalid protocol. Only http and https are allowed")]
    InvalidProtocol,
    #[error("Processed URL cannot be empty")]
    Empty,
}

impl NormalizationError {
    pub fn code(&self) -> &'static str {
        match self {
            NormalizationError::TooLong { .. } => "url_too_long",
            NormalizationError::Malformed => "url_malformed",
            NormalizationError::InvalidProtocol => "url_invalid_protocol",
            NormalizationError::Empty => "url_empty",
        }
    }
}

/// Normalized form of a URL: lowercased host plus the non-root path.
///
/// Only [`normalize_url`] constructs one, so every key reaching the store went through
/// the same rules.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CanonicalKey(String);

impl CanonicalKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for CanonicalKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Converts a raw URL into its canonical key.
///
/// Scheme, port, userinfo, query and fragment never contribute to the key. A path of exactly
/// `/` is dropped; any other path is kept verbatim, trailing slash included.
pub fn normalize_url(raw: &str) -> Result<CanonicalKey, NormalizationError> {
    let length = raw.chars().count();
    if length > MAX_URL_LENGTH {
        return Err(NormalizationError::TooLong { length });
    }

    let parsed = Url::parse(raw).map_err(|_| NormalizationError::Malformed)?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(NormalizationError::InvalidProtocol);
    }

    let mut key = parsed.host_str().unwrap_or_default().to_lowercase();
    let path = parsed.path();
    if !path.is_empty() && path != "/" {
        key.push_str(path);
    }

    if key.trim().is_empty() {
        return Err(NormalizationError::Empty);
    }

    Ok(CanonicalKey(key))
}
