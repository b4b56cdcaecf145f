//! Request validation for the likes API.
//!
//! Runs before any URL normalization or store access. Checks are applied in a fixed order and
//! the first failure wins:
//! 1. HTTP method must be `POST`.
//! 2. The `method` query parameter must be `read` or `update` (any case).
//! 3. The body must be non-empty JSON.
//! 4. The body must carry a non-empty string `url` (base64-decoded when configured).
//! 5. With same-domain protection on, the Host header and the body URL must share a root domain.

use axum::http::Method;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde_json::Value as JsonValue;
use std::str::FromStr;
use thiserror::Error;
use url::Url;

/// Default wildcard suffix of the hosting platform's shared domain.
pub const DEFAULT_PLATFORM_HOST_SUFFIX: &str = ".workers.dev";

/// The two operations the API exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Read,
    Update,
}

impl FromStr for Operation {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("read") {
            Ok(Operation::Read)
        } else if s.eq_ignore_ascii_case("update") {
            Ok(Operation::Update)
        } else {
            Err(ValidationError::InvalidOperation(s.to_string()))
        }
    }
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Read => "read",
            Operation::Update => "update",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Method not allowed. Only POST requests are accepted.")]
    MethodNotAllowed,
    #[error("Missing required query parameter: method")]
    MissingOperation,
    #[error("Invalid method. Must be \"read\" or \"update\"")]
    InvalidOperation(String),
    #[error("Request body cannot be empty")]
    EmptyBody,
    #[error("Invalid JSON in request body")]
    InvalidJson,
    #[error("Missing or invalid \"url\" field in request body")]
    InvalidUrlField,
    #[error("Invalid base64 encoding in \"url\" field")]
    InvalidUrlEncoding,
    #[error("Domain not allowed")]
    DomainNotAllowed,
}

impl ValidationError {
    /// Stable reason code, used in logs.
    pub fn code(&self) -> &'static str {
        match self {
            ValidationError::MethodNotAllowed => "method_not_allowed",
            ValidationError::MissingOperation => "missing_method_param",
            ValidationError::InvalidOperation(_) => "invalid_method_param",
            ValidationError::EmptyBody => "empty_body",
            ValidationError::InvalidJson => "invalid_json",
            ValidationError::InvalidUrlField => "invalid_url_field",
            ValidationError::InvalidUrlEncoding => "invalid_url_encoding",
            ValidationError::DomainNotAllowed => "domain_not_allowed",
        }
    }
}

/// Knobs for the validator. Passed in explicitly; never read from the environment here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationConfig {
    pub same_domain_protection: bool,
    /// Requests whose Host ends with this suffix are rejected when protection is on.
    pub platform_host_suffix: Option<String>,
    /// Whether the body `url` field is base64 of the raw URL.
    pub base64_urls: bool,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            same_domain_protection: false,
            platform_host_suffix: Some(DEFAULT_PLATFORM_HOST_SUFFIX.to_string()),
            base64_urls: false,
        }
    }
}

/// Everything the validator looks at, borrowed from the incoming HTTP request.
#[derive(Debug, Clone, Copy)]
pub struct IncomingRequest<'a> {
    pub method: &'a Method,
    pub query: Option<&'a str>,
    pub host: Option<&'a str>,
    pub body: &'a [u8],
}

/// A request that passed every check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedRequest {
    pub operation: Operation,
    /// Raw URL as supplied by the client (already base64-decoded if configured).
    pub url: String,
}

#[derive(Debug, Clone, Default)]
pub struct RequestValidator {
    config: ValidationConfig,
}

impl RequestValidator {
    pub fn new(config: ValidationConfig) -> Self {
        Self { config }
    }

    pub fn validate(&self, req: &IncomingRequest<'_>) -> Result<ValidatedRequest, ValidationError> {
        if *req.method != Method::POST {
            return Err(ValidationError::MethodNotAllowed);
        }

        let operation = operation_from_query(req.query)?;
        let body = parse_body(req.body)?;
        let url = self.extract_url(&body)?;

        if self.config.same_domain_protection {
            self.check_same_domain(req.host, &url)?;
        }

        Ok(ValidatedRequest { operation, url })
    }

    fn extract_url(&self, body: &JsonValue) -> Result<String, ValidationError> {
        let raw = body
            .get("url")
            .and_then(JsonValue::as_str)
            .filter(|s| !s.is_empty())
            .ok_or(ValidationError::InvalidUrlField)?;

        if !self.config.base64_urls {
            return Ok(raw.to_string());
        }

        let bytes = BASE64
            .decode(raw.trim())
            .map_err(|_| ValidationError::InvalidUrlEncoding)?;
        String::from_utf8(bytes).map_err(|_| ValidationError::InvalidUrlEncoding)
    }

    /// Coarse same-site heuristic: compares the root domain of the Host header with that of the
    /// URL being counted. Sibling subdomains are indistinguishable.
    fn check_same_domain(&self, host: Option<&str>, url: &str) -> Result<(), ValidationError> {
        let host = host
            .map(host_name)
            .filter(|h| !h.is_empty())
            .ok_or(ValidationError::DomainNotAllowed)?;

        if let Some(suffix) = &self.config.platform_host_suffix {
            if host.ends_with(&suffix.to_ascii_lowercase()) {
                return Err(ValidationError::DomainNotAllowed);
            }
        }

        let parsed = Url::parse(url).map_err(|_| ValidationError::DomainNotAllowed)?;
        let url_host = parsed.host_str().ok_or(ValidationError::DomainNotAllowed)?;

        if root_domain(&host) != root_domain(url_host) {
            return Err(ValidationError::DomainNotAllowed);
        }
        Ok(())
    }
}

fn operation_from_query(query: Option<&str>) -> Result<Operation, ValidationError> {
    let value = query
        .and_then(|q| {
            url::form_urlencoded::parse(q.as_bytes())
                .find(|(name, _)| name == "method")
                .map(|(_, value)| value.into_owned())
        })
        .filter(|v| !v.is_empty())
        .ok_or(ValidationError::MissingOperation)?;
    value.parse()
}

fn parse_body(body: &[u8]) -> Result<JsonValue, ValidationError> {
    let text = std::str::from_utf8(body).map_err(|_| ValidationError::InvalidJson)?;
    if text.trim().is_empty() {
        return Err(ValidationError::EmptyBody);
    }
    serde_json::from_str(text).map_err(|_| ValidationError::InvalidJson)
}

/// Host header value without its `:port`, lowercased (URL hosts are always lowercase).
fn host_name(header: &str) -> String {
    strip_port(header).to_ascii_lowercase()
}

fn strip_port(hostname: &str) -> &str {
    hostname.split(':').next().unwrap_or_default()
}

/// Last two dot-separated labels of `hostname`, ignoring any `:port` suffix.
pub fn root_domain(hostname: &str) -> &str {
    let host = strip_port(hostname);
    let mut dots = host.rmatch_indices('.').map(|(i, _)| i);
    match (dots.next(), dots.next()) {
        (Some(_), Some(second)) => &host[second + 1..],
        _ => host,
    }
}
