//! Error types for CaaS operations.
//!
//! This module provides the error taxonomy shared by every Dimension Data client:
//! authentication failures, structured provider API errors, and the transport and
//! configuration failures that surround them.

use std::fmt;
use thiserror::Error;

/// Code carried by a provider API error.
///
/// A `400 Bad Request` carries a provider-specific `responseCode` string; any other
/// unexpected status falls back to the HTTP status itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorCode {
    /// Provider `responseCode` value (e.g. `RESOURCE_NOT_FOUND`)
    Provider(String),
    /// Raw HTTP status code
    Http(u16),
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Provider(code) => f.write_str(code),
            Self::Http(status) => write!(f, "{status}"),
        }
    }
}

impl From<u16> for ErrorCode {
    fn from(status: u16) -> Self {
        Self::Http(status)
    }
}

impl From<&str> for ErrorCode {
    fn from(code: &str) -> Self {
        Self::Provider(code.to_string())
    }
}

/// Main error type for CaaS operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// The API rejected the credentials (HTTP 401 or 403)
    #[error("Invalid credentials: {0}")]
    InvalidCredentials(String),

    /// Structured error reported by the provider API
    #[error("{code}: {message}")]
    Api {
        /// Provider response code or HTTP status
        code: ErrorCode,
        /// Provider message or raw response body
        message: String,
        /// Name of the driver whose connection received the error
        driver: String,
    },

    /// Response body could not be parsed as XML
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// Account information did not include an organization id
    #[error("Organization id unavailable: {0}")]
    OrganizationUnresolved(String),

    /// Region code is not in the endpoint table
    #[error("Unknown region: {0}")]
    UnknownRegion(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Invalid endpoint
    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),

    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    HttpError(String),

    /// Operation timed out
    #[error("Request timed out: {0}")]
    Timeout(String),

    /// Endpoint could not be reached
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),
}

/// Specialized result type for CaaS operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Builds a provider API error.
    pub fn api(code: impl Into<ErrorCode>, message: impl Into<String>, driver: &str) -> Self {
        Self::Api {
            code: code.into(),
            message: message.into(),
            driver: driver.to_string(),
        }
    }

    /// Returns the error code for this error type.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidCredentials(_) => "INVALID_CREDENTIALS",
            Self::Api { .. } => "API_ERROR",
            Self::MalformedResponse(_) => "MALFORMED_RESPONSE",
            Self::OrganizationUnresolved(_) => "ORGANIZATION_UNRESOLVED",
            Self::UnknownRegion(_) => "UNKNOWN_REGION",
            Self::ConfigError(_) => "CONFIG_ERROR",
            Self::InvalidEndpoint(_) => "INVALID_ENDPOINT",
            Self::HttpError(_) => "HTTP_ERROR",
            Self::Timeout(_) => "TIMEOUT",
            Self::ServiceUnavailable(_) => "SERVICE_UNAVAILABLE",
        }
    }

    /// Provider code of an [`Error::Api`], if this is one.
    #[must_use]
    pub const fn api_code(&self) -> Option<&ErrorCode> {
        match self {
            Self::Api { code, .. } => Some(code),
            _ => None,
        }
    }

    /// Returns true for authentication failures.
    #[must_use]
    pub const fn is_auth_error(&self) -> bool {
        matches!(self, Self::InvalidCredentials(_))
    }

    /// Returns true if this error should be logged as a serious error.
    #[must_use]
    pub const fn should_log(&self) -> bool {
        matches!(
            self,
            Self::ConfigError(_) | Self::MalformedResponse(_) | Self::OrganizationUnresolved(_)
        )
    }
}

// Conversions from external error types
impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(err.to_string())
        } else if err.is_connect() {
            Self::ServiceUnavailable(err.to_string())
        } else {
            Self::HttpError(err.to_string())
        }
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Self::InvalidEndpoint(err.to_string())
    }
}

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        Self::MalformedResponse(err.to_string())
    }
}

impl From<validator::ValidationErrors> for Error {
    fn from(err: validator::ValidationErrors) -> Self {
        Self::ConfigError(format!("Invalid configuration: {err}"))
    }
}
