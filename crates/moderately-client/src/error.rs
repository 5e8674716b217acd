//! Client error types.

use std::time::Duration;

use thiserror::Error;

/// Coarse classification of an [`Error`], used by retry policies and callers
/// that want to branch without matching on every field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// 401 or 403.
    Authentication,
    /// 404.
    NotFound,
    /// 409.
    Conflict,
    /// 422.
    Validation,
    /// 429.
    RateLimit,
    /// Any other non-2xx status.
    Api,
    /// Connect or read timeout.
    Timeout,
    /// Connection failure that is not a timeout.
    Transport,
    /// A response body or local sample could not be decoded.
    Decode,
    /// A URL could not be built or parsed.
    InvalidUrl,
    /// The client was misconfigured.
    Config,
    /// Local I/O failure.
    Io,
    /// The upload protocol returned something unusable.
    Upload,
    /// The server state does not allow the requested operation.
    InvalidState,
    /// A polling wait exceeded its deadline.
    WaitTimeout,
}

/// A single field-level validation message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    /// Field path, dot-separated for nested fields. Empty when the server
    /// reported a message without a field.
    pub field: String,
    /// Message for the field.
    pub message: String,
}

impl FieldError {
    /// Create a field error.
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Client error type.
#[derive(Debug, Error)]
pub enum Error {
    /// The API key was rejected or lacks permission.
    #[error("Authentication failed ({status}): {message}")]
    Authentication {
        /// HTTP status code (401 or 403).
        status: u16,
        /// Message extracted from the response.
        message: String,
        /// Raw response body.
        body: String,
    },

    /// Resource not found.
    #[error("Not found: {message}")]
    NotFound {
        /// HTTP status code.
        status: u16,
        /// Message extracted from the response.
        message: String,
        /// Raw response body.
        body: String,
    },

    /// The request conflicts with the current server state.
    #[error("Conflict: {message}")]
    Conflict {
        /// HTTP status code.
        status: u16,
        /// Message extracted from the response.
        message: String,
        /// Raw response body.
        body: String,
    },

    /// The server rejected the request payload.
    #[error("Validation failed: {message}")]
    Validation {
        /// HTTP status code.
        status: u16,
        /// Message extracted from the response.
        message: String,
        /// Raw response body.
        body: String,
        /// Per-field messages, in the order the server reported them.
        fields: Vec<FieldError>,
    },

    /// Too many requests.
    #[error("Rate limited: {message}")]
    RateLimit {
        /// HTTP status code.
        status: u16,
        /// Message extracted from the response.
        message: String,
        /// Raw response body.
        body: String,
        /// How long the server asked us to wait, if it said.
        retry_after: Option<Duration>,
    },

    /// Server returned some other error response.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Message extracted from the response.
        message: String,
        /// Raw response body.
        body: String,
    },

    /// The request timed out before a response arrived.
    #[error("Request timed out: {0}")]
    Timeout(String),

    /// The request never produced a response.
    #[error("Transport error: {0}")]
    Transport(String),

    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// URL parsing failed.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Invalid configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Local I/O failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The upload protocol returned an unusable response.
    #[error("Upload failed: {0}")]
    Upload(String),

    /// The resource is not in a state that allows the operation.
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// A local sample file could not be used to infer a schema.
    #[error("Invalid sample: {0}")]
    Sample(String),

    /// Polling gave up before the resource reached a terminal state.
    #[error("Timed out after {elapsed:?} waiting for {what}")]
    WaitTimeout {
        /// What was being waited on.
        what: String,
        /// How long we waited.
        elapsed: Duration,
    },
}

impl Error {
    /// The coarse kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Authentication { .. } => ErrorKind::Authentication,
            Error::NotFound { .. } => ErrorKind::NotFound,
            Error::Conflict { .. } => ErrorKind::Conflict,
            Error::Validation { .. } => ErrorKind::Validation,
            Error::RateLimit { .. } => ErrorKind::RateLimit,
            Error::Api { .. } => ErrorKind::Api,
            Error::Timeout(_) => ErrorKind::Timeout,
            Error::Transport(_) => ErrorKind::Transport,
            Error::Json(_) | Error::Sample(_) => ErrorKind::Decode,
            Error::InvalidUrl(_) => ErrorKind::InvalidUrl,
            Error::Config(_) => ErrorKind::Config,
            Error::Io(_) => ErrorKind::Io,
            Error::Upload(_) => ErrorKind::Upload,
            Error::InvalidState(_) => ErrorKind::InvalidState,
            Error::WaitTimeout { .. } => ErrorKind::WaitTimeout,
        }
    }

    /// HTTP status code, for errors built from a response.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Authentication { status, .. }
            | Error::NotFound { status, .. }
            | Error::Conflict { status, .. }
            | Error::Validation { status, .. }
            | Error::RateLimit { status, .. }
            | Error::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Raw response body, for errors built from a response.
    pub fn body(&self) -> Option<&str> {
        match self {
            Error::Authentication { body, .. }
            | Error::NotFound { body, .. }
            | Error::Conflict { body, .. }
            | Error::Validation { body, .. }
            | Error::RateLimit { body, .. }
            | Error::Api { body, .. } => Some(body),
            _ => None,
        }
    }

    /// Response body parsed as JSON, if it is JSON.
    pub fn body_json(&self) -> Option<serde_json::Value> {
        self.body().and_then(|b| serde_json::from_str(b).ok())
    }

    /// Server-provided wait hint, only set on rate-limit errors.
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            Error::RateLimit { retry_after, .. } => *retry_after,
            _ => None,
        }
    }

    /// Field-level validation messages. Empty for every other kind.
    pub fn field_errors(&self) -> &[FieldError] {
        match self {
            Error::Validation { fields, .. } => fields,
            _ => &[],
        }
    }

    /// Check if this is a not-found error.
    pub fn is_not_found(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }

    /// Check if this is an authentication error.
    pub fn is_auth_error(&self) -> bool {
        self.kind() == ErrorKind::Authentication
    }

    /// Check if this is a rate limit error.
    pub fn is_rate_limited(&self) -> bool {
        self.kind() == ErrorKind::RateLimit
    }

    /// Check if this is a server error.
    pub fn is_server_error(&self) -> bool {
        matches!(self.status(), Some(status) if status >= 500)
    }

    /// Whether the default retry policy treats this error as transient.
    pub fn is_retryable(&self) -> bool {
        crate::retry::RetryPolicy::default().is_retryable(self)
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Error::Timeout(err.to_string())
        } else if err.is_connect() {
            Error::Transport(format!("Connection failed: {}", err))
        } else {
            Error::Transport(err.to_string())
        }
    }
}

impl From<csv::Error> for Error {
    fn from(err: csv::Error) -> Self {
        Error::Sample(err.to_string())
    }
}

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, Error>;
