//! Error types for courier.
//!
//! Errors fall into three kinds:
//! - transport failures ([`Error::Connection`], [`Error::Tls`], [`Error::Timeout`]),
//!   produced outside the response pipeline and only observed by it;
//! - response validation failures ([`Error::ResponseValidation`]);
//! - parsing failures ([`Error::JsonParsing`], [`Error::TextDecoding`]), wrapping
//!   the underlying decode error.
//!
//! [`Error`] is `Clone` so a parser can re-raise the error already stored on a
//! [`NetworkResponse`](crate::NetworkResponse) without consuming it.

use std::sync::Arc;

use derive_more::{Display, Error, From};

/// Main error type for courier operations.
#[derive(Debug, Clone, Display, Error, From)]
pub enum Error {
    /// Network/connection errors.
    #[display("connection error: {_0}")]
    #[from(skip)]
    Connection(#[error(not(source))] String),

    /// TLS/SSL errors.
    #[display("TLS error: {_0}")]
    #[from(skip)]
    Tls(#[error(not(source))] String),

    /// Request timeout.
    #[display("request timeout")]
    #[from(skip)]
    Timeout,

    /// Invalid request configuration.
    #[display("invalid request: {_0}")]
    #[from(skip)]
    InvalidRequest(#[error(not(source))] String),

    /// URL parsing error.
    #[display("invalid URL: {_0}")]
    #[from]
    InvalidUrl(url::ParseError),

    /// The base URL of a web service or custom resource could not be used.
    #[display("invalid base URL: {_0}")]
    #[from(skip)]
    InvalidBaseUrl(#[error(not(source))] String),

    /// The response did not meet a structural expectation.
    #[display("response validation failed: {reason}")]
    #[from(skip)]
    ResponseValidation {
        /// Why the response was rejected.
        reason: String,
    },

    /// The response body was present but is not valid JSON.
    #[display("JSON parsing failure: {_0}")]
    #[from(skip)]
    JsonParsing(Arc<serde_json::Error>),

    /// The response body was expected to be UTF-8 text.
    #[display("text decoding failure: {_0}")]
    #[from(skip)]
    TextDecoding(std::str::Utf8Error),

    /// JSON serialization error.
    #[display("JSON serialization error: {_0}")]
    #[from(skip)]
    JsonSerialization(Arc<serde_json::Error>),

    /// JSON deserialization error with path context.
    #[display("JSON deserialization error at '{path}': {message}")]
    #[from(skip)]
    JsonDeserialization {
        /// JSON path to the error (e.g., "user.address.city").
        path: String,
        /// Error message.
        message: String,
    },
}

/// Result type alias using [`crate::Error`].
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a connection error.
    #[must_use]
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection(message.into())
    }

    /// Create a TLS error.
    #[must_use]
    pub fn tls(message: impl Into<String>) -> Self {
        Self::Tls(message.into())
    }

    /// Create an invalid request error.
    #[must_use]
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest(message.into())
    }

    /// Create an invalid base URL error.
    #[must_use]
    pub fn invalid_base_url(message: impl Into<String>) -> Self {
        Self::InvalidBaseUrl(message.into())
    }

    /// Create a response validation error.
    #[must_use]
    pub fn response_validation(reason: impl Into<String>) -> Self {
        Self::ResponseValidation {
            reason: reason.into(),
        }
    }

    /// Create a JSON parsing failure wrapping the decode error.
    #[must_use]
    pub fn json_parsing(err: serde_json::Error) -> Self {
        Self::JsonParsing(Arc::new(err))
    }

    /// Create a JSON serialization error.
    #[must_use]
    pub fn json_serialization(err: serde_json::Error) -> Self {
        Self::JsonSerialization(Arc::new(err))
    }

    /// Create a JSON deserialization error with path context.
    #[must_use]
    pub fn json_deserialization(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::JsonDeserialization {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Returns `true` if this error was produced by the transport layer.
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(self, Self::Connection(_) | Self::Tls(_) | Self::Timeout)
    }

    /// Returns `true` if this is a timeout error.
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout)
    }

    /// Returns `true` if this is a connection error.
    #[must_use]
    pub const fn is_connection(&self) -> bool {
        matches!(self, Self::Connection(_))
    }

    /// Returns `true` if this is a response validation error.
    #[must_use]
    pub const fn is_response_validation(&self) -> bool {
        matches!(self, Self::ResponseValidation { .. })
    }

    /// Returns `true` if the response body could not be decoded.
    #[must_use]
    pub const fn is_parsing(&self) -> bool {
        matches!(
            self,
            Self::JsonParsing(_) | Self::TextDecoding(_) | Self::JsonDeserialization { .. }
        )
    }

    /// The validation reason, if this is a response validation error.
    #[must_use]
    pub fn validation_reason(&self) -> Option<&str> {
        match self {
            Self::ResponseValidation { reason } => Some(reason),
            _ => None,
        }
    }
}
