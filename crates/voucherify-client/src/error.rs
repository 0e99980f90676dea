//! # Client Error Types
//!
//! Error types for every operation that talks to the Voucherify API.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Client Error Categories                           │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │  Configuration  │  │   Transport     │  │     Response            │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  Configuration  │  │  Transport      │  │  UnexpectedStatus       │ │
//! │  │  Validation     │  │  (connect,      │  │  ResponseShape          │ │
//! │  │  InvalidUrl     │  │   timeout)      │  │                         │ │
//! │  │  ConfigLoad/Save│  │                 │  │                         │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! │                                                                         │
//! │  Configuration errors never reach the network. Transport and response  │
//! │  errors are returned through the same Result as success, never panic.  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde_json::Value;
use thiserror::Error;
use voucherify_core::{ApiErrorKey, ValidationError};

use crate::callback::ErrorObject;

/// Result type alias for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Client error type covering all possible failures of an API call.
#[derive(Debug, Error)]
pub enum ClientError {
    // =========================================================================
    // Configuration Errors
    // =========================================================================
    /// Credentials or another required setting is missing.
    #[error("Lack of configuration: {0}")]
    Configuration(String),

    /// Caller input failed local validation.
    #[error("Invalid input: {0}")]
    Validation(#[from] ValidationError),

    /// API base URL could not be parsed.
    #[error("Invalid API URL: {0}")]
    InvalidUrl(String),

    /// Failed to load config file.
    #[error("Failed to load config: {0}")]
    ConfigLoadFailed(String),

    /// Failed to save config file.
    #[error("Failed to save config: {0}")]
    ConfigSaveFailed(String),

    // =========================================================================
    // Transport Errors
    // =========================================================================
    /// Network failure or timeout before a response arrived.
    #[error("Transport error: {0}")]
    Transport(String),

    /// Payload could not be serialized.
    #[error("Serialization failed: {0}")]
    Serialization(String),

    // =========================================================================
    // Response Errors
    // =========================================================================
    /// The API answered with a status outside 200-399.
    #[error("Unexpected status code: {status}")]
    UnexpectedStatus {
        status: u16,
        /// Parsed error body, when the API sent JSON.
        body: Option<Value>,
    },

    /// The body matched none of the recognized response shapes.
    #[error("Unexpected response structure: {context}")]
    ResponseShape { context: Value },
}

// =============================================================================
// Error Conversions
// =============================================================================

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::Serialization(err.to_string())
    }
}

impl From<url::ParseError> for ClientError {
    fn from(err: url::ParseError) -> Self {
        ClientError::InvalidUrl(err.to_string())
    }
}

impl From<std::io::Error> for ClientError {
    fn from(err: std::io::Error) -> Self {
        ClientError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::de::Error> for ClientError {
    fn from(err: toml::de::Error) -> Self {
        ClientError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::ser::Error> for ClientError {
    fn from(err: toml::ser::Error) -> Self {
        ClientError::ConfigSaveFailed(err.to_string())
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ClientError::Transport(format!("request timed out: {}", err))
        } else if err.is_connect() {
            ClientError::Transport(format!("connection failed: {}", err))
        } else {
            ClientError::Transport(err.to_string())
        }
    }
}

// =============================================================================
// Error Categorization
// =============================================================================

impl ClientError {
    /// Returns true if this error was raised locally, before any request.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            ClientError::Configuration(_)
                | ClientError::Validation(_)
                | ClientError::InvalidUrl(_)
                | ClientError::ConfigLoadFailed(_)
                | ClientError::ConfigSaveFailed(_)
        )
    }

    /// Returns the HTTP status for status errors.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::UnexpectedStatus { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns the `key` the API put in its error body, if any.
    ///
    /// ## Example
    /// ```rust
    /// use serde_json::json;
    /// use voucherify_client::ClientError;
    /// use voucherify_core::ApiErrorKey;
    ///
    /// let err = ClientError::UnexpectedStatus {
    ///     status: 400,
    ///     body: Some(json!({ "code": 400, "key": "invalid_amount" })),
    /// };
    /// assert_eq!(err.api_error_key(), Some(ApiErrorKey::InvalidAmount));
    /// ```
    pub fn api_error_key(&self) -> Option<ApiErrorKey> {
        match self {
            ClientError::UnexpectedStatus {
                body: Some(body), ..
            } => body
                .get("key")
                .and_then(Value::as_str)
                .map(ApiErrorKey::from),
            _ => None,
        }
    }

    /// Converts this error into the `{type, message, context}` object
    /// delivered to callbacks.
    pub fn to_error_object(&self) -> ErrorObject {
        let (message, context) = match self {
            ClientError::ResponseShape { context } => {
                ("Unexpected response structure.".to_string(), context.clone())
            }
            ClientError::UnexpectedStatus { status, .. } => {
                ("Unexpected status code.".to_string(), Value::from(*status))
            }
            ClientError::Transport(reason) => {
                ("HTTP transport error.".to_string(), Value::String(reason.clone()))
            }
            other => (other.to_string(), Value::Null),
        };
        ErrorObject::new(message, context)
    }
}
