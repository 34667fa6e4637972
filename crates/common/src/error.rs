//! Error types for cinerate.

use thiserror::Error;

/// Application result type.
pub type AppResult<T> = Result<T, AppError>;

/// Application error type.
#[derive(Debug, Error)]
pub enum AppError {
    // === Transport Errors ===
    /// The backend answered with a non-success status.
    #[error("API Error: {status} - {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Raw response body text.
        body: String,
    },

    /// The request never produced a response.
    #[error("Network error: {0}")]
    Network(String),

    // === Client Errors ===
    /// Input rejected before any request was sent.
    #[error("{0}")]
    Validation(String),

    /// A success body did not match the expected shape.
    #[error("Unexpected response shape: {0}")]
    Decode(String),

    /// A success body was missing a required field.
    #[error("{0}")]
    InvalidResponse(String),

    /// The operation needs a logged-in user.
    #[error("Not logged in")]
    Unauthorized,

    // === Local Errors ===
    /// Local session storage failed.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Anything else.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Shorthand for a validation failure.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Returns the error code for logs and structured output.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Api { .. } => "API_ERROR",
            Self::Network(_) => "NETWORK_ERROR",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Decode(_) => "DECODE_ERROR",
            Self::InvalidResponse(_) => "INVALID_RESPONSE",
            Self::Unauthorized => "UNAUTHORIZED",
            Self::Storage(_) => "STORAGE_ERROR",
            Self::Config(_) => "CONFIG_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// HTTP status of a transport error.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether the backend reported the resource as missing.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::Api { status: 404, .. })
    }

    /// Whether this error was raised before any request was issued.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

impl AppError {
    /// Validation failure for the first field in `order` that failed.
    /// Fields not named in `order` fall back to the combined message.
    #[must_use]
    pub fn first_field_error(err: validator::ValidationErrors, order: &[&str]) -> Self {
        let first = {
            let fields = err.field_errors();
            order
                .iter()
                .find_map(|field| fields.get(*field))
                .and_then(|errors| errors.first())
                .map(field_message)
        };
        first.map_or_else(|| err.into(), Self::Validation)
    }
}

fn field_message(err: &validator::ValidationError) -> String {
    err.message
        .as_ref()
        .map_or_else(|| err.code.to_string(), ToString::to_string)
}

// === From implementations ===

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        // Field-level messages carry the user-facing text; keep only those,
        // ordered by field name.
        let mut fields: Vec<_> = err.field_errors().into_iter().collect();
        fields.sort_by(|(a, _), (b, _)| a.cmp(b));
        let messages: Vec<String> = fields
            .into_iter()
            .flat_map(|(_, errors)| errors.iter())
            .map(field_message)
            .collect();

        if messages.is_empty() {
            Self::Validation(err.to_string())
        } else {
            Self::Validation(messages.join("; "))
        }
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        Self::Network(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::Storage(err.to_string())
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}
