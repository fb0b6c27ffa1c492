//! API error types with HTTP status code mapping

use serde::Serialize;

use crate::storage::StoreError;

/// Message sent to clients for any internal failure
pub const GENERIC_ERROR_MESSAGE: &str = "Something went wrong!";

/// Error codes that map to HTTP status codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Resource not found (404)
    NotFound,
    /// Invalid request (400)
    BadRequest,
    /// Request body over the size limit (413)
    PayloadTooLarge,
    /// Internal server error (500)
    Internal,
}

impl ErrorCode {
    /// Get the HTTP status code for this error
    #[must_use]
    pub const fn status_code(self) -> u16 {
        match self {
            Self::NotFound => 404,
            Self::BadRequest => 400,
            Self::PayloadTooLarge => 413,
            Self::Internal => 500,
        }
    }

    /// Get the error code string
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotFound => "NOT_FOUND",
            Self::BadRequest => "BAD_REQUEST",
            Self::PayloadTooLarge => "PAYLOAD_TOO_LARGE",
            Self::Internal => "INTERNAL_ERROR",
        }
    }
}

/// API error with code and message
#[derive(Debug, Clone)]
pub struct ApiError {
    /// Error code (determines HTTP status)
    pub code: ErrorCode,
    /// Human-readable error message
    ///
    /// For internal errors this is a detail for the log, not for the client.
    pub message: String,
}

impl ApiError {
    /// Create a not found error
    #[must_use]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::NotFound,
            message: message.into(),
        }
    }

    /// Create a bad request error
    #[must_use]
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::BadRequest,
            message: message.into(),
        }
    }

    /// Create an internal error
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::Internal,
            message: message.into(),
        }
    }

    /// Create a payload too large error
    #[must_use]
    pub fn payload_too_large() -> Self {
        Self {
            code: ErrorCode::PayloadTooLarge,
            message: "Request body too large".to_string(),
        }
    }

    /// The 404 returned when no route matches
    #[must_use]
    pub fn route_not_found() -> Self {
        Self::not_found("Route not found")
    }

    /// Get the HTTP status code for this error
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        self.code.status_code()
    }

    /// The message that is safe to show a client
    #[must_use]
    pub fn public_message(&self) -> &str {
        match self.code {
            ErrorCode::Internal => GENERIC_ERROR_MESSAGE,
            ErrorCode::NotFound | ErrorCode::BadRequest | ErrorCode::PayloadTooLarge => {
                &self.message
            },
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code.as_str(), self.message)
    }
}

impl std::error::Error for ApiError {}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::EmptyText => Self::bad_request("Todo text is required"),
            StoreError::NotFound(_) => Self::not_found("Todo not found"),
        }
    }
}

/// Serializable error body: `{"error": "..."}`
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Human-readable message
    pub error: String,
}

impl From<&ApiError> for ErrorBody {
    fn from(err: &ApiError) -> Self {
        Self {
            error: err.public_message().to_string(),
        }
    }
}
