use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    Forbidden,
    NotFound,
    Validation,
    MethodNotAllowed,
    Internal,
}

/// Failure of an API operation. Only `message` goes over the wire.
#[derive(Debug, Clone, Error)]
#[error("{code:?}: {message}")]
pub struct ApiError {
    pub code: ErrorCode,
    pub message: String,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn city_not_found() -> Self {
        Self::new(ErrorCode::NotFound, "City not found")
    }

    pub fn hotel_not_found() -> Self {
        Self::new(ErrorCode::NotFound, "Hotel not found")
    }

    pub fn invalid_method() -> Self {
        Self::new(ErrorCode::MethodNotAllowed, "Invalid request method")
    }

    pub fn csrf_failed() -> Self {
        Self::new(ErrorCode::Forbidden, "CSRF verification failed")
    }
}

/// `{"error": "..."}` body returned for every failed request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl From<ApiError> for ErrorBody {
    fn from(value: ApiError) -> Self {
        Self {
            error: value.message,
        }
    }
}
