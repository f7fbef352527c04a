//! Anti-forgery token issued in the page and required on mutating API calls.

use std::sync::Arc;

use axum::{
    http::{HeaderMap, StatusCode},
    Json,
};
use shared::{
    error::{ApiError, ErrorBody},
    protocol::CSRF_HEADER,
};
use tracing::warn;

#[derive(Clone)]
pub(crate) struct CsrfToken(Arc<str>);

impl CsrfToken {
    pub(crate) fn new(value: impl Into<String>) -> Self {
        Self(Arc::from(value.into()))
    }

    pub(crate) fn generate() -> Self {
        Self::new(uuid::Uuid::new_v4().simple().to_string())
    }

    pub(crate) fn as_str(&self) -> &str {
        &self.0
    }

    fn matches(&self, presented: &str) -> bool {
        let expected = self.0.as_bytes();
        let presented = presented.as_bytes();
        if expected.len() != presented.len() {
            return false;
        }
        expected
            .iter()
            .zip(presented)
            .fold(0u8, |acc, (a, b)| acc | (a ^ b))
            == 0
    }
}

/// Rejects the request unless `X-CSRFToken` carries the process token.
pub(crate) fn verify_csrf(
    token: &CsrfToken,
    headers: &HeaderMap,
) -> Result<(), (StatusCode, Json<ErrorBody>)> {
    let presented = headers
        .get(CSRF_HEADER)
        .and_then(|value| value.to_str().ok());

    match presented {
        Some(presented) if token.matches(presented) => Ok(()),
        _ => {
            warn!(
                header_present = presented.is_some(),
                "rejected request without valid csrf token"
            );
            Err((
                StatusCode::FORBIDDEN,
                Json(ErrorBody::from(ApiError::csrf_failed())),
            ))
        }
    }
}
