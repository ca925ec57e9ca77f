//! Client-side error taxonomy.

use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

/// Structured detail the backend attaches to login failures.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ErrorDetail {
    /// Remaining login attempts before the account locks
    pub remaining_attempts: Option<i32>,
    /// Lock cooldown in minutes, present on 423 responses
    pub lock_minutes: Option<i64>,
}

/// Error body the backend returns on non-success statuses:
/// `{ "message": ..., "data": { "remainingAttempts": ..., "lockMinutes": ... } }`
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    data: Option<ErrorDetail>,
}

/// Error type for API operations.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Transport-level failure, no HTTP response was received (or the body
    /// could not be read/decoded)
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The backend answered with a non-success status
    #[error("Request failed ({status}): {message}")]
    Status {
        status: StatusCode,
        message: String,
        detail: ErrorDetail,
    },

    /// Invalid base URL or path
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// The response did not honor the envelope contract
    #[error("Malformed response envelope: {0}")]
    Envelope(String),
}

/// Result type for API operations.
pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    /// Build a structured error from a failure status and raw body bytes.
    /// An unparseable body degrades to an empty detail, never to a panic.
    pub fn from_status(status: StatusCode, body: &[u8]) -> Self {
        let parsed: ErrorBody = serde_json::from_slice(body).unwrap_or_default();
        ApiError::Status {
            status,
            message: parsed.message.unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("request failed")
                    .to_string()
            }),
            detail: parsed.data.unwrap_or_default(),
        }
    }

    /// The HTTP status, when the backend answered at all.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Authorization failure (401).
    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(StatusCode::UNAUTHORIZED)
    }

    /// Conflict (409), e.g. a duplicate username.
    pub fn is_conflict(&self) -> bool {
        self.status() == Some(StatusCode::CONFLICT)
    }

    /// Validation failure (400), e.g. a bad or expired verification code.
    pub fn is_validation(&self) -> bool {
        self.status() == Some(StatusCode::BAD_REQUEST)
    }

    /// Account lock (423) with a cooldown.
    pub fn is_locked(&self) -> bool {
        self.status() == Some(StatusCode::LOCKED)
    }

    /// Server-side failure (5xx).
    pub fn is_server_error(&self) -> bool {
        self.status().is_some_and(|s| s.is_server_error())
    }

    /// Remaining login attempts reported by the backend.
    pub fn remaining_attempts(&self) -> Option<i32> {
        match self {
            ApiError::Status { detail, .. } => detail.remaining_attempts,
            _ => None,
        }
    }

    /// Account lock cooldown in minutes reported by the backend.
    pub fn lock_minutes(&self) -> Option<i64> {
        match self {
            ApiError::Status { detail, .. } => detail.lock_minutes,
            _ => None,
        }
    }

    /// Backend-supplied message, or the error's own rendering.
    pub fn message(&self) -> String {
        match self {
            ApiError::Status { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_status_parses_detail() {
        let body = br#"{"success":false,"message":"Incorrect password","data":{"remainingAttempts":3}}"#;
        let err = ApiError::from_status(StatusCode::UNAUTHORIZED, body);

        assert!(err.is_unauthorized());
        assert_eq!(err.remaining_attempts(), Some(3));
        assert_eq!(err.lock_minutes(), None);
        assert_eq!(err.message(), "Incorrect password");
    }

    #[test]
    fn test_from_status_locked() {
        let body = br#"{"message":"Account locked","data":{"lockMinutes":15}}"#;
        let err = ApiError::from_status(StatusCode::LOCKED, body);

        assert!(err.is_locked());
        assert_eq!(err.lock_minutes(), Some(15));
    }

    #[test]
    fn test_from_status_unparseable_body() {
        let err = ApiError::from_status(StatusCode::INTERNAL_SERVER_ERROR, b"<html>oops</html>");

        assert!(err.is_server_error());
        assert_eq!(err.message(), "Internal Server Error");
        assert_eq!(err.remaining_attempts(), None);
    }

    #[test]
    fn test_conflict_and_validation_classification() {
        let conflict = ApiError::from_status(StatusCode::CONFLICT, b"{}");
        assert!(conflict.is_conflict());
        assert!(!conflict.is_validation());

        let validation = ApiError::from_status(StatusCode::BAD_REQUEST, b"{}");
        assert!(validation.is_validation());
        assert!(!validation.is_conflict());
    }
}
