//! Normalized response envelope.
//!
//! Every JSON endpoint answers `{ success, message, data }`. The client
//! enforces this one contract instead of branching on response shape.

use crate::{ApiError, ApiResult};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Response envelope returned by every JSON endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// Whether the operation succeeded
    pub success: bool,
    /// Human-readable outcome message
    #[serde(default)]
    pub message: String,
    /// Operation payload, absent for message-only responses
    #[serde(default = "Option::default")]
    pub data: Option<T>,
}

impl<T: DeserializeOwned> ApiResponse<T> {
    /// Unwrap the payload, treating a missing `data` on a success envelope
    /// as a contract violation.
    pub fn into_data(self) -> ApiResult<T> {
        if !self.success {
            return Err(ApiError::Envelope(format!(
                "success=false envelope on a 2xx response: {}",
                self.message
            )));
        }
        self.data.ok_or_else(|| {
            ApiError::Envelope("success envelope with no data field".to_string())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_into_data() {
        let envelope: ApiResponse<String> =
            serde_json::from_str(r#"{"success":true,"message":"ok","data":"payload"}"#).unwrap();
        assert_eq!(envelope.into_data().unwrap(), "payload");
    }

    #[test]
    fn test_envelope_missing_data_is_contract_violation() {
        let envelope: ApiResponse<String> =
            serde_json::from_str(r#"{"success":true,"message":"ok"}"#).unwrap();
        assert!(matches!(
            envelope.into_data(),
            Err(ApiError::Envelope(_))
        ));
    }

    #[test]
    fn test_envelope_success_false() {
        let envelope: ApiResponse<String> =
            serde_json::from_str(r#"{"success":false,"message":"nope","data":null}"#).unwrap();
        let err = envelope.into_data().unwrap_err();
        assert!(err.to_string().contains("nope"));
    }
}
