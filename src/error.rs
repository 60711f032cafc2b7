//! Error types and handling for the `WaveCast` service

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// Main error type for the `WaveCast` service
#[derive(Error, Debug)]
pub enum WaveCastError {
    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Forecast model errors (loading or rollout)
    #[error("Model error: {message}")]
    Model { message: String },

    /// Unknown location
    #[error("Not found: {message}")]
    NotFound { message: String },

    /// Failure while rendering a response body
    #[error("Application error: {message}")]
    General { message: String },
}

impl WaveCastError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new model error
    pub fn model<S: Into<String>>(message: S) -> Self {
        Self::Model {
            message: message.into(),
        }
    }

    /// Create a new not-found error
    pub fn not_found<S: Into<String>>(message: S) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// Create a new general error
    pub fn general<S: Into<String>>(message: S) -> Self {
        Self::General {
            message: message.into(),
        }
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            WaveCastError::Config { .. } => {
                "Configuration error. Please check your config file and environment.".to_string()
            }
            WaveCastError::Model { .. } => {
                "The forecast model is unavailable. Please try again later.".to_string()
            }
            WaveCastError::NotFound { .. } => "Location not found".to_string(),
            WaveCastError::General { .. } => "Failed to render the forecast".to_string(),
        }
    }

    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            WaveCastError::NotFound { .. } => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for WaveCastError {
    fn into_response(self) -> Response {
        (self.status_code(), Json(json!({"error": self.user_message()}))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use rstest::rstest;

    #[test]
    fn test_error_creation() {
        let config_err = WaveCastError::config("missing endpoint");
        assert!(matches!(config_err, WaveCastError::Config { .. }));

        let model_err = WaveCastError::model("rollout failed");
        assert!(matches!(model_err, WaveCastError::Model { .. }));

        let not_found = WaveCastError::not_found("Atlantis");
        assert!(matches!(not_found, WaveCastError::NotFound { .. }));
        assert_eq!(not_found.to_string(), "Not found: Atlantis");
    }

    #[test]
    fn test_user_messages() {
        let config_err = WaveCastError::config("test");
        assert!(config_err.user_message().contains("Configuration error"));

        let model_err = WaveCastError::model("test");
        assert!(model_err.user_message().contains("model is unavailable"));

        assert_eq!(
            WaveCastError::not_found("Atlantis").user_message(),
            "Location not found"
        );
    }

    #[rstest]
    #[case(WaveCastError::not_found("Atlantis"), StatusCode::NOT_FOUND)]
    #[case(WaveCastError::general("csv"), StatusCode::INTERNAL_SERVER_ERROR)]
    #[case(WaveCastError::model("down"), StatusCode::INTERNAL_SERVER_ERROR)]
    fn test_status_codes(#[case] err: WaveCastError, #[case] expected: StatusCode) {
        assert_eq!(err.status_code(), expected);
    }

    #[tokio::test]
    async fn test_not_found_response_body() {
        let response = WaveCastError::not_found("Atlantis").into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], br#"{"error":"Location not found"}"#);
    }

    #[tokio::test]
    async fn test_general_error_hides_details() {
        let response = WaveCastError::general("csv writer: broken pipe").into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = String::from_utf8(body.to_vec()).unwrap();
        assert!(!body.contains("broken pipe"));
    }
}
