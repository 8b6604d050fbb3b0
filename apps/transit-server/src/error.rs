//! Error taxonomy for the REST surface.
//!
//! Every failure leaving a handler is an [`ApiError`]; the `IntoResponse`
//! impl renders the `{success: false, error: "..."}` envelope with the
//! matching HTTP status. Backend failures are logged and collapsed to a
//! generic message so internals (hashes, SQL, stack detail) never reach a
//! client.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;
use transit_storage::StoreError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Access denied. No token provided.")]
    MissingToken,

    #[error("Invalid token")]
    MalformedToken,

    #[error("Token expired")]
    ExpiredToken,

    #[error("Invalid token - role mismatch")]
    RoleMismatch,

    #[error("User not found")]
    AccountGone,

    #[error("Admin access required")]
    Forbidden,

    #[error("Invalid OTP")]
    InvalidCode,

    #[error("Maximum verification attempts reached. Please request a new OTP.")]
    AttemptsExceeded,

    #[error("{0}")]
    Delivery(String),

    #[error("storage error: {0}")]
    Storage(String),

    #[error("Internal server error")]
    Internal,
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::InvalidCode | ApiError::AttemptsExceeded => {
                StatusCode::BAD_REQUEST
            }
            ApiError::InvalidCredentials
            | ApiError::MissingToken
            | ApiError::MalformedToken
            | ApiError::ExpiredToken
            | ApiError::RoleMismatch
            | ApiError::AccountGone => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Delivery(_) | ApiError::Storage(_) | ApiError::Internal => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Message shown to the client. Backend detail stays in the logs.
    fn public_message(&self) -> String {
        match self {
            ApiError::Storage(_) | ApiError::Internal => "Internal server error".to_string(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if matches!(self, ApiError::Storage(_) | ApiError::Internal) {
            tracing::error!(error = %self, "request failed");
        }
        let body = Json(serde_json::json!({
            "success": false,
            "error": self.public_message(),
        }));
        (self.status(), body).into_response()
    }
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound => ApiError::NotFound("Resource not found".to_string()),
            StoreError::AlreadyExists | StoreError::Conflict => {
                ApiError::Conflict("Already exists".to_string())
            }
            StoreError::Backend(msg) => ApiError::Storage(msg),
        }
    }
}

impl From<transit_crypto::CryptoError> for ApiError {
    fn from(e: transit_crypto::CryptoError) -> Self {
        tracing::error!(error = %e, "crypto failure");
        ApiError::Internal
    }
}
