// HTTP API Error Types
use axum::{http::StatusCode, response::IntoResponse, Json};
use serde::{Serialize, Serializer};
use serde_json::{json, Value};

use crate::services::ServiceError;

/// Numeric result code carried in every response body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ErrCode {
    None = 0,
    InvalidArgument = 1,
    Internal = 2,
    Unauthenticated = 3,
    NoAccess = 4,
    NotFound = 5,
}

impl ErrCode {
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    pub fn from_u8(code: u8) -> Option<Self> {
        match code {
            0 => Some(ErrCode::None),
            1 => Some(ErrCode::InvalidArgument),
            2 => Some(ErrCode::Internal),
            3 => Some(ErrCode::Unauthenticated),
            4 => Some(ErrCode::NoAccess),
            5 => Some(ErrCode::NotFound),
            _ => None,
        }
    }
}

impl Serialize for ErrCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.as_u8())
    }
}

/// HTTP API error with appropriate status codes and client-friendly messages
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    // 400 Bad Request
    #[error("{0}")]
    InvalidArgument(String),

    // 401 Unauthorized
    #[error("{0}")]
    Unauthenticated(String),

    // 403 Forbidden
    #[error("{0}")]
    NoAccess(String),

    // 404 Not Found
    #[error("{0}")]
    NotFound(String),

    // 500 Internal Server Error
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn code(&self) -> ErrCode {
        match self {
            ApiError::InvalidArgument(_) => ErrCode::InvalidArgument,
            ApiError::Unauthenticated(_) => ErrCode::Unauthenticated,
            ApiError::NoAccess(_) => ErrCode::NoAccess,
            ApiError::NotFound(_) => ErrCode::NotFound,
            ApiError::Internal(_) => ErrCode::Internal,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            ApiError::NoAccess(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            ApiError::InvalidArgument(msg)
            | ApiError::Unauthenticated(msg)
            | ApiError::NoAccess(msg)
            | ApiError::NotFound(msg)
            | ApiError::Internal(msg) => msg,
        }
    }

    pub fn to_json(&self) -> Value {
        json!({
            "code": self.code(),
            "message": self.message(),
            "data": null
        })
    }
}

impl ApiError {
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        ApiError::InvalidArgument(message.into())
    }

    pub fn unauthenticated(message: impl Into<String>) -> Self {
        ApiError::Unauthenticated(message.into())
    }

    pub fn no_access() -> Self {
        ApiError::NoAccess("No access".to_string())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::Internal(message.into())
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        // Services already logged the failure with its inputs
        ApiError::internal(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        match &self {
            ApiError::InvalidArgument(msg) => tracing::debug!(code = ?self.code(), "Rejected request: {}", msg),
            ApiError::Unauthenticated(msg) | ApiError::NoAccess(msg) | ApiError::NotFound(msg) => {
                tracing::warn!(code = ?self.code(), "Rejected request: {}", msg)
            }
            ApiError::Internal(msg) => tracing::error!(code = ?self.code(), "Request failed: {}", msg),
        }

        (self.status_code(), Json(self.to_json())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_serialize_as_numbers() {
        assert_eq!(serde_json::to_value(ErrCode::None).unwrap(), json!(0));
        assert_eq!(serde_json::to_value(ErrCode::NoAccess).unwrap(), json!(4));
        assert_eq!(ErrCode::from_u8(3), Some(ErrCode::Unauthenticated));
        assert_eq!(ErrCode::from_u8(9), None);
    }

    #[test]
    fn error_body_has_envelope_shape() {
        let body = ApiError::unauthenticated("invalid token").to_json();
        assert_eq!(body["code"], 3);
        assert_eq!(body["message"], "invalid token");
        assert!(body["data"].is_null());
    }

    #[test]
    fn status_mirrors_code() {
        assert_eq!(ApiError::no_access().status_code(), StatusCode::FORBIDDEN);
        assert_eq!(ApiError::not_found("x").status_code(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::internal("x").code(), ErrCode::Internal);
    }

    #[tokio::test]
    async fn dead_worker_is_internal_not_unauthenticated() {
        let source = tokio::task::spawn_blocking(|| -> bool { panic!("hasher died") })
            .await
            .unwrap_err();

        let err = ApiError::from(ServiceError::Worker { operation: "login", source });
        assert_eq!(err.code(), ErrCode::Internal);
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
