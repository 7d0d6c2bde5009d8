//! Shared API types
//!
//! Common types used across all API endpoints including error handling.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::store::StoreError;

/// Standard API error response
#[derive(Debug)]
pub enum ApiError {
    BadRequest { code: String, message: String },
    NotFound { code: String, message: String },
    BadGateway { code: String, message: String },
    ServiceUnavailable { message: String },
    Internal { message: String },
}

impl ApiError {
    pub fn bad_request(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::BadRequest {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn not_found(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::NotFound {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn bad_gateway(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::BadGateway {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Reduce a store failure to a user-visible error
    ///
    /// Upstream 404 means the namespace does not exist; other upstream
    /// rejections surface their message verbatim; transport failures map to
    /// 503.
    pub fn from_store(e: StoreError) -> Self {
        match e {
            StoreError::Api {
                status: 404,
                message,
            } => Self::not_found("NAMESPACE_NOT_FOUND", message),
            StoreError::Api { status, message } => Self::bad_gateway(
                "STORE_REJECTED",
                format!("store returned {}: {}", status, message),
            ),
            StoreError::Http(inner) => Self::ServiceUnavailable {
                message: format!("store request failed: {}", inner),
            },
            StoreError::Config(message) => {
                tracing::error!(error = %message, "Store client misconfiguration");
                Self::internal("Store client misconfiguration")
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type, code, message) = match self {
            Self::BadRequest { code, message } => {
                (StatusCode::BAD_REQUEST, "bad_request", code, message)
            }
            Self::NotFound { code, message } => (StatusCode::NOT_FOUND, "not_found", code, message),
            Self::BadGateway { code, message } => {
                (StatusCode::BAD_GATEWAY, "bad_gateway", code, message)
            }
            Self::ServiceUnavailable { message } => (
                StatusCode::SERVICE_UNAVAILABLE,
                "service_unavailable",
                "SERVICE_UNAVAILABLE".to_string(),
                message,
            ),
            Self::Internal { message } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                "INTERNAL".to_string(),
                message,
            ),
        };
        (
            status,
            Json(serde_json::json!({
                "error": error_type,
                "code": code,
                "message": message
            })),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upstream_404_maps_to_not_found() {
        let err = ApiError::from_store(StoreError::Api {
            status: 404,
            message: "namespace not found".to_string(),
        });
        assert!(matches!(err, ApiError::NotFound { .. }));
    }

    #[test]
    fn upstream_rejection_maps_to_bad_gateway_with_message() {
        let err = ApiError::from_store(StoreError::Api {
            status: 422,
            message: "invalid filter".to_string(),
        });
        match err {
            ApiError::BadGateway { code, message } => {
                assert_eq!(code, "STORE_REJECTED");
                assert!(message.contains("invalid filter"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
