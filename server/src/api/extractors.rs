//! Path and validation extractors for API routes

use std::ops::Deref;

use axum::Json;
use axum::extract::rejection::{PathRejection, QueryRejection};
use axum::extract::{FromRequestParts, Path, Query};
use axum::http::StatusCode;
use axum::http::request::Parts;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use validator::Validate;

/// Maximum length for namespace identifiers
pub const MAX_NAMESPACE_ID_LENGTH: usize = 128;

/// Validate a namespace id: 1-128 chars, no whitespace or path separators
pub fn is_valid_namespace_id(id: &str) -> bool {
    !id.is_empty()
        && id.len() <= MAX_NAMESPACE_ID_LENGTH
        && id
            .chars()
            .all(|c| !c.is_whitespace() && c != '/' && c != '\\')
}

/// Raw path extractor for namespace-scoped routes (internal use)
#[derive(Debug, Deserialize)]
struct NamespacePathRaw {
    namespace_id: String,
}

/// Validated namespace path extractor.
///
/// Extracts and validates `namespace_id` from URL path parameters.
/// Returns a 400 Bad Request if validation fails.
#[derive(Debug)]
pub struct NamespacePath {
    pub namespace_id: String,
}

impl<S> FromRequestParts<S> for NamespacePath
where
    S: Send + Sync,
{
    type Rejection = ValidationRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<NamespacePathRaw>::from_request_parts(parts, state)
            .await
            .map_err(ValidationRejection::Path)?;

        if !is_valid_namespace_id(&raw.namespace_id) {
            return Err(ValidationRejection::InvalidNamespaceId);
        }

        Ok(Self {
            namespace_id: raw.namespace_id,
        })
    }
}

/// Validation rejection with structured error response
pub enum ValidationRejection {
    /// Failed to parse path parameters
    Path(PathRejection),
    /// Invalid namespace_id format
    InvalidNamespaceId,
    /// Failed to parse query string
    Query(QueryRejection),
    /// Validation constraints not satisfied
    Validation(validator::ValidationErrors),
}

impl IntoResponse for ValidationRejection {
    fn into_response(self) -> Response {
        let (code, message) = match self {
            Self::Path(rejection) => ("PATH_PARSE_ERROR", rejection.body_text()),
            Self::InvalidNamespaceId => (
                "INVALID_NAMESPACE_ID",
                format!(
                    "Invalid namespace_id: must be 1-{} chars without whitespace or slashes",
                    MAX_NAMESPACE_ID_LENGTH
                ),
            ),
            Self::Query(rejection) => ("QUERY_PARSE_ERROR", rejection.body_text()),
            Self::Validation(errors) => ("VALIDATION_ERROR", format_validation_errors(&errors)),
        };
        (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({
                "error": "bad_request",
                "code": code,
                "message": message
            })),
        )
            .into_response()
    }
}

fn format_validation_errors(errors: &validator::ValidationErrors) -> String {
    errors
        .field_errors()
        .iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| {
                e.message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("{}: validation failed", field))
            })
        })
        .collect::<Vec<_>>()
        .join("; ")
}

/// Query extractor with automatic validation.
///
/// Deserializes query parameters and validates them using the `validator`
/// crate. Returns a `ValidationRejection` on parse or validation failure.
#[derive(Debug)]
pub struct ValidatedQuery<T>(pub T);

impl<T> Deref for ValidatedQuery<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<S, T> FromRequestParts<S> for ValidatedQuery<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = ValidationRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(ValidationRejection::Query)?;
        value.validate().map_err(ValidationRejection::Validation)?;
        Ok(Self(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn namespace_id_validation() {
        assert!(is_valid_namespace_id("products"));
        assert!(is_valid_namespace_id("tenant-42_docs.v2"));
        assert!(!is_valid_namespace_id(""));
        assert!(!is_valid_namespace_id("has space"));
        assert!(!is_valid_namespace_id("a/b"));
        assert!(!is_valid_namespace_id(&"x".repeat(MAX_NAMESPACE_ID_LENGTH + 1)));
    }
}
