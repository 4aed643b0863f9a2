//! # API Error Type
//!
//! Unified error type for HTTP handlers.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in BillEase                               │
//! │                                                                         │
//! │  Handler: Result<Json<T>, ApiError>                                    │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  Body/path rejected?  ── JsonRejection / PathRejection ──┐             │
//! │  Validation error?    ── ValidationError ────────────────┤             │
//! │  Business rule?       ── CoreError ──────────────────────┤             │
//! │  Storage error?       ── DbError ────────────────────────┤             │
//! │                                                          ▼             │
//! │                                                      ApiError          │
//! │                                                          │             │
//! │                                                          ▼             │
//! │                              (status, {"error": "Insufficient stock"}) │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! | Source                                  | Status |
//! |-----------------------------------------|--------|
//! | validation, duplicate, business rule    | 400    |
//! | malformed JSON body, bad path parameter | 400    |
//! | entity not found                        | 404    |
//! | table missing                           | 503    |
//! | lock poisoned, serialization            | 500    |

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{FromRequest, FromRequestParts, Path, Request};
use axum::http::request::Parts;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use billease_core::{CoreError, ValidationError};
use billease_db::DbError;
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::error;

/// API error returned from handlers.
///
/// ## Serialization
/// This is what the frontend receives when a request fails:
/// ```json
/// { "error": "Item not found" }
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

/// Result type for handlers.
pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    /// Creates a new API error.
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        ApiError {
            status,
            message: message.into(),
        }
    }

    /// Creates a 400 error.
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::new(StatusCode::BAD_REQUEST, message)
    }

    /// Creates a 404 error.
    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::new(StatusCode::NOT_FOUND, message)
    }

    /// Creates a 500 error with a generic message.
    pub fn internal() -> Self {
        ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

/// Converts database errors to API errors.
impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { .. } => ApiError::not_found(err.to_string()),
            DbError::UniqueViolation { .. } => ApiError::bad_request(err.to_string()),
            DbError::Rejected(core) => core.into(),
            DbError::NoSuchTable(table) => {
                error!(%table, "Table missing; was the schema bootstrapped?");
                ApiError::new(StatusCode::SERVICE_UNAVAILABLE, "Database not initialized")
            }
            DbError::LockPoisoned => {
                error!("Store lock poisoned");
                ApiError::internal()
            }
            DbError::IdsExhausted(table) => {
                error!(%table, "Row ids exhausted");
                ApiError::internal()
            }
            DbError::Serialization(e) => {
                // Log the actual error but return a generic message
                error!("Row serialization failed: {}", e);
                ApiError::internal()
            }
        }
    }
}

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        ApiError::bad_request(err.to_string())
    }
}

/// Converts validation errors to API errors.
impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::bad_request(err.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            // Oversized bodies keep their 413.
            JsonRejection::BytesRejection(r) => ApiError::new(r.status(), r.body_text()),
            other => ApiError::bad_request(format!("Invalid JSON body: {}", other.body_text())),
        }
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::bad_request(format!("Invalid path parameter: {}", rejection.body_text()))
    }
}

// =============================================================================
// Extractors
// =============================================================================

/// `Json` whose rejections answer `{"error": ...}`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApiJson<T>(pub T);

impl<T, S> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        Ok(ApiJson(value))
    }
}

/// `Path` whose rejections answer `{"error": ...}`.
#[derive(Debug, Clone, Copy)]
pub struct ApiPath<T>(pub T);

impl<T, S> FromRequestParts<S> for ApiPath<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(value) = Path::<T>::from_request_parts(parts, state).await?;
        Ok(ApiPath(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_db_error_status_mapping() {
        let cases = [
            (DbError::not_found("Item", 3), StatusCode::NOT_FOUND, "Item not found"),
            (
                DbError::duplicate("Category", "Food"),
                StatusCode::BAD_REQUEST,
                "Category 'Food' already exists",
            ),
            (
                DbError::NoSuchTable("pos_sales".into()),
                StatusCode::SERVICE_UNAVAILABLE,
                "Database not initialized",
            ),
            (
                DbError::LockPoisoned,
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error",
            ),
        ];
        for (err, status, message) in cases {
            let api: ApiError = err.into();
            assert_eq!(api.status, status);
            assert_eq!(api.message, message);
        }
    }

    #[test]
    fn test_rejected_write_is_bad_request() {
        let err = DbError::Rejected(CoreError::InsufficientStock {
            item_id: 1,
            available: 10,
            requested: 12,
        });
        let api: ApiError = err.into();
        assert_eq!(api, ApiError::bad_request("Insufficient stock"));
    }

    #[tokio::test]
    async fn test_error_body_shape() {
        let response = ApiError::not_found("Lead not found").into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body, json!({ "error": "Lead not found" }));
    }
}
