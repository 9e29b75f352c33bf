use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

pub type ApiKeyResult<T> = Result<T, ApiKeyError>;

/// Errors surfaced by Create/Validate/Revoke (§4.2, §7).
#[derive(Debug, Error)]
pub enum ApiKeyError {
    #[error("credential is not in `key_id:secret` form")]
    BadFormat,

    #[error("api key not found")]
    NotFound,

    #[error("api key has been revoked")]
    Revoked,

    #[error("api key has expired")]
    Expired,

    #[error("secret does not match key_id")]
    HashMismatch,

    #[error("database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("cache error: {0}")]
    Cache(String),
}

impl IntoResponse for ApiKeyError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            ApiKeyError::BadFormat => (StatusCode::BAD_REQUEST, "BAD_FORMAT", self.to_string()),
            ApiKeyError::NotFound => (StatusCode::UNAUTHORIZED, "NOT_FOUND", self.to_string()),
            ApiKeyError::Revoked => (StatusCode::UNAUTHORIZED, "REVOKED", self.to_string()),
            ApiKeyError::Expired => (StatusCode::UNAUTHORIZED, "EXPIRED", self.to_string()),
            ApiKeyError::HashMismatch => {
                (StatusCode::UNAUTHORIZED, "HASH_MISMATCH", self.to_string())
            }
            ApiKeyError::Database(e) => {
                tracing::error!(error = %e, "api key database error");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "UPSTREAM_UNAVAILABLE",
                    "database unavailable".to_string(),
                )
            }
            ApiKeyError::Cache(e) => {
                tracing::warn!(error = %e, "api key cache error, falling through to store");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "UPSTREAM_UNAVAILABLE",
                    "cache unavailable".to_string(),
                )
            }
        };

        let body = Json(json!({ "error": code, "message": message, "code": status.as_u16() }));
        (status, body).into_response()
    }
}
