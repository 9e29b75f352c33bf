use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TenantError {
    #[error("tenant not found: {0}")]
    TenantNotFound(String),
    #[error("plan not found: {0}")]
    PlanNotFound(String),
    #[error("user not found: {0}")]
    UserNotFound(String),
    #[error("tenant already has an active owner")]
    DuplicateOwner,
    #[error("plan limit exceeded: {reason}")]
    PlanLimitExceeded { reason: String },
    /// Raised when a handler reaches the persistence layer without a tenant bound by C9; this
    /// is always a programming error, never a client-facing one (§7).
    #[error("tenant context not bound for this request")]
    TenantNotBound,
    #[error("validation failed: {0}")]
    Validation(String),
    #[error(transparent)]
    Database(#[from] sea_orm::DbErr),
}

pub type TenantResult<T> = Result<T, TenantError>;

impl IntoResponse for TenantError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            TenantError::TenantNotFound(_) => (StatusCode::NOT_FOUND, "tenant_not_found"),
            TenantError::PlanNotFound(_) => (StatusCode::NOT_FOUND, "plan_not_found"),
            TenantError::UserNotFound(_) => (StatusCode::NOT_FOUND, "user_not_found"),
            TenantError::DuplicateOwner => (StatusCode::CONFLICT, "duplicate_owner"),
            TenantError::PlanLimitExceeded { .. } => {
                (StatusCode::TOO_MANY_REQUESTS, "plan_limit_exceeded")
            }
            TenantError::Validation(_) => (StatusCode::BAD_REQUEST, "validation_failed"),
            TenantError::TenantNotBound => {
                tracing::error!("tenant context not bound for request");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error")
            }
            TenantError::Database(err) => {
                tracing::error!(error = %err, "tenancy database error");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error")
            }
        };
        (status, Json(json!({ "error": code, "message": self.to_string() }))).into_response()
    }
}
