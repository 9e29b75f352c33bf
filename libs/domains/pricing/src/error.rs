use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

pub type PricingResult<T> = Result<T, PricingError>;

#[derive(Debug, Error)]
pub enum PricingError {
    #[error("pricing config not found: {0}")]
    NotFound(String),

    #[error("a default pricing config already exists for this tenant")]
    DuplicateDefault,

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("database error: {0}")]
    Database(#[from] sea_orm::DbErr),
}

impl IntoResponse for PricingError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            PricingError::NotFound(_) => (StatusCode::NOT_FOUND, self.to_string()),
            PricingError::DuplicateDefault => (StatusCode::CONFLICT, self.to_string()),
            PricingError::InvalidInput(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            PricingError::Database(e) => {
                tracing::error!(error = %e, "pricing database error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "database error".to_string(),
                )
            }
        };

        let body = Json(json!({ "error": message, "code": status.as_u16() }));
        (status, body).into_response()
    }
}
