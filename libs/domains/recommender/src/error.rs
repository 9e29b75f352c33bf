use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

pub type RecommenderResult<T> = Result<T, RecommenderError>;

#[derive(Debug, Error)]
pub enum RecommenderError {
    #[error("recommendation not found: {0}")]
    NotFound(String),
    /// `apply`/`dismiss` on a recommendation that is no longer `open` (§3, §7, §8).
    #[error("recommendation {0} is no longer open")]
    Conflict(String),
    #[error(transparent)]
    Database(#[from] sea_orm::DbErr),
    #[error(transparent)]
    Timeseries(#[from] domain_timeseries::TimeseriesError),
    #[error(transparent)]
    Pricing(#[from] domain_pricing::PricingError),
}

impl IntoResponse for RecommenderError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            RecommenderError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
            RecommenderError::Conflict(_) => (StatusCode::CONFLICT, "conflict"),
            RecommenderError::Database(err) => {
                tracing::error!(error = %err, "recommender database error");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error")
            }
            RecommenderError::Timeseries(err) => {
                tracing::error!(error = %err, "recommender timeseries error");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error")
            }
            RecommenderError::Pricing(err) => {
                tracing::error!(error = %err, "recommender pricing error");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error")
            }
        };
        (status, Json(json!({ "error": code, "message": self.to_string() }))).into_response()
    }
}
