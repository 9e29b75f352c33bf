use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

pub type AllocationResult<T> = Result<T, AllocationError>;

#[derive(Debug, Error)]
pub enum AllocationError {
    /// `window` didn't parse as a duration literal, named window, or ISO pair (§4.6.1).
    #[error("invalid window: {0}")]
    BadWindow(String),

    /// An `aggregate` token wasn't one of `{namespace, cluster, node, pod, controller, label:<key>}`.
    #[error("invalid aggregate token: {0}")]
    BadAggregate(String),

    /// A `filter` clause didn't parse as `<key>:<value>[,<value>...]`.
    #[error("invalid filter: {0}")]
    BadFilter(String),

    #[error(transparent)]
    Timeseries(#[from] domain_timeseries::TimeseriesError),

    #[error(transparent)]
    Pricing(#[from] domain_pricing::PricingError),
}

impl IntoResponse for AllocationError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            AllocationError::BadWindow(_) => (StatusCode::BAD_REQUEST, "bad_window"),
            AllocationError::BadAggregate(_) => (StatusCode::BAD_REQUEST, "bad_aggregate"),
            AllocationError::BadFilter(_) => (StatusCode::BAD_REQUEST, "bad_filter"),
            AllocationError::Timeseries(err) => {
                tracing::error!(error = %err, "allocation timeseries error");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error")
            }
            AllocationError::Pricing(err) => {
                tracing::error!(error = %err, "allocation pricing error");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error")
            }
        };
        (status, Json(json!({ "error": code, "message": self.to_string() }))).into_response()
    }
}
