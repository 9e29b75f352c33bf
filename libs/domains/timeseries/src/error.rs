use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

pub type TimeseriesResult<T> = Result<T, TimeseriesError>;

#[derive(Debug, Error)]
pub enum TimeseriesError {
    #[error("payload exceeds max_payload_bytes")]
    PayloadTooLarge,
    #[error("bundle cluster_name does not match the API key's bound cluster")]
    ClusterMismatch,
    #[error("fewer than 80% of samples were written")]
    IngestDegraded { accepted: usize, total: usize },
    #[error(transparent)]
    Tenant(#[from] domain_tenancy::TenantError),
    #[error(transparent)]
    Database(#[from] sea_orm::DbErr),
}

impl IntoResponse for TimeseriesError {
    fn into_response(self) -> Response {
        // Partial ingest degradation is not a failure class like the others — it's a 202-style
        // partial-success response carrying the accepted/total counts a client needs to decide
        // whether to retry the whole bundle (§4.4 step 5, §7).
        if let TimeseriesError::IngestDegraded { accepted, total } = &self {
            return (
                StatusCode::ACCEPTED,
                Json(json!({
                    "error": "ingest_degraded",
                    "message": self.to_string(),
                    "status": "degraded",
                    "accepted": accepted,
                    "total": total,
                })),
            )
                .into_response();
        }

        let (status, code) = match &self {
            TimeseriesError::PayloadTooLarge => (StatusCode::PAYLOAD_TOO_LARGE, "payload_too_large"),
            TimeseriesError::ClusterMismatch => (StatusCode::FORBIDDEN, "cluster_mismatch"),
            TimeseriesError::IngestDegraded { .. } => unreachable!("handled above"),
            TimeseriesError::Tenant(domain_tenancy::TenantError::TenantNotBound) => {
                tracing::error!("tenant context not bound for ingest/scan call");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error")
            }
            TimeseriesError::Tenant(err) => {
                tracing::warn!(error = %err, "tenancy error during timeseries call");
                (StatusCode::BAD_REQUEST, "tenant_error")
            }
            TimeseriesError::Database(err) => {
                tracing::error!(error = %err, "timeseries database error");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error")
            }
        };
        (status, Json(json!({ "error": code, "message": self.to_string() }))).into_response()
    }
}
