//! HTTP surface for `POST /v1/ingest` (§6).

use std::sync::Arc;

use axum::extract::{Extension, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};
use axum_helpers::errors::responses::InternalServerErrorResponse;
use domain_tenancy::TenantContext;
use utoipa::OpenApi;
use uuid::Uuid;

use crate::error::TimeseriesResult;
use crate::models::{CollectionBundle, IngestAccepted};
use crate::repository::TimeseriesRepository;
use crate::service::IngestService;

#[derive(OpenApi)]
#[openapi(
    paths(ingest),
    components(schemas(IngestAccepted)),
    tags((name = "ingest", description = "Collection-bundle ingest"))
)]
pub struct ApiDoc;

pub fn router<R: TimeseriesRepository + 'static>(service: IngestService<R>) -> Router {
    Router::new()
        .route("/", post(ingest))
        .with_state(Arc::new(service))
}

/// Bound upstream by C2 (API-key validation) and C9 (tenant-context middleware); C3's plan
/// check runs before this handler is reached.
#[derive(Clone)]
pub struct BoundCluster(pub String);

#[utoipa::path(
    post,
    path = "",
    tag = "ingest",
    request_body = (),
    responses(
        (status = 202, description = "Accepted"),
        (status = 413, description = "PayloadTooLarge"),
        (status = 403, description = "ClusterMismatch"),
        (status = 503, description = "IngestDegraded"),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn ingest<R: TimeseriesRepository>(
    State(service): State<Arc<IngestService<R>>>,
    Extension(ctx): Extension<TenantContext>,
    Extension(tenant_id): Extension<Uuid>,
    Extension(bound_cluster): Extension<BoundCluster>,
    body: axum::body::Bytes,
) -> TimeseriesResult<impl IntoResponse> {
    let raw_len = body.len();
    let bundle: CollectionBundle = match serde_json::from_slice(&body) {
        Ok(bundle) => bundle,
        Err(err) => {
            tracing::warn!(error = %err, "malformed ingest bundle");
            return Ok((StatusCode::BAD_REQUEST, Json(serde_json::json!({"error": "bad_request"}))).into_response());
        }
    };

    let accepted = service
        .ingest(&ctx, tenant_id, &bound_cluster.0, raw_len, bundle)
        .await?;
    Ok((StatusCode::ACCEPTED, Json(accepted)).into_response())
}
