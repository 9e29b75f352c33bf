//! HTTP surface for `/v1/recommendations` (§6).

use std::sync::Arc;

use axum::extract::{Extension, Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use axum_helpers::errors::responses::InternalServerErrorResponse;
use domain_pricing::PricingRepository;
use domain_tenancy::TenantContext;
use domain_timeseries::TimeseriesRepository;
use utoipa::OpenApi;
use uuid::Uuid;

use crate::error::RecommenderResult;
use crate::models::{GenerateRequest, Recommendation};
use crate::repository::RecommenderRepository;
use crate::service::RecommenderService;

#[derive(OpenApi)]
#[openapi(
    paths(list_recommendations, generate, apply, dismiss),
    components(schemas(Recommendation, GenerateRequest)),
    tags((name = "recommendations", description = "Right-sizing recommendations"))
)]
pub struct ApiDoc;

pub fn router<R, T, P>(service: RecommenderService<R, T, P>) -> Router
where
    R: RecommenderRepository + 'static,
    T: TimeseriesRepository + 'static,
    P: PricingRepository + 'static,
{
    Router::new()
        .route("/", get(list_recommendations))
        .route("/generate", post(generate))
        .route("/{id}/apply", post(apply))
        .route("/{id}/dismiss", post(dismiss))
        .with_state(Arc::new(service))
}

#[utoipa::path(
    get,
    path = "",
    tag = "recommendations",
    responses((status = 200, body = [Recommendation]), (status = 500, response = InternalServerErrorResponse))
)]
async fn list_recommendations<R, T, P>(
    State(service): State<Arc<RecommenderService<R, T, P>>>,
    Extension(tenant_id): Extension<Uuid>,
) -> RecommenderResult<impl IntoResponse>
where
    R: RecommenderRepository,
    T: TimeseriesRepository,
    P: PricingRepository,
{
    Ok(Json(service.list_open(tenant_id).await?))
}

#[utoipa::path(
    post,
    path = "/generate",
    tag = "recommendations",
    params(("lookback_hours" = Option<i64>, Query)),
    responses((status = 200, body = [Recommendation]), (status = 500, response = InternalServerErrorResponse))
)]
async fn generate<R, T, P>(
    State(service): State<Arc<RecommenderService<R, T, P>>>,
    Extension(ctx): Extension<TenantContext>,
    Extension(tenant_id): Extension<Uuid>,
    Query(input): Query<GenerateRequest>,
) -> RecommenderResult<impl IntoResponse>
where
    R: RecommenderRepository,
    T: TimeseriesRepository,
    P: PricingRepository,
{
    let created = service.generate(&ctx, tenant_id, input.lookback_hours).await?;
    Ok(Json(created))
}

#[utoipa::path(
    post,
    path = "/{id}/apply",
    tag = "recommendations",
    params(("id" = Uuid, Path)),
    responses((status = 204), (status = 500, response = InternalServerErrorResponse))
)]
async fn apply<R, T, P>(
    State(service): State<Arc<RecommenderService<R, T, P>>>,
    Extension(tenant_id): Extension<Uuid>,
    Path(id): Path<Uuid>,
) -> RecommenderResult<impl IntoResponse>
where
    R: RecommenderRepository,
    T: TimeseriesRepository,
    P: PricingRepository,
{
    service.apply(tenant_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/{id}/dismiss",
    tag = "recommendations",
    params(("id" = Uuid, Path)),
    responses((status = 204), (status = 500, response = InternalServerErrorResponse))
)]
async fn dismiss<R, T, P>(
    State(service): State<Arc<RecommenderService<R, T, P>>>,
    Extension(tenant_id): Extension<Uuid>,
    Path(id): Path<Uuid>,
) -> RecommenderResult<impl IntoResponse>
where
    R: RecommenderRepository,
    T: TimeseriesRepository,
    P: PricingRepository,
{
    service.dismiss(tenant_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
