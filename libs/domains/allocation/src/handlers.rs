//! HTTP surface for `/v1/allocation*` (§4.6, §6).

use std::sync::Arc;

use axum::extract::{Extension, Query, State};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use axum_helpers::errors::responses::{BadRequestValidationResponse, InternalServerErrorResponse};
use domain_pricing::PricingRepository;
use domain_tenancy::TenantContext;
use domain_timeseries::TimeseriesRepository;
use utoipa::OpenApi;
use uuid::Uuid;

use crate::error::AllocationResult;
use crate::models::{AllocationQuery, AllocationSet, Summary, Topline};
use crate::service::AllocationService;

#[derive(OpenApi)]
#[openapi(
    paths(list_allocations, summary, topline),
    components(schemas(AllocationSet, Summary, Topline), responses(BadRequestValidationResponse, InternalServerErrorResponse)),
    tags((name = "allocation", description = "OpenCost-compatible cost allocation"))
)]
pub struct ApiDoc;

pub fn router<T, P>(service: AllocationService<T, P>) -> Router
where
    T: TimeseriesRepository + 'static,
    P: PricingRepository + 'static,
{
    Router::new()
        .route("/", get(list_allocations))
        .route("/summary", get(summary))
        .route("/summary/topline", get(topline))
        .with_state(Arc::new(service))
}

#[utoipa::path(
    get,
    path = "",
    tag = "allocation",
    params(AllocationQuery),
    responses((status = 200, body = [AllocationSet]), (status = 400, response = BadRequestValidationResponse), (status = 500, response = InternalServerErrorResponse))
)]
async fn list_allocations<T, P>(
    State(service): State<Arc<AllocationService<T, P>>>,
    Extension(ctx): Extension<TenantContext>,
    Extension(tenant_id): Extension<Uuid>,
    Query(params): Query<AllocationQuery>,
) -> AllocationResult<impl IntoResponse>
where
    T: TimeseriesRepository,
    P: PricingRepository,
{
    Ok(Json(service.query(&ctx, tenant_id, &params).await?))
}

#[utoipa::path(
    get,
    path = "/summary",
    tag = "allocation",
    params(AllocationQuery),
    responses((status = 200, body = Summary), (status = 400, response = BadRequestValidationResponse), (status = 500, response = InternalServerErrorResponse))
)]
async fn summary<T, P>(
    State(service): State<Arc<AllocationService<T, P>>>,
    Extension(ctx): Extension<TenantContext>,
    Extension(tenant_id): Extension<Uuid>,
    Query(params): Query<AllocationQuery>,
) -> AllocationResult<impl IntoResponse>
where
    T: TimeseriesRepository,
    P: PricingRepository,
{
    Ok(Json(service.summary(&ctx, tenant_id, &params).await?))
}

#[utoipa::path(
    get,
    path = "/summary/topline",
    tag = "allocation",
    params(AllocationQuery),
    responses((status = 200, body = Topline), (status = 400, response = BadRequestValidationResponse), (status = 500, response = InternalServerErrorResponse))
)]
async fn topline<T, P>(
    State(service): State<Arc<AllocationService<T, P>>>,
    Extension(ctx): Extension<TenantContext>,
    Extension(tenant_id): Extension<Uuid>,
    Query(params): Query<AllocationQuery>,
) -> AllocationResult<impl IntoResponse>
where
    T: TimeseriesRepository,
    P: PricingRepository,
{
    Ok(Json(service.topline(&ctx, tenant_id, &params).await?))
}
