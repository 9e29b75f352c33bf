//! Admin HTTP surface for tenant/plan/user provisioning (§6).

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use axum_helpers::errors::responses::{BadRequestValidationResponse, InternalServerErrorResponse};
use axum_helpers::ValidatedJson;
use utoipa::OpenApi;
use uuid::Uuid;

use crate::error::TenantResult;
use crate::models::{CreatePlan, CreateTenant, CreateUser, Plan, Tenant, User};
use crate::repository::TenantRepository;
use crate::service::TenancyService;

#[derive(OpenApi)]
#[openapi(
    paths(create_plan, list_plans, create_tenant, get_tenant, create_user),
    components(schemas(CreatePlan, Plan, CreateTenant, Tenant, CreateUser, User)),
    tags((name = "tenancy", description = "Tenant, plan and user provisioning"))
)]
pub struct ApiDoc;

pub fn router<R: TenantRepository + 'static>(service: TenancyService<R>) -> Router {
    Router::new()
        .route("/plans", post(create_plan).get(list_plans))
        .route("/tenants", post(create_tenant))
        .route("/tenants/{tenant_id}", get(get_tenant))
        .route("/tenants/{tenant_id}/users", post(create_user))
        .with_state(Arc::new(service))
}

#[utoipa::path(
    post,
    path = "/plans",
    tag = "tenancy",
    request_body = CreatePlan,
    responses(
        (status = 201, body = Plan),
        (status = 400, response = BadRequestValidationResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_plan<R: TenantRepository>(
    State(service): State<Arc<TenancyService<R>>>,
    ValidatedJson(input): ValidatedJson<CreatePlan>,
) -> TenantResult<impl IntoResponse> {
    let plan = service.create_plan(input).await?;
    Ok((StatusCode::CREATED, Json(plan)))
}

#[utoipa::path(
    get,
    path = "/plans",
    tag = "tenancy",
    responses((status = 200, body = [Plan]), (status = 500, response = InternalServerErrorResponse))
)]
async fn list_plans<R: TenantRepository>(
    State(service): State<Arc<TenancyService<R>>>,
) -> TenantResult<impl IntoResponse> {
    Ok(Json(service.list_plans().await?))
}

#[utoipa::path(
    post,
    path = "/tenants",
    tag = "tenancy",
    request_body = CreateTenant,
    responses(
        (status = 201, body = Tenant),
        (status = 400, response = BadRequestValidationResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_tenant<R: TenantRepository>(
    State(service): State<Arc<TenancyService<R>>>,
    ValidatedJson(input): ValidatedJson<CreateTenant>,
) -> TenantResult<impl IntoResponse> {
    let tenant = service.create_tenant(input).await?;
    Ok((StatusCode::CREATED, Json(tenant)))
}

#[utoipa::path(
    get,
    path = "/tenants/{tenant_id}",
    tag = "tenancy",
    params(("tenant_id" = Uuid, Path)),
    responses((status = 200, body = Tenant), (status = 404), (status = 500, response = InternalServerErrorResponse))
)]
async fn get_tenant<R: TenantRepository>(
    State(service): State<Arc<TenancyService<R>>>,
    Path(tenant_id): Path<Uuid>,
) -> TenantResult<impl IntoResponse> {
    Ok(Json(service.get_tenant(tenant_id).await?))
}

#[utoipa::path(
    post,
    path = "/tenants/{tenant_id}/users",
    tag = "tenancy",
    params(("tenant_id" = Uuid, Path)),
    request_body = CreateUser,
    responses(
        (status = 201, body = User),
        (status = 400, response = BadRequestValidationResponse),
        (status = 429, description = "user_limit exceeded"),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_user<R: TenantRepository>(
    State(service): State<Arc<TenancyService<R>>>,
    Path(tenant_id): Path<Uuid>,
    ValidatedJson(input): ValidatedJson<CreateUser>,
) -> TenantResult<impl IntoResponse> {
    let user = service.create_user(tenant_id, input).await?;
    Ok((StatusCode::CREATED, Json(user)))
}
