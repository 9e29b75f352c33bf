//! HTTP handlers for `/v1/admin/api_keys` (§6).

use std::sync::Arc;

use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::post,
    Json, Router,
};
use axum_helpers::errors::responses::{BadRequestValidationResponse, InternalServerErrorResponse};
use axum_helpers::ValidatedJson;
use utoipa::OpenApi;
use uuid::Uuid;

use crate::error::ApiKeyResult;
use crate::models::{ApiKeyRecord, CreateApiKeyRequest, CreatedApiKey};
use crate::repository::ApiKeyRepository;
use crate::service::ApiKeyService;

#[derive(OpenApi)]
#[openapi(
    paths(create_api_key, revoke_api_key),
    components(schemas(CreateApiKeyRequest, CreatedApiKey, ApiKeyRecord)),
    tags((name = "api_keys", description = "API key administration"))
)]
pub struct ApiDoc;

pub fn router<R: ApiKeyRepository + 'static>(service: ApiKeyService<R>) -> Router {
    Router::new()
        .route("/", post(create_api_key))
        .route("/{key_id}", axum::routing::delete(revoke_api_key))
        .with_state(Arc::new(service))
}

/// Bound by C9's tenant-context middleware from the caller's authenticated identity.
type TenantId = Extension<Uuid>;

#[utoipa::path(
    post,
    path = "",
    tag = "api_keys",
    request_body = CreateApiKeyRequest,
    responses(
        (status = 201, description = "Key created; secret shown exactly once", body = CreatedApiKey),
        (status = 400, response = BadRequestValidationResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_api_key<R: ApiKeyRepository>(
    State(service): State<Arc<ApiKeyService<R>>>,
    Extension(tenant_id): TenantId,
    ValidatedJson(input): ValidatedJson<CreateApiKeyRequest>,
) -> ApiKeyResult<impl IntoResponse> {
    let created = service.create(tenant_id, input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    delete,
    path = "/{key_id}",
    tag = "api_keys",
    params(("key_id" = String, Path, description = "Key identifier")),
    responses(
        (status = 204, description = "Key revoked (idempotent)"),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn revoke_api_key<R: ApiKeyRepository>(
    State(service): State<Arc<ApiKeyService<R>>>,
    Path(key_id): Path<String>,
) -> ApiKeyResult<impl IntoResponse> {
    service.revoke(&key_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
