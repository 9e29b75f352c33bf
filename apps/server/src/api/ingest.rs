//! Mounts `POST /v1/ingest`, with the C3 plan-limit check run ahead of the ingest service
//! itself (§4.4 step 3 — the ingest service's own doc comment notes this runs in the caller).

use axum::extract::{Extension, Request, State};
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::Router;
use axum_helpers::AppError;
use domain_tenancy::{IngestUsage, PlanGate, TenantContext};
use domain_timeseries::handlers::BoundCluster;
use domain_timeseries::{handlers, TimeseriesRepository};
use uuid::Uuid;

use crate::state::AppState;

pub fn router(state: &AppState) -> Router {
    handlers::router((*state.timeseries).clone())
        .layer(middleware::from_fn_with_state(state.clone(), plan_gate))
}

/// Checks C3 before the incoming cluster's samples are written, so the incoming cluster itself
/// — not just clusters from samples already on disk — counts against `cluster_limit` (§4.3,
/// §8 scenario 5).
async fn plan_gate(
    State(state): State<AppState>,
    Extension(ctx): Extension<TenantContext>,
    Extension(tenant_id): Extension<Uuid>,
    Extension(bound_cluster): Extension<BoundCluster>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let plan = state
        .tenancy
        .plan_for_tenant(tenant_id)
        .await
        .map_err(|err| AppError::InternalServerError(err.to_string()))?;

    let now = chrono::Utc::now();
    let window = domain_timeseries::TimeWindow {
        start: now - chrono::Duration::hours(24),
        end: now,
    };
    let active_clusters = state
        .timeseries_store
        .distinct_active_clusters(&ctx, window)
        .await
        .map_err(|err| AppError::InternalServerError(err.to_string()))?;
    let nodes = state
        .timeseries_store
        .distinct_nodes(&ctx, window)
        .await
        .map_err(|err| AppError::InternalServerError(err.to_string()))?;

    let incoming_cluster_is_new = !active_clusters.iter().any(|c| c == &bound_cluster.0);

    let usage = IngestUsage {
        active_cluster_count: active_clusters.len() as i64,
        node_count_last_24h: nodes.len() as i64,
        incoming_cluster_is_new,
    };

    PlanGate::check_ingest(&plan, usage).map_err(|err| AppError::Forbidden(err.to_string()))?;

    Ok(next.run(request).await)
}
