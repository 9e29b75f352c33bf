pub mod admin;
pub mod allocation;
pub mod health;
pub mod ingest;
pub mod recommendations;

use axum::middleware;
use axum::Router;

use crate::auth::{require_admin, require_api_key, require_viewer};
use crate::state::AppState;

/// All `/v1/*` routes. Every one of them sits behind [`require_api_key`] (C9 tenant binding);
/// the admin and recommendation-generation routes additionally require a minimum role (§6).
pub fn routes(state: &AppState) -> Router {
    Router::new()
        .nest(
            "/admin/api_keys",
            admin::router(state).layer(middleware::from_fn_with_state(state.clone(), require_admin)),
        )
        .nest("/ingest", ingest::router(state))
        .nest(
            "/allocation",
            allocation::router(state).layer(middleware::from_fn_with_state(state.clone(), require_viewer)),
        )
        .nest("/recommendations", recommendations::router(state))
        .layer(middleware::from_fn_with_state(state.clone(), require_api_key))
}

/// `/ready`, mounted outside `/v1` and outside the API-key gate — it's a liveness-adjacent
/// probe, not a tenant-scoped resource.
pub fn ready_router(state: AppState) -> Router {
    Router::new()
        .route("/ready", axum::routing::get(health::ready_handler))
        .with_state(state)
}
