//! Mounts the `admin`-gated `/v1/admin/api_keys` routes (§6).

use axum::Router;
use domain_apikeys::handlers;

use crate::state::AppState;

pub fn router(state: &AppState) -> Router {
    handlers::router((*state.apikeys).clone())
}
