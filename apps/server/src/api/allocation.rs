//! Mounts the `viewer`-gated `/v1/allocation*` routes (§6).

use axum::Router;
use domain_allocation::handlers;

use crate::state::AppState;

pub fn router(state: &AppState) -> Router {
    handlers::router((*state.allocation).clone())
}
