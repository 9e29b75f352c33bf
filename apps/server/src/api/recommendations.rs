//! Mounts `/v1/recommendations*`: `GET /` is `viewer`-gated, the mutating routes
//! (`/generate`, `/{id}/apply`, `/{id}/dismiss`) are `editor`-gated (§6).

use axum::extract::{Request, State};
use axum::http::Method;
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::Router;
use axum_helpers::AppError;
use domain_recommender::handlers;
use domain_tenancy::Role;

use crate::auth::require_min_role;
use crate::state::AppState;

pub fn router(state: &AppState) -> Router {
    handlers::router((*state.recommender).clone())
        .layer(middleware::from_fn_with_state(state.clone(), role_gate))
}

async fn role_gate(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let min = if request.method() == Method::GET {
        Role::Viewer
    } else {
        Role::Editor
    };
    require_min_role(&state, request.headers(), min).await?;
    Ok(next.run(request).await)
}
