//! `/ready` readiness probe (`/health` and `/metrics` are mounted directly in `main`).

use axum::{extract::State, response::Response};
use axum_helpers::server::{run_health_checks, HealthCheckFuture};

use crate::state::AppState;

pub async fn ready_handler(State(state): State<AppState>) -> Response {
    use axum::response::IntoResponse;

    let checks: Vec<(&str, HealthCheckFuture<'_>)> = vec![
        (
            "database",
            Box::pin(async {
                database::postgres::check_health(&state.db)
                    .await
                    .map_err(|e| format!("database ping failed: {e}"))
            }),
        ),
        (
            "redis",
            Box::pin(async {
                let mut redis = state.redis.clone();
                redis::cmd("PING")
                    .query_async::<String>(&mut redis)
                    .await
                    .map(|_| ())
                    .map_err(|e| format!("redis ping failed: {e}"))
            }),
        ),
    ];

    match run_health_checks(checks).await {
        Ok((status, json)) => (status, json).into_response(),
        Err((status, json)) => (status, json).into_response(),
    }
}
