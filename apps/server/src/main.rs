use axum::{middleware, routing::get, Router};
use axum_helpers::server::{create_production_app, health_router};
use core_config::tracing::init_tracing;
use std::time::Duration;
use tracing::info;

mod api;
mod auth;
mod config;
mod openapi;
mod retention;
mod state;

use config::Config;
use state::AppState;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    color_eyre::install().ok();

    let config = Config::from_env()?;

    init_tracing(&config.environment);

    observability::init_metrics();
    info!("Prometheus metrics initialized");

    let postgres_future = async {
        database::postgres::connect_from_config_with_retry(config.database.clone(), None)
            .await
            .map_err(|e| eyre::eyre!("PostgreSQL connection failed: {}", e))
    };
    let redis_future = async {
        database::redis::connect_from_config_with_retry(config.redis.clone(), None)
            .await
            .map_err(|e| eyre::eyre!("Redis connection failed: {}", e))
    };
    let (db, redis) = tokio::try_join!(postgres_future, redis_future)?;

    database::postgres::run_migrations::<migration::Migrator>(&db, "cost_api").await?;

    let state = AppState::new(config, db, redis);

    let scheduler = retention::start(state.clone()).await?;

    let api_routes = api::routes(&state);
    let router = axum_helpers::create_router::<openapi::ApiDoc>(api_routes).await?;

    let metrics_router = Router::new().route("/metrics", get(observability::metrics_handler));

    let app = router
        .layer(middleware::from_fn(observability::middleware::metrics_middleware))
        .merge(health_router(state.config.app))
        .merge(api::ready_router(state.clone()))
        .merge(metrics_router);

    info!("Starting cost API with production-ready shutdown (30s timeout)");

    let server_config = state.config.server.clone();
    create_production_app(
        app,
        &server_config,
        Duration::from_secs(30),
        async move {
            info!("Shutting down: stopping scheduler and closing database connections");

            let mut scheduler = scheduler;
            if let Err(err) = scheduler.shutdown().await {
                tracing::error!(error = %err, "scheduler shutdown failed");
            }

            tokio::join!(
                async {
                    match state.db.close().await {
                        Ok(_) => info!("PostgreSQL connection closed successfully"),
                        Err(e) => tracing::error!("Error closing PostgreSQL: {}", e),
                    }
                },
                async {
                    drop(state.redis);
                    info!("Redis connection closed successfully");
                }
            );
        },
    )
    .await
    .map_err(|e| eyre::eyre!("Server error: {}", e))?;

    info!("Cost API shutdown complete");
    Ok(())
}
