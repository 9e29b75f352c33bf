//! Observability utilities for the multi-tenant cost observability platform.
//!
//! This crate provides:
//! - Prometheus metrics recording and export
//! - Custom metrics for pricing resolution, ingest, allocation, and recommendations
//! - Axum middleware for automatic request metrics
//!
//! # Example
//!
//! ```rust,ignore
//! use observability::{init_metrics, metrics_handler, IngestMetrics};
//!
//! // Initialize metrics recorder
//! init_metrics();
//!
//! // Record ingest activity
//! IngestMetrics::record_batch_accepted("tenant-1", "pod", 120, 0.04);
//!
//! // Add metrics endpoint to router
//! let app = Router::new()
//!     .route("/metrics", get(metrics_handler));
//! ```

pub mod allocation;
pub mod ingest;
pub mod middleware;
pub mod pricing;
pub mod recommender;

pub use allocation::AllocationMetrics;
pub use ingest::IngestMetrics;
pub use middleware::MetricsLayer;
pub use pricing::PricingMetrics;
pub use recommender::RecommenderMetrics;

// Re-export metrics macros for convenience
pub use metrics::{counter, gauge, histogram};

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;
use tracing::info;

static METRICS_HANDLE: OnceCell<PrometheusHandle> = OnceCell::new();

/// Initialize the Prometheus metrics recorder.
///
/// This should be called once at application startup.
/// Returns the PrometheusHandle for rendering metrics.
pub fn init_metrics() -> &'static PrometheusHandle {
    METRICS_HANDLE.get_or_init(|| {
        let handle = PrometheusBuilder::new()
            .install_recorder()
            .expect("Failed to install Prometheus recorder");

        info!("Prometheus metrics recorder initialized");

        // Register metric descriptions
        register_metric_descriptions();

        handle
    })
}

/// Get the metrics handle (must call init_metrics first)
pub fn get_metrics_handle() -> Option<&'static PrometheusHandle> {
    METRICS_HANDLE.get()
}

/// Axum handler for /metrics endpoint
pub async fn metrics_handler() -> String {
    match get_metrics_handle() {
        Some(handle) => handle.render(),
        None => "# Metrics not initialized\n".to_string(),
    }
}

/// Register metric descriptions for documentation
fn register_metric_descriptions() {
    use metrics::describe_counter;
    use metrics::describe_gauge;
    use metrics::describe_histogram;

    // HTTP metrics
    describe_counter!(
        "http_requests_total",
        "Total number of HTTP requests"
    );
    describe_histogram!(
        "http_request_duration_seconds",
        "HTTP request duration in seconds"
    );
    describe_counter!(
        "http_requests_errors_total",
        "Total number of HTTP request errors"
    );

    // Pricing resolver metrics
    describe_counter!(
        "pricing_resolutions_total",
        "Total pricing resolutions by tier, resource type, and source"
    );
    describe_histogram!(
        "pricing_resolution_duration_seconds",
        "Pricing resolution duration in seconds"
    );
    describe_counter!(
        "pricing_resolution_fallbacks_total",
        "Total resolutions that fell through to the default rate"
    );
    describe_counter!(
        "pricing_config_mutations_total",
        "Total pricing config create/update/delete operations"
    );
    describe_gauge!(
        "pricing_rates_active_total",
        "Total number of active pricing rates"
    );

    // Ingest pipeline metrics
    describe_counter!(
        "ingest_samples_accepted_total",
        "Total pod/node samples accepted by tenant and kind"
    );
    describe_counter!(
        "ingest_samples_rejected_total",
        "Total pod/node samples rejected by tenant, kind, and reason"
    );
    describe_histogram!(
        "ingest_batch_duration_seconds",
        "Ingest batch write duration in seconds"
    );
    describe_counter!(
        "ingest_degraded_total",
        "Total times the ingest pipeline degraded"
    );
    describe_gauge!(
        "ingest_queue_depth",
        "Current ingest write queue depth"
    );

    // Allocation engine metrics
    describe_counter!(
        "allocation_queries_total",
        "Total allocation queries by aggregate and idle mode"
    );
    describe_histogram!(
        "allocation_query_duration_seconds",
        "Allocation query duration in seconds"
    );
    describe_counter!(
        "allocation_queries_rejected_total",
        "Total allocation queries rejected by reason"
    );

    // Recommender metrics
    describe_gauge!(
        "recommendations_open_total",
        "Total open right-sizing recommendations"
    );
    describe_gauge!(
        "recommendations_potential_savings_cents",
        "Total potential savings across open recommendations, in cents"
    );
    describe_counter!(
        "recommendations_insufficient_samples_total",
        "Total recommendation runs skipped for insufficient samples"
    );
    describe_counter!(
        "recommendations_decided_total",
        "Total recommendations applied or dismissed"
    );
}
