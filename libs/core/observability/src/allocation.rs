//! Allocation engine metrics (C6).

use metrics::{counter, histogram};

/// Allocation metrics recorder
pub struct AllocationMetrics;

impl AllocationMetrics {
    /// Record an allocation query, tagged by aggregation key and idle mode.
    pub fn record_query(aggregate: &str, idle_mode: &str, window_buckets: usize, duration_ms: u64) {
        counter!(
            "allocation_queries_total",
            "aggregate" => aggregate.to_string(),
            "idle_mode" => idle_mode.to_string()
        )
        .increment(1);

        histogram!(
            "allocation_query_duration_seconds",
            "aggregate" => aggregate.to_string()
        )
        .record(duration_ms as f64 / 1000.0);

        tracing::debug!(aggregate = aggregate, idle_mode = idle_mode, window_buckets = window_buckets, duration_ms = duration_ms, "Allocation query served");
    }

    /// Record a query rejected for an invalid window/aggregate/filter.
    pub fn record_query_rejected(reason: &str) {
        counter!("allocation_queries_rejected_total", "reason" => reason.to_string()).increment(1);
    }
}
