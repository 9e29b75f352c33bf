//! Ingest pipeline metrics (C4).

use metrics::{counter, gauge, histogram};

/// Ingest metrics recorder
pub struct IngestMetrics;

impl IngestMetrics {
    /// Record a batch of pod/node samples accepted for a tenant's cluster.
    pub fn record_batch_accepted(tenant_id: &str, sample_kind: &str, count: usize, duration_secs: f64) {
        counter!(
            "ingest_samples_accepted_total",
            "tenant_id" => tenant_id.to_string(),
            "sample_kind" => sample_kind.to_string()
        )
        .increment(count as u64);

        histogram!(
            "ingest_batch_duration_seconds",
            "sample_kind" => sample_kind.to_string()
        )
        .record(duration_secs);
    }

    /// Record samples rejected from a batch (validation failure, clock skew, etc).
    pub fn record_batch_rejected(tenant_id: &str, sample_kind: &str, reason: &str, count: usize) {
        counter!(
            "ingest_samples_rejected_total",
            "tenant_id" => tenant_id.to_string(),
            "sample_kind" => sample_kind.to_string(),
            "reason" => reason.to_string()
        )
        .increment(count as u64);

        tracing::warn!(tenant_id = tenant_id, sample_kind = sample_kind, reason = reason, count = count, "Ingest batch rejected samples");
    }

    /// Record the ingest pipeline degrading (e.g. store backpressure).
    pub fn record_degraded(reason: &str) {
        counter!("ingest_degraded_total", "reason" => reason.to_string()).increment(1);
        tracing::error!(reason = reason, "Ingest pipeline degraded");
    }

    /// Set the current write queue depth.
    pub fn set_queue_depth(depth: usize) {
        gauge!("ingest_queue_depth").set(depth as f64);
    }
}
