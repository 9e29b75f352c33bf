//! Pricing resolver metrics.

use metrics::{counter, gauge, histogram};
use std::time::Instant;

/// Pricing metrics recorder
pub struct PricingMetrics;

impl PricingMetrics {
    /// Record a successful price resolution, tagged by which step of the
    /// lookup chain (override, cluster, rate, default) satisfied the request.
    pub fn record_resolved(tier: &str, resource_type: &str, source: &str, duration_ms: u64) {
        counter!(
            "pricing_resolutions_total",
            "tier" => tier.to_string(),
            "resource_type" => resource_type.to_string(),
            "source" => source.to_string()
        )
        .increment(1);
        histogram!(
            "pricing_resolution_duration_seconds",
            "source" => source.to_string()
        )
        .record(duration_ms as f64 / 1000.0);
    }

    /// Record a resolution falling through to the platform default rate.
    pub fn record_fallback(tier: &str, resource_type: &str) {
        counter!(
            "pricing_resolution_fallbacks_total",
            "tier" => tier.to_string(),
            "resource_type" => resource_type.to_string()
        )
        .increment(1);

        tracing::debug!(tier = tier, resource_type = resource_type, "Pricing resolution fell through to default rate");
    }

    /// Record a pricing config create/update/delete.
    pub fn record_config_mutation(operation: &str) {
        counter!("pricing_config_mutations_total", "operation" => operation.to_string()).increment(1);
    }

    /// Set the total number of active pricing rates.
    pub fn set_active_rates_count(count: usize) {
        gauge!("pricing_rates_active_total").set(count as f64);
    }
}

/// Timer guard for automatic duration recording.
pub struct PricingTimer {
    start: Instant,
    source: String,
    stopped: bool,
}

impl PricingTimer {
    pub fn new(source: &str) -> Self {
        Self {
            start: Instant::now(),
            source: source.to_string(),
            stopped: false,
        }
    }

    /// Stop the timer and record the duration. Returns duration in milliseconds.
    pub fn stop(&mut self) -> u64 {
        if self.stopped {
            return 0;
        }
        self.stopped = true;

        let duration = self.start.elapsed();
        histogram!(
            "pricing_resolution_duration_seconds",
            "source" => self.source.clone()
        )
        .record(duration.as_secs_f64());

        duration.as_millis() as u64
    }
}

impl Drop for PricingTimer {
    fn drop(&mut self) {
        if !self.stopped {
            self.stop();
        }
    }
}
