//! Right-sizing recommender metrics (C7).

use metrics::{counter, gauge};

/// Recommender metrics recorder
pub struct RecommenderMetrics;

impl RecommenderMetrics {
    /// Set the total number of open recommendations.
    pub fn set_open_count(count: usize) {
        gauge!("recommendations_open_total").set(count as f64);
    }

    /// Set the total potential monthly savings across open recommendations, in cents.
    pub fn set_potential_savings_cents(cents: i64) {
        gauge!("recommendations_potential_savings_cents").set(cents as f64);
    }

    /// Record a recommendation generation run skipped for insufficient samples.
    pub fn record_insufficient_samples(pod_key: &str, sample_count: usize) {
        counter!("recommendations_insufficient_samples_total").increment(1);
        tracing::debug!(pod_key = pod_key, sample_count = sample_count, "Skipped recommendation: below minimum sample threshold");
    }

    /// Record a recommendation being applied or dismissed.
    pub fn record_decision(decision: &str, savings_cents: i64) {
        counter!("recommendations_decided_total", "decision" => decision.to_string()).increment(1);

        tracing::info!(decision = decision, savings_cents = savings_cents, "Recommendation decided");
    }
}
