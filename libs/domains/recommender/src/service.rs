use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use domain_pricing::{PricingService, ResolveQuery};
use domain_tenancy::TenantContext;
use domain_timeseries::{PodSample, TimeWindow, TimeseriesRepository};
use observability::RecommenderMetrics;
use uuid::Uuid;

use crate::error::{RecommenderError, RecommenderResult};
use crate::models::{
    Recommendation, RecommendationCandidate, RecommendationStatus, ResourceType,
};
use crate::repository::RecommenderRepository;

/// Below this many samples in the lookback window, P95 is too unstable to recommend on; see
/// DESIGN.md for why the stricter floor was chosen over the distilled spec's silence here.
const MIN_SAMPLES: usize = 30;
const EXCESS_THRESHOLD: f64 = 0.5;
const RECOMMENDED_HEADROOM: f64 = 1.2;
const RECOMMENDED_FLOOR_RATIO: f64 = 0.1;
const BYTES_PER_GB: f64 = 1024.0 * 1024.0 * 1024.0;
const MILLICORES_PER_CORE: f64 = 1000.0;

#[derive(Clone)]
pub struct RecommenderService<R, T, P>
where
    R: RecommenderRepository,
    T: TimeseriesRepository,
    P: domain_pricing::PricingRepository,
{
    repository: Arc<R>,
    timeseries: Arc<T>,
    pricing: Arc<PricingService<P>>,
}

impl<R, T, P> RecommenderService<R, T, P>
where
    R: RecommenderRepository,
    T: TimeseriesRepository,
    P: domain_pricing::PricingRepository,
{
    pub fn new(repository: R, timeseries: Arc<T>, pricing: Arc<PricingService<P>>) -> Self {
        Self {
            repository: Arc::new(repository),
            timeseries,
            pricing,
        }
    }

    pub async fn list_open(&self, tenant_id: Uuid) -> RecommenderResult<Vec<Recommendation>> {
        let open = self.repository.list_open(tenant_id).await?;
        RecommenderMetrics::set_open_count(open.len());
        let savings_cents: i64 = open.iter().map(|r| (r.potential_savings_usd * 100.0) as i64).sum();
        RecommenderMetrics::set_potential_savings_cents(savings_cents);
        Ok(open)
    }

    /// Monotone `open -> applied` (§3): a no-longer-open row is left untouched and this
    /// returns [`crate::error::RecommenderError::Conflict`] (§7, §8).
    pub async fn apply(&self, tenant_id: Uuid, id: Uuid) -> RecommenderResult<()> {
        let recommendation = self.repository.get(tenant_id, id).await?;
        let changed = self
            .repository
            .set_status(tenant_id, id, RecommendationStatus::Applied)
            .await?;
        if !changed {
            return Err(RecommenderError::Conflict(id.to_string()));
        }
        let savings_cents = recommendation.map(|r| (r.potential_savings_usd * 100.0) as i64).unwrap_or(0);
        RecommenderMetrics::record_decision("applied", savings_cents);
        Ok(())
    }

    /// Monotone `open -> dismissed` (§3): a no-longer-open row is left untouched and this
    /// returns [`crate::error::RecommenderError::Conflict`] (§7, §8).
    pub async fn dismiss(&self, tenant_id: Uuid, id: Uuid) -> RecommenderResult<()> {
        let recommendation = self.repository.get(tenant_id, id).await?;
        let changed = self
            .repository
            .set_status(tenant_id, id, RecommendationStatus::Dismissed)
            .await?;
        if !changed {
            return Err(RecommenderError::Conflict(id.to_string()));
        }
        let savings_cents = recommendation.map(|r| (r.potential_savings_usd * 100.0) as i64).unwrap_or(0);
        RecommenderMetrics::record_decision("dismissed", savings_cents);
        Ok(())
    }

    /// GenerateRightSizing (§4.7): scans the lookback window's pod samples, computes P95 usage
    /// per `(cluster, namespace, pod)`, and persists a deduplicated set of open candidates.
    pub async fn generate(
        &self,
        ctx: &TenantContext,
        tenant_id: Uuid,
        lookback_hours: i64,
    ) -> RecommenderResult<Vec<Recommendation>> {
        let end = Utc::now();
        let start = end - chrono::Duration::hours(lookback_hours);
        let window = TimeWindow { start, end };

        let samples = self.timeseries.scan_pod(ctx, None, window).await?;

        let mut by_pod: HashMap<(String, String, String), Vec<PodSample>> = HashMap::new();
        for sample in samples {
            by_pod
                .entry((sample.cluster.clone(), sample.namespace.clone(), sample.pod.clone()))
                .or_default()
                .push(sample);
        }

        let mut created = Vec::new();
        for ((cluster, namespace, pod), mut pod_samples) in by_pod {
            if pod_samples.len() < MIN_SAMPLES {
                RecommenderMetrics::record_insufficient_samples(
                    &format!("{cluster}/{namespace}/{pod}"),
                    pod_samples.len(),
                );
                continue;
            }
            pod_samples.sort_by_key(|s| s.time);

            let cpu_usage: Vec<f64> = pod_samples.iter().map(|s| s.cpu_millicores_usage as f64).collect();
            let mem_usage: Vec<f64> = pod_samples.iter().map(|s| s.mem_bytes_usage as f64).collect();
            let last = pod_samples.last().expect("non-empty");
            let current_cpu_request = last.cpu_millicores_request as f64;
            let current_mem_request = last.mem_bytes_request as f64;

            let rates = self
                .pricing
                .resolve(
                    &ResolveQuery {
                        tenant_id,
                        cluster: cluster.clone(),
                        node: Some(last.node.clone()),
                        instance_family: None,
                        tier: domain_pricing::PricingTier::OnDemand,
                        at_time: end,
                    },
                    None,
                )
                .await?;

            if let Some(candidate) = candidate_for(
                ResourceType::Cpu,
                &cluster,
                &namespace,
                &pod,
                &cpu_usage,
                current_cpu_request,
                rates.cpu_per_core_hour,
                MILLICORES_PER_CORE,
                "m",
            ) {
                created.push(self.upsert(tenant_id, candidate).await?);
            }
            if let Some(candidate) = candidate_for(
                ResourceType::Memory,
                &cluster,
                &namespace,
                &pod,
                &mem_usage,
                current_mem_request,
                rates.mem_per_gb_hour,
                BYTES_PER_GB,
                "B",
            ) {
                created.push(self.upsert(tenant_id, candidate).await?);
            }
        }

        Ok(created)
    }

    async fn upsert(
        &self,
        tenant_id: Uuid,
        candidate: RecommendationCandidate,
    ) -> RecommenderResult<Recommendation> {
        if let Some(existing) = self
            .repository
            .find_open(
                tenant_id,
                &candidate.cluster,
                &candidate.namespace,
                &candidate.pod,
                candidate.resource_type,
            )
            .await?
        {
            self.repository.supersede(tenant_id, existing.id).await?;
        }
        self.repository.insert(tenant_id, candidate).await
    }
}

#[allow(clippy::too_many_arguments)]
fn candidate_for(
    resource_type: ResourceType,
    cluster: &str,
    namespace: &str,
    pod: &str,
    usage_samples: &[f64],
    current_request: f64,
    rate_per_unit_hour: f64,
    unit_divisor: f64,
    unit_label: &str,
) -> Option<RecommendationCandidate> {
    if current_request <= 0.0 {
        return None;
    }
    let p95 = percentile(usage_samples, 0.95);
    if p95 >= current_request * EXCESS_THRESHOLD {
        return None;
    }

    let recommended = (p95 * RECOMMENDED_HEADROOM).max(current_request * RECOMMENDED_FLOOR_RATIO);
    let avg_usage = usage_samples.iter().sum::<f64>() / usage_samples.len() as f64;
    let confidence = (1.0 - avg_usage / current_request).clamp(0.0, 1.0);

    let current_units = current_request / unit_divisor;
    let recommended_units = recommended / unit_divisor;
    let potential_savings_usd = (current_units - recommended_units) * rate_per_unit_hour;

    let reason = format!(
        "{resource_type} p95 usage ({p95:.0}{unit_label}) is less than {:.0}% of requested ({current_request:.0}{unit_label})",
        EXCESS_THRESHOLD * 100.0
    );

    Some(RecommendationCandidate {
        cluster: cluster.to_string(),
        namespace: namespace.to_string(),
        pod: pod.to_string(),
        resource_type,
        current_request,
        recommended_request: recommended,
        potential_savings_usd,
        confidence,
        reason,
    })
}

/// Nearest-rank percentile over an unsorted sample; `p` in `[0, 1]`.
fn percentile(samples: &[f64], p: f64) -> f64 {
    let mut sorted = samples.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap());
    let rank = ((p * sorted.len() as f64).ceil() as usize).clamp(1, sorted.len());
    sorted[rank - 1]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percentile_of_uniform_samples() {
        let samples: Vec<f64> = (1..=100).map(|n| n as f64).collect();
        assert_eq!(percentile(&samples, 0.95), 95.0);
    }

    #[test]
    fn candidate_emitted_when_usage_well_below_request() {
        let usage = vec![100.0; 40];
        let candidate = candidate_for(
            ResourceType::Cpu,
            "c1",
            "ns",
            "pod",
            &usage,
            1000.0,
            0.05,
            MILLICORES_PER_CORE,
            "m",
        );
        assert!(candidate.is_some());
        let candidate = candidate.unwrap();
        assert!(candidate.recommended_request < 1000.0);
        assert!(candidate.confidence > 0.0);
    }

    #[test]
    fn no_candidate_when_usage_close_to_request() {
        let usage = vec![900.0; 40];
        let candidate = candidate_for(
            ResourceType::Cpu,
            "c1",
            "ns",
            "pod",
            &usage,
            1000.0,
            0.05,
            MILLICORES_PER_CORE,
            "m",
        );
        assert!(candidate.is_none());
    }
}
