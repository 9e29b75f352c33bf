use std::sync::Arc;

use observability::PricingMetrics;
use uuid::Uuid;

use crate::error::PricingResult;
use crate::models::{
    CreatePricingConfig, CreatePricingRate, PricingConfig, PricingRate, PricingTier,
    ResolveQuery, ResolvedRates, ResourceType,
};
use crate::repository::PricingRepository;

/// Ultimate fallback when no config, cluster binding, or provider default applies.
const FALLBACK_CPU_PER_CORE_HOUR: f64 = 0.031_611;
const FALLBACK_MEM_PER_GB_HOUR: f64 = 0.004_237;

/// Hard-coded provider/tier defaults, step 4 of the resolver's lookup chain.
/// `(cpu_per_core_hour, mem_per_gb_hour)`.
fn provider_tier_defaults(provider: &str, tier: PricingTier) -> Option<(f64, f64)> {
    let table: &[(&str, PricingTier, f64, f64)] = &[
        ("aws", PricingTier::OnDemand, 0.0416, 0.0052),
        ("aws", PricingTier::Spot, 0.0125, 0.0016),
        ("aws", PricingTier::Preemptible, 0.0125, 0.0016),
        ("aws", PricingTier::Reserved1yr, 0.0266, 0.0033),
        ("aws", PricingTier::Reserved3yr, 0.0177, 0.0022),
        ("gcp", PricingTier::OnDemand, 0.0400, 0.0050),
        ("gcp", PricingTier::Spot, 0.0120, 0.0015),
        ("gcp", PricingTier::Preemptible, 0.0120, 0.0015),
        ("gcp", PricingTier::Reserved1yr, 0.0260, 0.0032),
        ("gcp", PricingTier::Reserved3yr, 0.0170, 0.0021),
        ("azure", PricingTier::OnDemand, 0.0420, 0.0053),
        ("azure", PricingTier::Spot, 0.0130, 0.0017),
        ("azure", PricingTier::Preemptible, 0.0130, 0.0017),
        ("azure", PricingTier::Reserved1yr, 0.0270, 0.0034),
        ("azure", PricingTier::Reserved3yr, 0.0180, 0.0023),
    ];

    table
        .iter()
        .find(|(p, t, _, _)| p.eq_ignore_ascii_case(provider) && *t == tier)
        .map(|(_, _, cpu, mem)| (*cpu, *mem))
}

/// Capacity known for a node, used only to split a [`crate::models::NodePricingOverride`]
/// (a single hourly cost) into per-core and per-GB rates.
#[derive(Debug, Clone, Copy)]
pub struct NodeCapacity {
    pub cpu_millicores: i64,
    pub mem_bytes: i64,
}

/// Relative value of one CPU core against one GB of RAM when splitting a node's flat hourly
/// override by capacity ratio (§4.1 item 1). Cloud providers typically price a core several
/// times higher per-hour than a GB of RAM, so a raw core-count : GB-count ratio would overweight
/// memory; this value-per-unit factor corrects for that before the ratio is taken.
const CORE_VALUE_PER_GIB: f64 = 6.0;

#[derive(Clone)]
pub struct PricingService<R: PricingRepository> {
    repository: Arc<R>,
}

impl<R: PricingRepository> PricingService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    pub async fn create_config(
        &self,
        tenant_id: Uuid,
        input: CreatePricingConfig,
    ) -> PricingResult<PricingConfig> {
        let config = self.repository.create_config(tenant_id, input).await?;
        PricingMetrics::record_config_mutation("create_config");
        Ok(config)
    }

    pub async fn list_configs(&self, tenant_id: Uuid) -> PricingResult<Vec<PricingConfig>> {
        self.repository.list_configs(tenant_id).await
    }

    pub async fn add_rate(
        &self,
        pricing_config_id: Uuid,
        input: CreatePricingRate,
    ) -> PricingResult<PricingRate> {
        let rate = self.repository.add_rate(pricing_config_id, input).await?;
        PricingMetrics::record_config_mutation("add_rate");
        Ok(rate)
    }

    pub async fn bind_cluster(
        &self,
        tenant_id: Uuid,
        cluster_name: &str,
        config_id: Uuid,
    ) -> PricingResult<()> {
        self.repository
            .set_cluster_pricing(tenant_id, cluster_name, config_id)
            .await?;
        PricingMetrics::record_config_mutation("bind_cluster");
        Ok(())
    }

    /// Resolve `(cpu_per_core_hour, mem_per_gb_hour)` for a tenant/cluster/node at a point in
    /// time, walking the lookup chain described in §4.1: node override, cluster-bound config,
    /// tenant default config, hard-coded provider/tier defaults, ultimate fallback.
    pub async fn resolve(
        &self,
        query: &ResolveQuery,
        node_capacity: Option<NodeCapacity>,
    ) -> PricingResult<ResolvedRates> {
        let resolve_start = std::time::Instant::now();
        let tier = query.tier.to_string();
        let record = |source: &str, duration_start: std::time::Instant| {
            PricingMetrics::record_resolved(&tier, "cpu_mem", source, duration_start.elapsed().as_millis() as u64);
        };

        if let (Some(node), Some(capacity)) = (&query.node, node_capacity) {
            if let Some(over) = self
                .repository
                .get_node_override(query.tenant_id, &query.cluster, node)
                .await?
            {
                if let Some(rates) = split_node_override(over.hourly_cost_override, capacity) {
                    record("node_override", resolve_start);
                    return Ok(rates);
                }
            }
        }

        let cluster_config_id = self
            .repository
            .get_cluster_config_id(query.tenant_id, &query.cluster)
            .await?;

        if let Some(config_id) = cluster_config_id {
            if let Some(rates) = self.resolve_from_config(config_id, query).await? {
                record("cluster_config", resolve_start);
                return Ok(rates);
            }
        }

        let default_config = self
            .repository
            .get_default_config(query.tenant_id)
            .await?;

        if let Some(config) = &default_config {
            if let Some(rates) = self.resolve_from_config(config.id, query).await? {
                record("tenant_default_config", resolve_start);
                return Ok(rates);
            }
        }

        let provider = default_config.as_ref().map(|c| c.provider.as_str());
        if let Some(provider) = provider {
            if let Some((cpu, mem)) = provider_tier_defaults(provider, query.tier) {
                record("provider_tier_default", resolve_start);
                return Ok(ResolvedRates {
                    cpu_per_core_hour: cpu,
                    mem_per_gb_hour: mem,
                });
            }
        }

        PricingMetrics::record_fallback(&tier, "cpu_mem");
        record("fallback", resolve_start);
        Ok(ResolvedRates {
            cpu_per_core_hour: FALLBACK_CPU_PER_CORE_HOUR,
            mem_per_gb_hour: FALLBACK_MEM_PER_GB_HOUR,
        })
    }

    async fn resolve_from_config(
        &self,
        config_id: Uuid,
        query: &ResolveQuery,
    ) -> PricingResult<Option<ResolvedRates>> {
        let cpu_rates = self
            .repository
            .find_rates(
                config_id,
                ResourceType::Cpu,
                query.tier,
                query.instance_family.as_deref(),
                query.at_time,
            )
            .await?;
        let mem_rates = self
            .repository
            .find_rates(
                config_id,
                ResourceType::Memory,
                query.tier,
                query.instance_family.as_deref(),
                query.at_time,
            )
            .await?;

        match (cpu_rates.first(), mem_rates.first()) {
            (Some(cpu), Some(mem)) => Ok(Some(ResolvedRates {
                cpu_per_core_hour: cpu.cost_per_unit,
                mem_per_gb_hour: mem.cost_per_unit,
            })),
            _ => Ok(None),
        }
    }
}

/// Splits a node's flat hourly override between CPU and memory by the node's own capacity
/// ratio (§4.1 item 1), not a fixed weight: a node with more cores relative to its RAM carries
/// proportionally more of the override's cost on its CPU rate, and vice versa.
fn split_node_override(hourly_cost: f64, capacity: NodeCapacity) -> Option<ResolvedRates> {
    let cpu_cores = capacity.cpu_millicores as f64 / 1000.0;
    let mem_gb = capacity.mem_bytes as f64 / 1024f64.powi(3);
    if cpu_cores <= 0.0 || mem_gb <= 0.0 {
        return None;
    }

    let cpu_value = cpu_cores * CORE_VALUE_PER_GIB;
    let mem_value = mem_gb;
    let cpu_weight = cpu_value / (cpu_value + mem_value);

    let cpu_share = hourly_cost * cpu_weight;
    let mem_share = hourly_cost * (1.0 - cpu_weight);

    Some(ResolvedRates {
        cpu_per_core_hour: cpu_share / cpu_cores,
        mem_per_gb_hour: mem_share / mem_gb,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_defaults_fall_back_when_unknown() {
        assert!(provider_tier_defaults("unknown-cloud", PricingTier::OnDemand).is_none());
        assert!(provider_tier_defaults("aws", PricingTier::OnDemand).is_some());
    }

    #[test]
    fn node_override_split_weights_cpu_higher() {
        let rates = split_node_override(
            1.0,
            NodeCapacity {
                cpu_millicores: 4000,
                mem_bytes: 16 * 1024i64.pow(3),
            },
        )
        .unwrap();
        assert!(rates.cpu_per_core_hour > 0.0);
        assert!(rates.mem_per_gb_hour > 0.0);
    }

    #[test]
    fn node_override_split_none_with_zero_capacity() {
        assert!(split_node_override(
            1.0,
            NodeCapacity {
                cpu_millicores: 0,
                mem_bytes: 0
            }
        )
        .is_none());
    }
}
