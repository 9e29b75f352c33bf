use async_trait::async_trait;
use uuid::Uuid;

use crate::error::PricingResult;
use crate::models::{
    CreatePricingConfig, CreatePricingRate, NodePricingOverride, PricingConfig, PricingRate,
    PricingTier, ResourceType,
};

/// Data access for pricing configs, rates, cluster bindings and node overrides.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PricingRepository: Send + Sync {
    async fn create_config(
        &self,
        tenant_id: Uuid,
        input: CreatePricingConfig,
    ) -> PricingResult<PricingConfig>;

    async fn list_configs(&self, tenant_id: Uuid) -> PricingResult<Vec<PricingConfig>>;

    async fn get_default_config(&self, tenant_id: Uuid) -> PricingResult<Option<PricingConfig>>;

    async fn add_rate(
        &self,
        pricing_config_id: Uuid,
        input: CreatePricingRate,
    ) -> PricingResult<PricingRate>;

    /// Rates for a config matching resource type and tier, active at `at_time`,
    /// ordered so an exact `instance_family` match sorts before a `None` one.
    async fn find_rates(
        &self,
        pricing_config_id: Uuid,
        resource_type: ResourceType,
        tier: PricingTier,
        instance_family: Option<&str>,
        at_time: chrono::DateTime<chrono::Utc>,
    ) -> PricingResult<Vec<PricingRate>>;

    async fn get_cluster_config_id(
        &self,
        tenant_id: Uuid,
        cluster_name: &str,
    ) -> PricingResult<Option<Uuid>>;

    async fn set_cluster_pricing(
        &self,
        tenant_id: Uuid,
        cluster_name: &str,
        config_id: Uuid,
    ) -> PricingResult<()>;

    async fn get_node_override(
        &self,
        tenant_id: Uuid,
        cluster_name: &str,
        node: &str,
    ) -> PricingResult<Option<NodePricingOverride>>;

    async fn set_node_override(
        &self,
        tenant_id: Uuid,
        cluster_name: &str,
        node: &str,
        hourly_cost_override: f64,
    ) -> PricingResult<NodePricingOverride>;
}
