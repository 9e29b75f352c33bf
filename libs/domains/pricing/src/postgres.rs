use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use crate::entity::{cluster_pricing, node_pricing_override, pricing_config, pricing_rate};
use crate::error::{PricingError, PricingResult};
use crate::models::{
    CreatePricingConfig, CreatePricingRate, NodePricingOverride, PricingConfig, PricingRate,
    PricingTier, ResourceType,
};
use crate::repository::PricingRepository;

#[derive(Clone)]
pub struct PgPricingRepository {
    db: DatabaseConnection,
}

impl PgPricingRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl PricingRepository for PgPricingRepository {
    async fn create_config(
        &self,
        tenant_id: Uuid,
        input: CreatePricingConfig,
    ) -> PricingResult<PricingConfig> {
        if input.is_default {
            let existing = self.get_default_config(tenant_id).await?;
            if existing.is_some() {
                return Err(PricingError::DuplicateDefault);
            }
        }

        let now = chrono::Utc::now();
        let model = pricing_config::ActiveModel {
            id: Set(Uuid::now_v7()),
            tenant_id: Set(tenant_id),
            name: Set(input.name),
            provider: Set(input.provider),
            region: Set(input.region),
            is_default: Set(input.is_default),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };
        Ok(model.insert(&self.db).await?.into())
    }

    async fn list_configs(&self, tenant_id: Uuid) -> PricingResult<Vec<PricingConfig>> {
        let results = pricing_config::Entity::find()
            .filter(pricing_config::Column::TenantId.eq(tenant_id))
            .order_by_desc(pricing_config::Column::CreatedAt)
            .all(&self.db)
            .await?
            .into_iter()
            .map(Into::into)
            .collect();
        Ok(results)
    }

    async fn get_default_config(&self, tenant_id: Uuid) -> PricingResult<Option<PricingConfig>> {
        let result = pricing_config::Entity::find()
            .filter(pricing_config::Column::TenantId.eq(tenant_id))
            .filter(pricing_config::Column::IsDefault.eq(true))
            .one(&self.db)
            .await?
            .map(Into::into);
        Ok(result)
    }

    async fn add_rate(
        &self,
        pricing_config_id: Uuid,
        input: CreatePricingRate,
    ) -> PricingResult<PricingRate> {
        let model = pricing_rate::ActiveModel {
            id: Set(Uuid::now_v7()),
            pricing_config_id: Set(pricing_config_id),
            resource_type: Set(input.resource_type),
            tier: Set(input.tier),
            instance_family: Set(input.instance_family),
            unit: Set(input.unit),
            cost_per_unit: Set(input.cost_per_unit),
            effective_from: Set(input.effective_from.into()),
            effective_to: Set(input.effective_to.map(Into::into)),
        };
        Ok(model.insert(&self.db).await?.into())
    }

    async fn find_rates(
        &self,
        pricing_config_id: Uuid,
        resource_type: ResourceType,
        tier: PricingTier,
        instance_family: Option<&str>,
        at_time: chrono::DateTime<chrono::Utc>,
    ) -> PricingResult<Vec<PricingRate>> {
        let at_time: chrono::DateTime<chrono::FixedOffset> = at_time.into();
        let mut query = pricing_rate::Entity::find()
            .filter(pricing_rate::Column::PricingConfigId.eq(pricing_config_id))
            .filter(pricing_rate::Column::ResourceType.eq(resource_type))
            .filter(pricing_rate::Column::Tier.eq(tier))
            .filter(pricing_rate::Column::EffectiveFrom.lte(at_time))
            .filter(
                pricing_rate::Column::EffectiveTo
                    .is_null()
                    .or(pricing_rate::Column::EffectiveTo.gt(at_time)),
            );

        if let Some(family) = instance_family {
            query = query.filter(
                pricing_rate::Column::InstanceFamily
                    .eq(family)
                    .or(pricing_rate::Column::InstanceFamily.is_null()),
            );
        } else {
            query = query.filter(pricing_rate::Column::InstanceFamily.is_null());
        }

        let mut results: Vec<PricingRate> = query
            .all(&self.db)
            .await?
            .into_iter()
            .map(Into::into)
            .collect();

        // Exact instance_family matches sort before the family-agnostic fallback.
        results.sort_by_key(|r| r.instance_family.is_none());
        Ok(results)
    }

    async fn get_cluster_config_id(
        &self,
        tenant_id: Uuid,
        cluster_name: &str,
    ) -> PricingResult<Option<Uuid>> {
        let result = cluster_pricing::Entity::find()
            .filter(cluster_pricing::Column::TenantId.eq(tenant_id))
            .filter(cluster_pricing::Column::ClusterName.eq(cluster_name))
            .one(&self.db)
            .await?
            .map(|m| m.config_id);
        Ok(result)
    }

    async fn set_cluster_pricing(
        &self,
        tenant_id: Uuid,
        cluster_name: &str,
        config_id: Uuid,
    ) -> PricingResult<()> {
        let existing = cluster_pricing::Entity::find()
            .filter(cluster_pricing::Column::TenantId.eq(tenant_id))
            .filter(cluster_pricing::Column::ClusterName.eq(cluster_name))
            .one(&self.db)
            .await?;

        if let Some(existing) = existing {
            let mut model: cluster_pricing::ActiveModel = existing.into();
            model.config_id = Set(config_id);
            model.update(&self.db).await?;
        } else {
            let model = cluster_pricing::ActiveModel {
                tenant_id: Set(tenant_id),
                cluster_name: Set(cluster_name.to_string()),
                config_id: Set(config_id),
            };
            model.insert(&self.db).await?;
        }
        Ok(())
    }

    async fn get_node_override(
        &self,
        tenant_id: Uuid,
        cluster_name: &str,
        node: &str,
    ) -> PricingResult<Option<NodePricingOverride>> {
        let result = node_pricing_override::Entity::find()
            .filter(node_pricing_override::Column::TenantId.eq(tenant_id))
            .filter(node_pricing_override::Column::ClusterName.eq(cluster_name))
            .filter(node_pricing_override::Column::Node.eq(node))
            .one(&self.db)
            .await?
            .map(Into::into);
        Ok(result)
    }

    async fn set_node_override(
        &self,
        tenant_id: Uuid,
        cluster_name: &str,
        node: &str,
        hourly_cost_override: f64,
    ) -> PricingResult<NodePricingOverride> {
        let existing = node_pricing_override::Entity::find()
            .filter(node_pricing_override::Column::TenantId.eq(tenant_id))
            .filter(node_pricing_override::Column::ClusterName.eq(cluster_name))
            .filter(node_pricing_override::Column::Node.eq(node))
            .one(&self.db)
            .await?;

        let model = if let Some(existing) = existing {
            let mut model: node_pricing_override::ActiveModel = existing.into();
            model.hourly_cost_override = Set(hourly_cost_override);
            model.update(&self.db).await?
        } else {
            let model = node_pricing_override::ActiveModel {
                tenant_id: Set(tenant_id),
                cluster_name: Set(cluster_name.to_string()),
                node: Set(node.to_string()),
                hourly_cost_override: Set(hourly_cost_override),
                created_at: Set(chrono::Utc::now().into()),
            };
            model.insert(&self.db).await?
        };
        Ok(model.into())
    }
}
