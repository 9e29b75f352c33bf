use chrono::{DateTime, Utc};
use sea_orm::{DeriveActiveEnum, EnumIter};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use ts_rs::TS;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Resource type priced by a rate.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
    DeriveActiveEnum, EnumIter, ToSchema, TS, Hash,
)]
#[ts(export)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "allocation_resource_type")]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ResourceType {
    #[sea_orm(string_value = "cpu")]
    Cpu,
    #[sea_orm(string_value = "memory")]
    Memory,
    #[sea_orm(string_value = "gpu")]
    Gpu,
    #[sea_orm(string_value = "storage")]
    Storage,
    #[sea_orm(string_value = "network")]
    Network,
}

/// Purchasing tier a rate applies to.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, Default,
    DeriveActiveEnum, EnumIter, ToSchema, TS, Hash,
)]
#[ts(export)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "pricing_tier")]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum PricingTier {
    #[default]
    #[sea_orm(string_value = "on_demand")]
    OnDemand,
    #[sea_orm(string_value = "spot")]
    Spot,
    #[sea_orm(string_value = "preemptible")]
    Preemptible,
    #[sea_orm(string_value = "reserved_1yr")]
    Reserved1yr,
    #[sea_orm(string_value = "reserved_3yr")]
    Reserved3yr,
}

/// A named set of rates belonging to a tenant; at most one is `is_default`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, TS)]
#[ts(export)]
pub struct PricingConfig {
    #[ts(as = "String")]
    pub id: Uuid,
    #[ts(as = "String")]
    pub tenant_id: Uuid,
    pub name: String,
    pub provider: String,
    pub region: Option<String>,
    pub is_default: bool,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema, TS)]
#[ts(export)]
pub struct CreatePricingConfig {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[validate(length(min = 1, max = 100))]
    pub provider: String,
    pub region: Option<String>,
    #[serde(default)]
    pub is_default: bool,
}

/// A single rate line within a pricing config.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, TS)]
#[ts(export)]
pub struct PricingRate {
    #[ts(as = "String")]
    pub id: Uuid,
    #[ts(as = "String")]
    pub pricing_config_id: Uuid,
    pub resource_type: ResourceType,
    pub tier: PricingTier,
    pub instance_family: Option<String>,
    pub unit: String,
    pub cost_per_unit: f64,
    #[ts(as = "String")]
    pub effective_from: DateTime<Utc>,
    #[ts(as = "Option<String>")]
    pub effective_to: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema, TS)]
#[ts(export)]
pub struct CreatePricingRate {
    pub resource_type: ResourceType,
    pub tier: PricingTier,
    pub instance_family: Option<String>,
    #[validate(length(min = 1, max = 50))]
    pub unit: String,
    pub cost_per_unit: f64,
    #[ts(as = "String")]
    pub effective_from: DateTime<Utc>,
    #[ts(as = "Option<String>")]
    pub effective_to: Option<DateTime<Utc>>,
}

/// Per-node hourly cost, known directly rather than resolved.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, TS)]
#[ts(export)]
pub struct NodePricingOverride {
    #[ts(as = "String")]
    pub tenant_id: Uuid,
    pub cluster_name: String,
    pub node: String,
    pub hourly_cost_override: f64,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

/// Resolved per-unit rates for CPU and memory, the output of [`crate::service::PricingService::resolve`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema, TS)]
#[ts(export)]
pub struct ResolvedRates {
    pub cpu_per_core_hour: f64,
    pub mem_per_gb_hour: f64,
}

/// Parameters to [`crate::service::PricingService::resolve`].
#[derive(Debug, Clone)]
pub struct ResolveQuery {
    pub tenant_id: Uuid,
    pub cluster: String,
    pub node: Option<String>,
    pub instance_family: Option<String>,
    pub tier: PricingTier,
    pub at_time: DateTime<Utc>,
}
