//! Right-sizing recommendation types (§4.7).

use chrono::{DateTime, Utc};
use sea_orm::{DeriveActiveEnum, EnumIter};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
    DeriveActiveEnum, EnumIter, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "recommendation_resource_type")]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ResourceType {
    #[sea_orm(string_value = "cpu")]
    Cpu,
    #[sea_orm(string_value = "memory")]
    Memory,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
    DeriveActiveEnum, EnumIter, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "recommendation_status")]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum RecommendationStatus {
    #[sea_orm(string_value = "open")]
    Open,
    #[sea_orm(string_value = "applied")]
    Applied,
    #[sea_orm(string_value = "dismissed")]
    Dismissed,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Recommendation {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub cluster: String,
    pub namespace: String,
    pub pod: String,
    pub resource_type: ResourceType,
    pub current_request: f64,
    pub recommended_request: f64,
    pub potential_savings_usd: f64,
    pub confidence: f64,
    pub reason: String,
    pub status: RecommendationStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct GenerateRequest {
    #[serde(default = "default_lookback_hours")]
    pub lookback_hours: i64,
}

fn default_lookback_hours() -> i64 {
    24
}

/// A candidate produced by [`crate::service::compute_candidates`] before it is persisted; kept
/// separate from [`Recommendation`] because it has no id/status/created_at yet.
#[derive(Debug, Clone)]
pub struct RecommendationCandidate {
    pub cluster: String,
    pub namespace: String,
    pub pod: String,
    pub resource_type: ResourceType,
    pub current_request: f64,
    pub recommended_request: f64,
    pub potential_savings_usd: f64,
    pub confidence: f64,
    pub reason: String,
}
