//! Tenant / Plan / User domain types (§3, §4.3).

use chrono::{DateTime, Utc};
use sea_orm::{DeriveActiveEnum, EnumIter};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// `-1` on any limit field means unlimited.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Plan {
    pub id: Uuid,
    pub name: String,
    pub cluster_limit: i32,
    pub node_limit: i32,
    pub user_limit: i32,
    pub retention_days: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreatePlan {
    #[validate(length(min = 1, max = 64))]
    pub name: String,
    pub cluster_limit: i32,
    pub node_limit: i32,
    pub user_limit: i32,
    #[validate(range(min = 1))]
    pub retention_days: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Tenant {
    pub id: Uuid,
    pub name: String,
    pub plan_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateTenant {
    #[validate(length(min = 1, max = 128))]
    pub name: String,
    pub plan_id: Uuid,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
    DeriveActiveEnum, EnumIter, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "user_role")]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Role {
    #[sea_orm(string_value = "owner")]
    Owner,
    #[sea_orm(string_value = "admin")]
    Admin,
    #[sea_orm(string_value = "editor")]
    Editor,
    #[sea_orm(string_value = "viewer")]
    Viewer,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
    DeriveActiveEnum, EnumIter, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "user_status")]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum UserStatus {
    #[sea_orm(string_value = "active")]
    Active,
    #[sea_orm(string_value = "suspended")]
    Suspended,
    #[sea_orm(string_value = "pending")]
    Pending,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct User {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub external_identity: String,
    pub email: String,
    pub role: Role,
    pub status: UserStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateUser {
    #[validate(length(min = 1, max = 255))]
    pub external_identity: String,
    #[validate(email)]
    pub email: String,
    pub role: Role,
}

/// Pre-computed counts the caller (ingest pipeline) gathers from the timeseries store before
/// invoking [`crate::service::PlanGate`]; the gate itself never reaches into another domain's
/// tables (§4.3).
///
/// `active_cluster_count` and `node_count_last_24h` reflect samples already written — they do
/// not yet include the cluster/nodes named in the request being gated. `incoming_cluster_is_new`
/// tells the gate whether this request would add a *new* distinct cluster to that count, since
/// the limit must account for the incoming cluster, not just already-ingested ones (§4.3).
#[derive(Debug, Clone, Copy)]
pub struct IngestUsage {
    pub active_cluster_count: i64,
    pub node_count_last_24h: i64,
    pub incoming_cluster_is_new: bool,
}
