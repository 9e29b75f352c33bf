use crate::models::{RecommendationStatus, ResourceType};
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, serde::Serialize, serde::Deserialize)]
#[sea_orm(table_name = "recommendations")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub tenant_id: Uuid,
    #[sea_orm(column_type = "String(StringLen::N(255))")]
    pub cluster: String,
    #[sea_orm(column_type = "String(StringLen::N(255))")]
    pub namespace: String,
    #[sea_orm(column_type = "String(StringLen::N(255))")]
    pub pod: String,
    pub resource_type: ResourceType,
    pub current_request: f64,
    pub recommended_request: f64,
    pub potential_savings_usd: f64,
    pub confidence: f64,
    #[sea_orm(column_type = "Text")]
    pub reason: String,
    pub status: RecommendationStatus,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for crate::models::Recommendation {
    fn from(m: Model) -> Self {
        Self {
            id: m.id,
            tenant_id: m.tenant_id,
            cluster: m.cluster,
            namespace: m.namespace,
            pod: m.pod,
            resource_type: m.resource_type,
            current_request: m.current_request,
            recommended_request: m.recommended_request,
            potential_savings_usd: m.potential_savings_usd,
            confidence: m.confidence,
            reason: m.reason,
            status: m.status,
            created_at: m.created_at.into(),
        }
    }
}
