use async_trait::async_trait;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
};
use uuid::Uuid;

use crate::entity::{ActiveModel, Column, Entity};
use crate::error::RecommenderResult;
use crate::models::{Recommendation, RecommendationCandidate, RecommendationStatus, ResourceType};
use crate::repository::RecommenderRepository;

#[derive(Clone)]
pub struct PgRecommenderRepository {
    db: DatabaseConnection,
}

impl PgRecommenderRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl RecommenderRepository for PgRecommenderRepository {
    async fn list_open(&self, tenant_id: Uuid) -> RecommenderResult<Vec<Recommendation>> {
        let rows = Entity::find()
            .filter(Column::TenantId.eq(tenant_id))
            .filter(Column::Status.eq(RecommendationStatus::Open))
            .all(&self.db)
            .await?
            .into_iter()
            .map(Into::into)
            .collect();
        Ok(rows)
    }

    async fn get(&self, tenant_id: Uuid, id: Uuid) -> RecommenderResult<Option<Recommendation>> {
        let row = Entity::find_by_id(id)
            .filter(Column::TenantId.eq(tenant_id))
            .one(&self.db)
            .await?
            .map(Into::into);
        Ok(row)
    }

    async fn find_open(
        &self,
        tenant_id: Uuid,
        cluster: &str,
        namespace: &str,
        pod: &str,
        resource_type: ResourceType,
    ) -> RecommenderResult<Option<Recommendation>> {
        let row = Entity::find()
            .filter(Column::TenantId.eq(tenant_id))
            .filter(Column::Cluster.eq(cluster))
            .filter(Column::Namespace.eq(namespace))
            .filter(Column::Pod.eq(pod))
            .filter(Column::ResourceType.eq(resource_type))
            .filter(Column::Status.eq(RecommendationStatus::Open))
            .one(&self.db)
            .await?
            .map(Into::into);
        Ok(row)
    }

    async fn insert(
        &self,
        tenant_id: Uuid,
        candidate: RecommendationCandidate,
    ) -> RecommenderResult<Recommendation> {
        let model = ActiveModel {
            id: Set(Uuid::new_v4()),
            tenant_id: Set(tenant_id),
            cluster: Set(candidate.cluster),
            namespace: Set(candidate.namespace),
            pod: Set(candidate.pod),
            resource_type: Set(candidate.resource_type),
            current_request: Set(candidate.current_request),
            recommended_request: Set(candidate.recommended_request),
            potential_savings_usd: Set(candidate.potential_savings_usd),
            confidence: Set(candidate.confidence),
            reason: Set(candidate.reason),
            status: Set(RecommendationStatus::Open),
            ..Default::default()
        };
        Ok(model.insert(&self.db).await?.into())
    }

    async fn set_status(
        &self,
        tenant_id: Uuid,
        id: Uuid,
        status: RecommendationStatus,
    ) -> RecommenderResult<bool> {
        let result = Entity::update_many()
            .col_expr(Column::Status, Expr::value(status))
            .filter(Column::TenantId.eq(tenant_id))
            .filter(Column::Id.eq(id))
            .filter(Column::Status.eq(RecommendationStatus::Open))
            .exec(&self.db)
            .await?;
        Ok(result.rows_affected > 0)
    }

    async fn supersede(&self, tenant_id: Uuid, id: Uuid) -> RecommenderResult<()> {
        if let Some(existing) = Entity::find_by_id(id)
            .filter(Column::TenantId.eq(tenant_id))
            .one(&self.db)
            .await?
        {
            let mut model: ActiveModel = existing.into();
            model.status = Set(RecommendationStatus::Dismissed);
            model.reason = Set("superseded".to_string());
            model.update(&self.db).await?;
        }
        Ok(())
    }
}
