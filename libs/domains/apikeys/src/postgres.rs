use async_trait::async_trait;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};

use crate::entity::{ActiveModel, Entity};
use crate::error::ApiKeyResult;
use crate::models::ApiKeyRow;
use crate::repository::ApiKeyRepository;

#[derive(Clone)]
pub struct PgApiKeyRepository {
    db: DatabaseConnection,
}

impl PgApiKeyRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ApiKeyRepository for PgApiKeyRepository {
    async fn insert(&self, row: ApiKeyRow) -> ApiKeyResult<ApiKeyRow> {
        let model = ActiveModel {
            key_id: Set(row.key_id),
            tenant_id: Set(row.tenant_id),
            cluster_name: Set(row.cluster_name),
            salt: Set(row.salt),
            secret_hash: Set(row.secret_hash),
            scopes: Set(row.scopes),
            expires_at: Set(row.expires_at.map(Into::into)),
            revoked: Set(row.revoked),
            created_at: Set(row.created_at.into()),
        };
        Ok(model.insert(&self.db).await?.into())
    }

    async fn find_by_key_id(&self, key_id: &str) -> ApiKeyResult<Option<ApiKeyRow>> {
        let result = Entity::find_by_id(key_id.to_string())
            .one(&self.db)
            .await?
            .map(Into::into);
        Ok(result)
    }

    async fn revoke(&self, key_id: &str) -> ApiKeyResult<()> {
        if let Some(existing) = Entity::find_by_id(key_id.to_string()).one(&self.db).await? {
            let mut model: ActiveModel = existing.into();
            model.revoked = Set(true);
            model.update(&self.db).await?;
        }
        Ok(())
    }
}
