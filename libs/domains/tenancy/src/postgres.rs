use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, Set,
};
use uuid::Uuid;

use crate::entity::{plan, tenant, user};
use crate::error::{TenantError, TenantResult};
use crate::models::{CreatePlan, CreateTenant, CreateUser, Plan, Tenant, User, UserStatus};
use crate::repository::TenantRepository;

#[derive(Clone)]
pub struct PgTenantRepository {
    db: DatabaseConnection,
}

impl PgTenantRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl TenantRepository for PgTenantRepository {
    async fn create_plan(&self, input: CreatePlan) -> TenantResult<Plan> {
        let model = plan::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(input.name),
            cluster_limit: Set(input.cluster_limit),
            node_limit: Set(input.node_limit),
            user_limit: Set(input.user_limit),
            retention_days: Set(input.retention_days),
            ..Default::default()
        };
        Ok(model.insert(&self.db).await?.into())
    }

    async fn get_plan(&self, plan_id: Uuid) -> TenantResult<Option<Plan>> {
        Ok(plan::Entity::find_by_id(plan_id)
            .one(&self.db)
            .await?
            .map(Into::into))
    }

    async fn list_plans(&self) -> TenantResult<Vec<Plan>> {
        Ok(plan::Entity::find()
            .all(&self.db)
            .await?
            .into_iter()
            .map(Into::into)
            .collect())
    }

    async fn create_tenant(&self, input: CreateTenant) -> TenantResult<Tenant> {
        let model = tenant::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(input.name),
            plan_id: Set(input.plan_id),
            ..Default::default()
        };
        Ok(model.insert(&self.db).await?.into())
    }

    async fn get_tenant(&self, tenant_id: Uuid) -> TenantResult<Option<Tenant>> {
        Ok(tenant::Entity::find_by_id(tenant_id)
            .one(&self.db)
            .await?
            .map(Into::into))
    }

    async fn list_tenants(&self) -> TenantResult<Vec<Tenant>> {
        Ok(tenant::Entity::find()
            .all(&self.db)
            .await?
            .into_iter()
            .map(Into::into)
            .collect())
    }

    async fn get_tenant_plan(&self, tenant_id: Uuid) -> TenantResult<Option<Plan>> {
        let Some(tenant) = tenant::Entity::find_by_id(tenant_id).one(&self.db).await? else {
            return Ok(None);
        };
        Ok(plan::Entity::find_by_id(tenant.plan_id)
            .one(&self.db)
            .await?
            .map(Into::into))
    }

    async fn create_user(&self, tenant_id: Uuid, input: CreateUser) -> TenantResult<User> {
        let model = user::ActiveModel {
            id: Set(Uuid::new_v4()),
            tenant_id: Set(tenant_id),
            external_identity: Set(input.external_identity),
            email: Set(input.email),
            role: Set(input.role),
            status: Set(UserStatus::Active),
            ..Default::default()
        };
        model.insert(&self.db).await.map(Into::into).map_err(|err| {
            if is_unique_violation(&err) {
                TenantError::DuplicateOwner
            } else {
                err.into()
            }
        })
    }

    async fn get_user(&self, user_id: Uuid) -> TenantResult<Option<User>> {
        Ok(user::Entity::find_by_id(user_id)
            .one(&self.db)
            .await?
            .map(Into::into))
    }

    async fn get_user_by_external_identity(
        &self,
        tenant_id: Uuid,
        external_identity: &str,
    ) -> TenantResult<Option<User>> {
        Ok(user::Entity::find()
            .filter(user::Column::TenantId.eq(tenant_id))
            .filter(user::Column::ExternalIdentity.eq(external_identity))
            .one(&self.db)
            .await?
            .map(Into::into))
    }

    async fn count_active_users(&self, tenant_id: Uuid) -> TenantResult<i64> {
        let count = user::Entity::find()
            .filter(user::Column::TenantId.eq(tenant_id))
            .filter(user::Column::Status.eq(UserStatus::Active))
            .count(&self.db)
            .await?;
        Ok(count as i64)
    }

    async fn suspend_user(&self, user_id: Uuid) -> TenantResult<()> {
        if let Some(existing) = user::Entity::find_by_id(user_id).one(&self.db).await? {
            let mut model: user::ActiveModel = existing.into();
            model.status = Set(UserStatus::Suspended);
            model.update(&self.db).await?;
        }
        Ok(())
    }
}

fn is_unique_violation(err: &sea_orm::DbErr) -> bool {
    err.sql_err()
        .is_some_and(|e| matches!(e, sea_orm::SqlErr::UniqueConstraintViolation(_)))
}
