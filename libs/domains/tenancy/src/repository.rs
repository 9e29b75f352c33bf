use async_trait::async_trait;
use uuid::Uuid;

use crate::error::TenantResult;
use crate::models::{CreatePlan, CreateTenant, CreateUser, Plan, Tenant, User};

/// Persistence for tenants, plans and users (§3, §4.3).
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TenantRepository: Send + Sync {
    async fn create_plan(&self, input: CreatePlan) -> TenantResult<Plan>;
    async fn get_plan(&self, plan_id: Uuid) -> TenantResult<Option<Plan>>;
    async fn list_plans(&self) -> TenantResult<Vec<Plan>>;

    async fn create_tenant(&self, input: CreateTenant) -> TenantResult<Tenant>;
    async fn get_tenant(&self, tenant_id: Uuid) -> TenantResult<Option<Tenant>>;
    /// All provisioned tenants; used by the retention-compaction job to iterate tenants under
    /// admin bypass (§4.3, §4.8).
    async fn list_tenants(&self) -> TenantResult<Vec<Tenant>>;
    async fn get_tenant_plan(&self, tenant_id: Uuid) -> TenantResult<Option<Plan>>;

    async fn create_user(&self, tenant_id: Uuid, input: CreateUser) -> TenantResult<User>;
    async fn get_user(&self, user_id: Uuid) -> TenantResult<Option<User>>;
    async fn get_user_by_external_identity(
        &self,
        tenant_id: Uuid,
        external_identity: &str,
    ) -> TenantResult<Option<User>>;
    async fn count_active_users(&self, tenant_id: Uuid) -> TenantResult<i64>;
    async fn suspend_user(&self, user_id: Uuid) -> TenantResult<()>;
}
