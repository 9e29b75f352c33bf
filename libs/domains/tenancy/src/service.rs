use std::sync::Arc;

use uuid::Uuid;

use crate::error::{TenantError, TenantResult};
use crate::models::{CreatePlan, CreateTenant, CreateUser, IngestUsage, Plan, Tenant, User};
use crate::repository::TenantRepository;

/// Tenant / plan / user provisioning (§3). Plan-limit enforcement at ingest time is a separate,
/// pure concern: see [`PlanGate`].
#[derive(Clone)]
pub struct TenancyService<R: TenantRepository> {
    repository: Arc<R>,
}

impl<R: TenantRepository> TenancyService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    pub async fn create_plan(&self, input: CreatePlan) -> TenantResult<Plan> {
        self.repository.create_plan(input).await
    }

    pub async fn list_plans(&self) -> TenantResult<Vec<Plan>> {
        self.repository.list_plans().await
    }

    pub async fn create_tenant(&self, input: CreateTenant) -> TenantResult<Tenant> {
        self.repository
            .get_plan(input.plan_id)
            .await?
            .ok_or_else(|| TenantError::PlanNotFound(input.plan_id.to_string()))?;
        self.repository.create_tenant(input).await
    }

    pub async fn list_tenants(&self) -> TenantResult<Vec<Tenant>> {
        self.repository.list_tenants().await
    }

    pub async fn get_user_by_external_identity(
        &self,
        tenant_id: Uuid,
        external_identity: &str,
    ) -> TenantResult<Option<User>> {
        self.repository
            .get_user_by_external_identity(tenant_id, external_identity)
            .await
    }

    pub async fn get_tenant(&self, tenant_id: Uuid) -> TenantResult<Tenant> {
        self.repository
            .get_tenant(tenant_id)
            .await?
            .ok_or_else(|| TenantError::TenantNotFound(tenant_id.to_string()))
    }

    /// Enforces `user_limit` at provisioning time (§4.3). At-most-one-active-owner is enforced
    /// by the `uq_users_one_active_owner_per_tenant` partial unique index; a violation surfaces
    /// here as [`TenantError::DuplicateOwner`].
    pub async fn create_user(&self, tenant_id: Uuid, input: CreateUser) -> TenantResult<User> {
        let plan = self
            .repository
            .get_tenant_plan(tenant_id)
            .await?
            .ok_or_else(|| TenantError::TenantNotFound(tenant_id.to_string()))?;

        if plan.user_limit >= 0 {
            let active = self.repository.count_active_users(tenant_id).await?;
            if active >= plan.user_limit as i64 {
                return Err(TenantError::PlanLimitExceeded {
                    reason: format!(
                        "user_limit {} reached ({active} active users)",
                        plan.user_limit
                    ),
                });
            }
        }

        self.repository.create_user(tenant_id, input).await
    }

    pub async fn suspend_user(&self, user_id: Uuid) -> TenantResult<()> {
        self.repository.suspend_user(user_id).await
    }

    pub async fn plan_for_tenant(&self, tenant_id: Uuid) -> TenantResult<Plan> {
        self.repository
            .get_tenant_plan(tenant_id)
            .await?
            .ok_or_else(|| TenantError::TenantNotFound(tenant_id.to_string()))
    }
}

/// The C3 ingest-time gate. A pure function over a plan and usage counts the caller has already
/// gathered from the timeseries store — it never queries another domain's tables directly, so
/// this crate stays decoupled from `domain_timeseries` (§4.3).
pub struct PlanGate;

impl PlanGate {
    pub fn check_ingest(plan: &Plan, usage: IngestUsage) -> TenantResult<()> {
        let effective_cluster_count = usage.active_cluster_count
            + if usage.incoming_cluster_is_new { 1 } else { 0 };
        if plan.cluster_limit >= 0 && effective_cluster_count > plan.cluster_limit as i64 {
            return Err(TenantError::PlanLimitExceeded {
                reason: format!(
                    "cluster_limit {} exceeded ({} active clusters including this request)",
                    plan.cluster_limit, effective_cluster_count
                ),
            });
        }
        if plan.node_limit >= 0 && usage.node_count_last_24h > plan.node_limit as i64 {
            return Err(TenantError::PlanLimitExceeded {
                reason: format!(
                    "node_limit {} exceeded ({} nodes observed in the last 24h)",
                    plan.node_limit, usage.node_count_last_24h
                ),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plan(cluster_limit: i32, node_limit: i32) -> Plan {
        Plan {
            id: Uuid::new_v4(),
            name: "starter".into(),
            cluster_limit,
            node_limit,
            user_limit: -1,
            retention_days: 30,
            created_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn unlimited_plan_never_rejects() {
        let p = plan(-1, -1);
        let usage = IngestUsage {
            active_cluster_count: 500,
            node_count_last_24h: 10_000,
            incoming_cluster_is_new: true,
        };
        assert!(PlanGate::check_ingest(&p, usage).is_ok());
    }

    #[test]
    fn cluster_limit_rejects_second_cluster() {
        let p = plan(1, -1);
        let usage = IngestUsage {
            active_cluster_count: 2,
            node_count_last_24h: 1,
            incoming_cluster_is_new: false,
        };
        assert!(matches!(
            PlanGate::check_ingest(&p, usage),
            Err(TenantError::PlanLimitExceeded { .. })
        ));
    }

    #[test]
    fn node_limit_rejects_excess_nodes() {
        let p = plan(-1, 10);
        let usage = IngestUsage {
            active_cluster_count: 1,
            node_count_last_24h: 11,
            incoming_cluster_is_new: false,
        };
        assert!(matches!(
            PlanGate::check_ingest(&p, usage),
            Err(TenantError::PlanLimitExceeded { .. })
        ));
    }

    /// Starter plan (`cluster_limit=1`): a second, never-before-seen cluster must be rejected
    /// on its very first request, not just from the third cluster onward.
    #[test]
    fn cluster_limit_rejects_brand_new_second_cluster_immediately() {
        let p = plan(1, -1);
        let usage = IngestUsage {
            active_cluster_count: 1,
            node_count_last_24h: 1,
            incoming_cluster_is_new: true,
        };
        assert!(matches!(
            PlanGate::check_ingest(&p, usage),
            Err(TenantError::PlanLimitExceeded { .. })
        ));
    }

    #[test]
    fn cluster_limit_allows_repeat_ingest_from_known_cluster() {
        let p = plan(1, -1);
        let usage = IngestUsage {
            active_cluster_count: 1,
            node_count_last_24h: 1,
            incoming_cluster_is_new: false,
        };
        assert!(PlanGate::check_ingest(&p, usage).is_ok());
    }
}
