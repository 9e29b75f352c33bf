//! Background retention-compaction job (§4.3, §5's "graceful shutdown" note).
//!
//! Runs hourly under admin bypass, deleting samples older than each tenant's plan
//! `retention_days`.

use domain_tenancy::TenantContext;
use domain_timeseries::TimeseriesRepository;
use tokio_cron_scheduler::{Job, JobScheduler};

use crate::state::AppState;

pub async fn start(state: AppState) -> eyre::Result<JobScheduler> {
    let scheduler = JobScheduler::new().await?;

    let job = Job::new_async("0 0 * * * *", move |_uuid, _l| {
        let state = state.clone();
        Box::pin(async move {
            if let Err(err) = run_once(&state).await {
                tracing::error!(error = %err, "retention compaction failed");
            }
        })
    })?;

    scheduler.add(job).await?;
    scheduler.start().await?;
    Ok(scheduler)
}

async fn run_once(state: &AppState) -> eyre::Result<()> {
    let tenants = state.tenancy.list_tenants().await?;

    for tenant in tenants {
        let plan = match state.tenancy.plan_for_tenant(tenant.id).await {
            Ok(plan) => plan,
            Err(err) => {
                tracing::warn!(tenant_id = %tenant.id, error = %err, "skipping retention for tenant: no plan");
                continue;
            }
        };
        if plan.retention_days < 0 {
            continue;
        }

        let ctx = TenantContext::bound(tenant.id);
        let cutoff = chrono::Utc::now() - chrono::Duration::days(plan.retention_days as i64);
        match state.timeseries_store.delete_older_than(&ctx, cutoff).await {
            Ok(deleted) => {
                if deleted > 0 {
                    tracing::info!(tenant_id = %tenant.id, deleted, "retention compaction deleted samples");
                }
            }
            Err(err) => {
                tracing::error!(tenant_id = %tenant.id, error = %err, "retention compaction delete failed");
            }
        }
    }

    Ok(())
}
