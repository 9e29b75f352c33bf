use async_trait::async_trait;
use domain_tenancy::TenantContext;

use crate::error::TimeseriesResult;
use crate::models::{NodeSample, PodSample, TimeWindow};

/// The C5 store adapter: an append-only, tenant-scoped narrow interface over pod/node samples.
/// Every method takes a [`TenantContext`] and applies it as an explicit query predicate rather
/// than relying solely on a database session variable (§4.5, §9).
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TimeseriesRepository: Send + Sync {
    async fn insert_pod_sample(&self, ctx: &TenantContext, row: PodSample) -> TimeseriesResult<()>;
    async fn insert_node_sample(&self, ctx: &TenantContext, row: NodeSample) -> TimeseriesResult<()>;

    async fn scan_pod(
        &self,
        ctx: &TenantContext,
        cluster: Option<&str>,
        window: TimeWindow,
    ) -> TimeseriesResult<Vec<PodSample>>;

    async fn scan_node(
        &self,
        ctx: &TenantContext,
        cluster: Option<&str>,
        window: TimeWindow,
    ) -> TimeseriesResult<Vec<NodeSample>>;

    /// Distinct clusters with at least one pod sample in `window`; feeds the C3 plan gate's
    /// `cluster_limit` check.
    async fn distinct_active_clusters(
        &self,
        ctx: &TenantContext,
        window: TimeWindow,
    ) -> TimeseriesResult<Vec<String>>;

    /// Distinct nodes observed in `window`; feeds the C3 plan gate's `node_limit` check.
    async fn distinct_nodes(
        &self,
        ctx: &TenantContext,
        window: TimeWindow,
    ) -> TimeseriesResult<Vec<String>>;

    /// Deletes samples older than `cutoff` for the bound tenant (or, under admin bypass, across
    /// every tenant at once). The retention-compaction job calls this once per tenant with that
    /// tenant's own plan-derived cutoff, since `retention_days` varies by plan (§4.3, §4.8).
    async fn delete_older_than(
        &self,
        ctx: &TenantContext,
        cutoff: chrono::DateTime<chrono::Utc>,
    ) -> TimeseriesResult<u64>;
}
