use async_trait::async_trait;
use chrono::{DateTime, Utc};
use domain_tenancy::TenantContext;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter, QuerySelect,
    Set,
};

use crate::entity::{node_sample, pod_sample};
use crate::error::TimeseriesResult;
use crate::models::{NodeSample, PodSample, TimeWindow};
use crate::repository::TimeseriesRepository;

#[derive(Clone)]
pub struct PgTimeseriesRepository {
    db: DatabaseConnection,
}

impl PgTimeseriesRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn tenant_cond<C: ColumnTrait>(ctx: &TenantContext, column: C) -> Condition {
    match ctx.tenant_filter() {
        Some(tenant_id) => Condition::all().add(column.eq(tenant_id)),
        None => Condition::all(),
    }
}

#[async_trait]
impl TimeseriesRepository for PgTimeseriesRepository {
    async fn insert_pod_sample(&self, _ctx: &TenantContext, row: PodSample) -> TimeseriesResult<()> {
        let model = pod_sample::ActiveModel {
            id: Set(row.id),
            time: Set(row.time.into()),
            tenant_id: Set(row.tenant_id),
            cluster: Set(row.cluster),
            namespace: Set(row.namespace),
            pod: Set(row.pod),
            node: Set(row.node),
            controller: Set(row.controller),
            cpu_millicores_usage: Set(row.cpu_millicores_usage),
            mem_bytes_usage: Set(row.mem_bytes_usage),
            cpu_millicores_request: Set(row.cpu_millicores_request),
            mem_bytes_request: Set(row.mem_bytes_request),
            cpu_millicores_limit: Set(row.cpu_millicores_limit),
            mem_bytes_limit: Set(row.mem_bytes_limit),
            labels: Set(serde_json::to_value(&row.labels).unwrap_or_default()),
            phase: Set(row.phase),
            qos_class: Set(row.qos_class),
            containers: Set(serde_json::to_value(&row.containers).unwrap_or_default()),
        };
        model.insert(&self.db).await?;
        Ok(())
    }

    async fn insert_node_sample(&self, _ctx: &TenantContext, row: NodeSample) -> TimeseriesResult<()> {
        let model = node_sample::ActiveModel {
            id: Set(row.id),
            time: Set(row.time.into()),
            tenant_id: Set(row.tenant_id),
            cluster: Set(row.cluster),
            node: Set(row.node),
            instance_type: Set(row.instance_type),
            cpu_capacity_millicores: Set(row.cpu_capacity_millicores),
            mem_capacity_bytes: Set(row.mem_capacity_bytes),
            hourly_cost_usd_hint: Set(row.hourly_cost_usd_hint),
        };
        model.insert(&self.db).await?;
        Ok(())
    }

    async fn scan_pod(
        &self,
        ctx: &TenantContext,
        cluster: Option<&str>,
        window: TimeWindow,
    ) -> TimeseriesResult<Vec<PodSample>> {
        let mut cond = tenant_cond(ctx, pod_sample::Column::TenantId)
            .add(pod_sample::Column::Time.gte(window.start))
            .add(pod_sample::Column::Time.lt(window.end));
        if let Some(cluster) = cluster {
            cond = cond.add(pod_sample::Column::Cluster.eq(cluster));
        }
        let rows = pod_sample::Entity::find()
            .filter(cond)
            .all(&self.db)
            .await?
            .into_iter()
            .map(Into::into)
            .collect();
        Ok(rows)
    }

    async fn scan_node(
        &self,
        ctx: &TenantContext,
        cluster: Option<&str>,
        window: TimeWindow,
    ) -> TimeseriesResult<Vec<NodeSample>> {
        let mut cond = tenant_cond(ctx, node_sample::Column::TenantId)
            .add(node_sample::Column::Time.gte(window.start))
            .add(node_sample::Column::Time.lt(window.end));
        if let Some(cluster) = cluster {
            cond = cond.add(node_sample::Column::Cluster.eq(cluster));
        }
        let rows = node_sample::Entity::find()
            .filter(cond)
            .all(&self.db)
            .await?
            .into_iter()
            .map(Into::into)
            .collect();
        Ok(rows)
    }

    async fn distinct_active_clusters(
        &self,
        ctx: &TenantContext,
        window: TimeWindow,
    ) -> TimeseriesResult<Vec<String>> {
        let cond = tenant_cond(ctx, pod_sample::Column::TenantId)
            .add(pod_sample::Column::Time.gte(window.start))
            .add(pod_sample::Column::Time.lt(window.end));
        let rows: Vec<(String,)> = pod_sample::Entity::find()
            .filter(cond)
            .select_only()
            .column(pod_sample::Column::Cluster)
            .distinct()
            .into_tuple()
            .all(&self.db)
            .await?;
        Ok(rows.into_iter().map(|(c,)| c).collect())
    }

    async fn distinct_nodes(
        &self,
        ctx: &TenantContext,
        window: TimeWindow,
    ) -> TimeseriesResult<Vec<String>> {
        let cond = tenant_cond(ctx, pod_sample::Column::TenantId)
            .add(pod_sample::Column::Time.gte(window.start))
            .add(pod_sample::Column::Time.lt(window.end));
        let rows: Vec<(String,)> = pod_sample::Entity::find()
            .filter(cond)
            .select_only()
            .column(pod_sample::Column::Node)
            .distinct()
            .into_tuple()
            .all(&self.db)
            .await?;
        Ok(rows.into_iter().map(|(n,)| n).collect())
    }

    async fn delete_older_than(&self, ctx: &TenantContext, cutoff: DateTime<Utc>) -> TimeseriesResult<u64> {
        let cond =
            tenant_cond(ctx, pod_sample::Column::TenantId).add(pod_sample::Column::Time.lt(cutoff));
        let pod_deleted = pod_sample::Entity::delete_many()
            .filter(cond)
            .exec(&self.db)
            .await?
            .rows_affected;

        let cond =
            tenant_cond(ctx, node_sample::Column::TenantId).add(node_sample::Column::Time.lt(cutoff));
        let node_deleted = node_sample::Entity::delete_many()
            .filter(cond)
            .exec(&self.db)
            .await?
            .rows_affected;

        Ok(pod_deleted + node_deleted)
    }
}
