use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(PodSamples::Table)
                    .if_not_exists()
                    .col(pk_uuid(PodSamples::Id))
                    .col(timestamp_with_time_zone(PodSamples::Time))
                    .col(uuid(PodSamples::TenantId))
                    .col(string(PodSamples::Cluster))
                    .col(string(PodSamples::Namespace))
                    .col(string(PodSamples::Pod))
                    .col(string(PodSamples::Node))
                    .col(string(PodSamples::Controller).default(""))
                    .col(big_integer(PodSamples::CpuMillicoresUsage))
                    .col(big_integer(PodSamples::MemBytesUsage))
                    .col(big_integer(PodSamples::CpuMillicoresRequest))
                    .col(big_integer(PodSamples::MemBytesRequest))
                    .col(big_integer(PodSamples::CpuMillicoresLimit))
                    .col(big_integer(PodSamples::MemBytesLimit))
                    .col(json(PodSamples::Labels).default("{}"))
                    .col(string(PodSamples::Phase))
                    .col(string(PodSamples::QosClass))
                    .col(json(PodSamples::Containers).default("[]"))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_pod_samples_tenant_id")
                            .from(PodSamples::Table, PodSamples::TenantId)
                            .to(Tenants::Table, Tenants::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_pod_samples_tenant_cluster_time")
                    .table(PodSamples::Table)
                    .col(PodSamples::TenantId)
                    .col(PodSamples::Cluster)
                    .col(PodSamples::Time)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_pod_samples_tenant_namespace_pod_time")
                    .table(PodSamples::Table)
                    .col(PodSamples::TenantId)
                    .col(PodSamples::Namespace)
                    .col(PodSamples::Pod)
                    .col(PodSamples::Time)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(NodeSamples::Table)
                    .if_not_exists()
                    .col(pk_uuid(NodeSamples::Id))
                    .col(timestamp_with_time_zone(NodeSamples::Time))
                    .col(uuid(NodeSamples::TenantId))
                    .col(string(NodeSamples::Cluster))
                    .col(string(NodeSamples::Node))
                    .col(string(NodeSamples::InstanceType))
                    .col(big_integer(NodeSamples::CpuCapacityMillicores))
                    .col(big_integer(NodeSamples::MemCapacityBytes))
                    .col(double_null(NodeSamples::HourlyCostUsdHint))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_node_samples_tenant_id")
                            .from(NodeSamples::Table, NodeSamples::TenantId)
                            .to(Tenants::Table, Tenants::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_node_samples_tenant_cluster_node_time")
                    .table(NodeSamples::Table)
                    .col(NodeSamples::TenantId)
                    .col(NodeSamples::Cluster)
                    .col(NodeSamples::Node)
                    .col(NodeSamples::Time)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(NodeSamples::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(PodSamples::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Tenants {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum PodSamples {
    Table,
    Id,
    Time,
    TenantId,
    Cluster,
    Namespace,
    Pod,
    Node,
    Controller,
    CpuMillicoresUsage,
    MemBytesUsage,
    CpuMillicoresRequest,
    MemBytesRequest,
    CpuMillicoresLimit,
    MemBytesLimit,
    Labels,
    Phase,
    QosClass,
    Containers,
}

#[derive(DeriveIden)]
enum NodeSamples {
    Table,
    Id,
    Time,
    TenantId,
    Cluster,
    Node,
    InstanceType,
    CpuCapacityMillicores,
    MemCapacityBytes,
    HourlyCostUsdHint,
}
