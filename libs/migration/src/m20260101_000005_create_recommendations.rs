use sea_orm_migration::sea_query::extension::postgres::Type;
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_type(
                Type::create()
                    .as_enum(RecommendationResourceType::Enum)
                    .values([
                        RecommendationResourceType::Cpu,
                        RecommendationResourceType::Memory,
                    ])
                    .to_owned(),
            )
            .await?;

        manager
            .create_type(
                Type::create()
                    .as_enum(RecommendationStatus::Enum)
                    .values([
                        RecommendationStatus::Open,
                        RecommendationStatus::Applied,
                        RecommendationStatus::Dismissed,
                    ])
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Recommendations::Table)
                    .if_not_exists()
                    .col(pk_uuid(Recommendations::Id))
                    .col(uuid(Recommendations::TenantId))
                    .col(string(Recommendations::Cluster))
                    .col(string(Recommendations::Namespace))
                    .col(string(Recommendations::Pod))
                    .col(
                        ColumnDef::new(Recommendations::ResourceType)
                            .enumeration(
                                RecommendationResourceType::Enum,
                                [
                                    RecommendationResourceType::Cpu,
                                    RecommendationResourceType::Memory,
                                ],
                            )
                            .not_null(),
                    )
                    .col(double(Recommendations::CurrentRequest))
                    .col(double(Recommendations::RecommendedRequest))
                    .col(double(Recommendations::PotentialSavingsUsd))
                    .col(double(Recommendations::Confidence))
                    .col(text(Recommendations::Reason))
                    .col(
                        ColumnDef::new(Recommendations::Status)
                            .enumeration(
                                RecommendationStatus::Enum,
                                [
                                    RecommendationStatus::Open,
                                    RecommendationStatus::Applied,
                                    RecommendationStatus::Dismissed,
                                ],
                            )
                            .not_null()
                            .default("open"),
                    )
                    .col(
                        timestamp_with_time_zone(Recommendations::CreatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_recommendations_tenant_id")
                            .from(Recommendations::Table, Recommendations::TenantId)
                            .to(Tenants::Table, Tenants::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // At most one open recommendation per (tenant, cluster, namespace, pod, resource_type).
        manager
            .get_connection()
            .execute_unprepared(
                r#"
                CREATE UNIQUE INDEX uq_recommendations_one_open_per_pod_resource
                    ON recommendations (tenant_id, cluster, namespace, pod, resource_type)
                    WHERE status = 'open'
                "#,
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_recommendations_tenant_status")
                    .table(Recommendations::Table)
                    .col(Recommendations::TenantId)
                    .col(Recommendations::Status)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Recommendations::Table).to_owned())
            .await?;

        manager
            .drop_type(Type::drop().name(RecommendationStatus::Enum).to_owned())
            .await?;

        manager
            .drop_type(Type::drop().name(RecommendationResourceType::Enum).to_owned())
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
enum Recommendations {
    Table,
    Id,
    TenantId,
    Cluster,
    Namespace,
    Pod,
    ResourceType,
    CurrentRequest,
    RecommendedRequest,
    PotentialSavingsUsd,
    Confidence,
    Reason,
    Status,
    CreatedAt,
}

#[derive(DeriveIden)]
enum RecommendationResourceType {
    #[sea_orm(iden = "recommendation_resource_type")]
    Enum,
    #[sea_orm(iden = "cpu")]
    Cpu,
    #[sea_orm(iden = "memory")]
    Memory,
}

#[derive(DeriveIden)]
enum RecommendationStatus {
    #[sea_orm(iden = "recommendation_status")]
    Enum,
    #[sea_orm(iden = "open")]
    Open,
    #[sea_orm(iden = "applied")]
    Applied,
    #[sea_orm(iden = "dismissed")]
    Dismissed,
}
