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
                    .as_enum(ResourceType::Enum)
                    .values([
                        ResourceType::Cpu,
                        ResourceType::Memory,
                        ResourceType::Gpu,
                        ResourceType::Storage,
                        ResourceType::Network,
                    ])
                    .to_owned(),
            )
            .await?;

        manager
            .create_type(
                Type::create()
                    .as_enum(PricingTier::Enum)
                    .values([
                        PricingTier::OnDemand,
                        PricingTier::Spot,
                        PricingTier::Preemptible,
                        PricingTier::Reserved1yr,
                        PricingTier::Reserved3yr,
                    ])
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(PricingConfigs::Table)
                    .if_not_exists()
                    .col(pk_uuid(PricingConfigs::Id))
                    .col(uuid(PricingConfigs::TenantId))
                    .col(string(PricingConfigs::Name))
                    .col(string(PricingConfigs::Provider))
                    .col(string_null(PricingConfigs::Region))
                    .col(boolean(PricingConfigs::IsDefault).default(false))
                    .col(
                        timestamp_with_time_zone(PricingConfigs::CreatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        timestamp_with_time_zone(PricingConfigs::UpdatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_pricing_configs_tenant_id")
                            .from(PricingConfigs::Table, PricingConfigs::TenantId)
                            .to(Tenants::Table, Tenants::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // At most one default pricing config per tenant.
        manager
            .get_connection()
            .execute_unprepared(
                r#"
                CREATE UNIQUE INDEX uq_pricing_configs_one_default_per_tenant
                    ON pricing_configs (tenant_id)
                    WHERE is_default
                "#,
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(PricingRates::Table)
                    .if_not_exists()
                    .col(pk_uuid(PricingRates::Id))
                    .col(uuid(PricingRates::PricingConfigId))
                    .col(
                        ColumnDef::new(PricingRates::ResourceType)
                            .enumeration(
                                ResourceType::Enum,
                                [
                                    ResourceType::Cpu,
                                    ResourceType::Memory,
                                    ResourceType::Gpu,
                                    ResourceType::Storage,
                                    ResourceType::Network,
                                ],
                            )
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PricingRates::Tier)
                            .enumeration(
                                PricingTier::Enum,
                                [
                                    PricingTier::OnDemand,
                                    PricingTier::Spot,
                                    PricingTier::Preemptible,
                                    PricingTier::Reserved1yr,
                                    PricingTier::Reserved3yr,
                                ],
                            )
                            .not_null(),
                    )
                    .col(string_null(PricingRates::InstanceFamily))
                    .col(string(PricingRates::Unit))
                    .col(double(PricingRates::CostPerUnit))
                    .col(timestamp_with_time_zone(PricingRates::EffectiveFrom))
                    .col(timestamp_with_time_zone_null(PricingRates::EffectiveTo))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_pricing_rates_config_id")
                            .from(PricingRates::Table, PricingRates::PricingConfigId)
                            .to(PricingConfigs::Table, PricingConfigs::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_pricing_rates_config_lookup")
                    .table(PricingRates::Table)
                    .col(PricingRates::PricingConfigId)
                    .col(PricingRates::ResourceType)
                    .col(PricingRates::Tier)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ClusterPricing::Table)
                    .if_not_exists()
                    .col(uuid(ClusterPricing::TenantId))
                    .col(string(ClusterPricing::ClusterName))
                    .col(uuid(ClusterPricing::ConfigId))
                    .primary_key(
                        Index::create()
                            .col(ClusterPricing::TenantId)
                            .col(ClusterPricing::ClusterName),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_cluster_pricing_tenant_id")
                            .from(ClusterPricing::Table, ClusterPricing::TenantId)
                            .to(Tenants::Table, Tenants::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_cluster_pricing_config_id")
                            .from(ClusterPricing::Table, ClusterPricing::ConfigId)
                            .to(PricingConfigs::Table, PricingConfigs::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(NodePricingOverrides::Table)
                    .if_not_exists()
                    .col(uuid(NodePricingOverrides::TenantId))
                    .col(string(NodePricingOverrides::ClusterName))
                    .col(string(NodePricingOverrides::Node))
                    .col(double(NodePricingOverrides::HourlyCostOverride))
                    .col(
                        timestamp_with_time_zone(NodePricingOverrides::CreatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .primary_key(
                        Index::create()
                            .col(NodePricingOverrides::TenantId)
                            .col(NodePricingOverrides::ClusterName)
                            .col(NodePricingOverrides::Node),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_node_pricing_overrides_tenant_id")
                            .from(NodePricingOverrides::Table, NodePricingOverrides::TenantId)
                            .to(Tenants::Table, Tenants::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .get_connection()
            .execute_unprepared(
                r#"
                CREATE TRIGGER pricing_configs_touch_updated_at
                    BEFORE UPDATE ON pricing_configs
                    FOR EACH ROW
                    EXECUTE FUNCTION util.touch_updated_at()
                "#,
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared(
                "DROP TRIGGER IF EXISTS pricing_configs_touch_updated_at ON pricing_configs",
            )
            .await?;

        manager
            .drop_table(Table::drop().table(NodePricingOverrides::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(ClusterPricing::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(PricingRates::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(PricingConfigs::Table).to_owned())
            .await?;

        manager
            .drop_type(Type::drop().name(PricingTier::Enum).to_owned())
            .await?;

        manager
            .drop_type(Type::drop().name(ResourceType::Enum).to_owned())
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
enum PricingConfigs {
    Table,
    Id,
    TenantId,
    Name,
    Provider,
    Region,
    IsDefault,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum PricingRates {
    Table,
    Id,
    PricingConfigId,
    ResourceType,
    Tier,
    InstanceFamily,
    Unit,
    CostPerUnit,
    EffectiveFrom,
    EffectiveTo,
}

#[derive(DeriveIden)]
enum ClusterPricing {
    Table,
    TenantId,
    ClusterName,
    ConfigId,
}

#[derive(DeriveIden)]
enum NodePricingOverrides {
    Table,
    TenantId,
    ClusterName,
    Node,
    HourlyCostOverride,
    CreatedAt,
}

#[derive(DeriveIden)]
enum ResourceType {
    #[sea_orm(iden = "allocation_resource_type")]
    Enum,
    #[sea_orm(iden = "cpu")]
    Cpu,
    #[sea_orm(iden = "memory")]
    Memory,
    #[sea_orm(iden = "gpu")]
    Gpu,
    #[sea_orm(iden = "storage")]
    Storage,
    #[sea_orm(iden = "network")]
    Network,
}

#[derive(DeriveIden)]
enum PricingTier {
    #[sea_orm(iden = "pricing_tier")]
    Enum,
    #[sea_orm(iden = "on_demand")]
    OnDemand,
    #[sea_orm(iden = "spot")]
    Spot,
    #[sea_orm(iden = "preemptible")]
    Preemptible,
    #[sea_orm(iden = "reserved_1yr")]
    Reserved1yr,
    #[sea_orm(iden = "reserved_3yr")]
    Reserved3yr,
}
