use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ApiKeys::Table)
                    .if_not_exists()
                    .col(string(ApiKeys::KeyId).primary_key())
                    .col(uuid(ApiKeys::TenantId))
                    .col(string(ApiKeys::ClusterName))
                    .col(binary(ApiKeys::Salt))
                    .col(binary(ApiKeys::SecretHash))
                    .col(
                        ColumnDef::new(ApiKeys::Scopes)
                            .array(ColumnType::Text)
                            .null(),
                    )
                    .col(timestamp_with_time_zone_null(ApiKeys::ExpiresAt))
                    .col(boolean(ApiKeys::Revoked).default(false))
                    .col(
                        timestamp_with_time_zone(ApiKeys::CreatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_api_keys_tenant_id")
                            .from(ApiKeys::Table, ApiKeys::TenantId)
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
                    .name("idx_api_keys_tenant_cluster")
                    .table(ApiKeys::Table)
                    .col(ApiKeys::TenantId)
                    .col(ApiKeys::ClusterName)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ApiKeys::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum ApiKeys {
    Table,
    KeyId,
    TenantId,
    ClusterName,
    Salt,
    SecretHash,
    Scopes,
    ExpiresAt,
    Revoked,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Tenants {
    Table,
    Id,
}
