pub use sea_orm_migration::prelude::*;

mod m20241128_000000_bootstrap;
mod m20260101_000000_create_tenants_and_plans;
mod m20260101_000001_create_users;
mod m20260101_000002_create_api_keys;
mod m20260101_000003_create_pricing;
mod m20260101_000004_create_timeseries;
mod m20260101_000005_create_recommendations;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20241128_000000_bootstrap::Migration),
            Box::new(m20260101_000000_create_tenants_and_plans::Migration),
            Box::new(m20260101_000001_create_users::Migration),
            Box::new(m20260101_000002_create_api_keys::Migration),
            Box::new(m20260101_000003_create_pricing::Migration),
            Box::new(m20260101_000004_create_timeseries::Migration),
            Box::new(m20260101_000005_create_recommendations::Migration),
        ]
    }
}
