//! Sea-ORM entities for the pricing tables.

pub mod pricing_config {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel, serde::Serialize, serde::Deserialize)]
    #[sea_orm(table_name = "pricing_configs")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: Uuid,
        pub tenant_id: Uuid,
        #[sea_orm(column_type = "String(StringLen::N(255))")]
        pub name: String,
        #[sea_orm(column_type = "String(StringLen::N(100))")]
        pub provider: String,
        #[sea_orm(column_type = "String(StringLen::N(100))", nullable)]
        pub region: Option<String>,
        pub is_default: bool,
        pub created_at: DateTimeWithTimeZone,
        pub updated_at: DateTimeWithTimeZone,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}

    impl From<Model> for crate::models::PricingConfig {
        fn from(m: Model) -> Self {
            Self {
                id: m.id,
                tenant_id: m.tenant_id,
                name: m.name,
                provider: m.provider,
                region: m.region,
                is_default: m.is_default,
                created_at: m.created_at.into(),
                updated_at: m.updated_at.into(),
            }
        }
    }
}

pub mod pricing_rate {
    use crate::models::{PricingTier, ResourceType};
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel, serde::Serialize, serde::Deserialize)]
    #[sea_orm(table_name = "pricing_rates")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: Uuid,
        pub pricing_config_id: Uuid,
        pub resource_type: ResourceType,
        pub tier: PricingTier,
        #[sea_orm(column_type = "String(StringLen::N(255))", nullable)]
        pub instance_family: Option<String>,
        #[sea_orm(column_type = "String(StringLen::N(50))")]
        pub unit: String,
        pub cost_per_unit: f64,
        pub effective_from: DateTimeWithTimeZone,
        pub effective_to: Option<DateTimeWithTimeZone>,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}

    impl From<Model> for crate::models::PricingRate {
        fn from(m: Model) -> Self {
            Self {
                id: m.id,
                pricing_config_id: m.pricing_config_id,
                resource_type: m.resource_type,
                tier: m.tier,
                instance_family: m.instance_family,
                unit: m.unit,
                cost_per_unit: m.cost_per_unit,
                effective_from: m.effective_from.into(),
                effective_to: m.effective_to.map(Into::into),
            }
        }
    }
}

pub mod cluster_pricing {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel, serde::Serialize, serde::Deserialize)]
    #[sea_orm(table_name = "cluster_pricing")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub tenant_id: Uuid,
        #[sea_orm(primary_key, auto_increment = false, column_type = "String(StringLen::N(255))")]
        pub cluster_name: String,
        pub config_id: Uuid,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}

pub mod node_pricing_override {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel, serde::Serialize, serde::Deserialize)]
    #[sea_orm(table_name = "node_pricing_overrides")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub tenant_id: Uuid,
        #[sea_orm(primary_key, auto_increment = false, column_type = "String(StringLen::N(255))")]
        pub cluster_name: String,
        #[sea_orm(primary_key, auto_increment = false, column_type = "String(StringLen::N(255))")]
        pub node: String,
        pub hourly_cost_override: f64,
        pub created_at: DateTimeWithTimeZone,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}

    impl From<Model> for crate::models::NodePricingOverride {
        fn from(m: Model) -> Self {
            Self {
                tenant_id: m.tenant_id,
                cluster_name: m.cluster_name,
                node: m.node,
                hourly_cost_override: m.hourly_cost_override,
                created_at: m.created_at.into(),
            }
        }
    }
}
