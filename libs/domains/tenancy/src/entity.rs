//! Sea-ORM entities for the tenancy tables.

pub mod plan {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel, serde::Serialize, serde::Deserialize)]
    #[sea_orm(table_name = "plans")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: Uuid,
        #[sea_orm(column_type = "String(StringLen::N(64))", unique)]
        pub name: String,
        pub cluster_limit: i32,
        pub node_limit: i32,
        pub user_limit: i32,
        pub retention_days: i32,
        pub created_at: DateTimeWithTimeZone,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}

    impl From<Model> for crate::models::Plan {
        fn from(m: Model) -> Self {
            Self {
                id: m.id,
                name: m.name,
                cluster_limit: m.cluster_limit,
                node_limit: m.node_limit,
                user_limit: m.user_limit,
                retention_days: m.retention_days,
                created_at: m.created_at.into(),
            }
        }
    }
}

pub mod tenant {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel, serde::Serialize, serde::Deserialize)]
    #[sea_orm(table_name = "tenants")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: Uuid,
        #[sea_orm(column_type = "String(StringLen::N(128))", unique)]
        pub name: String,
        pub plan_id: Uuid,
        pub created_at: DateTimeWithTimeZone,
        pub updated_at: DateTimeWithTimeZone,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        #[sea_orm(
            belongs_to = "super::plan::Entity",
            from = "Column::PlanId",
            to = "super::plan::Column::Id"
        )]
        Plan,
    }

    impl Related<super::plan::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::Plan.def()
        }
    }

    impl ActiveModelBehavior for ActiveModel {}

    impl From<Model> for crate::models::Tenant {
        fn from(m: Model) -> Self {
            Self {
                id: m.id,
                name: m.name,
                plan_id: m.plan_id,
                created_at: m.created_at.into(),
                updated_at: m.updated_at.into(),
            }
        }
    }
}

pub mod user {
    use crate::models::{Role, UserStatus};
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel, serde::Serialize, serde::Deserialize)]
    #[sea_orm(table_name = "users")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: Uuid,
        pub tenant_id: Uuid,
        #[sea_orm(column_type = "String(StringLen::N(255))")]
        pub external_identity: String,
        #[sea_orm(column_type = "String(StringLen::N(255))")]
        pub email: String,
        pub role: Role,
        pub status: UserStatus,
        pub created_at: DateTimeWithTimeZone,
        pub updated_at: DateTimeWithTimeZone,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        #[sea_orm(
            belongs_to = "super::tenant::Entity",
            from = "Column::TenantId",
            to = "super::tenant::Column::Id"
        )]
        Tenant,
    }

    impl Related<super::tenant::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::Tenant.def()
        }
    }

    impl ActiveModelBehavior for ActiveModel {}

    impl From<Model> for crate::models::User {
        fn from(m: Model) -> Self {
            Self {
                id: m.id,
                tenant_id: m.tenant_id,
                external_identity: m.external_identity,
                email: m.email,
                role: m.role,
                status: m.status,
                created_at: m.created_at.into(),
                updated_at: m.updated_at.into(),
            }
        }
    }
}
