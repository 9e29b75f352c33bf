//! Sea-ORM entities for the time-series tables.

pub mod pod_sample {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel, serde::Serialize, serde::Deserialize)]
    #[sea_orm(table_name = "pod_samples")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: Uuid,
        pub time: DateTimeWithTimeZone,
        pub tenant_id: Uuid,
        #[sea_orm(column_type = "String(StringLen::N(255))")]
        pub cluster: String,
        #[sea_orm(column_type = "String(StringLen::N(255))")]
        pub namespace: String,
        #[sea_orm(column_type = "String(StringLen::N(255))")]
        pub pod: String,
        #[sea_orm(column_type = "String(StringLen::N(255))")]
        pub node: String,
        #[sea_orm(column_type = "String(StringLen::N(255))")]
        pub controller: String,
        pub cpu_millicores_usage: i64,
        pub mem_bytes_usage: i64,
        pub cpu_millicores_request: i64,
        pub mem_bytes_request: i64,
        pub cpu_millicores_limit: i64,
        pub mem_bytes_limit: i64,
        pub labels: Json,
        #[sea_orm(column_type = "String(StringLen::N(32))")]
        pub phase: String,
        #[sea_orm(column_type = "String(StringLen::N(32))")]
        pub qos_class: String,
        pub containers: Json,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}

    impl From<Model> for crate::models::PodSample {
        fn from(m: Model) -> Self {
            Self {
                id: m.id,
                time: m.time.into(),
                tenant_id: m.tenant_id,
                cluster: m.cluster,
                namespace: m.namespace,
                pod: m.pod,
                node: m.node,
                controller: m.controller,
                cpu_millicores_usage: m.cpu_millicores_usage,
                mem_bytes_usage: m.mem_bytes_usage,
                cpu_millicores_request: m.cpu_millicores_request,
                mem_bytes_request: m.mem_bytes_request,
                cpu_millicores_limit: m.cpu_millicores_limit,
                mem_bytes_limit: m.mem_bytes_limit,
                labels: serde_json::from_value(m.labels).unwrap_or_default(),
                phase: m.phase,
                qos_class: m.qos_class,
                containers: serde_json::from_value(m.containers).unwrap_or_default(),
            }
        }
    }
}

pub mod node_sample {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel, serde::Serialize, serde::Deserialize)]
    #[sea_orm(table_name = "node_samples")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: Uuid,
        pub time: DateTimeWithTimeZone,
        pub tenant_id: Uuid,
        #[sea_orm(column_type = "String(StringLen::N(255))")]
        pub cluster: String,
        #[sea_orm(column_type = "String(StringLen::N(255))")]
        pub node: String,
        #[sea_orm(column_type = "String(StringLen::N(100))")]
        pub instance_type: String,
        pub cpu_capacity_millicores: i64,
        pub mem_capacity_bytes: i64,
        pub hourly_cost_usd_hint: Option<f64>,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}

    impl From<Model> for crate::models::NodeSample {
        fn from(m: Model) -> Self {
            Self {
                id: m.id,
                time: m.time.into(),
                tenant_id: m.tenant_id,
                cluster: m.cluster,
                node: m.node,
                instance_type: m.instance_type,
                cpu_capacity_millicores: m.cpu_capacity_millicores,
                mem_capacity_bytes: m.mem_capacity_bytes,
                hourly_cost_usd_hint: m.hourly_cost_usd_hint,
            }
        }
    }
}
