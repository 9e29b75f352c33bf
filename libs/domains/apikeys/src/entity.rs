use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, serde::Serialize, serde::Deserialize)]
#[sea_orm(table_name = "api_keys")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false, column_type = "String(StringLen::N(255))")]
    pub key_id: String,
    pub tenant_id: Uuid,
    #[sea_orm(column_type = "String(StringLen::N(255))")]
    pub cluster_name: String,
    pub salt: Vec<u8>,
    pub secret_hash: Vec<u8>,
    pub scopes: Option<Vec<String>>,
    pub expires_at: Option<DateTimeWithTimeZone>,
    pub revoked: bool,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for crate::models::ApiKeyRow {
    fn from(m: Model) -> Self {
        Self {
            key_id: m.key_id,
            tenant_id: m.tenant_id,
            cluster_name: m.cluster_name,
            salt: m.salt,
            secret_hash: m.secret_hash,
            scopes: m.scopes,
            expires_at: m.expires_at.map(Into::into),
            revoked: m.revoked,
            created_at: m.created_at.into(),
        }
    }
}
