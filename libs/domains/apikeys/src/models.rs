use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Request body for minting a new key.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateApiKeyRequest {
    #[validate(length(min = 1, max = 255))]
    pub cluster_name: String,
    #[serde(default)]
    pub scopes: Option<Vec<String>>,
    pub expires_at: Option<DateTime<Utc>>,
}

/// Returned exactly once, at creation time. The secret is never persisted or retrievable again.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CreatedApiKey {
    pub key_id: String,
    pub secret: String,
}

/// Public-facing record: never carries `salt` or `secret_hash`.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ApiKeyRecord {
    pub key_id: String,
    pub tenant_id: Uuid,
    pub cluster_name: String,
    pub scopes: Option<Vec<String>>,
    pub expires_at: Option<DateTime<Utc>>,
    pub revoked: bool,
    pub created_at: DateTime<Utc>,
}

/// Row as stored, including the hash material Validate() needs.
#[derive(Debug, Clone)]
pub struct ApiKeyRow {
    pub key_id: String,
    pub tenant_id: Uuid,
    pub cluster_name: String,
    pub salt: Vec<u8>,
    pub secret_hash: Vec<u8>,
    pub scopes: Option<Vec<String>>,
    pub expires_at: Option<DateTime<Utc>>,
    pub revoked: bool,
    pub created_at: DateTime<Utc>,
}

impl From<ApiKeyRow> for ApiKeyRecord {
    fn from(row: ApiKeyRow) -> Self {
        Self {
            key_id: row.key_id,
            tenant_id: row.tenant_id,
            cluster_name: row.cluster_name,
            scopes: row.scopes,
            expires_at: row.expires_at,
            revoked: row.revoked,
            created_at: row.created_at,
        }
    }
}
