use chrono::{DateTime, Utc};
use redis::{aio::ConnectionManager, AsyncCommands};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ApiKeyError;
use crate::models::ApiKeyRow;

const CACHE_KEY_PREFIX: &str = "apikey:";

/// Cached shape of an [`ApiKeyRow`]. Carries `revoked`/`expires_at` so a cache hit never needs
/// a round-trip to the relational store to decide validity (§4.2's caching invariant).
#[derive(Debug, Clone, Serialize, Deserialize)]
struct CachedApiKey {
    tenant_id: Uuid,
    cluster_name: String,
    #[serde(with = "base64_bytes")]
    salt: Vec<u8>,
    #[serde(with = "base64_bytes")]
    secret_hash: Vec<u8>,
    scopes: Option<Vec<String>>,
    expires_at: Option<DateTime<Utc>>,
    revoked: bool,
    created_at: DateTime<Utc>,
}

mod base64_bytes {
    use base64::{engine::general_purpose::STANDARD, Engine};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(d)?;
        STANDARD
            .decode(encoded)
            .map_err(serde::de::Error::custom)
    }
}

impl From<&ApiKeyRow> for CachedApiKey {
    fn from(row: &ApiKeyRow) -> Self {
        Self {
            tenant_id: row.tenant_id,
            cluster_name: row.cluster_name.clone(),
            salt: row.salt.clone(),
            secret_hash: row.secret_hash.clone(),
            scopes: row.scopes.clone(),
            expires_at: row.expires_at,
            revoked: row.revoked,
            created_at: row.created_at,
        }
    }
}

impl CachedApiKey {
    fn into_row(self, key_id: String) -> ApiKeyRow {
        ApiKeyRow {
            key_id,
            tenant_id: self.tenant_id,
            cluster_name: self.cluster_name,
            salt: self.salt,
            secret_hash: self.secret_hash,
            scopes: self.scopes,
            expires_at: self.expires_at,
            revoked: self.revoked,
            created_at: self.created_at,
        }
    }
}

/// Redis-backed cache sitting in front of the relational store (§4.2, §5).
#[derive(Clone)]
pub struct ApiKeyCache {
    conn: ConnectionManager,
    ttl_seconds: u64,
}

impl ApiKeyCache {
    pub fn new(conn: ConnectionManager, ttl_seconds: u64) -> Self {
        Self { conn, ttl_seconds }
    }

    pub async fn get(&self, key_id: &str) -> Result<Option<ApiKeyRow>, ApiKeyError> {
        let mut conn = self.conn.clone();
        let raw: Option<String> = conn
            .get(cache_key(key_id))
            .await
            .map_err(|e| ApiKeyError::Cache(e.to_string()))?;

        let Some(raw) = raw else { return Ok(None) };
        let cached: CachedApiKey =
            serde_json::from_str(&raw).map_err(|e| ApiKeyError::Cache(e.to_string()))?;
        Ok(Some(cached.into_row(key_id.to_string())))
    }

    pub async fn set(&self, row: &ApiKeyRow) -> Result<(), ApiKeyError> {
        let mut conn = self.conn.clone();
        let cached = CachedApiKey::from(row);
        let raw = serde_json::to_string(&cached).map_err(|e| ApiKeyError::Cache(e.to_string()))?;
        conn.set_ex::<_, _, ()>(cache_key(&row.key_id), raw, self.ttl_seconds)
            .await
            .map_err(|e| ApiKeyError::Cache(e.to_string()))?;
        Ok(())
    }

    pub async fn invalidate(&self, key_id: &str) -> Result<(), ApiKeyError> {
        let mut conn = self.conn.clone();
        let _: () = conn
            .del(cache_key(key_id))
            .await
            .map_err(|e| ApiKeyError::Cache(e.to_string()))?;
        Ok(())
    }
}

fn cache_key(key_id: &str) -> String {
    format!("{CACHE_KEY_PREFIX}{key_id}")
}
