use std::sync::Arc;

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use chrono::Utc;
use rand::RngCore;
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::cache::ApiKeyCache;
use crate::error::{ApiKeyError, ApiKeyResult};
use crate::models::{ApiKeyRecord, ApiKeyRow, CreateApiKeyRequest, CreatedApiKey};
use crate::repository::ApiKeyRepository;

const SECRET_BYTES: usize = 32;
const KEY_ID_BYTES: usize = 16;

/// Create / Validate / Revoke for per-tenant, per-cluster API keys (§4.2).
#[derive(Clone)]
pub struct ApiKeyService<R: ApiKeyRepository> {
    repository: Arc<R>,
    cache: ApiKeyCache,
    /// Process-wide secret mixed into every hash; never persisted alongside the key material.
    pepper: Arc<String>,
}

impl<R: ApiKeyRepository> ApiKeyService<R> {
    pub fn new(repository: R, cache: ApiKeyCache, pepper: String) -> Self {
        Self {
            repository: Arc::new(repository),
            cache,
            pepper: Arc::new(pepper),
        }
    }

    pub async fn create(
        &self,
        tenant_id: Uuid,
        input: CreateApiKeyRequest,
    ) -> ApiKeyResult<CreatedApiKey> {
        let key_id = generate_url_safe_token(KEY_ID_BYTES);
        let secret = generate_url_safe_token(SECRET_BYTES);
        let salt = random_bytes(16);
        let secret_hash = hash_secret(&salt, &secret, &self.pepper);

        let row = ApiKeyRow {
            key_id: key_id.clone(),
            tenant_id,
            cluster_name: input.cluster_name,
            salt,
            secret_hash,
            scopes: input.scopes,
            expires_at: input.expires_at,
            revoked: false,
            created_at: Utc::now(),
        };

        self.repository.insert(row).await?;

        Ok(CreatedApiKey { key_id, secret })
    }

    /// Parses `key_id:secret`, checks the cache then falls through to the store, and verifies
    /// the hash in constant time.
    pub async fn validate(&self, presented: &str) -> ApiKeyResult<ApiKeyRecord> {
        let (key_id, secret) = presented.split_once(':').ok_or(ApiKeyError::BadFormat)?;
        if key_id.is_empty() || secret.is_empty() {
            return Err(ApiKeyError::BadFormat);
        }

        let row = match self.cache.get(key_id).await {
            Ok(Some(row)) if !is_stale(&row) => row,
            _ => {
                let row = self
                    .repository
                    .find_by_key_id(key_id)
                    .await?
                    .ok_or(ApiKeyError::NotFound)?;
                let _ = self.cache.set(&row).await;
                row
            }
        };

        if row.revoked {
            return Err(ApiKeyError::Revoked);
        }
        if let Some(expires_at) = row.expires_at {
            if expires_at <= Utc::now() {
                return Err(ApiKeyError::Expired);
            }
        }

        let candidate_hash = hash_secret(&row.salt, secret, &self.pepper);
        if !constant_time_eq(&candidate_hash, &row.secret_hash) {
            return Err(ApiKeyError::HashMismatch);
        }

        Ok(row.into())
    }

    pub async fn revoke(&self, key_id: &str) -> ApiKeyResult<()> {
        self.repository.revoke(key_id).await?;
        let _ = self.cache.invalidate(key_id).await;
        Ok(())
    }
}

/// A cache entry is never trusted once its `expires_at` has passed (§4.2's caching invariant),
/// even though revocation already actively invalidates the entry.
fn is_stale(row: &ApiKeyRow) -> bool {
    row.expires_at.is_some_and(|exp| exp <= Utc::now())
}

fn generate_url_safe_token(bytes: usize) -> String {
    URL_SAFE_NO_PAD.encode(random_bytes(bytes))
}

fn random_bytes(len: usize) -> Vec<u8> {
    let mut buf = vec![0u8; len];
    rand::rng().fill_bytes(&mut buf);
    buf
}

fn hash_secret(salt: &[u8], secret: &str, pepper: &str) -> Vec<u8> {
    let mut hasher = Sha256::new();
    hasher.update(salt);
    hasher.update(secret.as_bytes());
    hasher.update(pepper.as_bytes());
    hasher.finalize().to_vec()
}

/// Compares two byte slices without short-circuiting on the first mismatch.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut diff: u8 = 0;
    for (x, y) in a.iter().zip(b.iter()) {
        diff |= x ^ y;
    }
    diff == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constant_time_eq_matches_equal_slices() {
        assert!(constant_time_eq(b"abc", b"abc"));
        assert!(!constant_time_eq(b"abc", b"abd"));
        assert!(!constant_time_eq(b"abc", b"ab"));
    }

    #[test]
    fn hash_secret_is_deterministic_and_salt_sensitive() {
        let a = hash_secret(b"salt1", "secret", "pepper");
        let b = hash_secret(b"salt1", "secret", "pepper");
        let c = hash_secret(b"salt2", "secret", "pepper");
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
