use async_trait::async_trait;

use crate::error::ApiKeyResult;
use crate::models::ApiKeyRow;

/// Relational persistence for API keys. `key_id` is the sole lookup key.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ApiKeyRepository: Send + Sync {
    async fn insert(&self, row: ApiKeyRow) -> ApiKeyResult<ApiKeyRow>;

    async fn find_by_key_id(&self, key_id: &str) -> ApiKeyResult<Option<ApiKeyRow>>;

    /// Idempotent: returns `Ok(())` even if already revoked or absent.
    async fn revoke(&self, key_id: &str) -> ApiKeyResult<()>;
}
