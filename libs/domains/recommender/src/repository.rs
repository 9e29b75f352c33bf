use async_trait::async_trait;
use uuid::Uuid;

use crate::error::RecommenderResult;
use crate::models::{Recommendation, RecommendationCandidate, RecommendationStatus};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecommenderRepository: Send + Sync {
    async fn list_open(&self, tenant_id: Uuid) -> RecommenderResult<Vec<Recommendation>>;
    async fn get(&self, tenant_id: Uuid, id: Uuid) -> RecommenderResult<Option<Recommendation>>;

    /// Finds the open row, if any, for `(cluster, namespace, pod, resource_type)` — the dedup
    /// key from §4.7.
    async fn find_open(
        &self,
        tenant_id: Uuid,
        cluster: &str,
        namespace: &str,
        pod: &str,
        resource_type: crate::models::ResourceType,
    ) -> RecommenderResult<Option<Recommendation>>;

    async fn insert(
        &self,
        tenant_id: Uuid,
        candidate: RecommendationCandidate,
    ) -> RecommenderResult<Recommendation>;

    /// Conditional transition out of `open` (§3, §7): only a row still in `open` status is
    /// updated. Returns `true` if a row was actually changed, `false` if it was already
    /// `applied`/`dismissed` — the caller turns that into [`crate::error::RecommenderError::Conflict`].
    async fn set_status(
        &self,
        tenant_id: Uuid,
        id: Uuid,
        status: RecommendationStatus,
    ) -> RecommenderResult<bool>;

    /// Dismisses a still-open row that a fresh candidate has replaced, overwriting `reason`
    /// with `"superseded"` (§4.7).
    async fn supersede(&self, tenant_id: Uuid, id: Uuid) -> RecommenderResult<()>;
}
