//! Pod/node sample types for the ingest pipeline (C4) and store adapter (C5), §4.4/§4.5.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Label maps are truncated to this serialized size by [`crate::service::normalize_labels`]
/// (§4.4 step 4).
pub const MAX_LABELS_BYTES: usize = 4 * 1024;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PodSample {
    pub id: Uuid,
    pub time: DateTime<Utc>,
    pub tenant_id: Uuid,
    pub cluster: String,
    pub namespace: String,
    pub pod: String,
    pub node: String,
    /// Owning workload, e.g. `deployment/api`; empty string if the agent couldn't resolve an
    /// owner reference. Feeds the allocation engine's `controller` aggregation token (§4.6.2).
    pub controller: String,
    pub cpu_millicores_usage: i64,
    pub mem_bytes_usage: i64,
    pub cpu_millicores_request: i64,
    pub mem_bytes_request: i64,
    pub cpu_millicores_limit: i64,
    pub mem_bytes_limit: i64,
    pub labels: HashMap<String, String>,
    pub phase: String,
    pub qos_class: String,
    pub containers: Vec<ContainerSample>,
}

/// Per-container breakdown within a [`PodSample`] — the same six resource quantities the pod
/// carries, scoped to one container (§3).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContainerSample {
    pub container_name: String,
    pub cpu_millicores_usage: i64,
    pub mem_bytes_usage: i64,
    pub cpu_millicores_request: i64,
    pub mem_bytes_request: i64,
    pub cpu_millicores_limit: i64,
    pub mem_bytes_limit: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeSample {
    pub id: Uuid,
    pub time: DateTime<Utc>,
    pub tenant_id: Uuid,
    pub cluster: String,
    pub node: String,
    pub instance_type: String,
    pub cpu_capacity_millicores: i64,
    pub mem_capacity_bytes: i64,
    pub hourly_cost_usd_hint: Option<f64>,
}

/// Raw wire shape of a single pod reading, as posted by an agent (§4.4).
#[derive(Debug, Clone, Deserialize)]
pub struct PodMetric {
    pub namespace: String,
    pub pod: String,
    #[serde(default)]
    pub node: String,
    #[serde(default)]
    pub controller: String,
    #[serde(default)]
    pub cpu_millicores_usage: i64,
    #[serde(default)]
    pub mem_bytes_usage: i64,
    #[serde(default)]
    pub cpu_millicores_request: i64,
    #[serde(default)]
    pub mem_bytes_request: i64,
    #[serde(default)]
    pub cpu_millicores_limit: i64,
    #[serde(default)]
    pub mem_bytes_limit: i64,
    #[serde(default)]
    pub labels: HashMap<String, String>,
    #[serde(default)]
    pub phase: String,
    #[serde(default)]
    pub qos_class: String,
    #[serde(default)]
    pub containers: Vec<ContainerSample>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NodeMetric {
    pub node: String,
    #[serde(default)]
    pub instance_type: String,
    #[serde(default)]
    pub cpu_capacity_millicores: i64,
    #[serde(default)]
    pub mem_capacity_bytes: i64,
    pub hourly_cost_usd_hint: Option<f64>,
}

/// Request body of `POST /v1/ingest` (§4.4). `timestamp` of zero means "now", resolved by the
/// service before normalization.
#[derive(Debug, Clone, Deserialize)]
pub struct CollectionBundle {
    pub cluster_name: String,
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default)]
    pub pod_metrics: Vec<PodMetric>,
    #[serde(default)]
    pub namespace_costs: HashMap<String, f64>,
    #[serde(default)]
    pub node_metrics: Vec<NodeMetric>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct IngestAccepted {
    pub status: &'static str,
    pub accepted: usize,
}

/// Half-open `[start, end)` interval in UTC, used by every C5 scan.
#[derive(Debug, Clone, Copy)]
pub struct TimeWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}
