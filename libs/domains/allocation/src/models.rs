//! Allocation engine types: window/aggregate/filter parsing and the cost-report shapes
//! returned by `/v1/allocation*` (§4.6).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// Tokens accepted by the `aggregate` query parameter (§4.6.2).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AggregateToken {
    Namespace,
    Cluster,
    Node,
    Pod,
    Controller,
    Label(String),
}

/// How idle cost is handled (§4.6.4), derived from the `idle`/`shareIdle` query params.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IdleMode {
    #[default]
    Discard,
    Separate,
    ShareWeighted,
    ShareEven,
}

/// A single `<key>:<value>[,<value>...]` filter clause (§4.6.6). Multiple clauses are
/// AND-joined; values within one clause are OR-joined.
#[derive(Debug, Clone)]
pub enum FilterClause {
    Namespace(Vec<String>),
    Cluster(Vec<String>),
    Node(Vec<String>),
    Pod(Vec<String>),
    Label(String, String),
}

/// Parsed query parameters for `GET /v1/allocation` and its `/summary` variants.
#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct AllocationQuery {
    /// Duration literal, named window, or ISO pair — see §4.6.1.
    #[serde(default = "default_window")]
    pub window: String,
    /// Comma-separated aggregation tokens — see §4.6.2. Empty means a single overall total.
    #[serde(default)]
    pub aggregate: String,
    /// Bucket size (`1h`, `1d`, `1w`); absent means one bucket spanning the whole window.
    pub step: Option<String>,
    #[serde(default)]
    pub accumulate: bool,
    #[serde(default)]
    pub idle: bool,
    /// `"weighted"`, `"true"`/`"even"`, or absent/`"false"`.
    pub share_idle: Option<String>,
    /// Repeatable in the wire API as `filter=namespace:a,b&filter=cluster:prod` (§4.6.6); each
    /// occurrence is one `<key>:<value>[,<value>...]` clause and clauses are AND-joined.
    /// `axum::Query` collects repeated keys into this `Vec` in order, same as
    /// `filter_namespaces`/`filter_clusters` below.
    #[serde(default)]
    pub filter: Vec<String>,
    #[serde(default)]
    pub filter_namespaces: Vec<String>,
    #[serde(default)]
    pub filter_clusters: Vec<String>,
    #[serde(default = "default_limit")]
    pub limit: usize,
    #[serde(default)]
    pub offset: usize,
}

fn default_window() -> String {
    "today".to_string()
}

fn default_limit() -> usize {
    200
}

/// One row of an allocation report: totals for the samples matching one aggregation key
/// over one bucket (§4.6.3).
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Allocation {
    /// `/`-joined aggregation key values, in token order; `"__idle__"` for the idle row.
    pub name: String,
    #[serde(with = "chrono::serde::ts_seconds")]
    pub window_start: DateTime<Utc>,
    #[serde(with = "chrono::serde::ts_seconds")]
    pub window_end: DateTime<Utc>,
    pub cpu_core_hours: f64,
    pub ram_byte_hours: f64,
    pub ram_gb_hours: f64,
    pub cpu_cost: f64,
    pub ram_cost: f64,
    pub idle_cost: f64,
    pub total_cost: f64,
    pub cpu_efficiency: f64,
    pub ram_efficiency: f64,
    pub total_efficiency: f64,
}

/// One bucket's worth of allocations, as returned by `GET /v1/allocation`.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AllocationSet {
    #[serde(with = "chrono::serde::ts_seconds")]
    pub window_start: DateTime<Utc>,
    #[serde(with = "chrono::serde::ts_seconds")]
    pub window_end: DateTime<Utc>,
    pub allocations: Vec<Allocation>,
}

/// `/v1/allocation/summary` row (§4.6.8).
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SummaryItem {
    pub name: String,
    pub cpu_core_hours: f64,
    pub cpu_cost: f64,
    pub ram_byte_hours: f64,
    pub ram_cost: f64,
    pub total_cost: f64,
    pub total_efficiency: f64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Summary {
    pub items: Vec<SummaryItem>,
    pub total_cost: f64,
}

/// `/v1/allocation/summary/topline` (§4.6.8).
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Topline {
    pub total_cost: f64,
    pub total_cpu_cost: f64,
    pub total_ram_cost: f64,
    pub total_idle_cost: f64,
    pub total_cpu_core_hours: f64,
    pub total_ram_byte_hours: f64,
    pub avg_efficiency: f64,
    pub allocation_count: usize,
    pub window_start: String,
    pub window_end: String,
}
