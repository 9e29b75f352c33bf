//! The allocation engine (§4.6): window/aggregate/filter parsing, per-sample cost and
//! efficiency arithmetic, idle-cost distribution, time-bucketing, and the `/summary` and
//! `/summary/topline` collapses.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use chrono::{DateTime, Datelike, Duration, NaiveDate, TimeZone, Utc};
use domain_pricing::{NodeCapacity, PricingRepository, PricingService, PricingTier, ResolveQuery, ResolvedRates};
use domain_tenancy::TenantContext;
use domain_timeseries::{NodeSample, PodSample, TimeWindow, TimeseriesRepository};
use observability::AllocationMetrics;
use uuid::Uuid;

use crate::error::{AllocationError, AllocationResult};
use crate::models::{
    Allocation, AllocationQuery, AllocationSet, AggregateToken, FilterClause, IdleMode, Summary,
    SummaryItem, Topline,
};

const BYTES_PER_GIB: f64 = 1024.0 * 1024.0 * 1024.0;
const MILLICORES_PER_CORE: f64 = 1000.0;

#[derive(Clone)]
pub struct AllocationService<T, P>
where
    T: TimeseriesRepository,
    P: PricingRepository,
{
    timeseries: Arc<T>,
    pricing: Arc<PricingService<P>>,
}

impl<T, P> AllocationService<T, P>
where
    T: TimeseriesRepository,
    P: PricingRepository,
{
    pub fn new(timeseries: Arc<T>, pricing: Arc<PricingService<P>>) -> Self {
        Self { timeseries, pricing }
    }

    /// `GET /v1/allocation` (§4.6): one [`AllocationSet`] per time bucket.
    pub async fn query(
        &self,
        ctx: &TenantContext,
        tenant_id: Uuid,
        params: &AllocationQuery,
    ) -> AllocationResult<Vec<AllocationSet>> {
        let query_start = std::time::Instant::now();
        let now = Utc::now();
        let window = match parse_window(&params.window, now) {
            Ok(w) => w,
            Err(err) => {
                AllocationMetrics::record_query_rejected("bad_window");
                return Err(err);
            }
        };
        let tokens = match parse_aggregate(&params.aggregate) {
            Ok(t) => t,
            Err(err) => {
                AllocationMetrics::record_query_rejected("bad_aggregate");
                return Err(err);
            }
        };
        let filters = match parse_filters(params) {
            Ok(f) => f,
            Err(err) => {
                AllocationMetrics::record_query_rejected("bad_filter");
                return Err(err);
            }
        };
        let idle_mode = parse_idle_mode(params.idle, params.share_idle.as_deref());
        let step = match &params.step {
            Some(s) => Some(parse_step(s)?),
            None => None,
        };
        let buckets = build_buckets(window, step, params.accumulate);

        let pod_samples = self.timeseries.scan_pod(ctx, None, window).await?;
        let node_samples = self.timeseries.scan_node(ctx, None, window).await?;
        let scrape_interval_hours = estimate_scrape_interval_hours(&pod_samples, window);

        let mut rate_cache: HashMap<(String, String), ResolvedRates> = HashMap::new();
        let mut sets = Vec::with_capacity(buckets.len());
        for bucket in buckets {
            let allocations = self
                .compute_bucket(
                    tenant_id,
                    bucket,
                    &tokens,
                    &filters,
                    idle_mode,
                    &pod_samples,
                    &node_samples,
                    scrape_interval_hours,
                    &mut rate_cache,
                )
                .await?;
            let allocations = paginate(allocations, params.limit, params.offset);
            sets.push(AllocationSet {
                window_start: bucket.start,
                window_end: bucket.end,
                allocations,
            });
        }

        AllocationMetrics::record_query(
            &params.aggregate,
            idle_mode_label(idle_mode),
            sets.len(),
            query_start.elapsed().as_millis() as u64,
        );
        Ok(sets)
    }

    /// `GET /v1/allocation/summary` (§4.6.8). Always computed over the whole requested window
    /// as a single bucket, regardless of `step`/`accumulate`.
    pub async fn summary(
        &self,
        ctx: &TenantContext,
        tenant_id: Uuid,
        params: &AllocationQuery,
    ) -> AllocationResult<Summary> {
        let mut whole_window = params.clone();
        whole_window.step = None;
        whole_window.accumulate = true;
        let sets = self.query(ctx, tenant_id, &whole_window).await?;
        let allocations = sets.into_iter().next().map(|s| s.allocations).unwrap_or_default();

        let total_cost = allocations.iter().map(|a| a.total_cost).sum();
        let items = allocations
            .into_iter()
            .map(|a| SummaryItem {
                name: a.name,
                cpu_core_hours: a.cpu_core_hours,
                cpu_cost: a.cpu_cost,
                ram_byte_hours: a.ram_byte_hours,
                ram_cost: a.ram_cost,
                total_cost: a.total_cost,
                total_efficiency: a.total_efficiency,
            })
            .collect();
        Ok(Summary { items, total_cost })
    }

    /// `GET /v1/allocation/summary/topline` (§4.6.8).
    pub async fn topline(
        &self,
        ctx: &TenantContext,
        tenant_id: Uuid,
        params: &AllocationQuery,
    ) -> AllocationResult<Topline> {
        let now = Utc::now();
        let window = parse_window(&params.window, now)?;
        let mut whole_window = params.clone();
        whole_window.step = None;
        whole_window.accumulate = true;
        let sets = self.query(ctx, tenant_id, &whole_window).await?;
        let allocations = sets.into_iter().next().map(|s| s.allocations).unwrap_or_default();

        let total_cpu_cost: f64 = allocations.iter().map(|a| a.cpu_cost).sum();
        let total_ram_cost: f64 = allocations.iter().map(|a| a.ram_cost).sum();
        let total_idle_cost: f64 = allocations.iter().map(|a| a.idle_cost).sum();
        let total_cost: f64 = allocations.iter().map(|a| a.total_cost).sum();
        let total_cpu_core_hours: f64 = allocations.iter().map(|a| a.cpu_core_hours).sum();
        let total_ram_byte_hours: f64 = allocations.iter().map(|a| a.ram_byte_hours).sum();
        let avg_efficiency = if total_cost > 0.0 {
            allocations.iter().map(|a| a.total_efficiency * a.total_cost).sum::<f64>() / total_cost
        } else if !allocations.is_empty() {
            allocations.iter().map(|a| a.total_efficiency).sum::<f64>() / allocations.len() as f64
        } else {
            1.0
        };

        Ok(Topline {
            total_cost,
            total_cpu_cost,
            total_ram_cost,
            total_idle_cost,
            total_cpu_core_hours,
            total_ram_byte_hours,
            avg_efficiency,
            allocation_count: allocations.len(),
            window_start: window.start.to_rfc3339(),
            window_end: window.end.to_rfc3339(),
        })
    }

    #[allow(clippy::too_many_arguments)]
    async fn compute_bucket(
        &self,
        tenant_id: Uuid,
        bucket: TimeWindow,
        tokens: &[AggregateToken],
        filters: &[FilterClause],
        idle_mode: IdleMode,
        pod_samples: &[PodSample],
        node_samples: &[NodeSample],
        scrape_interval_hours: f64,
        rate_cache: &mut HashMap<(String, String), ResolvedRates>,
    ) -> AllocationResult<Vec<Allocation>> {
        let mut acc: HashMap<Vec<String>, Accumulator> = HashMap::new();
        let mut allocated_cost_by_cluster: HashMap<String, f64> = HashMap::new();
        let mut contributed_by_key_cluster: HashMap<(Vec<String>, String), f64> = HashMap::new();
        let mut node_capacity: HashMap<(String, String), NodeCapacity> = HashMap::new();

        for node in node_samples {
            if node.time < bucket.start || node.time >= bucket.end {
                continue;
            }
            node_capacity.insert(
                (node.cluster.clone(), node.node.clone()),
                NodeCapacity {
                    cpu_millicores: node.cpu_capacity_millicores,
                    mem_bytes: node.mem_capacity_bytes,
                },
            );
        }

        for sample in pod_samples {
            if sample.time < bucket.start || sample.time >= bucket.end {
                continue;
            }
            if !sample_matches(sample, filters) {
                continue;
            }

            let capacity = node_capacity.get(&(sample.cluster.clone(), sample.node.clone())).copied();
            let rates = self
                .rate_for(tenant_id, &sample.cluster, &sample.node, bucket.start, capacity, rate_cache)
                .await?;

            let cpu_request_cores = sample.cpu_millicores_request as f64 / MILLICORES_PER_CORE;
            let cpu_usage_cores = sample.cpu_millicores_usage as f64 / MILLICORES_PER_CORE;
            let mem_request_bytes = sample.mem_bytes_request as f64;
            let mem_usage_bytes = sample.mem_bytes_usage as f64;

            let cpu_core_hours = cpu_request_cores.max(cpu_usage_cores) * scrape_interval_hours;
            let ram_byte_hours = mem_request_bytes.max(mem_usage_bytes) * scrape_interval_hours;
            let ram_gb_hours = ram_byte_hours / BYTES_PER_GIB;

            let cpu_cost = cpu_core_hours * rates.cpu_per_core_hour;
            let ram_cost = ram_gb_hours * rates.mem_per_gb_hour;

            let cpu_efficiency = if cpu_request_cores > 0.0 { cpu_usage_cores / cpu_request_cores } else { 1.0 };
            let ram_efficiency = if mem_request_bytes > 0.0 { mem_usage_bytes / mem_request_bytes } else { 1.0 };

            let key = aggregate_key(tokens, sample);
            let entry = acc.entry(key.clone()).or_default();
            entry.cpu_core_hours += cpu_core_hours;
            entry.ram_byte_hours += ram_byte_hours;
            entry.cpu_cost += cpu_cost;
            entry.ram_cost += ram_cost;
            entry.cpu_eff_weighted += cpu_efficiency * cpu_core_hours;
            entry.ram_eff_weighted += ram_efficiency * ram_byte_hours;

            *allocated_cost_by_cluster.entry(sample.cluster.clone()).or_default() += cpu_cost + ram_cost;
            *contributed_by_key_cluster.entry((key, sample.cluster.clone())).or_default() += cpu_cost + ram_cost;
        }

        let mut node_total_cost_by_cluster: HashMap<String, f64> = HashMap::new();
        for node in node_samples {
            if node.time < bucket.start || node.time >= bucket.end {
                continue;
            }
            let hourly = match node.hourly_cost_usd_hint {
                Some(hint) => hint,
                None => {
                    let capacity = NodeCapacity {
                        cpu_millicores: node.cpu_capacity_millicores,
                        mem_bytes: node.mem_capacity_bytes,
                    };
                    let rates = self
                        .rate_for(tenant_id, &node.cluster, &node.node, bucket.start, Some(capacity), rate_cache)
                        .await?;
                    rates.cpu_per_core_hour * (node.cpu_capacity_millicores as f64 / MILLICORES_PER_CORE)
                        + rates.mem_per_gb_hour * (node.mem_capacity_bytes as f64 / BYTES_PER_GIB)
                }
            };
            *node_total_cost_by_cluster.entry(node.cluster.clone()).or_default() += hourly * scrape_interval_hours;
        }

        let mut idle_cost_by_cluster: HashMap<String, f64> = HashMap::new();
        if idle_mode != IdleMode::Discard {
            for (cluster, node_total) in &node_total_cost_by_cluster {
                let allocated = allocated_cost_by_cluster.get(cluster).copied().unwrap_or(0.0);
                idle_cost_by_cluster.insert(cluster.clone(), (node_total - allocated).max(0.0));
            }
        }

        let mut allocations: Vec<Allocation> = acc
            .into_iter()
            .map(|(key, a)| {
                let cpu_efficiency = if a.cpu_core_hours > 0.0 { a.cpu_eff_weighted / a.cpu_core_hours } else { 1.0 };
                let ram_efficiency = if a.ram_byte_hours > 0.0 { a.ram_eff_weighted / a.ram_byte_hours } else { 1.0 };
                let idle_cost = match idle_mode {
                    IdleMode::Discard | IdleMode::Separate => 0.0,
                    IdleMode::ShareWeighted => key_idle_share_weighted(
                        &key,
                        &contributed_by_key_cluster,
                        &allocated_cost_by_cluster,
                        &idle_cost_by_cluster,
                    ),
                    IdleMode::ShareEven => key_idle_share_even(
                        &key,
                        &contributed_by_key_cluster,
                        &idle_cost_by_cluster,
                    ),
                };
                Allocation {
                    name: key_name(&key),
                    window_start: bucket.start,
                    window_end: bucket.end,
                    cpu_core_hours: a.cpu_core_hours,
                    ram_byte_hours: a.ram_byte_hours,
                    ram_gb_hours: a.ram_byte_hours / BYTES_PER_GIB,
                    cpu_cost: a.cpu_cost,
                    ram_cost: a.ram_cost,
                    idle_cost,
                    total_cost: a.cpu_cost + a.ram_cost + idle_cost,
                    cpu_efficiency,
                    ram_efficiency,
                    total_efficiency: (cpu_efficiency + ram_efficiency) / 2.0,
                }
            })
            .collect();

        if idle_mode == IdleMode::Separate {
            for (cluster, idle_cost) in idle_cost_by_cluster {
                if idle_cost <= 0.0 {
                    continue;
                }
                allocations.push(Allocation {
                    name: format!("__idle__/{cluster}"),
                    window_start: bucket.start,
                    window_end: bucket.end,
                    cpu_core_hours: 0.0,
                    ram_byte_hours: 0.0,
                    ram_gb_hours: 0.0,
                    cpu_cost: 0.0,
                    ram_cost: 0.0,
                    idle_cost,
                    total_cost: idle_cost,
                    cpu_efficiency: 1.0,
                    ram_efficiency: 1.0,
                    total_efficiency: 1.0,
                });
            }
        }

        allocations.sort_by(|a, b| {
            b.total_cost
                .partial_cmp(&a.total_cost)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.name.cmp(&b.name))
        });

        Ok(allocations)
    }

    async fn rate_for(
        &self,
        tenant_id: Uuid,
        cluster: &str,
        node: &str,
        at_time: DateTime<Utc>,
        capacity: Option<NodeCapacity>,
        cache: &mut HashMap<(String, String), ResolvedRates>,
    ) -> AllocationResult<ResolvedRates> {
        let cache_key = (cluster.to_string(), node.to_string());
        if let Some(rates) = cache.get(&cache_key) {
            return Ok(*rates);
        }
        let rates = self
            .pricing
            .resolve(
                &ResolveQuery {
                    tenant_id,
                    cluster: cluster.to_string(),
                    node: Some(node.to_string()),
                    instance_family: None,
                    tier: PricingTier::OnDemand,
                    at_time,
                },
                capacity,
            )
            .await?;
        cache.insert(cache_key, rates);
        Ok(rates)
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct Accumulator {
    cpu_core_hours: f64,
    ram_byte_hours: f64,
    cpu_cost: f64,
    ram_cost: f64,
    cpu_eff_weighted: f64,
    ram_eff_weighted: f64,
}

fn key_idle_share_weighted(
    key: &[String],
    contributed: &HashMap<(Vec<String>, String), f64>,
    allocated_by_cluster: &HashMap<String, f64>,
    idle_by_cluster: &HashMap<String, f64>,
) -> f64 {
    let mut total = 0.0;
    for (cluster, idle) in idle_by_cluster {
        if *idle <= 0.0 {
            continue;
        }
        let Some(contributed_cost) = contributed.get(&(key.to_vec(), cluster.clone())) else {
            continue;
        };
        let allocated = allocated_by_cluster.get(cluster).copied().unwrap_or(0.0);
        if allocated > 0.0 {
            total += idle * (contributed_cost / allocated);
        }
    }
    total
}

fn key_idle_share_even(
    key: &[String],
    contributed: &HashMap<(Vec<String>, String), f64>,
    idle_by_cluster: &HashMap<String, f64>,
) -> f64 {
    let mut total = 0.0;
    for (cluster, idle) in idle_by_cluster {
        if *idle <= 0.0 {
            continue;
        }
        if !contributed.contains_key(&(key.to_vec(), cluster.clone())) {
            continue;
        }
        let participants = contributed.keys().filter(|(_, c)| c == cluster).count().max(1);
        total += idle / participants as f64;
    }
    total
}

fn sample_matches(sample: &PodSample, filters: &[FilterClause]) -> bool {
    filters.iter().all(|clause| match clause {
        FilterClause::Namespace(values) => values.iter().any(|v| v == &sample.namespace),
        FilterClause::Cluster(values) => values.iter().any(|v| v == &sample.cluster),
        FilterClause::Node(values) => values.iter().any(|v| v == &sample.node),
        FilterClause::Pod(values) => values.iter().any(|v| v == &sample.pod),
        FilterClause::Label(key, value) => sample.labels.get(key).is_some_and(|v| v == value),
    })
}

fn aggregate_key(tokens: &[AggregateToken], sample: &PodSample) -> Vec<String> {
    tokens
        .iter()
        .map(|token| match token {
            AggregateToken::Namespace => sample.namespace.clone(),
            AggregateToken::Cluster => sample.cluster.clone(),
            AggregateToken::Node => sample.node.clone(),
            AggregateToken::Pod => sample.pod.clone(),
            AggregateToken::Controller => sample.controller.clone(),
            AggregateToken::Label(key) => sample.labels.get(key).cloned().unwrap_or_default(),
        })
        .collect()
}

fn key_name(key: &[String]) -> String {
    if key.is_empty() {
        "__total__".to_string()
    } else {
        key.join("/")
    }
}

fn paginate(allocations: Vec<Allocation>, limit: usize, offset: usize) -> Vec<Allocation> {
    allocations.into_iter().skip(offset).take(limit).collect()
}

fn estimate_scrape_interval_hours(pod_samples: &[PodSample], window: TimeWindow) -> f64 {
    let window_hours = (window.end - window.start).num_seconds() as f64 / 3600.0;
    let distinct_times: BTreeSet<DateTime<Utc>> = pod_samples.iter().map(|s| s.time).collect();
    if distinct_times.len() > 1 {
        window_hours / distinct_times.len() as f64
    } else {
        window_hours.max(1.0 / 60.0)
    }
}

fn parse_aggregate(raw: &str) -> AllocationResult<Vec<AggregateToken>> {
    if raw.trim().is_empty() {
        return Ok(Vec::new());
    }
    raw.split(',')
        .map(|token| {
            let token = token.trim();
            match token {
                "namespace" => Ok(AggregateToken::Namespace),
                "cluster" => Ok(AggregateToken::Cluster),
                "node" => Ok(AggregateToken::Node),
                "pod" => Ok(AggregateToken::Pod),
                "controller" => Ok(AggregateToken::Controller),
                _ if token.starts_with("label:") => {
                    Ok(AggregateToken::Label(token["label:".len()..].to_string()))
                }
                _ => Err(AllocationError::BadAggregate(token.to_string())),
            }
        })
        .collect()
}

fn parse_filters(params: &AllocationQuery) -> AllocationResult<Vec<FilterClause>> {
    let mut clauses = Vec::new();
    if !params.filter_namespaces.is_empty() {
        clauses.push(FilterClause::Namespace(params.filter_namespaces.clone()));
    }
    if !params.filter_clusters.is_empty() {
        clauses.push(FilterClause::Cluster(params.filter_clusters.clone()));
    }
    for clause in params.filter.iter().filter(|s| !s.is_empty()) {
        clauses.push(parse_filter_clause(clause)?);
    }
    Ok(clauses)
}

fn parse_filter_clause(raw: &str) -> AllocationResult<FilterClause> {
    if let Some(rest) = raw.strip_prefix("label:") {
        let (key, value) = rest
            .split_once('=')
            .ok_or_else(|| AllocationError::BadFilter(raw.to_string()))?;
        return Ok(FilterClause::Label(key.to_string(), value.to_string()));
    }
    let (key, value) = raw
        .split_once(':')
        .ok_or_else(|| AllocationError::BadFilter(raw.to_string()))?;
    let values = value.split(',').map(String::from).collect();
    match key {
        "namespace" => Ok(FilterClause::Namespace(values)),
        "cluster" => Ok(FilterClause::Cluster(values)),
        "node" => Ok(FilterClause::Node(values)),
        "pod" => Ok(FilterClause::Pod(values)),
        _ => Err(AllocationError::BadFilter(raw.to_string())),
    }
}

fn parse_idle_mode(idle: bool, share_idle: Option<&str>) -> IdleMode {
    if !idle {
        return IdleMode::Discard;
    }
    match share_idle {
        Some(v) if v.eq_ignore_ascii_case("weighted") => IdleMode::ShareWeighted,
        Some(v) if v.eq_ignore_ascii_case("true") || v.eq_ignore_ascii_case("even") => IdleMode::ShareEven,
        _ => IdleMode::Separate,
    }
}

fn idle_mode_label(mode: IdleMode) -> &'static str {
    match mode {
        IdleMode::Discard => "discard",
        IdleMode::Separate => "separate",
        IdleMode::ShareWeighted => "share_weighted",
        IdleMode::ShareEven => "share_even",
    }
}

fn parse_step(raw: &str) -> AllocationResult<Duration> {
    match raw {
        "hour" => Ok(Duration::hours(1)),
        "day" => Ok(Duration::days(1)),
        "week" => Ok(Duration::weeks(1)),
        other => parse_duration_literal(other).ok_or_else(|| AllocationError::BadWindow(format!("step:{other}"))),
    }
}

fn build_buckets(window: TimeWindow, step: Option<Duration>, accumulate: bool) -> Vec<TimeWindow> {
    let Some(step) = step.filter(|_| !accumulate) else {
        return vec![window];
    };
    let mut buckets = Vec::new();
    let mut cursor = window.start;
    while cursor < window.end {
        let next = (cursor + step).min(window.end);
        buckets.push(TimeWindow { start: cursor, end: next });
        cursor = next;
    }
    if buckets.is_empty() {
        buckets.push(window);
    }
    buckets
}

/// Parses the `window` query parameter per §4.6.1.
pub fn parse_window(raw: &str, now: DateTime<Utc>) -> AllocationResult<TimeWindow> {
    let raw = raw.trim();
    if let Some(duration) = parse_duration_literal(raw) {
        return Ok(TimeWindow { start: now - duration, end: now });
    }
    if let Some(window) = parse_named_window(raw, now) {
        return Ok(window);
    }
    if let Some((start_raw, end_raw)) = raw.split_once(',') {
        let start = parse_iso_instant(start_raw.trim())
            .ok_or_else(|| AllocationError::BadWindow(raw.to_string()))?;
        let end = parse_iso_instant(end_raw.trim())
            .ok_or_else(|| AllocationError::BadWindow(raw.to_string()))?;
        return Ok(TimeWindow { start, end });
    }
    Err(AllocationError::BadWindow(raw.to_string()))
}

fn parse_duration_literal(raw: &str) -> Option<Duration> {
    if raw.len() < 2 {
        return None;
    }
    let (number, unit) = raw.split_at(raw.len() - 1);
    let count: i64 = number.parse().ok()?;
    match unit {
        "h" => Some(Duration::hours(count)),
        "d" => Some(Duration::days(count)),
        "w" => Some(Duration::weeks(count)),
        _ => None,
    }
}

fn parse_named_window(raw: &str, now: DateTime<Utc>) -> Option<TimeWindow> {
    let today_start = start_of_day(now);
    match raw {
        "today" => Some(TimeWindow { start: today_start, end: now }),
        "yesterday" => Some(TimeWindow { start: today_start - Duration::days(1), end: today_start }),
        "week" | "thisweek" => Some(TimeWindow { start: start_of_week(now), end: now }),
        "lastweek" => {
            let start = start_of_week(now) - Duration::weeks(1);
            Some(TimeWindow { start, end: start_of_week(now) })
        }
        "month" | "thismonth" => Some(TimeWindow { start: start_of_month(now), end: now }),
        "lastmonth" => {
            let this_month_start = start_of_month(now);
            let start = start_of_prev_month(now);
            Some(TimeWindow { start, end: this_month_start })
        }
        _ => None,
    }
}

fn start_of_day(dt: DateTime<Utc>) -> DateTime<Utc> {
    Utc.from_utc_datetime(&dt.date_naive().and_hms_opt(0, 0, 0).expect("valid midnight"))
}

fn start_of_week(dt: DateTime<Utc>) -> DateTime<Utc> {
    let day = start_of_day(dt);
    let offset = day.weekday().num_days_from_monday() as i64;
    day - Duration::days(offset)
}

fn start_of_month(dt: DateTime<Utc>) -> DateTime<Utc> {
    let naive = NaiveDate::from_ymd_opt(dt.year(), dt.month(), 1)
        .expect("valid date")
        .and_hms_opt(0, 0, 0)
        .expect("valid midnight");
    Utc.from_utc_datetime(&naive)
}

fn start_of_prev_month(dt: DateTime<Utc>) -> DateTime<Utc> {
    let (year, month) = if dt.month() == 1 { (dt.year() - 1, 12) } else { (dt.year(), dt.month() - 1) };
    let naive = NaiveDate::from_ymd_opt(year, month, 1)
        .expect("valid date")
        .and_hms_opt(0, 0, 0)
        .expect("valid midnight");
    Utc.from_utc_datetime(&naive)
}

fn parse_iso_instant(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()?;
    Some(Utc.from_utc_datetime(&date.and_hms_opt(0, 0, 0)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duration_literal_windows_resolve_relative_to_now() {
        let now = Utc.with_ymd_and_hms(2026, 7, 29, 12, 0, 0).unwrap();
        let window = parse_window("24h", now).unwrap();
        assert_eq!(window.end, now);
        assert_eq!(window.start, now - Duration::hours(24));
    }

    #[test]
    fn named_window_today_starts_at_midnight() {
        let now = Utc.with_ymd_and_hms(2026, 7, 29, 15, 30, 0).unwrap();
        let window = parse_window("today", now).unwrap();
        assert_eq!(window.start, Utc.with_ymd_and_hms(2026, 7, 29, 0, 0, 0).unwrap());
        assert_eq!(window.end, now);
    }

    #[test]
    fn iso_pair_window_parses_explicit_bounds() {
        let now = Utc::now();
        let window = parse_window("2026-01-01,2026-01-02", now).unwrap();
        assert_eq!(window.start, Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap());
        assert_eq!(window.end, Utc.with_ymd_and_hms(2026, 1, 2, 0, 0, 0).unwrap());
    }

    #[test]
    fn invalid_window_is_rejected() {
        let now = Utc::now();
        assert!(parse_window("not-a-window", now).is_err());
    }

    #[test]
    fn aggregate_tokens_accept_label_keys() {
        let tokens = parse_aggregate("namespace,label:team").unwrap();
        assert_eq!(tokens.len(), 2);
        assert!(matches!(tokens[1], AggregateToken::Label(ref k) if k == "team"));
    }

    #[test]
    fn aggregate_rejects_unknown_token() {
        assert!(parse_aggregate("bogus").is_err());
    }

    #[test]
    fn filter_clause_label_uses_equals_separator() {
        let clause = parse_filter_clause("label:team=backend").unwrap();
        assert!(matches!(clause, FilterClause::Label(k, v) if k == "team" && v == "backend"));
    }

    #[test]
    fn filter_clause_plain_key_ors_values() {
        let clause = parse_filter_clause("namespace:a,b").unwrap();
        assert!(matches!(clause, FilterClause::Namespace(v) if v == vec!["a".to_string(), "b".to_string()]));
    }

    #[test]
    fn idle_mode_defaults_to_separate_row_when_shared_not_specified() {
        assert_eq!(parse_idle_mode(true, None), IdleMode::Separate);
        assert_eq!(parse_idle_mode(true, Some("weighted")), IdleMode::ShareWeighted);
        assert_eq!(parse_idle_mode(true, Some("even")), IdleMode::ShareEven);
        assert_eq!(parse_idle_mode(false, Some("weighted")), IdleMode::Discard);
    }

    #[test]
    fn buckets_partition_window_into_equal_steps() {
        let window = TimeWindow {
            start: Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap(),
            end: Utc.with_ymd_and_hms(2026, 1, 1, 3, 0, 0).unwrap(),
        };
        let buckets = build_buckets(window, Some(Duration::hours(1)), false);
        assert_eq!(buckets.len(), 3);
    }

    #[test]
    fn accumulate_collapses_to_single_bucket_regardless_of_step() {
        let window = TimeWindow {
            start: Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap(),
            end: Utc.with_ymd_and_hms(2026, 1, 1, 3, 0, 0).unwrap(),
        };
        let buckets = build_buckets(window, Some(Duration::hours(1)), true);
        assert_eq!(buckets.len(), 1);
    }
}
