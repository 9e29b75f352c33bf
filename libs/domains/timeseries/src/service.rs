use std::sync::Arc;

use chrono::Utc;
use domain_tenancy::TenantContext;
use observability::IngestMetrics;
use uuid::Uuid;

use crate::error::{TimeseriesError, TimeseriesResult};
use crate::models::{CollectionBundle, IngestAccepted, NodeSample, PodSample, MAX_LABELS_BYTES};
use crate::repository::TimeseriesRepository;

/// Minimum fraction of samples in a bundle that must write successfully for ingest to be
/// considered `Accepted` rather than `IngestDegraded` (§4.4 step 5).
const MIN_ACCEPT_RATIO: f64 = 0.8;

#[derive(Clone)]
pub struct IngestService<R: TimeseriesRepository> {
    repository: Arc<R>,
    max_payload_bytes: usize,
}

impl<R: TimeseriesRepository> IngestService<R> {
    pub fn new(repository: R, max_payload_bytes: usize) -> Self {
        Self {
            repository: Arc::new(repository),
            max_payload_bytes,
        }
    }

    /// Runs C4 steps 4-6. Auth (step 1), tenant bind (step 2) and the plan check (step 3) happen
    /// upstream, in the caller that constructs `ctx` and `bound_cluster`.
    pub async fn ingest(
        &self,
        ctx: &TenantContext,
        tenant_id: Uuid,
        bound_cluster: &str,
        raw_payload_bytes: usize,
        bundle: CollectionBundle,
    ) -> TimeseriesResult<IngestAccepted> {
        if raw_payload_bytes > self.max_payload_bytes {
            return Err(TimeseriesError::PayloadTooLarge);
        }
        if bundle.cluster_name != bound_cluster {
            return Err(TimeseriesError::ClusterMismatch);
        }

        let time = bundle.timestamp.unwrap_or_else(Utc::now);
        let total = bundle.pod_metrics.len() + bundle.node_metrics.len();
        if total == 0 {
            return Ok(IngestAccepted {
                status: "accepted",
                accepted: 0,
            });
        }

        let batch_start = std::time::Instant::now();
        let mut accepted = 0usize;
        let mut pod_accepted = 0usize;
        let mut pod_rejected = 0usize;
        let mut node_accepted = 0usize;
        let mut node_rejected = 0usize;

        for metric in bundle.pod_metrics {
            let row = PodSample {
                id: Uuid::new_v4(),
                time,
                tenant_id,
                cluster: bundle.cluster_name.clone(),
                namespace: metric.namespace,
                pod: metric.pod,
                node: metric.node,
                controller: metric.controller,
                cpu_millicores_usage: clamp_non_negative(metric.cpu_millicores_usage),
                mem_bytes_usage: clamp_non_negative(metric.mem_bytes_usage),
                cpu_millicores_request: clamp_non_negative(metric.cpu_millicores_request),
                mem_bytes_request: clamp_non_negative(metric.mem_bytes_request),
                cpu_millicores_limit: clamp_non_negative(metric.cpu_millicores_limit),
                mem_bytes_limit: clamp_non_negative(metric.mem_bytes_limit),
                labels: truncate_labels(metric.labels),
                phase: metric.phase,
                qos_class: metric.qos_class,
                containers: metric.containers.into_iter().map(clamp_container).collect(),
            };
            match self.repository.insert_pod_sample(ctx, row).await {
                Ok(()) => {
                    accepted += 1;
                    pod_accepted += 1;
                }
                Err(err) => {
                    pod_rejected += 1;
                    tracing::warn!(error = %err, "pod sample write failed");
                }
            }
        }

        for metric in bundle.node_metrics {
            let row = NodeSample {
                id: Uuid::new_v4(),
                time,
                tenant_id,
                cluster: bundle.cluster_name.clone(),
                node: metric.node,
                instance_type: metric.instance_type,
                cpu_capacity_millicores: clamp_non_negative(metric.cpu_capacity_millicores),
                mem_capacity_bytes: clamp_non_negative(metric.mem_capacity_bytes),
                hourly_cost_usd_hint: metric.hourly_cost_usd_hint,
            };
            match self.repository.insert_node_sample(ctx, row).await {
                Ok(()) => {
                    accepted += 1;
                    node_accepted += 1;
                }
                Err(err) => {
                    node_rejected += 1;
                    tracing::warn!(error = %err, "node sample write failed");
                }
            }
        }

        let tenant_id_str = tenant_id.to_string();
        if pod_accepted > 0 {
            IngestMetrics::record_batch_accepted(&tenant_id_str, "pod", pod_accepted, batch_start.elapsed().as_secs_f64());
        }
        if node_accepted > 0 {
            IngestMetrics::record_batch_accepted(&tenant_id_str, "node", node_accepted, batch_start.elapsed().as_secs_f64());
        }
        if pod_rejected > 0 {
            IngestMetrics::record_batch_rejected(&tenant_id_str, "pod", "write_failed", pod_rejected);
        }
        if node_rejected > 0 {
            IngestMetrics::record_batch_rejected(&tenant_id_str, "node", "write_failed", node_rejected);
        }

        let ratio = accepted as f64 / total as f64;
        if accepted > 0 && ratio >= MIN_ACCEPT_RATIO {
            Ok(IngestAccepted {
                status: "accepted",
                accepted,
            })
        } else {
            IngestMetrics::record_degraded("below_min_accept_ratio");
            Err(TimeseriesError::IngestDegraded { accepted, total })
        }
    }
}

fn clamp_non_negative(value: i64) -> i64 {
    value.max(0)
}

fn clamp_container(container: crate::models::ContainerSample) -> crate::models::ContainerSample {
    crate::models::ContainerSample {
        container_name: container.container_name,
        cpu_millicores_usage: clamp_non_negative(container.cpu_millicores_usage),
        mem_bytes_usage: clamp_non_negative(container.mem_bytes_usage),
        cpu_millicores_request: clamp_non_negative(container.cpu_millicores_request),
        mem_bytes_request: clamp_non_negative(container.mem_bytes_request),
        cpu_millicores_limit: clamp_non_negative(container.cpu_millicores_limit),
        mem_bytes_limit: clamp_non_negative(container.mem_bytes_limit),
    }
}

/// Drops labels by descending total `key.len() + value.len()` until the serialized map fits
/// within [`MAX_LABELS_BYTES`] (§4.4 step 4).
fn truncate_labels(
    labels: std::collections::HashMap<String, String>,
) -> std::collections::HashMap<String, String> {
    let mut entries: Vec<(String, String)> = labels.into_iter().collect();
    let total_size = |entries: &[(String, String)]| -> usize {
        entries.iter().map(|(k, v)| k.len() + v.len()).sum()
    };

    if total_size(&entries) <= MAX_LABELS_BYTES {
        return entries.into_iter().collect();
    }

    entries.sort_by_key(|(k, v)| std::cmp::Reverse(k.len() + v.len()));
    while !entries.is_empty() && total_size(&entries) > MAX_LABELS_BYTES {
        entries.remove(0);
    }
    entries.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_non_negative_floors_at_zero() {
        assert_eq!(clamp_non_negative(-5), 0);
        assert_eq!(clamp_non_negative(5), 5);
    }

    #[test]
    fn truncate_labels_keeps_small_maps_untouched() {
        let mut labels = std::collections::HashMap::new();
        labels.insert("app".to_string(), "web".to_string());
        let result = truncate_labels(labels.clone());
        assert_eq!(result, labels);
    }

    #[test]
    fn truncate_labels_drops_largest_entries_first() {
        let mut labels = std::collections::HashMap::new();
        labels.insert("small".to_string(), "x".to_string());
        labels.insert("huge".to_string(), "y".repeat(MAX_LABELS_BYTES));
        let result = truncate_labels(labels);
        assert!(result.contains_key("small"));
        assert!(!result.contains_key("huge"));
    }
}
