//! Streaming sample collector — concurrent aggregation during a run.
//!
//! Uses atomics for counters and a mutex-protected duration vector per
//! group, so many sample-producing workers can record concurrently. The
//! projector only ever consumes the finalized snapshot.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::RwLock;
use tracing::debug;

use loadcast_core::{GroupSummary, GroupTag, Sample};

use crate::summary::percentile;

/// Per-group accumulator.
struct GroupAccumulator {
    /// Total samples recorded.
    sample_count: AtomicU64,
    /// Samples with success = false.
    failure_count: AtomicU64,
    /// Durations (milliseconds) for percentile computation.
    durations: tokio::sync::Mutex<Vec<f64>>,
}

impl GroupAccumulator {
    fn new() -> Self {
        Self {
            sample_count: AtomicU64::new(0),
            failure_count: AtomicU64::new(0),
            durations: tokio::sync::Mutex::new(Vec::new()),
        }
    }
}

/// Accumulates samples across groups while a run is in flight.
///
/// Groups are created on first sample; `register` pre-declares a group so
/// that a scenario which never produces a sample still appears in the
/// finalized output as a count-0 summary (failure rate 1.0).
pub struct SampleCollector {
    /// Per-group accumulators: tag → accumulator.
    groups: Arc<RwLock<HashMap<GroupTag, Arc<GroupAccumulator>>>>,
    /// Peak concurrent virtual users, reported by the load generator.
    observed_load: AtomicU64,
}

impl SampleCollector {
    pub fn new() -> Self {
        Self {
            groups: Arc::new(RwLock::new(HashMap::new())),
            observed_load: AtomicU64::new(0),
        }
    }

    /// Pre-declare a group so it appears in the output even with no samples.
    pub async fn register(&self, group: &str) {
        let mut groups = self.groups.write().await;
        groups
            .entry(group.to_string())
            .or_insert_with(|| Arc::new(GroupAccumulator::new()));
        debug!(%group, "registered for sample collection");
    }

    /// Record one completed request for a group.
    pub async fn record(&self, group: &str, duration_ms: f64, success: bool) {
        let accumulator = {
            let groups = self.groups.read().await;
            groups.get(group).cloned()
        };

        let accumulator = match accumulator {
            Some(a) => a,
            None => {
                let mut groups = self.groups.write().await;
                groups
                    .entry(group.to_string())
                    .or_insert_with(|| Arc::new(GroupAccumulator::new()))
                    .clone()
            }
        };

        accumulator.sample_count.fetch_add(1, Ordering::Relaxed);
        if !success {
            accumulator.failure_count.fetch_add(1, Ordering::Relaxed);
        }
        accumulator.durations.lock().await.push(duration_ms);
    }

    /// Record a `Sample` produced by the load generator.
    pub async fn record_sample(&self, sample: &Sample) {
        self.record(&sample.group, sample.duration_ms, sample.success)
            .await;
    }

    /// Update the peak concurrent load reached so far.
    pub fn set_observed_load(&self, load: u32) {
        self.observed_load
            .fetch_max(load as u64, Ordering::Relaxed);
    }

    /// Snapshot every group into an immutable summary.
    ///
    /// The snapshot is run-scoped: counters are not reset, since a run
    /// produces exactly one summary per group at completion.
    pub async fn finalize(&self) -> HashMap<GroupTag, GroupSummary> {
        let observed_load = self.observed_load.load(Ordering::Relaxed) as u32;
        let groups = self.groups.read().await;
        let mut summaries = HashMap::with_capacity(groups.len());

        for (tag, accumulator) in groups.iter() {
            let count = accumulator.sample_count.load(Ordering::Relaxed);
            let failed = accumulator.failure_count.load(Ordering::Relaxed);

            let summary = if count == 0 {
                GroupSummary::empty(tag.clone(), observed_load)
            } else {
                let mut durations = accumulator.durations.lock().await.clone();
                durations.sort_by(f64::total_cmp);

                GroupSummary {
                    group: tag.clone(),
                    count,
                    mean_ms: durations.iter().sum::<f64>() / count as f64,
                    p95_ms: percentile(&durations, 95.0),
                    p99_ms: Some(percentile(&durations, 99.0)),
                    failure_rate: failed as f64 / count as f64,
                    observed_load,
                }
            };

            summaries.insert(tag.clone(), summary);
        }

        debug!(groups = summaries.len(), observed_load, "sample collection finalized");
        summaries
    }
}

impl Default for SampleCollector {
    fn default() -> Self {
        Self::new()
    }
}
