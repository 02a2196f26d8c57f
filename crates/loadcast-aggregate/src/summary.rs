//! Pure aggregation of completed samples into per-group summaries.

use std::collections::HashMap;

use loadcast_core::{GroupSummary, GroupTag, Sample};

/// Fold a finite sample sequence into one summary per distinct group tag.
///
/// `observed_load` is the peak concurrent virtual-user count during the
/// run, reported by the load generator; it is stamped onto every summary
/// so projections know which load level the numbers were measured at.
///
/// Pure function of its input: no side effects, no ordering requirement
/// between groups.
pub fn aggregate(samples: &[Sample], observed_load: u32) -> HashMap<GroupTag, GroupSummary> {
    let mut by_group: HashMap<&str, Vec<&Sample>> = HashMap::new();
    for sample in samples {
        by_group.entry(sample.group.as_str()).or_default().push(sample);
    }

    by_group
        .into_iter()
        .map(|(tag, group)| (tag.to_string(), summarize(tag, &group, observed_load)))
        .collect()
}

fn summarize(tag: &str, samples: &[&Sample], observed_load: u32) -> GroupSummary {
    if samples.is_empty() {
        return GroupSummary::empty(tag, observed_load);
    }

    let count = samples.len() as u64;
    let failed = samples.iter().filter(|s| !s.success).count() as u64;

    let mut durations: Vec<f64> = samples.iter().map(|s| s.duration_ms).collect();
    durations.sort_by(f64::total_cmp);

    let mean = durations.iter().sum::<f64>() / count as f64;

    GroupSummary {
        group: tag.to_string(),
        count,
        mean_ms: mean,
        p95_ms: percentile(&durations, 95.0),
        p99_ms: Some(percentile(&durations, 99.0)),
        failure_rate: failed as f64 / count as f64,
        observed_load,
    }
}

/// Percentile by linear interpolation between order statistics.
///
/// `sorted` must be ascending. The rank is `p/100 · (n − 1)`; a
/// fractional rank interpolates between the two surrounding samples.
/// This definition is continuous in the sample values, which keeps
/// percentiles comparable across runs of different sizes. A single
/// sample is every percentile of itself; an empty slice reports 0.0.
pub fn percentile(sorted: &[f64], p: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }

    let rank = (p / 100.0) * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = (lo + 1).min(sorted.len() - 1);
    let frac = rank - lo as f64;

    sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}
