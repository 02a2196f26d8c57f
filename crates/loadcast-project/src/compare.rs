//! Cross-group performance comparison.
//!
//! Supports equivalence claims across regions or scenarios: two groups
//! are "equivalent" when their durations diverge by less than the
//! configured threshold percentage of the pair mean.

use loadcast_core::{Equivalence, GroupComparison, GroupSummary, ProjectionResult};

use crate::model::EPSILON;

/// Relative divergence of two values as a percentage of their mean:
/// `|a − b| / ((a + b) / 2) · 100`.
///
/// Identical values (including both zero) are 0% apart; a zero mean with
/// a non-zero difference reports 100%.
pub fn divergence_pct(a: f64, b: f64) -> f64 {
    let diff = (a - b).abs();
    if diff == 0.0 {
        return 0.0;
    }
    let mean = (a + b) / 2.0;
    if mean.abs() <= EPSILON {
        return 100.0;
    }
    diff / mean * 100.0
}

/// Compare two groups' projected figures.
pub fn compare_projections(
    left: &ProjectionResult,
    right: &ProjectionResult,
    threshold_pct: f64,
) -> GroupComparison {
    compare_figures(
        &left.group,
        left.projected_duration_ms,
        left.projected_failure_rate,
        &right.group,
        right.projected_duration_ms,
        right.projected_failure_rate,
        threshold_pct,
    )
}

/// Compare two groups' observed figures (p95 duration, failure rate).
pub fn compare_summaries(
    left: &GroupSummary,
    right: &GroupSummary,
    threshold_pct: f64,
) -> GroupComparison {
    compare_figures(
        &left.group,
        left.p95_ms,
        left.failure_rate,
        &right.group,
        right.p95_ms,
        right.failure_rate,
        threshold_pct,
    )
}

fn compare_figures(
    left: &str,
    left_duration: f64,
    left_failure: f64,
    right: &str,
    right_duration: f64,
    right_failure: f64,
    threshold_pct: f64,
) -> GroupComparison {
    let duration_divergence_pct = divergence_pct(left_duration, right_duration);
    let failure_divergence_pct = divergence_pct(left_failure, right_failure);

    let verdict = if duration_divergence_pct < threshold_pct {
        Equivalence::Equivalent
    } else {
        Equivalence::Divergent
    };

    GroupComparison {
        left: left.to_string(),
        right: right.to_string(),
        duration_divergence_pct,
        failure_divergence_pct,
        threshold_pct,
        verdict,
    }
}

/// Compare every pair of projected groups, in input order.
pub fn compare_all(results: &[ProjectionResult], threshold_pct: f64) -> Vec<GroupComparison> {
    let mut comparisons = Vec::new();
    for (i, left) in results.iter().enumerate() {
        for right in &results[i + 1..] {
            comparisons.push(compare_projections(left, right, threshold_pct));
        }
    }
    comparisons
}
