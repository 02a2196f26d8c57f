//! Projection of group baselines to a target load, with verdicts.

use std::collections::HashMap;

use thiserror::Error;
use tracing::{debug, warn};

use loadcast_core::{
    ConfidenceParams, GroupSummary, GroupTag, ModelParams, ProjectionResult,
    RequirementThresholds, RequirementVerdict,
};

use crate::model::{self, EPSILON, UslCoefficients};

/// Model identifier: logarithmic single-observation projection.
pub const MODEL_LOG_SINGLE: &str = "log-growth/single-point";
/// Model identifier: least-squares-fitted scalability law.
pub const MODEL_USL_FITTED: &str = "usl/least-squares";
/// Model identifier: fixed-coefficient scalability law.
pub const MODEL_USL_FIXED: &str = "usl/fixed";

/// Result type alias for projection operations.
pub type ProjectResult<T> = Result<T, ProjectError>;

/// Errors raised by projection preconditions.
///
/// These are invalid-configuration failures: detected at call time,
/// never silently substituted with defaults.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProjectError {
    #[error("invalid configuration: target load must be at least 1 (got {0})")]
    InvalidTargetLoad(u32),

    #[error("invalid configuration: no observations supplied")]
    NoObservations,

    #[error("invalid configuration: observed load must be positive (group {group})")]
    NonPositiveLoad { group: String },
}

/// Everything a projection call needs beyond the observations themselves.
///
/// Passed in explicitly — there is no process-wide state behind this.
#[derive(Debug, Clone, Default)]
pub struct ProjectionConfig {
    pub thresholds: RequirementThresholds,
    pub model: ModelParams,
    pub confidence: ConfidenceParams,
}

/// Project one group's baselines to `target_load`.
///
/// `observations` are summaries of the same group measured at different
/// load levels; order does not matter, they are sorted by observed load
/// internally. One observation selects the logarithmic model, two or
/// more select the fitted scalability law (see crate docs).
///
/// Pure: identical inputs yield identical results. A count-0 observation
/// is valid input — its failure rate of 1.0 flows through and fails the
/// failure-rate verdict.
pub fn project(
    observations: &[GroupSummary],
    target_load: u32,
    config: &ProjectionConfig,
) -> ProjectResult<ProjectionResult> {
    if target_load < 1 {
        return Err(ProjectError::InvalidTargetLoad(target_load));
    }
    if observations.is_empty() {
        return Err(ProjectError::NoObservations);
    }
    for obs in observations {
        if obs.observed_load == 0 {
            return Err(ProjectError::NonPositiveLoad {
                group: obs.group.clone(),
            });
        }
    }

    let mut ordered: Vec<&GroupSummary> = observations.iter().collect();
    ordered.sort_by_key(|s| s.observed_load);

    let baseline = ordered[0];
    let max_observed = ordered[ordered.len() - 1].observed_load;
    let group = baseline.group.clone();

    let (duration_ms, failure_rate, model_id) = if ordered.len() == 1 {
        project_single(baseline, target_load, &config.model)
    } else {
        project_fitted(&ordered, target_load)
    };

    let failure_rate = failure_rate.clamp(0.0, 1.0);
    let confidence = model::confidence(max_observed, target_load, &config.confidence);
    let verdicts = build_verdicts(&config.thresholds, duration_ms, failure_rate);
    let meets_requirements = verdicts.iter().all(|v| v.satisfied);

    debug!(
        %group,
        model = model_id,
        target_load,
        projected_ms = duration_ms,
        projected_failure = failure_rate,
        confidence,
        meets_requirements,
        "projection complete"
    );

    Ok(ProjectionResult {
        group,
        target_load,
        projected_duration_ms: duration_ms,
        projected_failure_rate: failure_rate,
        confidence,
        verdicts,
        meets_requirements,
        model: model_id.to_string(),
    })
}

/// Single empirical point: logarithmic duration growth, power-law error
/// growth — or the fixed-coefficient scalability curve when σ/κ were
/// supplied explicitly.
fn project_single(
    obs: &GroupSummary,
    target_load: u32,
    params: &ModelParams,
) -> (f64, f64, &'static str) {
    let failure = model::power_failure_rate(
        obs.failure_rate,
        obs.observed_load,
        target_load,
        params.gamma,
    );

    if params.fixed_coefficients {
        let coeffs = UslCoefficients {
            sigma: params.sigma,
            kappa: params.kappa,
        };
        let speedup = coeffs.capacity_ratio(target_load as f64, obs.observed_load as f64);
        // Duration scales by the inverse capacity ratio; a degenerate
        // ratio collapses to the neutral 1.0.
        let multiplier = if speedup <= EPSILON { 1.0 } else { 1.0 / speedup };
        (obs.p95_ms * multiplier, failure, MODEL_USL_FIXED)
    } else {
        let duration = model::log_duration(obs.p95_ms, obs.observed_load, target_load);
        (duration, failure, MODEL_LOG_SINGLE)
    }
}

/// Two or more empirical points: fit the scalability law in latency
/// overhead space, then rescale the lowest-load baseline by the fitted
/// overhead at the target.
fn project_fitted(ordered: &[&GroupSummary], target_load: u32) -> (f64, f64, &'static str) {
    let baseline = ordered[0];
    let base_load = baseline.observed_load as f64;
    let base_duration = baseline.p95_ms;

    let points: Vec<(f64, f64)> = ordered
        .iter()
        .map(|obs| {
            let n = obs.observed_load as f64 / base_load;
            let y = if base_duration <= EPSILON {
                0.0
            } else {
                obs.p95_ms / base_duration - 1.0
            };
            (n, y)
        })
        .collect();

    let coeffs = crate::model::fit_usl(&points);
    let h = coeffs.overhead_clamped(target_load as f64 / base_load);

    let duration = base_duration * h;
    let failure = (baseline.failure_rate * h).min(1.0);
    (duration, failure, MODEL_USL_FITTED)
}

fn build_verdicts(
    thresholds: &RequirementThresholds,
    duration_ms: f64,
    failure_rate: f64,
) -> Vec<RequirementVerdict> {
    let mut verdicts = Vec::new();

    if let Some(limit) = thresholds.max_duration_ms {
        verdicts.push(RequirementVerdict {
            requirement: "max_duration_ms".to_string(),
            limit,
            projected: duration_ms,
            satisfied: duration_ms < limit,
        });
    }
    if let Some(limit) = thresholds.max_failure_rate {
        verdicts.push(RequirementVerdict {
            requirement: "max_failure_rate".to_string(),
            limit,
            projected: failure_rate,
            satisfied: failure_rate < limit,
        });
    }

    verdicts
}

/// Project every group independently.
///
/// Groups are processed in tag order for reproducible output. A failed
/// projection for one group never prevents the others from being
/// projected — each group carries its own result.
pub fn project_all(
    groups: &HashMap<GroupTag, Vec<GroupSummary>>,
    target_load: u32,
    config: &ProjectionConfig,
) -> Vec<(GroupTag, ProjectResult<ProjectionResult>)> {
    let mut tags: Vec<&GroupTag> = groups.keys().collect();
    tags.sort();

    tags.into_iter()
        .map(|tag| {
            let result = project(&groups[tag], target_load, config);
            if let Err(e) = &result {
                warn!(group = %tag, error = %e, "projection failed");
            }
            (tag.clone(), result)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn observation(group: &str, load: u32, p95_ms: f64, failure_rate: f64) -> GroupSummary {
        GroupSummary {
            group: group.to_string(),
            count: 1000,
            mean_ms: p95_ms,
            p95_ms,
            p99_ms: Some(p95_ms * 1.2),
            failure_rate,
            observed_load: load,
        }
    }

    fn thresholds(max_duration_ms: f64, max_failure_rate: f64) -> RequirementThresholds {
        RequirementThresholds {
            max_duration_ms: Some(max_duration_ms),
            max_failure_rate: Some(max_failure_rate),
        }
    }

    #[test]
    fn single_point_projection_to_215k() {
        // One clean run at 1000 VUs, projected to 215k.
        let obs = [observation("participante", 1000, 147.0, 0.0)];
        let config = ProjectionConfig {
            thresholds: thresholds(5000.0, 0.02),
            ..Default::default()
        };

        let result = project(&obs, 215_000, &config).unwrap();

        let expected = 147.0 * (216.0_f64).ln();
        assert!((result.projected_duration_ms - expected).abs() < 1e-9);
        assert!(result.projected_duration_ms > 789.0 && result.projected_duration_ms < 791.0);
        assert_eq!(result.projected_failure_rate, 0.0);
        assert_eq!(result.model, MODEL_LOG_SINGLE);
        assert!(result.meets_requirements);
        assert_eq!(result.verdicts.len(), 2);
        assert!(result.verdicts.iter().all(|v| v.satisfied));
    }

    #[test]
    fn two_point_projection_to_200k() {
        // Runs at 500 and 2000 VUs, projected to 200k. The documented
        // fit gives σ = 11/45, κ = 0, overhead h(400) = 4434/45.
        let obs = [
            observation("participante", 500, 3000.0, 0.01),
            observation("participante", 2000, 5200.0, 0.02),
        ];
        let config = ProjectionConfig {
            thresholds: thresholds(8000.0, 0.03),
            ..Default::default()
        };

        let result = project(&obs, 200_000, &config).unwrap();

        let h = 4434.0 / 45.0;
        assert!((result.projected_duration_ms - 3000.0 * h).abs() < 1e-6);
        assert!((result.projected_duration_ms - 295_600.0).abs() < 1e-6);
        assert!((result.projected_failure_rate - 0.01 * h).abs() < 1e-12);
        assert_eq!(result.model, MODEL_USL_FITTED);
        assert!(!result.meets_requirements);
    }

    #[test]
    fn fitted_model_reproduces_observations() {
        // An exact two-point fit must pass through the higher observation.
        let obs = [
            observation("api", 500, 3000.0, 0.01),
            observation("api", 2000, 5200.0, 0.02),
        ];
        let result = project(&obs, 2000, &ProjectionConfig::default()).unwrap();
        assert!((result.projected_duration_ms - 5200.0).abs() < 1e-9);
    }

    #[test]
    fn target_equal_to_observed_load_is_ln2() {
        let obs = [observation("api", 1000, 147.0, 0.0)];
        let result = project(&obs, 1000, &ProjectionConfig::default()).unwrap();
        assert!(
            (result.projected_duration_ms - 147.0 * std::f64::consts::LN_2).abs() < 1e-9
        );
        // No extrapolation: confidence sits at the ceiling.
        assert_eq!(result.confidence, 0.85);
    }

    #[test]
    fn projection_is_pure() {
        let obs = [
            observation("api", 500, 3000.0, 0.01),
            observation("api", 2000, 5200.0, 0.02),
        ];
        let config = ProjectionConfig {
            thresholds: thresholds(8000.0, 0.03),
            ..Default::default()
        };

        let first = project(&obs, 200_000, &config).unwrap();
        let second = project(&obs, 200_000, &config).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn failure_rate_never_exceeds_one() {
        let obs = [observation("api", 100, 500.0, 0.4)];
        let result = project(&obs, 100_000, &ProjectionConfig::default()).unwrap();
        assert_eq!(result.projected_failure_rate, 1.0);
    }

    #[test]
    fn rejects_zero_target_load() {
        let obs = [observation("api", 1000, 147.0, 0.0)];
        assert_eq!(
            project(&obs, 0, &ProjectionConfig::default()),
            Err(ProjectError::InvalidTargetLoad(0))
        );
    }

    #[test]
    fn rejects_empty_observations() {
        assert_eq!(
            project(&[], 1000, &ProjectionConfig::default()),
            Err(ProjectError::NoObservations)
        );
    }

    #[test]
    fn rejects_zero_observed_load() {
        let obs = [observation("api", 0, 147.0, 0.0)];
        assert!(matches!(
            project(&obs, 1000, &ProjectionConfig::default()),
            Err(ProjectError::NonPositiveLoad { .. })
        ));
    }

    #[test]
    fn zero_count_group_propagates_total_failure() {
        // A group that produced no samples projects as total failure and
        // fails the failure-rate verdict; the call itself succeeds.
        let obs = [GroupSummary::empty("ghost", 500)];
        let config = ProjectionConfig {
            thresholds: thresholds(5000.0, 0.02),
            ..Default::default()
        };

        let result = project(&obs, 10_000, &config).unwrap();
        assert_eq!(result.projected_failure_rate, 1.0);
        assert_eq!(result.projected_duration_ms, 0.0);
        assert!(!result.meets_requirements);
    }

    #[test]
    fn fixed_coefficients_select_usl_curve() {
        let obs = [observation("participante", 1000, 147.0, 0.0)];
        let config = ProjectionConfig {
            model: ModelParams {
                sigma: 0.0008,
                kappa: 0.00002,
                gamma: 1.2,
                fixed_coefficients: true,
            },
            ..Default::default()
        };

        let result = project(&obs, 215_000, &config).unwrap();
        assert_eq!(result.model, MODEL_USL_FIXED);

        // Past the law's peak, per-user capacity collapses and duration
        // grows far beyond the logarithmic estimate.
        let coeffs = UslCoefficients { sigma: 0.0008, kappa: 0.00002 };
        let expected = 147.0 / coeffs.capacity_ratio(215_000.0, 1000.0);
        assert!((result.projected_duration_ms - expected).abs() < 1e-6);
        assert!(result.projected_duration_ms > 147.0 * (216.0_f64).ln());
    }

    #[test]
    fn confidence_decreases_with_target_distance() {
        let obs = [observation("api", 2000, 300.0, 0.0)];
        let config = ProjectionConfig::default();

        let near = project(&obs, 4000, &config).unwrap();
        let far = project(&obs, 200_000, &config).unwrap();
        assert!(near.confidence >= far.confidence);
        assert!(far.confidence >= 0.70);
        assert!(near.confidence <= 0.85);
    }

    #[test]
    fn project_all_isolates_group_failures() {
        let mut groups = HashMap::new();
        groups.insert(
            "healthy".to_string(),
            vec![observation("healthy", 1000, 200.0, 0.01)],
        );
        groups.insert(
            "broken".to_string(),
            vec![observation("broken", 0, 200.0, 0.01)],
        );

        let results = project_all(&groups, 50_000, &ProjectionConfig::default());
        assert_eq!(results.len(), 2);

        // Tag order: broken first, healthy second.
        assert_eq!(results[0].0, "broken");
        assert!(results[0].1.is_err());
        assert_eq!(results[1].0, "healthy");
        assert!(results[1].1.is_ok());
    }

    #[test]
    fn no_thresholds_means_vacuously_satisfied() {
        let obs = [observation("api", 1000, 147.0, 0.0)];
        let result = project(&obs, 10_000, &ProjectionConfig::default()).unwrap();
        assert!(result.verdicts.is_empty());
        assert!(result.meets_requirements);
    }
}
