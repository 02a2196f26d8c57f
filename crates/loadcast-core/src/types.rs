//! Shared types used across loadcast crates.
//!
//! These types carry measurements from the load-generation side into the
//! aggregation and projection stages. Everything is serializable so runs
//! can be exchanged as JSON with external tooling.

use serde::{Deserialize, Serialize};

/// Tag identifying a scenario or region group (e.g. "nordeste", "checkout").
pub type GroupTag = String;

/// One completed request observation.
///
/// Produced by the load generator, consumed only by the aggregator.
/// Immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Sample {
    /// Group tag this request belongs to.
    pub group: GroupTag,
    /// Request duration in milliseconds (non-negative).
    pub duration_ms: f64,
    /// Whether the request passed all response checks.
    pub success: bool,
    /// Monotonic timestamp in milliseconds, used for ordering only.
    pub timestamp_ms: u64,
}

/// Aggregated statistics for one group over one run.
///
/// Created once at run completion and never mutated afterward; a new run
/// produces a new summary.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GroupSummary {
    pub group: GroupTag,
    /// Number of samples observed for this group.
    pub count: u64,
    /// Arithmetic mean duration in milliseconds.
    pub mean_ms: f64,
    /// 95th percentile duration in milliseconds.
    pub p95_ms: f64,
    /// 99th percentile duration in milliseconds. Absent when count = 0.
    pub p99_ms: Option<f64>,
    /// Failed samples / total samples (0.0–1.0). Pinned to 1.0 when count = 0.
    pub failure_rate: f64,
    /// Peak concurrent virtual users during the measurement window.
    pub observed_load: u32,
}

impl GroupSummary {
    /// Sentinel summary for a group that produced no samples.
    ///
    /// The failure rate is pinned to 1.0 so a silent group reads as a
    /// failed one and downstream consumers never special-case missing data.
    pub fn empty(group: impl Into<GroupTag>, observed_load: u32) -> Self {
        GroupSummary {
            group: group.into(),
            count: 0,
            mean_ms: 0.0,
            p95_ms: 0.0,
            p99_ms: None,
            failure_rate: 1.0,
            observed_load,
        }
    }

    /// Availability as a fraction (1 − failure rate).
    pub fn availability(&self) -> f64 {
        1.0 - self.failure_rate
    }
}

/// Pass/fail ceilings a projection is verified against.
///
/// Supplied externally (usually from `loadcast.toml`), never derived.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RequirementThresholds {
    /// Ceiling on the projected (p95) duration in milliseconds.
    pub max_duration_ms: Option<f64>,
    /// Ceiling on the projected failure rate (fraction, 0.0–1.0).
    pub max_failure_rate: Option<f64>,
}

/// Growth-model parameters.
///
/// σ and κ drive the scalability-law overhead curve; γ is the
/// failure-rate growth exponent of the single-observation model. The
/// defaults are deliberately conservative heuristics, not calibrated
/// constants — tune them per system under test.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ModelParams {
    /// Contention coefficient (σ ≥ 0).
    pub sigma: f64,
    /// Coherency coefficient (κ ≥ 0).
    pub kappa: f64,
    /// Failure-rate growth exponent, typically in 1.0–1.5.
    pub gamma: f64,
    /// Project single observations through the fixed-coefficient
    /// scalability curve instead of the logarithmic fallback.
    pub fixed_coefficients: bool,
}

impl Default for ModelParams {
    fn default() -> Self {
        ModelParams {
            sigma: 0.0008,
            kappa: 0.00002,
            gamma: 1.2,
            fixed_coefficients: false,
        }
    }
}

/// Bounds and decay rate of the extrapolation confidence estimate.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ConfidenceParams {
    /// Lowest reported confidence, reached at extreme extrapolation.
    pub floor: f64,
    /// Highest reported confidence, reached when not extrapolating.
    pub ceiling: f64,
    /// Linear decay per unit of unmeasured target fraction.
    pub penalty: f64,
}

impl Default for ConfidenceParams {
    fn default() -> Self {
        ConfidenceParams {
            floor: 0.70,
            ceiling: 0.85,
            penalty: 0.3,
        }
    }
}

/// Verdict for a single configured requirement.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RequirementVerdict {
    /// Requirement name ("max_duration_ms", "max_failure_rate").
    pub requirement: String,
    /// Configured ceiling.
    pub limit: f64,
    /// Projected value the ceiling was checked against.
    pub projected: f64,
    /// Whether the projected value stays strictly below the ceiling.
    pub satisfied: bool,
}

/// Output of one projection call. Immutable; consumed by the report layer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProjectionResult {
    pub group: GroupTag,
    /// Load level the projection targets (virtual users).
    pub target_load: u32,
    /// Projected p95 duration at the target load, in milliseconds.
    pub projected_duration_ms: f64,
    /// Projected failure rate at the target load (0.0–1.0).
    pub projected_failure_rate: f64,
    /// Trust in the projection (0.0–1.0), lower the further we extrapolate.
    pub confidence: f64,
    /// One verdict per configured threshold.
    pub verdicts: Vec<RequirementVerdict>,
    /// Conjunction of all individual verdicts.
    pub meets_requirements: bool,
    /// Identifier of the growth law and fitting procedure used.
    pub model: String,
}

/// Equivalence verdict for a pair of groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Equivalence {
    Equivalent,
    Divergent,
}

impl Equivalence {
    pub fn label(&self) -> &'static str {
        match self {
            Equivalence::Equivalent => "EQUIVALENT",
            Equivalence::Divergent => "DIVERGENT",
        }
    }
}

/// Relative performance divergence between two groups.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GroupComparison {
    pub left: GroupTag,
    pub right: GroupTag,
    /// Duration divergence as a percentage of the pair mean.
    pub duration_divergence_pct: f64,
    /// Failure-rate divergence as a percentage of the pair mean.
    pub failure_divergence_pct: f64,
    /// Threshold the duration divergence was judged against.
    pub threshold_pct: f64,
    pub verdict: Equivalence,
}
