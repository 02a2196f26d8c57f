//! Growth laws and fitting for load extrapolation.

use loadcast_core::ConfidenceParams;

/// Guard for zero or near-zero denominators in ratio arithmetic.
pub(crate) const EPSILON: f64 = 1e-9;

/// Coefficients of the scalability law
/// `C(N) = N / (1 + σ·(N−1) + κ·N·(N−1))`.
///
/// σ models contention (serialization on a shared resource), κ models
/// coherency (cross-talk between load units). Both are dimensionless
/// and non-negative.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UslCoefficients {
    pub sigma: f64,
    pub kappa: f64,
}

impl UslCoefficients {
    /// Latency overhead at load `n` relative to load 1:
    /// `h(n) = 1 + σ·(n−1) + κ·n·(n−1)`.
    pub fn overhead(&self, n: f64) -> f64 {
        1.0 + self.sigma * (n - 1.0) + self.kappa * n * (n - 1.0)
    }

    /// Overhead with the degenerate-denominator guard applied: a value
    /// at or below the guard collapses to the neutral ratio 1.0 instead
    /// of producing an undefined result.
    pub fn overhead_clamped(&self, n: f64) -> f64 {
        let h = self.overhead(n);
        if h <= EPSILON { 1.0 } else { h }
    }

    /// Relative capacity `C(at) / C(base)` of the law at absolute loads.
    pub fn capacity_ratio(&self, at: f64, base: f64) -> f64 {
        let c_at = at / self.overhead_clamped(at);
        let c_base = base / self.overhead_clamped(base);
        if c_at <= EPSILON || c_base <= EPSILON {
            1.0
        } else {
            c_at / c_base
        }
    }
}

/// Fit (σ, κ) against observed (normalized load, overhead) points by
/// ordinary least squares through the origin.
///
/// Points are `(n_i, y_i)` with `n_i = N_i/N_1` and `y_i = D_i/D_1 − 1`,
/// so the baseline observation contributes the trivial point (1, 0).
/// The overhead model is linear in the coefficients with regressors
/// `x1 = n−1` and `x2 = n·(n−1)`:
///
/// - one usable point (two observations): the system is underdetermined,
///   so overhead is attributed to contention alone (κ = 0), which makes
///   the fit exact;
/// - three or more observations: the 2×2 normal equations are solved in
///   closed form; a singular system falls back to the contention-only fit.
///
/// Negative fitted coefficients clamp to zero. The procedure is fully
/// deterministic: the same points always produce the same coefficients.
pub fn fit_usl(points: &[(f64, f64)]) -> UslCoefficients {
    let mut s11 = 0.0;
    let mut s12 = 0.0;
    let mut s22 = 0.0;
    let mut sy1 = 0.0;
    let mut sy2 = 0.0;

    for &(n, y) in points {
        let x1 = n - 1.0;
        let x2 = n * x1;
        s11 += x1 * x1;
        s12 += x1 * x2;
        s22 += x2 * x2;
        sy1 += x1 * y;
        sy2 += x2 * y;
    }

    let det = s11 * s22 - s12 * s12;
    let (sigma, kappa) = if det.abs() <= EPSILON {
        // Underdetermined: contention-only (the Amdahl limit of the law).
        if s11 <= EPSILON {
            (0.0, 0.0)
        } else {
            (sy1 / s11, 0.0)
        }
    } else {
        (
            (s22 * sy1 - s12 * sy2) / det,
            (s11 * sy2 - s12 * sy1) / det,
        )
    };

    UslCoefficients {
        sigma: sigma.max(0.0),
        kappa: kappa.max(0.0),
    }
}

/// Logarithmic degradation model for a single observation:
/// `D(T) = D0 · ln(T/L0 + 1)`.
///
/// Diminishing-returns widening of latency with load — a single data
/// point cannot justify anything steeper without blowing up unboundedly.
pub fn log_duration(baseline_ms: f64, baseline_load: u32, target_load: u32) -> f64 {
    let ratio = target_load as f64 / baseline_load as f64;
    baseline_ms * (ratio + 1.0).ln()
}

/// Failure-rate growth for a single observation:
/// `E(T) = min(1, E0 · (T/L0)^γ)`.
///
/// Error rate rises super-linearly as saturation approaches; the clamp
/// keeps the result a valid fraction.
pub fn power_failure_rate(
    baseline_rate: f64,
    baseline_load: u32,
    target_load: u32,
    gamma: f64,
) -> f64 {
    let ratio = target_load as f64 / baseline_load as f64;
    (baseline_rate * ratio.powf(gamma)).clamp(0.0, 1.0)
}

/// Extrapolation confidence.
///
/// Reports the ceiling when the target sits inside the measured range and
/// decays linearly with the unmeasured fraction of the target load down
/// to the floor — the further the projection reaches past what was
/// measured, the less the number is trusted.
pub fn confidence(max_observed_load: u32, target_load: u32, params: &ConfidenceParams) -> f64 {
    let measured = max_observed_load as f64 / target_load as f64;
    let unmeasured = (1.0 - measured).max(0.0);
    (1.0 - params.penalty * unmeasured).clamp(params.floor, params.ceiling)
}
