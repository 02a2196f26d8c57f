//! loadcast-project — scalability projection from empirical baselines.
//!
//! Consumes per-group summaries measured at tested load levels, predicts
//! latency and failure rate at a larger untested target load, attaches a
//! confidence estimate, and verifies the prediction against requirement
//! ceilings.
//!
//! # Growth models
//!
//! ```text
//! 1 observation    D(T) = D0 · ln(T/L0 + 1)
//!                  E(T) = min(1, E0 · (T/L0)^γ)
//!
//! ≥2 observations  fit σ, κ of C(N) = N / (1 + σ(N−1) + κ·N·(N−1))
//!                  by least squares over (normalized load, overhead),
//!                  then with h(n) = 1 + σ(n−1) + κ·n·(n−1):
//!                  D(T) = D0 · h(T/L0),  E(T) = min(1, E0 · h(T/L0))
//!
//! confidence       clamp(1 − 0.3·(1 − Lmax/T), 0.70, 0.85)
//! ```
//!
//! Pure, synchronous computation over finalized snapshots — identical
//! inputs always produce identical results.

pub mod compare;
pub mod model;
pub mod projector;
pub mod report;

pub use compare::{compare_all, compare_projections, compare_summaries};
pub use model::UslCoefficients;
pub use projector::{ProjectError, ProjectionConfig, project, project_all};
