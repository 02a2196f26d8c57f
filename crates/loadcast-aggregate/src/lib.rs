//! loadcast-aggregate — per-group summaries from raw request samples.
//!
//! Collapses the sample stream handed over by the load generator into one
//! `GroupSummary` per scenario/region tag: count, mean, p95/p99, failure
//! rate.
//!
//! # Architecture
//!
//! ```text
//! summary
//!   └── aggregate() → pure fold over a finished sample set
//!
//! SampleCollector
//!   ├── record() ← called per request, safe across worker tasks
//!   └── finalize() → immutable GroupSummary snapshot per group
//! ```

pub mod collector;
pub mod summary;

pub use collector::SampleCollector;
pub use summary::{aggregate, percentile};
