//! Simulation pipeline and derived series: per-sample power, energy
//! aggregation, orientation sweep, validation, and yield reporting.

/// Time aggregation of power into energy buckets.
pub mod aggregate;
/// Per-sample weather→power pipeline.
pub mod pipeline;
/// Scalar yield KPIs.
pub mod report;
/// Orientation grid search.
pub mod sweep;
/// Modeled-vs-measured error metrics.
pub mod validate;

// Re-export the main types for convenience
pub use aggregate::EnergySeries;
pub use pipeline::simulate;
pub use report::YieldReport;
pub use sweep::{SweepResult, run_sweep};
pub use validate::{ErrorMetrics, compare_daily};
