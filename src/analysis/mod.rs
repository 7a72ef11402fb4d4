//! Batch analysis.
//!
//! Turns the per-view defect reports into the final AQL verdict.

pub mod aggregator;

pub use aggregator::*;
