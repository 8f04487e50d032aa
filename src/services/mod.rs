//! Service layer: orchestration over configuration and capabilities.

pub mod reconcile;

pub use reconcile::{ClusterFailure, ListOutcome, ReconciliationEngine};
