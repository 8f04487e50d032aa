//! Domain models
//!
//! Resolved cluster parameters, instance descriptors, and the records
//! produced by the reconciliation engine.

pub mod cluster;

pub use cluster::{keys, ClusterRecord, ClusterSpec, Instance, Overrides};
pub use cluster::{DEFAULT_PROVIDER, DEFAULT_REGION, NOT_APPLICABLE};
