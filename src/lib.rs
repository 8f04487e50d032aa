//! Corral - Cluster Manager
//!
//! Corral manages named clusters — logical groupings of cloud compute
//! instances running a particular service — across one or more cloud
//! providers. The core is the configuration resolution and cluster
//! reconciliation engine: layered configuration with per-invocation
//! overrides, capability lookup by (category, name), and a unified
//! listing that deduplicates declared against discovered clusters.
//!
//! # Architecture
//!
//! - **Domain Layer** (`domain`): models and the port traits providers
//!   and capabilities satisfy
//! - **Service Layer** (`services`): the reconciliation engine
//! - **Infrastructure Layer** (`infrastructure`): config store, option
//!   merger, capability registry, resolver, built-in plugins, providers
//! - **CLI Layer** (`cli`): command-line interface

pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::models::{ClusterRecord, ClusterSpec, Instance, Overrides};
pub use domain::ports::{
    CapabilityError, CliCapability, CloudProvider, ClusterHandle, ProviderError, ServiceCapability,
};
pub use infrastructure::config::{ConfigError, ConfigStore, Sections};
pub use infrastructure::{PluginRegistry, ResolveError, ServiceBinding};
pub use services::{ListOutcome, ReconciliationEngine};
