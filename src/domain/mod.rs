//! Domain layer for the Corral cluster manager
//!
//! Core models and the port traits that cloud providers and pluggable
//! capabilities satisfy.

pub mod models;
pub mod ports;

pub use models::{ClusterRecord, ClusterSpec, Instance, Overrides};
pub use ports::{
    CapabilityError, CliCapability, CloudProvider, ClusterHandle, ProviderError, ServiceCapability,
};
