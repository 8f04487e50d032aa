//! Port traits satisfied by infrastructure implementations
//!
//! Cloud providers and the service/cli capability pair are looked up by
//! name at runtime; the engine programs against these traits only.

pub mod cli;
pub mod provider;
pub mod service;

pub use cli::{CapabilityError, CliCapability};
pub use provider::{CloudProvider, ClusterHandle, ProviderError};
pub use service::ServiceCapability;
