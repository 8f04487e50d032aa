//! Infrastructure layer
//!
//! Adapters behind the domain ports: configuration loading and option
//! merging, the capability registry and binding resolver, built-in
//! capability implementations, and providers.

pub mod config;
pub mod plugins;
pub mod providers;
pub mod registry;
pub mod resolver;

pub use registry::PluginRegistry;
pub use resolver::{bind, ResolveError, ServiceBinding};
