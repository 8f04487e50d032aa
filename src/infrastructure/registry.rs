//! Capability registry.
//!
//! Maps (category, name) to installed service/cli capabilities and holds
//! the cloud provider table. Populated once at startup from a fixed list
//! (static registration, no runtime plugin loading) and read-only
//! afterwards, so it is safe to share across concurrent lookups.
//!
//! Service and cli capabilities are registered as factories: every lookup
//! produces a fresh instance, which makes the one-cluster-per-instance
//! constraint of bindings safe by ownership.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::domain::models::DEFAULT_PROVIDER;
use crate::domain::ports::{CliCapability, CloudProvider, ServiceCapability};

/// Factory producing a fresh service capability instance.
pub type ServiceFactory = Box<dyn Fn() -> Box<dyn ServiceCapability> + Send + Sync>;

/// Factory producing a fresh cli capability instance.
pub type CliFactory = Box<dyn Fn() -> Box<dyn CliCapability> + Send + Sync>;

/// Lookup table for installed capabilities and providers.
///
/// Lookup is by exact name within a category; absence is a normal,
/// reportable condition — callers decide whether to warn-and-skip or abort.
pub struct PluginRegistry {
    services: BTreeMap<String, ServiceFactory>,
    clis: BTreeMap<String, CliFactory>,
    providers: BTreeMap<String, Arc<dyn CloudProvider>>,
    default_provider: String,
}

impl PluginRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self {
            services: BTreeMap::new(),
            clis: BTreeMap::new(),
            providers: BTreeMap::new(),
            default_provider: DEFAULT_PROVIDER.to_string(),
        }
    }

    /// Register the service capability for `service_type`, replacing any
    /// previous registration under the same name.
    pub fn register_service(&mut self, service_type: impl Into<String>, factory: ServiceFactory) {
        self.services.insert(service_type.into(), factory);
    }

    /// Register the cli capability for `service_type`.
    pub fn register_cli(&mut self, service_type: impl Into<String>, factory: CliFactory) {
        self.clis.insert(service_type.into(), factory);
    }

    /// Register a cloud provider under its own name.
    pub fn register_provider(&mut self, provider: Arc<dyn CloudProvider>) {
        self.providers.insert(provider.name().to_string(), provider);
    }

    /// Provider used for discovery and for clusters that configure none.
    pub fn set_default_provider(&mut self, name: impl Into<String>) {
        self.default_provider = name.into();
    }

    #[must_use]
    pub fn default_provider(&self) -> &str {
        &self.default_provider
    }

    /// A fresh service capability instance for `service_type`, if installed.
    #[must_use]
    pub fn service(&self, service_type: &str) -> Option<Box<dyn ServiceCapability>> {
        self.services.get(service_type).map(|factory| factory())
    }

    /// A fresh cli capability instance for `service_type`, if installed.
    #[must_use]
    pub fn cli(&self, service_type: &str) -> Option<Box<dyn CliCapability>> {
        self.clis.get(service_type).map(|factory| factory())
    }

    #[must_use]
    pub fn provider(&self, name: &str) -> Option<Arc<dyn CloudProvider>> {
        self.providers.get(name).cloned()
    }

    /// Installed service types, sorted. Used for discovery scanning across
    /// all known services.
    #[must_use]
    pub fn service_names(&self) -> Vec<String> {
        self.services.keys().cloned().collect()
    }

    #[must_use]
    pub fn cli_names(&self) -> Vec<String> {
        self.clis.keys().cloned().collect()
    }

    #[must_use]
    pub fn provider_names(&self) -> Vec<String> {
        self.providers.keys().cloned().collect()
    }
}

impl Default for PluginRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::plugins::tagged::{TaggedCli, TaggedService};

    fn registry_with(service_type: &'static str) -> PluginRegistry {
        let mut registry = PluginRegistry::new();
        registry.register_service(service_type, Box::new(move || {
            Box::new(TaggedService::new(service_type))
        }));
        registry.register_cli(service_type, Box::new(move || {
            Box::new(TaggedCli::new(service_type))
        }));
        registry
    }

    #[test]
    fn exact_name_lookup_only() {
        let registry = registry_with("basic");
        assert!(registry.service("basic").is_some());
        assert!(registry.service("basi").is_none());
        assert!(registry.service("BASIC").is_none());
        assert!(registry.cli("basic").is_some());
        assert!(registry.cli("other").is_none());
    }

    #[test]
    fn lookups_produce_fresh_instances() {
        let registry = registry_with("basic");
        let mut first = registry.service("basic").unwrap();
        let second = registry.service("basic").unwrap();

        let provider = std::sync::Arc::new(
            crate::infrastructure::providers::StaticProvider::new("test"),
        );
        first.attach(crate::domain::ports::ClusterHandle::new(
            provider, "web", "/cfg", "us-east-1",
        ));
        assert!(first.cluster().is_some());
        assert!(second.cluster().is_none(), "instances share no state");
    }

    #[test]
    fn default_provider_starts_at_ec2() {
        let registry = PluginRegistry::new();
        assert_eq!(registry.default_provider(), DEFAULT_PROVIDER);
    }

    #[test]
    fn enumeration_is_sorted() {
        let mut registry = registry_with("zeta");
        registry.register_service("alpha", Box::new(|| Box::new(TaggedService::new("alpha"))));
        assert_eq!(registry.service_names(), vec!["alpha", "zeta"]);
    }
}
