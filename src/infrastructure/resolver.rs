//! Cluster binding: pairing a cluster with its capability instances.

use std::path::Path;

use crate::domain::ports::{CliCapability, ClusterHandle, ServiceCapability};
use crate::infrastructure::registry::PluginRegistry;

/// Error type for capability binding.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error("no cli capability installed for service type '{0}'")]
    MissingCli(String),

    #[error("no service capability installed for service type '{0}'")]
    MissingService(String),

    #[error("no cloud provider registered under '{0}'")]
    MissingProvider(String),
}

/// A cluster's live pairing of service and cli capability instances.
///
/// The service already holds the provider cluster handle. The binding is
/// exclusively owned by the call that created it and dropped after one
/// operation; nothing is cached across invocations.
pub struct ServiceBinding {
    pub service: Box<dyn ServiceCapability>,
    pub cli: Box<dyn CliCapability>,
}

impl std::fmt::Debug for ServiceBinding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceBinding").finish_non_exhaustive()
    }
}

/// Bind fresh capability instances for one cluster.
///
/// Resolves the cli capability, then the service capability, then the
/// provider; builds the cluster handle from `(name, config_dir, region)`
/// and attaches it to the service instance.
///
/// # Errors
/// One `ResolveError` naming the missing capability or provider. Absence
/// is recoverable at per-cluster granularity — callers warn-and-skip in
/// aggregate listings and abort only single-cluster commands.
pub fn bind(
    registry: &PluginRegistry,
    name: &str,
    provider: &str,
    service_type: &str,
    region: &str,
    config_dir: &Path,
) -> Result<ServiceBinding, ResolveError> {
    let cli = registry
        .cli(service_type)
        .ok_or_else(|| ResolveError::MissingCli(service_type.to_string()))?;
    let mut service = registry
        .service(service_type)
        .ok_or_else(|| ResolveError::MissingService(service_type.to_string()))?;
    let provider = registry
        .provider(provider)
        .ok_or_else(|| ResolveError::MissingProvider(provider.to_string()))?;

    service.attach(ClusterHandle::new(provider, name, config_dir, region));

    Ok(ServiceBinding { service, cli })
}
