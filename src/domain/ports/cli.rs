//! CLI capability port.

use async_trait::async_trait;

use super::provider::ProviderError;
use super::service::ServiceCapability;
use crate::domain::models::ClusterSpec;

/// Error type for cli capability operations.
#[derive(Debug, thiserror::Error)]
pub enum CapabilityError {
    #[error("unsupported subcommand '{0}'")]
    Unsupported(String),

    #[error(transparent)]
    Provider(#[from] ProviderError),
}

/// The command surface of one service type.
///
/// Invoked only after a successful bind: the service passed in already
/// holds a cluster handle, and the spec carries the fully resolved options
/// for that cluster.
#[async_trait]
pub trait CliCapability: Send + Sync {
    /// The service type this capability fronts.
    fn service_type(&self) -> &str;

    /// Run one service subcommand against the bound cluster.
    async fn execute(
        &self,
        service: &dyn ServiceCapability,
        args: &[String],
        spec: &ClusterSpec,
    ) -> Result<(), CapabilityError>;

    /// Print the bound cluster's instances in detail.
    async fn print_instances(
        &self,
        service: &dyn ServiceCapability,
    ) -> Result<(), CapabilityError>;
}
