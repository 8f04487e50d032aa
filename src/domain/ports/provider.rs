//! Cloud provider port.

use std::collections::BTreeSet;
use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::models::Instance;

/// Error type for provider calls.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("unknown cluster '{0}'")]
    UnknownCluster(String),

    #[error("no cluster attached to service capability")]
    NotAttached,

    #[error("provider request failed: {0}")]
    Request(String),
}

/// One cloud provider integration (e.g. EC2).
///
/// Implementations perform the actual instance enumeration; the engine only
/// asks two questions: which clusters currently carry a role tag, and which
/// instances belong to a named cluster. Providers are shared read-only after
/// registration and must apply their own call timeouts.
#[async_trait]
pub trait CloudProvider: Send + Sync {
    /// Registry name for this provider, e.g. `ec2`.
    fn name(&self) -> &str;

    /// Names of clusters that currently have at least one instance tagged
    /// with `role` in `region`.
    async fn clusters_with_role(
        &self,
        role: &str,
        region: &str,
    ) -> Result<BTreeSet<String>, ProviderError>;

    /// All instances belonging to the named cluster in `region`.
    ///
    /// A declared-but-stopped cluster yields an empty list, not an error.
    async fn instances(&self, cluster: &str, region: &str)
        -> Result<Vec<Instance>, ProviderError>;
}

/// A provider-bound handle to one cluster.
///
/// Carries the coordinates a provider needs to answer questions about the
/// cluster: its name, the config root that relative paths (private keys)
/// anchor against, and the region.
#[derive(Clone)]
pub struct ClusterHandle {
    provider: Arc<dyn CloudProvider>,
    name: String,
    config_dir: PathBuf,
    region: String,
}

impl ClusterHandle {
    #[must_use]
    pub fn new(
        provider: Arc<dyn CloudProvider>,
        name: impl Into<String>,
        config_dir: impl Into<PathBuf>,
        region: impl Into<String>,
    ) -> Self {
        Self {
            provider,
            name: name.into(),
            config_dir: config_dir.into(),
            region: region.into(),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn config_dir(&self) -> &std::path::Path {
        &self.config_dir
    }

    #[must_use]
    pub fn region(&self) -> &str {
        &self.region
    }

    #[must_use]
    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// Fetch this cluster's instances from the owning provider.
    pub async fn instances(&self) -> Result<Vec<Instance>, ProviderError> {
        self.provider.instances(&self.name, &self.region).await
    }
}

impl std::fmt::Debug for ClusterHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClusterHandle")
            .field("provider", &self.provider.name())
            .field("name", &self.name)
            .field("config_dir", &self.config_dir)
            .field("region", &self.region)
            .finish()
    }
}
