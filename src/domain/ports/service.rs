//! Service capability port.

use async_trait::async_trait;

use super::provider::{ClusterHandle, ProviderError};
use crate::domain::models::Instance;

/// One installed service integration, bound to at most one cluster.
///
/// A service instance holds a single cluster handle at a time; attaching a
/// new handle replaces the previous one. The registry hands out a fresh
/// instance per lookup, so a binding is exclusively owned for the duration
/// of one operation and dropped afterwards — never shared across clusters.
#[async_trait]
pub trait ServiceCapability: Send + Sync {
    /// The service type this capability implements, e.g. `basic`.
    fn service_type(&self) -> &str;

    /// Role tags identifying which running instances belong to this
    /// service on the provider side. Used for discovery scanning.
    fn roles(&self) -> Vec<String>;

    /// Attach the cluster this instance operates on, replacing any
    /// previously attached handle.
    fn attach(&mut self, cluster: ClusterHandle);

    /// The currently attached cluster, if any.
    fn cluster(&self) -> Option<&ClusterHandle>;

    /// Instances of the attached cluster.
    ///
    /// # Errors
    /// [`ProviderError::NotAttached`] when called before [`attach`](Self::attach).
    async fn instances(&self) -> Result<Vec<Instance>, ProviderError>;
}
