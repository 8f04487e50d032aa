//! Static-inventory cloud provider.
//!
//! Serves cluster and instance data from an in-memory inventory, loadable
//! from a JSON file. Used as the fixture provider in tests and for
//! air-gapped operation; real cloud integrations register through the same
//! provider port.

use std::collections::BTreeSet;
use std::path::Path;

use anyhow::Context;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::models::Instance;
use crate::domain::ports::{CloudProvider, ProviderError};

/// One cluster entry in the inventory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryCluster {
    pub name: String,
    pub region: String,
    /// Role tags carried by this cluster's instances.
    pub roles: Vec<String>,
    pub instances: Vec<Instance>,
}

#[derive(Debug, Serialize, Deserialize)]
struct InventoryFile {
    clusters: Vec<InventoryCluster>,
}

/// Provider backed by a fixed inventory.
#[derive(Debug)]
pub struct StaticProvider {
    name: String,
    clusters: Vec<InventoryCluster>,
}

impl StaticProvider {
    /// An empty inventory registered under `name`.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            clusters: Vec::new(),
        }
    }

    /// Load an inventory from a JSON file of the shape
    /// `{"clusters": [{"name", "region", "roles", "instances"}]}`.
    pub fn from_path(name: impl Into<String>, path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read inventory {}", path.display()))?;
        let file: InventoryFile = serde_json::from_str(&text)
            .with_context(|| format!("invalid inventory {}", path.display()))?;
        Ok(Self {
            name: name.into(),
            clusters: file.clusters,
        })
    }

    /// Add one cluster to the inventory.
    pub fn add_cluster(
        &mut self,
        name: impl Into<String>,
        region: impl Into<String>,
        roles: &[&str],
        instances: Vec<Instance>,
    ) {
        self.clusters.push(InventoryCluster {
            name: name.into(),
            region: region.into(),
            roles: roles.iter().map(ToString::to_string).collect(),
            instances,
        });
    }
}

#[async_trait]
impl CloudProvider for StaticProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn clusters_with_role(
        &self,
        role: &str,
        region: &str,
    ) -> Result<BTreeSet<String>, ProviderError> {
        Ok(self
            .clusters
            .iter()
            .filter(|c| c.region == region && c.roles.iter().any(|r| r == role))
            .filter(|c| !c.instances.is_empty())
            .map(|c| c.name.clone())
            .collect())
    }

    async fn instances(
        &self,
        cluster: &str,
        region: &str,
    ) -> Result<Vec<Instance>, ProviderError> {
        // A cluster absent from the inventory simply has no running
        // instances, mirroring tag-filter semantics of real providers.
        Ok(self
            .clusters
            .iter()
            .filter(|c| c.name == cluster && c.region == region)
            .flat_map(|c| c.instances.iter().cloned())
            .collect())
    }
}
