//! Command handlers
//!
//! Thin adapters between the clap surface and the resolution core.

pub mod instances;
pub mod list;
pub mod plugins;
pub mod run;

use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::domain::models::{ClusterSpec, Overrides};
use crate::infrastructure::config::{merge, ConfigStore};
use crate::infrastructure::registry::PluginRegistry;
use crate::infrastructure::resolver::{self, ServiceBinding};

/// Resolve and bind one named cluster for a single-cluster command.
///
/// Unlike the aggregate listing, a missing section, capability, or
/// provider here is fatal to the invocation.
pub(crate) fn bind_cluster(
    registry: &PluginRegistry,
    config_dir: Option<PathBuf>,
    overrides: &Overrides,
    cluster: &str,
) -> Result<(ServiceBinding, ClusterSpec)> {
    let store = ConfigStore::new(config_dir)?;
    let sections = store.load().context("failed to load cluster configuration")?;
    let spec = merge(cluster, &sections, overrides, store.config_dir());

    let service_type = spec
        .service_type()
        .with_context(|| format!("no service_type configured or supplied for '{cluster}'"))?;
    let provider = spec
        .cloud_provider()
        .unwrap_or_else(|| registry.default_provider());
    let config_root = spec.config_dir().unwrap_or_else(|| store.config_dir());

    let binding = resolver::bind(
        registry,
        cluster,
        provider,
        service_type,
        spec.region(),
        config_root,
    )?;
    Ok((binding, spec))
}
