//! `corral instances` — detail view of one cluster's instances.

use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::cli::commands::bind_cluster;
use crate::domain::models::Overrides;
use crate::infrastructure::registry::PluginRegistry;

pub async fn execute(
    registry: &PluginRegistry,
    config_dir: Option<PathBuf>,
    overrides: Overrides,
    cluster: String,
) -> Result<()> {
    let (binding, _spec) = bind_cluster(registry, config_dir, &overrides, &cluster)?;
    binding
        .cli
        .print_instances(binding.service.as_ref())
        .await
        .with_context(|| format!("failed to list instances of '{cluster}'"))?;
    Ok(())
}
