//! `corral run` — delegate a subcommand to a cluster's cli capability.

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
    args: Vec<String>,
) -> Result<()> {
    let (binding, spec) = bind_cluster(registry, config_dir, &overrides, &cluster)?;
    binding
        .cli
        .execute(binding.service.as_ref(), &args, &spec)
        .await
        .with_context(|| format!("command failed for cluster '{cluster}'"))?;
    Ok(())
}
