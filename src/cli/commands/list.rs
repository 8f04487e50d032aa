//! `corral list` — the reconciled cluster listing.

use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::warn;

use crate::cli::display::table::{list_table, render_list};
use crate::cli::types::SortColumn;
use crate::domain::models::{keys, ClusterRecord, Overrides, DEFAULT_REGION};
use crate::infrastructure::config::ConfigStore;
use crate::infrastructure::registry::PluginRegistry;
use crate::services::ReconciliationEngine;

pub async fn execute(
    registry: &PluginRegistry,
    config_dir: Option<PathBuf>,
    overrides: Overrides,
    all: bool,
    sort: SortColumn,
    desc: bool,
) -> Result<()> {
    let store = ConfigStore::new(config_dir)?;
    let sections = store.load().context("failed to load cluster configuration")?;

    let engine = ReconciliationEngine::new(registry, &sections, store.config_dir(), &overrides);
    let region = overrides.get(keys::REGION).unwrap_or(DEFAULT_REGION);

    let outcome = engine.list(region, all).await;
    for failure in &outcome.failures {
        warn!(cluster = %failure.cluster, error = %failure.error, "cluster not queried");
    }

    let mut records = outcome.records;
    sort_records(&mut records, sort, desc);

    let mut table = list_table(&[
        "#", "name", "service", "provider", "instances", "hours", "type", "owned",
    ]);
    for (idx, record) in records.iter().enumerate() {
        table.add_row(vec![
            (idx + 1).to_string(),
            record.name.clone(),
            record.service_type.clone(),
            record.provider.clone(),
            record.instance_count.to_string(),
            record.running_hours.to_string(),
            record.instance_type.clone(),
            if record.owned { "*" } else { "" }.to_string(),
        ]);
    }
    println!("{}", render_list("cluster", table, records.len()));

    Ok(())
}

fn sort_records(records: &mut [ClusterRecord], sort: SortColumn, desc: bool) {
    records.sort_by(|a, b| {
        let ordering = match sort {
            SortColumn::Name => a.name.cmp(&b.name),
            SortColumn::Service => a.service_type.cmp(&b.service_type),
            SortColumn::Provider => a.provider.cmp(&b.provider),
            SortColumn::Instances => a.instance_count.cmp(&b.instance_count),
            SortColumn::Hours => a.running_hours.cmp(&b.running_hours),
            SortColumn::Type => a.instance_type.cmp(&b.instance_type),
            SortColumn::Owned => a.owned.cmp(&b.owned),
        };
        // Ties fall back to the name so output order is stable.
        let ordering = ordering.then_with(|| a.name.cmp(&b.name));
        if desc {
            ordering.reverse()
        } else {
            ordering
        }
    });
}
