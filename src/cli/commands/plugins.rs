//! `corral plugins` — show installed capabilities and providers.

use anyhow::Result;

use crate::cli::display::table::{list_table, render_list};
use crate::infrastructure::registry::PluginRegistry;

pub fn execute(registry: &PluginRegistry) -> Result<()> {
    let mut rows = Vec::new();
    for name in registry.service_names() {
        rows.push(("service", name));
    }
    for name in registry.cli_names() {
        rows.push(("cli", name));
    }
    for name in registry.provider_names() {
        let marker = if name == registry.default_provider() {
            " (default)"
        } else {
            ""
        };
        rows.push(("provider", format!("{name}{marker}")));
    }

    let mut table = list_table(&["category", "name"]);
    let total = rows.len();
    for (category, name) in rows {
        table.add_row(vec![category.to_string(), name]);
    }
    println!("{}", render_list("plugin", table, total));
    Ok(())
}
