//! Built-in capability population.

pub mod tagged;

use std::sync::Arc;

use tracing::{info, warn};

use crate::infrastructure::providers::StaticProvider;
use crate::infrastructure::registry::PluginRegistry;

use tagged::{TaggedCli, TaggedService};

/// Service types with built-in capability pairs.
const BUILTIN_SERVICE_TYPES: &[&str] = &["basic"];

/// Environment variable naming a JSON inventory to serve as the `static`
/// provider.
pub const INVENTORY_ENV: &str = "CORRAL_INVENTORY";

/// Build the registry from the fixed built-in list.
///
/// Registers the generic role-tagged service/cli pair for each built-in
/// service type. When `CORRAL_INVENTORY` points at an inventory file, a
/// `static` provider is registered from it and made the default provider.
/// Real cloud providers register through [`PluginRegistry::register_provider`].
#[must_use]
pub fn builtin() -> PluginRegistry {
    let mut registry = PluginRegistry::new();

    for service_type in BUILTIN_SERVICE_TYPES {
        registry.register_service(
            *service_type,
            Box::new(move || Box::new(TaggedService::new(*service_type))),
        );
        registry.register_cli(
            *service_type,
            Box::new(move || Box::new(TaggedCli::new(*service_type))),
        );
    }

    if let Ok(path) = std::env::var(INVENTORY_ENV) {
        match StaticProvider::from_path("static", std::path::Path::new(&path)) {
            Ok(provider) => {
                registry.register_provider(Arc::new(provider));
                registry.set_default_provider("static");
                info!(path, "registered static inventory provider");
            }
            Err(err) => {
                warn!(%path, error = %err, "ignoring unusable inventory");
            }
        }
    }

    registry
}
