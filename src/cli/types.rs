//! CLI type definitions
//!
//! Clap command structures defining the corral command-line interface.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::domain::models::{keys, Overrides};

#[derive(Parser)]
#[command(name = "corral")]
#[command(about = "Manage named clusters of cloud instances across providers", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Directory holding clusters.cfg and clusters.cfg.d/
    #[arg(long, global = true, env = "CORRAL_CONFIG_DIR")]
    pub config_dir: Option<PathBuf>,

    /// Override the configured cloud provider
    #[arg(long, global = true)]
    pub cloud_provider: Option<String>,

    /// Override the configured service type
    #[arg(long, global = true)]
    pub service_type: Option<String>,

    /// Override the configured region
    #[arg(long, global = true)]
    pub region: Option<String>,

    /// Override the configured private key path (~ is expanded)
    #[arg(long, global = true)]
    pub private_key: Option<String>,
}

impl Cli {
    /// Per-invocation option overrides from the global flags.
    #[must_use]
    pub fn overrides(&self) -> Overrides {
        let mut overrides = Overrides::new();
        overrides.set_opt(keys::CLOUD_PROVIDER, self.cloud_provider.as_deref());
        overrides.set_opt(keys::SERVICE_TYPE, self.service_type.as_deref());
        overrides.set_opt(keys::REGION, self.region.as_deref());
        overrides.set_opt(keys::PRIVATE_KEY, self.private_key.as_deref());
        overrides
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// List declared and running clusters
    List {
        /// Also scan the default provider for running clusters per service role
        #[arg(short, long)]
        all: bool,

        /// Column to sort by
        #[arg(long, value_enum, default_value_t = SortColumn::Name)]
        sort: SortColumn,

        /// Sort in descending order
        #[arg(long)]
        desc: bool,
    },

    /// Print the instances of one cluster
    Instances {
        /// Cluster name
        cluster: String,
    },

    /// Run a service subcommand against one cluster
    Run {
        /// Cluster name
        cluster: String,

        /// Arguments passed to the service's cli capability
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },

    /// Show installed capabilities and providers
    Plugins,
}

/// Sortable columns of the cluster listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SortColumn {
    Name,
    Service,
    Provider,
    Instances,
    Hours,
    Type,
    Owned,
}
