//! Corral CLI entry point.

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use corral::cli::{commands, Cli, Commands};
use corral::infrastructure::plugins;

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let registry = plugins::builtin();
    let config_dir = cli.config_dir.clone();
    let overrides = cli.overrides();

    let result = match cli.command {
        Commands::List { all, sort, desc } => {
            commands::list::execute(&registry, config_dir, overrides, all, sort, desc).await
        }
        Commands::Instances { cluster } => {
            commands::instances::execute(&registry, config_dir, overrides, cluster).await
        }
        Commands::Run { cluster, args } => {
            commands::run::execute(&registry, config_dir, overrides, cluster, args).await
        }
        Commands::Plugins => commands::plugins::execute(&registry),
    };

    if let Err(err) = result {
        corral::cli::handle_error(err);
    }
}
