//! CLI layer: clap surface, command handlers, and terminal rendering.

pub mod commands;
pub mod display;
pub mod types;

pub use types::{Cli, Commands, SortColumn};

/// Report a command failure and exit non-zero.
pub fn handle_error(err: anyhow::Error) -> ! {
    tracing::error!(error = %err, "command failed");
    eprintln!("error: {err:#}");
    std::process::exit(1);
}
