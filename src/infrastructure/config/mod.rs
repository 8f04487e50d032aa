//! Configuration loading and option resolution.

pub mod merge;
pub mod store;

pub use merge::merge;
pub use store::{ConfigError, ConfigStore, Sections};
