//! Application configuration module.
//!
//! Reads the TOML config file holding the OMDb credentials and the
//! default search filters.

#[allow(clippy::module_inception)]
mod config;
mod paths;

#[allow(clippy::module_name_repetitions)]
pub use config::{AppConfig, SearchConfig};
pub use paths::resolve_config_path;
