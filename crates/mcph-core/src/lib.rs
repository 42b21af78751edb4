//! mcph-core — shared types for the mcp-health monitor.
//!
//! Holds the data model every other crate speaks (server configs,
//! per-server health status, aggregated cycle results), the fatal error
//! taxonomy with its stable machine-readable codes, the reader for the
//! server configuration file, and the optional TOML settings file.

pub mod config;
pub mod error;
pub mod settings;
pub mod types;

pub use config::{default_config_paths, read_server_configs};
pub use error::{HealthCheckError, HealthResult};
pub use settings::Settings;
pub use types::*;
