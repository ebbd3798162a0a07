//! Configuration management
//!
//! Node-local settings such as the node id, mining address and log level,
//! loaded from an optional TOML file and overridden by environment variables.

pub mod settings;

pub use settings::{Config, Settings, GLOBAL_CONFIG};
