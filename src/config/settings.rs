use crate::error::{BlockchainError, Result};
use log::LevelFilter;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;
use std::sync::RwLock;

pub static GLOBAL_CONFIG: Lazy<Config> = Lazy::new(Config::new);

const NODE_ID_KEY: &str = "NODE_ID";
const MINING_ADDRESS_KEY: &str = "MINING_ADDRESS";
const LOG_LEVEL_KEY: &str = "LOG_LEVEL";

/// Node-local settings. Consensus constants live in `core::constants`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub node_id: String,
    pub mining_address: Option<String>,
    pub log_level: String,
    pub blocks_to_mine: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            node_id: String::from("default"),
            mining_address: None,
            log_level: String::from("info"),
            blocks_to_mine: 3,
        }
    }
}

impl Settings {
    /// Parse settings from TOML text; missing keys fall back to defaults
    pub fn from_toml(text: &str) -> Result<Settings> {
        Ok(toml::from_str(text)?)
    }

    pub fn from_file(path: &Path) -> Result<Settings> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml(&text)
    }

    /// Apply overrides from `lookup` (the process environment in production)
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Settings {
        if let Some(node_id) = lookup(NODE_ID_KEY) {
            self.node_id = node_id;
        }
        if let Some(addr) = lookup(MINING_ADDRESS_KEY) {
            self.mining_address = Some(addr);
        }
        if let Some(level) = lookup(LOG_LEVEL_KEY) {
            self.log_level = level;
        }
        self
    }

    pub fn level_filter(&self) -> Result<LevelFilter> {
        self.log_level
            .parse::<LevelFilter>()
            .map_err(|_| BlockchainError::Config(format!("Unknown log level: {}", self.log_level)))
    }
}

pub struct Config {
    inner: RwLock<Settings>,
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    /// Defaults overridden by the environment
    pub fn new() -> Config {
        Self::from_settings(Settings::default().with_overrides(|key| env::var(key).ok()))
    }

    pub fn from_settings(settings: Settings) -> Config {
        Config {
            inner: RwLock::new(settings),
        }
    }

    /// Replace the current settings, e.g. after loading a config file
    pub fn load(&self, settings: Settings) {
        let mut inner = self
            .inner
            .write()
            .expect("Failed to acquire write lock on config - this should never happen");
        *inner = settings;
    }

    pub fn settings(&self) -> Settings {
        self.inner
            .read()
            .expect("Failed to acquire read lock on config - this should never happen")
            .clone()
    }

    pub fn get_node_id(&self) -> String {
        self.settings().node_id
    }

    pub fn set_mining_addr(&self, addr: String) {
        let mut inner = self
            .inner
            .write()
            .expect("Failed to acquire write lock on config - this should never happen");
        inner.mining_address = Some(addr);
    }

    pub fn get_mining_addr(&self) -> Option<String> {
        self.settings().mining_address
    }

    pub fn is_miner(&self) -> bool {
        self.get_mining_addr().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let settings = Settings::from_toml("node_id = \"2001\"\nblocks_to_mine = 7\n").unwrap();
        assert_eq!(settings.node_id, "2001");
        assert_eq!(settings.blocks_to_mine, 7);
        assert_eq!(settings.log_level, "info");
        assert_eq!(settings.mining_address, None);
    }

    #[test]
    fn test_bad_toml_is_config_error() {
        let result = Settings::from_toml("blocks_to_mine = \"many\"");
        assert!(matches!(result, Err(BlockchainError::Config(_))));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "mining_address = \"abcd\"").unwrap();
        writeln!(file, "log_level = \"debug\"").unwrap();

        let settings = Settings::from_file(file.path()).unwrap();
        assert_eq!(settings.mining_address.as_deref(), Some("abcd"));
        assert_eq!(settings.level_filter().unwrap(), LevelFilter::Debug);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = Settings::from_file(&dir.path().join("absent.toml"));
        assert!(matches!(result, Err(BlockchainError::Io(_))));
    }

    #[test]
    fn test_overrides_win_over_file_values() {
        let vars: HashMap<&str, &str> = [("NODE_ID", "3000"), ("LOG_LEVEL", "warn")].into();
        let settings = Settings::from_toml("node_id = \"2001\"")
            .unwrap()
            .with_overrides(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(settings.node_id, "3000");
        assert_eq!(settings.level_filter().unwrap(), LevelFilter::Warn);
    }

    #[test]
    fn test_unknown_log_level() {
        let settings = Settings {
            log_level: "chatty".to_string(),
            ..Settings::default()
        };
        assert!(settings.level_filter().is_err());
    }

    #[test]
    fn test_config_mining_address() {
        let config = Config::from_settings(Settings::default());
        assert!(!config.is_miner());
        config.set_mining_addr("miner".to_string());
        assert_eq!(config.get_mining_addr().as_deref(), Some("miner"));
        assert!(config.is_miner());
        assert_eq!(config.get_node_id(), "default");
    }
}
