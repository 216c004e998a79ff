//! Operator settings for the `bdth` binary.
//!
//! Read from `bdth.toml` in the platform config directory unless `--config`
//! points elsewhere. Every field is optional in the file.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use bdth_core::DEFAULT_PROCESS_NAME;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

const CONFIG_FILE_NAME: &str = "bdth.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// Executable name of the game client
    pub process_name: String,
    /// Saved offsets; signatures are resolved when absent
    pub offsets: Option<PathBuf>,
    pub catalog: Option<PathBuf>,
    /// Directory of PNG icons laid out as `<group>/<id>.png`
    pub icon_dir: Option<PathBuf>,
    pub poll_interval_ms: u64,
    /// Attempts made while waiting for the housing singleton
    pub max_offset_attempts: u32,
    pub offset_retry_delay_ms: u64,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            process_name: DEFAULT_PROCESS_NAME.to_string(),
            offsets: None,
            catalog: None,
            icon_dir: None,
            poll_interval_ms: bdth_core::memory::layout::timing::STATE_POLL_INTERVAL_MS,
            max_offset_attempts: 10,
            offset_retry_delay_ms: 2000,
        }
    }
}

impl CliConfig {
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("bdth").join(CONFIG_FILE_NAME))
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
    }

    /// Load the explicit path, else the default path, else defaults
    pub fn resolve(explicit: Option<&Path>) -> Self {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => match Self::default_path() {
                Some(path) if path.exists() => path,
                _ => return Self::default(),
            },
        };

        match Self::load(&path) {
            Ok(config) => {
                info!("Loaded config from {}", path.display());
                config
            }
            Err(e) => {
                warn!("{:#}, using defaults", e);
                Self::default()
            }
        }
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn offset_retry_delay(&self) -> Duration {
        Duration::from_millis(self.offset_retry_delay_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let file = NamedTempFile::new().unwrap();
        fs::write(
            file.path(),
            "catalog = \"data/catalog.json\"\npoll_interval_ms = 250\n",
        )
        .unwrap();

        let config = CliConfig::load(file.path()).unwrap();
        assert_eq!(config.catalog, Some(PathBuf::from("data/catalog.json")));
        assert_eq!(config.poll_interval(), Duration::from_millis(250));
        assert_eq!(config.process_name, DEFAULT_PROCESS_NAME);
        assert!(config.offsets.is_none());
    }

    #[test]
    fn test_bad_file_falls_back_to_defaults() {
        let file = NamedTempFile::new().unwrap();
        fs::write(file.path(), "poll_interval_ms = \"fast\"").unwrap();

        assert!(CliConfig::load(file.path()).is_err());
        assert_eq!(CliConfig::resolve(Some(file.path())), CliConfig::default());
    }

    #[test]
    fn test_round_trip_through_toml() {
        let config = CliConfig {
            icon_dir: Some(PathBuf::from("icons")),
            ..CliConfig::default()
        };
        let text = toml::to_string_pretty(&config).unwrap();
        assert_eq!(toml::from_str::<CliConfig>(&text).unwrap(), config);
    }
}
