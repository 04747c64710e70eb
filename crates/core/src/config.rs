//! Runtime configuration
//!
//! Loaded from `roomloop.toml` in the data directory, or from the file named
//! by `ROOMLOOP_CONFIG`. Every field has a default, so a missing file or a
//! partial one is fine.

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Environment variable overriding the config file location
pub const CONFIG_ENV: &str = "ROOMLOOP_CONFIG";

/// Config file name inside the data directory
pub const CONFIG_FILE: &str = "roomloop.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// How often room statuses are re-evaluated
    pub refresh_interval_secs: u64,
    /// Load the demo users and rooms at startup
    pub seed_mock_data: bool,
    /// Probability (0.0..=1.0) that a simulated request fails
    pub failure_rate: f64,
    /// Overrides the platform data directory
    pub data_dir: Option<PathBuf>,
    pub latency: LatencyConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            refresh_interval_secs: 60,
            seed_mock_data: true,
            failure_rate: 0.0,
            data_dir: None,
            latency: LatencyConfig::default(),
        }
    }
}

impl Config {
    /// Parse config from TOML content
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load config from a file, falling back to defaults if it does not exist
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config = Self::from_toml(&content)?;
        tracing::info!(path = %path.display(), "Loaded config");
        Ok(config)
    }

    /// Resolve the config file: `ROOMLOOP_CONFIG` first, then the data directory
    pub fn locate() -> Result<PathBuf> {
        if let Ok(path) = std::env::var(CONFIG_ENV) {
            return Ok(PathBuf::from(path));
        }
        Ok(default_data_dir()?.join(CONFIG_FILE))
    }

    /// Directory holding the session record
    pub fn data_dir(&self) -> Result<PathBuf> {
        match &self.data_dir {
            Some(dir) => Ok(dir.clone()),
            None => default_data_dir(),
        }
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs)
    }

    fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.failure_rate) {
            return Err(Error::InvalidOperation(format!(
                "failure_rate must be between 0 and 1, got {}",
                self.failure_rate
            )));
        }

        if self.refresh_interval_secs == 0 {
            return Err(Error::InvalidOperation(
                "refresh_interval_secs must be positive".to_string(),
            ));
        }

        Ok(())
    }
}

/// Simulated request latency per operation, in milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LatencyConfig {
    pub fetch_ms: u64,
    pub create_ms: u64,
    pub join_ms: u64,
    pub leave_ms: u64,
    pub update_ms: u64,
    pub refresh_ms: u64,
    pub message_ms: u64,
    pub reaction_ms: u64,
    pub invite_ms: u64,
    pub auth_ms: u64,
}

impl Default for LatencyConfig {
    fn default() -> Self {
        Self {
            fetch_ms: 500,
            create_ms: 800,
            join_ms: 500,
            leave_ms: 500,
            update_ms: 500,
            refresh_ms: 500,
            message_ms: 300,
            reaction_ms: 300,
            invite_ms: 1000,
            auth_ms: 800,
        }
    }
}

impl LatencyConfig {
    /// No artificial delay at all
    pub fn none() -> Self {
        Self {
            fetch_ms: 0,
            create_ms: 0,
            join_ms: 0,
            leave_ms: 0,
            update_ms: 0,
            refresh_ms: 0,
            message_ms: 0,
            reaction_ms: 0,
            invite_ms: 0,
            auth_ms: 0,
        }
    }
}

fn default_data_dir() -> Result<PathBuf> {
    let dirs = ProjectDirs::from("com", "roomloop", "roomloop").ok_or_else(|| {
        Error::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "Could not determine data directory",
        ))
    })?;

    Ok(dirs.data_dir().to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_empty_config() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.refresh_interval(), Duration::from_secs(60));
    }

    #[test]
    fn test_parse_partial_config() {
        let toml = r#"
refresh_interval_secs = 5
seed_mock_data = false

[latency]
join_ms = 0
"#;
        let config = Config::from_toml(toml).unwrap();
        assert_eq!(config.refresh_interval_secs, 5);
        assert!(!config.seed_mock_data);
        assert_eq!(config.latency.join_ms, 0);
        assert_eq!(config.latency.create_ms, 800);
    }

    #[test]
    fn test_rejects_bad_failure_rate() {
        assert!(Config::from_toml("failure_rate = 1.5").is_err());
        assert!(Config::from_toml("refresh_interval_secs = 0").is_err());
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(&dir.path().join(CONFIG_FILE)).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, "failure_rate = 0.25\n").unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.failure_rate, 0.25);
    }
}
