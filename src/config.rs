//! World configuration module
//!
//! Handles loading and parsing of world configuration from files and environment variables.

use std::env;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Environment variable naming the configuration file
pub const CONFIG_PATH_ENV: &str = "ACE_WORLD_CONFIG";

/// Configuration file used when the environment does not name one
pub const DEFAULT_CONFIG_PATH: &str = "config/world.toml";

/// Largest accepted outbound queue size
const MAX_OUTBOUND_QUEUE_SIZE: usize = 65536;

/// World configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldConfig {
    /// Path to the configuration file
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Validate header flags against populated fields before encoding objects
    #[serde(default)]
    pub strict_flags: bool,

    /// Capacity of each session's outbound message queue
    #[serde(default = "default_outbound_queue_size")]
    pub outbound_queue_size: usize,

    /// Enable debug logging
    #[serde(default)]
    pub debug: bool,

    /// Emit logs as JSON
    #[serde(default)]
    pub json_logs: bool,
}

fn default_outbound_queue_size() -> usize {
    256
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
            strict_flags: false,
            outbound_queue_size: default_outbound_queue_size(),
            debug: false,
            json_logs: false,
        }
    }
}

impl WorldConfig {
    /// Load configuration from file and environment variables
    pub async fn load() -> Result<Self> {
        let config_path = env::var(CONFIG_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH));

        Self::load_from(&config_path).await
    }

    /// Load configuration from a specific file, then apply environment overrides
    pub async fn load_from(config_path: &Path) -> Result<Self> {
        let mut config = Self::read_file(config_path).await?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Read a configuration file, falling back to defaults when it is missing
    async fn read_file(config_path: &Path) -> Result<Self> {
        let mut config = if config_path.exists() {
            let content = tokio::fs::read_to_string(config_path)
                .await
                .with_context(|| {
                    format!("Failed to read config file: {}", config_path.display())
                })?;

            toml::from_str(&content).with_context(|| {
                format!("Failed to parse config file: {}", config_path.display())
            })?
        } else {
            tracing::warn!(
                "Config file not found at {}, using defaults",
                config_path.display()
            );
            Self::default()
        };

        config.config_path = config_path.to_path_buf();
        Ok(config)
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(&mut self) {
        if let Ok(val) = env::var("ACE_WORLD_STRICT_FLAGS") {
            self.strict_flags = parse_bool(&val);
        }
        if let Ok(val) = env::var("ACE_WORLD_OUTBOUND_QUEUE") {
            if let Ok(size) = val.parse() {
                self.outbound_queue_size = size;
            }
        }
        if let Ok(val) = env::var("ACE_WORLD_DEBUG") {
            self.debug = parse_bool(&val);
        }
        if let Ok(val) = env::var("ACE_WORLD_JSON_LOGS") {
            self.json_logs = parse_bool(&val);
        }
    }

    /// Validate the configuration
    fn validate(&self) -> Result<()> {
        if self.outbound_queue_size == 0 || self.outbound_queue_size > MAX_OUTBOUND_QUEUE_SIZE {
            anyhow::bail!(
                "Outbound queue size must be between 1 and {}",
                MAX_OUTBOUND_QUEUE_SIZE
            );
        }

        Ok(())
    }
}

fn parse_bool(val: &str) -> bool {
    val.to_lowercase() == "true" || val == "1"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = WorldConfig::default();
        assert!(!config.strict_flags);
        assert_eq!(config.outbound_queue_size, 256);
        assert!(!config.debug);
        assert!(!config.json_logs);
    }

    #[test]
    fn test_validation() {
        let mut config = WorldConfig::default();

        // Valid config should pass
        assert!(config.validate().is_ok());

        config.outbound_queue_size = 0;
        assert!(config.validate().is_err());

        config.outbound_queue_size = MAX_OUTBOUND_QUEUE_SIZE + 1;
        assert!(config.validate().is_err());

        config.outbound_queue_size = MAX_OUTBOUND_QUEUE_SIZE;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_file() {
        let config: WorldConfig = toml::from_str(
            r#"
            strict_flags = true
            outbound_queue_size = 32
            "#,
        )
        .unwrap();

        assert!(config.strict_flags);
        assert_eq!(config.outbound_queue_size, 32);
        assert!(!config.json_logs);
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let path = Path::new("does/not/exist/world.toml");
        let config = tokio_test::block_on(WorldConfig::read_file(path)).unwrap();

        assert_eq!(config.config_path, path);
        assert_eq!(config.outbound_queue_size, 256);
    }

    #[test]
    fn test_read_file() {
        let path = env::temp_dir().join(format!("ace-world-config-{}.toml", std::process::id()));
        std::fs::write(&path, "outbound_queue_size = 8\ndebug = true\n").unwrap();

        let config = tokio_test::block_on(WorldConfig::read_file(&path)).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(config.outbound_queue_size, 8);
        assert!(config.debug);
    }

    #[test]
    fn test_bad_file_is_an_error() {
        let path = env::temp_dir().join(format!("ace-world-bad-{}.toml", std::process::id()));
        std::fs::write(&path, "outbound_queue_size = \"lots\"\n").unwrap();

        let result = tokio_test::block_on(WorldConfig::read_file(&path));
        std::fs::remove_file(&path).unwrap();

        assert!(result.is_err());
    }
}
