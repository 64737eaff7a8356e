//! Configuration system for the Ops Heaven engine
//!
//! Supports multiple configuration sources with the following precedence (highest to lowest):
//! 1. CLI arguments
//! 2. Environment variables (OPSHEAVEN_* prefix)
//! 3. Configuration file (TOML)
//! 4. Default values

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};

/// Main engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Engine decision tunables
    pub engine: EngineSettings,

    /// Logging configuration
    pub logging: LoggingSettings,

    /// Data storage paths
    pub storage: StorageSettings,
}

/// Engine decision tunables
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    /// QIS below this raises a high-priority alert
    pub low_qis_threshold: u8,

    /// Hours a user creation counts as "new" for the alert scan
    pub new_user_window_hours: i64,
}

/// Logging settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Log level: trace, debug, info, warn, error
    pub level: String,

    /// Log file path (empty = no file logging)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,

    /// Maximum log file size in MB before rotation
    pub max_file_size_mb: u64,

    /// Number of rotated log files to keep
    pub max_files: u32,

    /// Enable JSON formatted logging
    pub json_format: bool,
}

/// Storage path settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    /// Base data directory
    pub data_dir: String,

    /// Directory/meeting snapshot file consumed by decision commands
    pub snapshot_file: String,
}

// Default implementations

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            engine: EngineSettings::default(),
            logging: LoggingSettings::default(),
            storage: StorageSettings::default(),
        }
    }
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            low_qis_threshold: 75,
            new_user_window_hours: 24,
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
            max_file_size_mb: 100,
            max_files: 5,
            json_format: false,
        }
    }
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            data_dir: "~/.opsheaven".to_string(),
            snapshot_file: "~/.opsheaven/data.json".to_string(),
        }
    }
}

impl EngineConfig {
    /// Load configuration from the given path, or search standard
    /// locations, then apply environment overrides and validate.
    pub fn load(explicit_path: Option<&str>) -> Result<Self> {
        // 1. Load from file (or defaults)
        let mut config = match Self::find_config_file(explicit_path)? {
            Some(path) => {
                let raw = fs::read_to_string(&path).map_err(|e| Error::IoRead {
                    path: path.clone(),
                    source: e,
                })?;
                toml::from_str(&raw).map_err(|e| Error::ConfigParse {
                    message: format!("{}: {}", path.display(), e),
                    source: Some(e),
                })?
            }
            None => Self::default(),
        };

        // 2. Apply environment variable overrides
        config.apply_env_overrides();

        // 3. Expand paths
        config.expand_paths();

        // 4. Validate
        config.validate()?;

        Ok(config)
    }

    /// Find the configuration file to use
    fn find_config_file(explicit_path: Option<&str>) -> Result<Option<PathBuf>> {
        // If explicit path provided, use it (error if not found)
        if let Some(path) = explicit_path {
            let expanded = shellexpand::tilde(path);
            let path = PathBuf::from(expanded.as_ref());
            if path.exists() {
                return Ok(Some(path));
            } else {
                return Err(Error::Config(format!(
                    "Configuration file not found: {}",
                    path.display()
                )));
            }
        }

        // Search in standard locations
        let search_paths = [
            // Current directory
            PathBuf::from("ops-heaven.toml"),
            PathBuf::from("config.toml"),
            // User config directory
            dirs::config_dir()
                .map(|p| p.join("opsheaven").join("engine.toml"))
                .unwrap_or_default(),
            // Home directory
            dirs::home_dir()
                .map(|p| p.join(".opsheaven").join("engine.toml"))
                .unwrap_or_default(),
            // System config (Linux)
            PathBuf::from("/etc/opsheaven/engine.toml"),
        ];

        for path in &search_paths {
            if path.exists() {
                debug!(path = %path.display(), "Found configuration file");
                return Ok(Some(path.clone()));
            }
        }

        debug!("No configuration file found, using defaults");
        Ok(None)
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(&mut self) {
        // Engine settings
        if let Ok(val) = std::env::var("OPSHEAVEN_LOW_QIS_THRESHOLD") {
            if let Ok(n) = val.parse() {
                self.engine.low_qis_threshold = n;
            }
        }
        if let Ok(val) = std::env::var("OPSHEAVEN_NEW_USER_WINDOW_HOURS") {
            if let Ok(n) = val.parse() {
                self.engine.new_user_window_hours = n;
            }
        }

        // Logging settings
        if let Ok(val) = std::env::var("OPSHEAVEN_LOG_LEVEL") {
            self.logging.level = val;
        }
        if let Ok(val) = std::env::var("OPSHEAVEN_LOG_FILE") {
            self.logging.file = Some(val);
        }
        if let Ok(val) = std::env::var("OPSHEAVEN_LOG_JSON") {
            self.logging.json_format = val.to_lowercase() == "true" || val == "1";
        }

        // Storage settings
        if let Ok(val) = std::env::var("OPSHEAVEN_DATA_DIR") {
            self.storage.data_dir = val;
        }
        if let Ok(val) = std::env::var("OPSHEAVEN_SNAPSHOT_FILE") {
            self.storage.snapshot_file = val;
        }
    }

    /// Expand ~ and other path variables
    fn expand_paths(&mut self) {
        self.storage.data_dir = expand_path(&self.storage.data_dir);
        self.storage.snapshot_file = expand_path(&self.storage.snapshot_file);

        if let Some(ref file) = self.logging.file {
            self.logging.file = Some(expand_path(file));
        }
    }

    /// Validate the configuration
    fn validate(&self) -> Result<()> {
        // Validate the alert threshold
        if self.engine.low_qis_threshold > 100 {
            return Err(Error::config_field_invalid(
                "engine.low_qis_threshold",
                "low_qis_threshold must be between 0 and 100",
            ));
        }

        // Validate the new-user window
        if self.engine.new_user_window_hours <= 0 {
            return Err(Error::config_field_invalid(
                "engine.new_user_window_hours",
                "new_user_window_hours must be positive",
            ));
        }

        // Validate log level
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.to_lowercase().as_str()) {
            return Err(Error::Config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_levels.join(", ")
            )));
        }

        // Validate the snapshot path
        if self.storage.snapshot_file.is_empty() {
            return Err(Error::config_field_invalid(
                "storage.snapshot_file",
                "snapshot_file cannot be empty",
            ));
        }

        Ok(())
    }

    /// Get the snapshot file as a PathBuf
    pub fn snapshot_file(&self) -> PathBuf {
        PathBuf::from(&self.storage.snapshot_file)
    }

    /// Get the data directory as a PathBuf
    pub fn data_dir(&self) -> PathBuf {
        PathBuf::from(&self.storage.data_dir)
    }
}

/// Expand ~ and environment variables in paths
fn expand_path(path: &str) -> String {
    shellexpand::full(path)
        .unwrap_or_else(|_| std::borrow::Cow::Borrowed(path))
        .into_owned()
}

/// Initialize a new configuration file
pub fn init_config(path: Option<&str>, force: bool) -> Result<()> {
    let config_path = path
        .map(|p| PathBuf::from(expand_path(p)))
        .unwrap_or_else(|| {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".opsheaven")
                .join("engine.toml")
        });

    // Check if file exists
    if config_path.exists() && !force {
        return Err(Error::Config(format!(
            "Configuration file already exists: {}. Use --force to overwrite.",
            config_path.display()
        )));
    }

    // Create parent directories
    if let Some(parent) = config_path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| Error::Config(format!("Failed to create config directory: {}", e)))?;
    }

    // Generate default config with comments
    let config_content = generate_default_config();

    // Write the file
    fs::write(&config_path, config_content)
        .map_err(|e| Error::Config(format!("Failed to write config file: {}", e)))?;

    println!("Configuration file created: {}", config_path.display());
    Ok(())
}

/// Generate default configuration content with comments
fn generate_default_config() -> String {
    r#"# Ops Heaven Engine Configuration
# https://github.com/opsheaven/engine

[engine]
# QIS below this raises a high-priority alert
low_qis_threshold = 75

# Hours a user creation counts as "new" for the alert scan
new_user_window_hours = 24

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log file path (comment out to disable file logging)
# file = "~/.opsheaven/logs/engine.log"

# Maximum log file size in MB before rotation
max_file_size_mb = 100

# Number of rotated log files to keep
max_files = 5

# Enable JSON formatted logging
json_format = false

[storage]
# Base data directory
data_dir = "~/.opsheaven"

# Directory/meeting snapshot file
snapshot_file = "~/.opsheaven/data.json"
"#
    .to_string()
}

// ─────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = EngineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.engine.low_qis_threshold, 75);
        assert_eq!(config.engine.new_user_window_hours, 24);
    }

    #[test]
    fn test_threshold_validation() {
        let mut config = EngineConfig::default();
        config.engine.low_qis_threshold = 101;
        assert!(config.validate().is_err());

        config.engine.low_qis_threshold = 100;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_window_validation() {
        let mut config = EngineConfig::default();
        config.engine.new_user_window_hours = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_log_level_validation() {
        let mut config = EngineConfig::default();
        config.logging.level = "noisy".to_string();
        assert!(config.validate().is_err());

        config.logging.level = "DEBUG".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_snapshot_path_rejected() {
        let mut config = EngineConfig::default();
        config.storage.snapshot_file = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_parse_partial_file() {
        let config: EngineConfig = toml::from_str(
            r#"
[engine]
low_qis_threshold = 80
"#,
        )
        .unwrap();
        assert_eq!(config.engine.low_qis_threshold, 80);
        // Unspecified sections keep their defaults
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_round_trip_serialization() {
        let config = EngineConfig::default();
        let raw = toml::to_string_pretty(&config).unwrap();
        let parsed: EngineConfig = toml::from_str(&raw).unwrap();
        assert_eq!(parsed.engine.low_qis_threshold, config.engine.low_qis_threshold);
    }

    #[test]
    fn test_generated_template_parses() {
        let parsed: EngineConfig = toml::from_str(&generate_default_config()).unwrap();
        assert!(parsed.validate().is_ok());
    }
}
