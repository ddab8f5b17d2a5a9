//! Configuration handling for nestlist
//!
//! Configuration is stored in `~/.config/nestlist/config.toml` (or the
//! platform equivalent). `NEST_CONFIG` points at a different file.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Failed to parse configuration: {0}")]
    Parse(String),
}

/// Environment variable overriding the config file location
pub const CONFIG_ENV: &str = "NEST_CONFIG";

/// Output format for commands
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Log line format
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

/// Logging settings
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct LogConfig {
    /// `tracing` filter directive, e.g. `nestlist=debug`
    pub filter: Option<String>,

    /// Line format for log output on stderr
    pub format: LogFormat,
}

/// User configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct GlobalConfig {
    /// Default output format (text or json)
    pub default_format: OutputFormat,

    /// Database file; defaults to `nest.db` in the platform data directory
    pub database: Option<PathBuf>,

    /// Email of the user commands act as
    pub user: Option<String>,

    /// How long a writer waits for the database lock, in milliseconds
    pub busy_timeout_ms: u64,

    /// Logging settings
    pub log: LogConfig,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            default_format: OutputFormat::Text,
            database: None,
            user: None,
            busy_timeout_ms: 5000,
            log: LogConfig::default(),
        }
    }
}

/// Loaded configuration plus where it came from
#[derive(Debug, Clone)]
pub struct Config {
    pub global: GlobalConfig,
    pub path: Option<PathBuf>,
}

impl Config {
    /// Loads configuration from `NEST_CONFIG` or the default location
    pub fn load() -> Result<Self> {
        match Self::config_path() {
            Some(path) => Self::from_path(&path),
            None => Ok(Self {
                global: GlobalConfig::default(),
                path: None,
            }),
        }
    }

    /// Loads configuration from a specific file; a missing file yields defaults
    pub fn from_path(path: &Path) -> Result<Self> {
        let global = if path.exists() {
            let content = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config: {}", path.display()))?;
            Self::parse(&content).context("Failed to parse config")?
        } else {
            GlobalConfig::default()
        };

        Ok(Self {
            global,
            path: Some(path.to_path_buf()),
        })
    }

    fn parse(content: &str) -> Result<GlobalConfig, ConfigError> {
        let config: GlobalConfig =
            toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;

        if config.busy_timeout_ms == 0 {
            return Err(ConfigError::Invalid(
                "busy_timeout_ms must be greater than zero".to_string(),
            ));
        }

        Ok(config)
    }

    fn project_dirs() -> Option<ProjectDirs> {
        ProjectDirs::from("dev", "nestlist", "nestlist")
    }

    /// Returns the config file location
    pub fn config_path() -> Option<PathBuf> {
        if let Some(path) = std::env::var_os(CONFIG_ENV) {
            return Some(PathBuf::from(path));
        }
        Self::project_dirs().map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Default database location when nothing else is configured
    pub fn default_database_path() -> PathBuf {
        Self::project_dirs()
            .map(|dirs| dirs.data_dir().join("nest.db"))
            .unwrap_or_else(|| PathBuf::from("nest.db"))
    }

    /// Resolves the database path: explicit override, then config, then default
    pub fn database_path(&self, override_path: Option<&Path>) -> PathBuf {
        override_path
            .map(Path::to_path_buf)
            .or_else(|| self.global.database.clone())
            .unwrap_or_else(Self::default_database_path)
    }

    /// Resolves the acting user's email: explicit override, then config
    pub fn effective_user(&self, override_user: Option<&str>) -> Option<String> {
        override_user
            .map(str::to_string)
            .or_else(|| self.global.user.clone())
    }

    pub fn busy_timeout(&self) -> Duration {
        Duration::from_millis(self.global.busy_timeout_ms)
    }

    /// Saves the configuration to the file it was loaded from
    pub fn save(&self) -> Result<()> {
        let path = self
            .path
            .as_deref()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config file location"))?;

        if let Some(dir) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(dir).with_context(|| {
                format!("Failed to create config directory: {}", dir.display())
            })?;
        }

        let content =
            toml::to_string_pretty(&self.global).context("Failed to serialize config")?;

        fs::write(path, content)
            .with_context(|| format!("Failed to write config: {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config() {
        let config = GlobalConfig::default();

        assert_eq!(config.default_format, OutputFormat::Text);
        assert_eq!(config.busy_timeout_ms, 5000);
        assert!(config.database.is_none());
        assert_eq!(config.log.format, LogFormat::Compact);
    }

    #[test]
    fn parse_config() {
        let toml = r#"
default_format = "json"
database = "/tmp/nest.db"
user = "ann@example.com"

[log]
filter = "nestlist=debug"
format = "json"
"#;

        let config = Config::parse(toml).unwrap();
        assert_eq!(config.default_format, OutputFormat::Json);
        assert_eq!(config.database, Some(PathBuf::from("/tmp/nest.db")));
        assert_eq!(config.user.as_deref(), Some("ann@example.com"));
        assert_eq!(config.log.filter.as_deref(), Some("nestlist=debug"));
        assert_eq!(config.log.format, LogFormat::Json);
        assert_eq!(config.busy_timeout_ms, 5000);
    }

    #[test]
    fn parse_rejects_zero_timeout() {
        let err = Config::parse("busy_timeout_ms = 0").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn parse_rejects_bad_toml() {
        let err = Config::parse("default_format = [").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = TempDir::new().unwrap();
        let config = Config::from_path(&dir.path().join("config.toml")).unwrap();

        assert_eq!(config.global, GlobalConfig::default());
    }

    #[test]
    fn save_and_reload() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("sub").join("config.toml");

        let mut config = Config::from_path(&path).unwrap();
        config.global.user = Some("ann@example.com".to_string());
        config.save().unwrap();

        let reloaded = Config::from_path(&path).unwrap();
        assert_eq!(reloaded.global.user.as_deref(), Some("ann@example.com"));
    }

    #[test]
    fn database_path_precedence() {
        let mut config = Config {
            global: GlobalConfig::default(),
            path: None,
        };
        assert_eq!(config.database_path(None), Config::default_database_path());

        config.global.database = Some(PathBuf::from("from-config.db"));
        assert_eq!(config.database_path(None), PathBuf::from("from-config.db"));

        let explicit = PathBuf::from("explicit.db");
        assert_eq!(config.database_path(Some(&explicit)), explicit);
    }

    #[test]
    fn effective_user_precedence() {
        let mut config = Config {
            global: GlobalConfig::default(),
            path: None,
        };
        assert_eq!(config.effective_user(None), None);

        config.global.user = Some("ann@example.com".to_string());
        assert_eq!(config.effective_user(None).as_deref(), Some("ann@example.com"));
        assert_eq!(
            config.effective_user(Some("bob@example.com")).as_deref(),
            Some("bob@example.com")
        );
    }
}
