//! Configuration file resolution and loading
//!
//! Config file location priority:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable (`BIZSCAN_CONFIG`)
//! 3. Platform config directory (`<config_dir>/bizscan/bizscan.toml`)
//! 4. None: compiled defaults are used
//!
//! A missing or absent config file never terminates the program. The caller
//! gets the type's defaults plus a [`ConfigOrigin`] to report once logging is
//! up (the config itself decides where logs go, so it is read first).

use crate::{Error, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Environment variable naming an explicit config file
pub const CONFIG_ENV_VAR: &str = "BIZSCAN_CONFIG";

/// Config file name looked up in the platform config directory
pub const CONFIG_FILE_NAME: &str = "bizscan.toml";

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct LoggingConfig {
    /// Log level or filter directive (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log file path (optional, logs to stderr if not specified)
    #[serde(default)]
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Resolves which config file (if any) should be loaded
#[derive(Debug, Clone)]
pub struct ConfigFileResolver {
    app_dir: String,
}

impl ConfigFileResolver {
    /// Resolver for `<config_dir>/<app_dir>/bizscan.toml`
    pub fn new(app_dir: &str) -> Self {
        Self {
            app_dir: app_dir.to_string(),
        }
    }

    /// Resolve the config file path following the priority order
    ///
    /// Returns `None` when no candidate exists; callers fall back to defaults.
    pub fn resolve(&self, cli_arg: Option<&Path>) -> Option<PathBuf> {
        // Priority 1: Command-line argument
        if let Some(path) = cli_arg {
            return Some(path.to_path_buf());
        }

        // Priority 2: Environment variable
        if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
            if !path.trim().is_empty() {
                return Some(PathBuf::from(path));
            }
        }

        // Priority 3: Platform config directory
        let user_config = dirs::config_dir().map(|d| d.join(&self.app_dir).join(CONFIG_FILE_NAME));
        user_config.filter(|path| path.exists())
    }
}

/// Where a loaded configuration came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigOrigin {
    /// No config file was named or found
    Defaults,
    /// A config file was named but does not exist
    MissingFile(PathBuf),
    /// Parsed from this file
    File(PathBuf),
}

impl ConfigOrigin {
    /// Report the origin; call after the tracing subscriber is installed
    pub fn log(&self) {
        match self {
            ConfigOrigin::Defaults => info!("No config file found, using compiled defaults"),
            ConfigOrigin::MissingFile(path) => warn!(
                "Config file {} does not exist, using compiled defaults",
                path.display()
            ),
            ConfigOrigin::File(path) => info!("Loaded config from {}", path.display()),
        }
    }
}

/// Load a TOML config file, falling back to `T::default()`
///
/// - `None` path: defaults
/// - Path that does not exist: defaults, origin `MissingFile`
/// - Path that exists but cannot be read or parsed: `Error::Config`
pub fn load_toml_config<T>(path: Option<&Path>) -> Result<(T, ConfigOrigin)>
where
    T: DeserializeOwned + Default,
{
    let Some(path) = path else {
        return Ok((T::default(), ConfigOrigin::Defaults));
    };

    if !path.exists() {
        return Ok((T::default(), ConfigOrigin::MissingFile(path.to_path_buf())));
    }

    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Read {} failed: {}", path.display(), e)))?;

    let config = toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Parse {} failed: {}", path.display(), e)))?;

    Ok((config, ConfigOrigin::File(path.to_path_buf())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default, Deserialize, PartialEq)]
    struct SampleConfig {
        #[serde(default)]
        logging: LoggingConfig,
        #[serde(default)]
        name: Option<String>,
    }

    #[test]
    fn test_logging_default_level_is_info() {
        let logging = LoggingConfig::default();
        assert_eq!(logging.level, "info");
        assert!(logging.file.is_none());
    }

    #[test]
    fn test_cli_arg_wins() {
        let resolver = ConfigFileResolver::new("bizscan");
        let resolved = resolver.resolve(Some(Path::new("/tmp/explicit.toml")));
        assert_eq!(resolved, Some(PathBuf::from("/tmp/explicit.toml")));
    }

    #[test]
    fn test_load_none_returns_defaults() {
        let (config, origin): (SampleConfig, _) = load_toml_config(None).unwrap();
        assert_eq!(config, SampleConfig::default());
        assert_eq!(origin, ConfigOrigin::Defaults);
    }

    #[test]
    fn test_load_missing_file_returns_defaults() {
        let path = Path::new("/nonexistent/bizscan/config.toml");
        let (config, origin): (SampleConfig, _) = load_toml_config(Some(path)).unwrap();
        assert!(config.name.is_none());
        assert_eq!(origin, ConfigOrigin::MissingFile(path.to_path_buf()));
    }
}
