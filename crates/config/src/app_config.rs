//! Application startup configuration

use crate::error::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Settings read once at startup from a flat JSON file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Directory where the library is persisted
    pub library_path: PathBuf,

    /// Address the web service listens on, e.g. "127.0.0.1:8080"
    pub network_addr: String,
}

impl AppConfig {
    /// Loads and validates configuration from the given JSON file.
    ///
    /// A missing file is an error: unlike runtime state, the configuration
    /// has no sensible default location to fall back to.
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        let config: AppConfig =
            serde_json::from_str(&contents).map_err(|e| ConfigError::ParseError {
                path: path.to_path_buf(),
                source: e,
            })?;

        config.validate()?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    fn validate(&self) -> ConfigResult<()> {
        if self.library_path.as_os_str().is_empty() {
            return Err(ConfigError::ValidationError(
                "library_path must not be empty".to_string(),
            ));
        }
        if self.network_addr.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "network_addr must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_config(dir: &TempDir, contents: &str) -> PathBuf {
        let path = dir.path().join("config.json");
        fs::write(&path, contents).expect("Should write config file");
        path
    }

    #[test]
    fn test_load_valid_config() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let path = write_config(
            &dir,
            r#"{"library_path": "/var/lib/ebookshelf", "network_addr": "127.0.0.1:8080"}"#,
        );

        let config = AppConfig::load(&path).expect("Should load config");
        assert_eq!(config.library_path, PathBuf::from("/var/lib/ebookshelf"));
        assert_eq!(config.network_addr, "127.0.0.1:8080");
    }

    #[test]
    fn test_load_missing_file_is_error() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let result = AppConfig::load(dir.path().join("nope.json"));
        assert!(matches!(result, Err(ConfigError::ReadError { .. })));
    }

    #[test]
    fn test_load_invalid_json_is_error() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let path = write_config(&dir, "this is not json {{{");
        let result = AppConfig::load(&path);
        assert!(matches!(result, Err(ConfigError::ParseError { .. })));
    }

    #[test]
    fn test_load_missing_field_is_error() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let path = write_config(&dir, r#"{"library_path": "/books"}"#);
        let result = AppConfig::load(&path);
        assert!(matches!(result, Err(ConfigError::ParseError { .. })));
    }

    #[test]
    fn test_empty_library_path_fails_validation() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let path = write_config(&dir, r#"{"library_path": "", "network_addr": ":8080"}"#);
        let result = AppConfig::load(&path);
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_empty_network_addr_fails_validation() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let path = write_config(&dir, r#"{"library_path": "/books", "network_addr": "  "}"#);
        let result = AppConfig::load(&path);
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }
}
