//! Settings loading for risk-assess.
//!
//! This module handles:
//! - Locating settings.json (CLI > env > XDG > /etc > defaults)
//! - Parsing and semantic validation
//! - Resolving the model artifact path
//! - Config snapshots for `check` output

pub use ra_config::validate::ValidationError;
pub use ra_config::{ConfigSource, Settings};

use ra_config::resolve::{resolve_model_path, resolve_settings};
use ra_config::validate::validate_settings;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur during config loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config directory not found: {path}")]
    NotFound { path: PathBuf },

    #[error("Invalid JSON in settings file {path}: {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("Semantic validation failed: {0}")]
    ValidationError(#[from] ValidationError),

    #[error("I/O error reading {path}: {source}")]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl From<ConfigError> for ra_common::Error {
    fn from(err: ConfigError) -> Self {
        ra_common::Error::Config(err.to_string())
    }
}

/// Configuration resolution options.
#[derive(Debug, Default, Clone)]
pub struct ConfigOptions {
    /// Explicit config directory (highest priority).
    pub config_dir: Option<PathBuf>,
    /// Explicit model artifact path.
    pub model_path: Option<PathBuf>,
}

/// Resolved configuration with provenance information.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub settings: Settings,
    /// Path to settings.json (None if using defaults).
    pub settings_path: Option<PathBuf>,
    pub settings_source: ConfigSource,
    /// SHA-256 of the settings file content (None if using defaults).
    pub settings_hash: Option<String>,

    /// Model artifact to load; None when nothing was configured or found.
    pub model_path: Option<PathBuf>,
    pub model_source: ConfigSource,
}

impl ResolvedConfig {
    /// Create a config snapshot for `check` output.
    pub fn snapshot(&self) -> ConfigSnapshot {
        ConfigSnapshot {
            settings_path: self.settings_path.clone(),
            settings_source: self.settings_source.to_string(),
            settings_hash: self.settings_hash.clone(),
            settings_schema_version: self.settings.schema_version.clone(),
            model_path: self.model_path.clone(),
            model_source: self.model_source.to_string(),
        }
    }
}

/// Config snapshot for diagnostics.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ConfigSnapshot {
    pub settings_path: Option<PathBuf>,
    pub settings_source: String,
    pub settings_hash: Option<String>,
    pub settings_schema_version: String,
    pub model_path: Option<PathBuf>,
    pub model_source: String,
}

/// Load configuration with the standard resolution order.
///
/// A missing settings file is not an error: built-in defaults are used. A
/// settings file that exists but does not parse or validate is.
pub fn load_config(options: &ConfigOptions) -> Result<ResolvedConfig, ConfigError> {
    if let Some(dir) = &options.config_dir {
        if !dir.is_dir() {
            return Err(ConfigError::NotFound { path: dir.clone() });
        }
    }

    let resolved = resolve_settings(options.config_dir.as_deref());
    let (settings, settings_hash) = match &resolved.path {
        Some(path) => {
            let (settings, hash) = load_settings_from_file(path)?;
            (settings, Some(hash))
        }
        None => (Settings::default(), None),
    };

    validate_settings(&settings)?;

    let model = resolve_model_path(
        options.model_path.as_deref(),
        options.config_dir.as_deref(),
        &settings,
        &resolved,
    );

    Ok(ResolvedConfig {
        settings,
        settings_path: resolved.path,
        settings_source: resolved.source,
        settings_hash,
        model_path: model.path,
        model_source: model.source,
    })
}

/// Read, hash, and parse settings.json.
pub fn load_settings_from_file(path: &Path) -> Result<(Settings, String), ConfigError> {
    let content = std::fs::read(path).map_err(|source| ConfigError::IoError {
        path: path.to_path_buf(),
        source,
    })?;
    let hash = hex::encode(Sha256::digest(&content));
    let text = String::from_utf8_lossy(&content);
    let settings = Settings::from_json(&text).map_err(|e| ConfigError::ParseError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    Ok((settings, hash))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_config_dir_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let options = ConfigOptions {
            config_dir: Some(dir.path().join("absent")),
            model_path: None,
        };
        assert!(matches!(
            load_config(&options),
            Err(ConfigError::NotFound { .. })
        ));
    }

    #[test]
    fn test_empty_config_dir_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let model = dir.path().join("tree.json");
        let options = ConfigOptions {
            config_dir: Some(dir.path().to_path_buf()),
            model_path: Some(model.clone()),
        };
        let config = load_config(&options).unwrap();
        assert_eq!(config.settings, Settings::default());
        assert_eq!(config.model_path, Some(model));
        assert_eq!(config.model_source, ConfigSource::CliArgument);
    }

    #[test]
    fn test_settings_file_loaded_and_hashed() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("settings.json"),
            r#"{"server": {"port": 9100}, "model": {"path": "tree.json"}}"#,
        )
        .unwrap();
        let options = ConfigOptions {
            config_dir: Some(dir.path().to_path_buf()),
            model_path: None,
        };
        let config = load_config(&options).unwrap();
        assert_eq!(config.settings.server.port, 9100);
        assert_eq!(config.settings_source, ConfigSource::CliArgument);
        assert_eq!(config.settings_hash.as_ref().map(String::len), Some(64));
        assert_eq!(config.model_path, Some(dir.path().join("tree.json")));

        let snapshot = config.snapshot();
        assert_eq!(snapshot.settings_source, "CLI argument");
        assert_eq!(snapshot.model_source, "settings file");
    }

    #[test]
    fn test_invalid_settings_rejected() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("settings.json"), "{ nope").unwrap();
        let options = ConfigOptions {
            config_dir: Some(dir.path().to_path_buf()),
            model_path: None,
        };
        let err = load_config(&options).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));

        std::fs::write(
            dir.path().join("settings.json"),
            r#"{"schema_version": "9.9.9"}"#,
        )
        .unwrap();
        let err = load_config(&options).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::ValidationError(ValidationError::VersionMismatch { .. })
        ));
        let unified: ra_common::Error = err.into();
        assert_eq!(unified.code(), 40);
    }
}
