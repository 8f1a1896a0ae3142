//! Settings and model path discovery.
//!
//! Resolution order: CLI arguments → environment variables → XDG paths →
//! /etc → defaults.

use std::path::{Path, PathBuf};

use crate::settings::Settings;

/// Where a file was found, highest precedence first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConfigSource {
    CliArgument,
    Environment,
    /// Named by `model.path` in settings.json.
    Settings,
    XdgConfig,
    /// `/etc/risk-assess/`
    SystemConfig,
    #[default]
    BuiltinDefault,
}

impl ConfigSource {
    pub fn describe(self) -> &'static str {
        match self {
            ConfigSource::CliArgument => "CLI argument",
            ConfigSource::Environment => "environment variable",
            ConfigSource::Settings => "settings file",
            ConfigSource::XdgConfig => "XDG config",
            ConfigSource::SystemConfig => "system config",
            ConfigSource::BuiltinDefault => "builtin default",
        }
    }
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.describe())
    }
}

/// A resolved path and where it came from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedPath {
    /// `None` when nothing was found.
    pub path: Option<PathBuf>,
    pub source: ConfigSource,
}

impl ResolvedPath {
    fn found(path: PathBuf, source: ConfigSource) -> Self {
        Self {
            path: Some(path),
            source,
        }
    }

    /// Directory containing the resolved file.
    pub fn dir(&self) -> Option<&Path> {
        self.path.as_deref().and_then(Path::parent)
    }
}

/// Environment variable names.
pub const ENV_SETTINGS_PATH: &str = "RISK_ASSESS_SETTINGS";
pub const ENV_MODEL_PATH: &str = "RISK_ASSESS_MODEL";
pub const ENV_CONFIG_DIR: &str = "RISK_ASSESS_CONFIG_DIR";

/// Standard file names.
pub const SETTINGS_FILENAME: &str = "settings.json";
pub const MODEL_FILENAME: &str = "model.json";

/// Application name for XDG directories.
const APP_NAME: &str = "risk-assess";

/// Resolve settings.json.
///
/// 1. `<cli_config_dir>/settings.json`
/// 2. `RISK_ASSESS_SETTINGS`
/// 3. `RISK_ASSESS_CONFIG_DIR/settings.json`
/// 4. `~/.config/risk-assess/settings.json`
/// 5. `/etc/risk-assess/settings.json`
/// 6. Built-in defaults (None)
pub fn resolve_settings(cli_config_dir: Option<&Path>) -> ResolvedPath {
    // 1. CLI directory
    if let Some(dir) = cli_config_dir {
        let path = dir.join(SETTINGS_FILENAME);
        if path.exists() {
            return ResolvedPath::found(path, ConfigSource::CliArgument);
        }
    }

    // 2. Environment variable (direct path)
    if let Ok(env_path) = std::env::var(ENV_SETTINGS_PATH) {
        let path = PathBuf::from(env_path);
        if path.exists() {
            return ResolvedPath::found(path, ConfigSource::Environment);
        }
    }

    find_in_config_dirs(None, SETTINGS_FILENAME)
}

/// Resolve the model artifact.
///
/// Explicit choices (CLI, `RISK_ASSESS_MODEL`, `model.path`) are returned even
/// when the file is missing so the load error names the path the user asked
/// for. Only the `model.json` fallback requires the file to exist.
pub fn resolve_model_path(
    cli_model: Option<&Path>,
    cli_config_dir: Option<&Path>,
    settings: &Settings,
    settings_path: &ResolvedPath,
) -> ResolvedPath {
    if let Some(path) = cli_model {
        return ResolvedPath::found(path.to_path_buf(), ConfigSource::CliArgument);
    }

    if let Ok(env_path) = std::env::var(ENV_MODEL_PATH) {
        if !env_path.is_empty() {
            return ResolvedPath::found(PathBuf::from(env_path), ConfigSource::Environment);
        }
    }

    if let Some(path) = settings.model_path_from(settings_path.dir()) {
        return ResolvedPath::found(path, ConfigSource::Settings);
    }

    if let Some(dir) = settings_path.dir() {
        let path = dir.join(MODEL_FILENAME);
        if path.exists() {
            return ResolvedPath::found(path, settings_path.source.clone());
        }
    }

    find_in_config_dirs(cli_config_dir, MODEL_FILENAME)
}

/// Walk the config directories in order and return the first `filename`.
fn find_in_config_dirs(cli_config_dir: Option<&Path>, filename: &str) -> ResolvedPath {
    // 1. CLI directory
    if let Some(dir) = cli_config_dir {
        let path = dir.join(filename);
        if path.exists() {
            return ResolvedPath::found(path, ConfigSource::CliArgument);
        }
    }

    // 2. Environment variable (config dir)
    if let Ok(config_dir) = std::env::var(ENV_CONFIG_DIR) {
        let path = PathBuf::from(config_dir).join(filename);
        if path.exists() {
            return ResolvedPath::found(path, ConfigSource::Environment);
        }
    }

    // 3. XDG config directory
    if let Some(dir) = xdg_config_dir() {
        let path = dir.join(filename);
        if path.exists() {
            return ResolvedPath::found(path, ConfigSource::XdgConfig);
        }
    }

    // 4. System config
    let system_path = system_config_dir().join(filename);
    if system_path.exists() {
        return ResolvedPath::found(system_path, ConfigSource::SystemConfig);
    }

    ResolvedPath::default()
}

/// Get the XDG config directory for risk-assess.
pub fn xdg_config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(APP_NAME))
}

pub fn system_config_dir() -> PathBuf {
    PathBuf::from("/etc").join(APP_NAME)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_labels() {
        assert_eq!(ConfigSource::Settings.to_string(), "settings file");
        assert_eq!(ConfigSource::default().describe(), "builtin default");
    }

    #[test]
    fn test_cli_model_wins_even_if_missing() {
        let resolved = resolve_model_path(
            Some(Path::new("/nonexistent/tree.json")),
            None,
            &Settings::default(),
            &ResolvedPath::default(),
        );
        assert_eq!(resolved.source, ConfigSource::CliArgument);
        assert_eq!(resolved.path, Some(PathBuf::from("/nonexistent/tree.json")));
    }

    #[test]
    fn test_resolved_dir() {
        let resolved = ResolvedPath::found(
            PathBuf::from("/etc/risk-assess/settings.json"),
            ConfigSource::SystemConfig,
        );
        assert_eq!(resolved.dir(), Some(Path::new("/etc/risk-assess")));
        assert_eq!(ResolvedPath::default().dir(), None);
    }

    #[test]
    fn test_system_config_dir() {
        assert_eq!(system_config_dir(), PathBuf::from("/etc/risk-assess"));
    }
}
