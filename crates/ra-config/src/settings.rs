//! Typed `settings.json`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::validate::ValidationError;

/// Runtime settings for every front end.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_schema_version")]
    pub schema_version: String,

    #[serde(default)]
    pub model: ModelSettings,

    #[serde(default)]
    pub server: ServerSettings,

    #[serde(default)]
    pub form: FormDefaults,
}

/// Where the classifier artifact lives.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelSettings {
    /// Artifact path; relative paths are taken from the settings file's
    /// directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

/// Web form server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_bind")]
    pub bind: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Requests with a larger body are answered with 413.
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            port: default_port(),
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

/// Pre-filled values for the numeric questions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormDefaults {
    #[serde(default = "default_age")]
    pub default_age: u8,

    #[serde(default)]
    pub default_children: u8,

    #[serde(default = "default_income")]
    pub default_income: f64,

    #[serde(default = "default_income_step")]
    pub income_step: f64,
}

impl Default for FormDefaults {
    fn default() -> Self {
        Self {
            default_age: default_age(),
            default_children: 0,
            default_income: default_income(),
            income_step: default_income_step(),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            model: ModelSettings::default(),
            server: ServerSettings::default(),
            form: FormDefaults::default(),
        }
    }
}

fn default_schema_version() -> String {
    crate::CONFIG_SCHEMA_VERSION.to_string()
}

fn default_bind() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8501
}

fn default_max_body_bytes() -> usize {
    16 * 1024
}

fn default_age() -> u8 {
    30
}

fn default_income() -> f64 {
    50_000.0
}

fn default_income_step() -> f64 {
    1_000.0
}

impl Settings {
    /// Load settings from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, ValidationError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ValidationError::IoError(format!("{}: {}", path.display(), e)))?;
        Self::from_json(&content)
    }

    /// Parse settings from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, ValidationError> {
        serde_json::from_str(json).map_err(|e| ValidationError::ParseError(e.to_string()))
    }

    /// `model.path`, anchored at `base_dir` when relative.
    pub fn model_path_from(&self, base_dir: Option<&Path>) -> Option<PathBuf> {
        let path = self.model.path.as_ref()?;
        match base_dir {
            Some(dir) if path.is_relative() => Some(dir.join(path)),
            _ => Some(path.clone()),
        }
    }

    /// `bind:port` for the web server.
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.server.bind, self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_uses_defaults() {
        let settings = Settings::from_json("{}").unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.server.port, 8501);
        assert_eq!(settings.form.default_age, 30);
        assert_eq!(settings.form.default_children, 0);
        assert_eq!(settings.form.default_income, 50_000.0);
        assert_eq!(settings.listen_addr(), "127.0.0.1:8501");
    }

    #[test]
    fn test_partial_sections() {
        let json = r#"{
            "schema_version": "1.0.0",
            "server": { "port": 9000 },
            "form": { "default_age": 45 }
        }"#;
        let settings = Settings::from_json(json).unwrap();
        assert_eq!(settings.server.port, 9000);
        assert_eq!(settings.server.bind, "127.0.0.1");
        assert_eq!(settings.form.default_age, 45);
        assert_eq!(settings.form.default_income, 50_000.0);
        assert!(settings.model.path.is_none());
    }

    #[test]
    fn test_relative_model_path_anchored() {
        let settings =
            Settings::from_json(r#"{"model": {"path": "models/tree.json"}}"#).unwrap();
        assert_eq!(
            settings.model_path_from(Some(Path::new("/etc/risk-assess"))),
            Some(PathBuf::from("/etc/risk-assess/models/tree.json"))
        );
        assert_eq!(
            settings.model_path_from(None),
            Some(PathBuf::from("models/tree.json"))
        );

        let absolute =
            Settings::from_json(r#"{"model": {"path": "/srv/tree.json"}}"#).unwrap();
        assert_eq!(
            absolute.model_path_from(Some(Path::new("/etc/risk-assess"))),
            Some(PathBuf::from("/srv/tree.json"))
        );
    }

    #[test]
    fn test_parse_error() {
        let err = Settings::from_json("{ not json").unwrap_err();
        assert!(matches!(err, ValidationError::ParseError(_)));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Settings::from_file(&dir.path().join("settings.json")).unwrap_err();
        assert!(matches!(err, ValidationError::IoError(_)));
    }
}
