//! Risk assessment configuration loading and validation.
//!
//! This crate provides:
//! - Typed Rust structs for settings.json
//! - Path resolution (CLI → env → XDG → /etc → defaults) for the settings
//!   file and the model artifact
//! - Semantic validation

pub mod resolve;
pub mod settings;
pub mod validate;

pub use resolve::{resolve_model_path, resolve_settings, ConfigSource, ResolvedPath};
pub use settings::{FormDefaults, ModelSettings, ServerSettings, Settings};
pub use validate::{validate_settings, ValidationError, ValidationResult};

/// Schema version for configuration files.
pub const CONFIG_SCHEMA_VERSION: &str = "1.0.0";
