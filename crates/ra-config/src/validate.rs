//! Configuration validation errors and semantic validation.

use ra_common::field::{AGE_RANGE, CHILDREN_RANGE};
use thiserror::Error;

use crate::settings::Settings;

/// Validation result type.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Smallest accepted request body limit for the web form.
pub const MIN_BODY_BYTES: usize = 1024;

/// Configuration validation errors.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("I/O error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    #[error("Version mismatch: expected {expected}, got {actual}")]
    VersionMismatch { expected: String, actual: String },
}

impl ValidationError {
    /// Error code for structured error reporting.
    pub fn code(&self) -> u32 {
        match self {
            ValidationError::IoError(_) => 40,
            ValidationError::ParseError(_) => 41,
            ValidationError::InvalidValue { .. } => 42,
            ValidationError::VersionMismatch { .. } => 43,
        }
    }
}

impl From<ValidationError> for ra_common::Error {
    fn from(err: ValidationError) -> Self {
        ra_common::Error::Config(err.to_string())
    }
}

/// Validate settings semantically.
pub fn validate_settings(settings: &Settings) -> ValidationResult<()> {
    if settings.schema_version != crate::CONFIG_SCHEMA_VERSION {
        return Err(ValidationError::VersionMismatch {
            expected: crate::CONFIG_SCHEMA_VERSION.to_string(),
            actual: settings.schema_version.clone(),
        });
    }

    if settings.server.port == 0 {
        return Err(ValidationError::InvalidValue {
            field: "server.port".to_string(),
            message: "Must be non-zero".to_string(),
        });
    }

    if settings.server.bind.trim().is_empty() {
        return Err(ValidationError::InvalidValue {
            field: "server.bind".to_string(),
            message: "Must not be empty".to_string(),
        });
    }

    if settings.server.max_body_bytes < MIN_BODY_BYTES {
        return Err(ValidationError::InvalidValue {
            field: "server.max_body_bytes".to_string(),
            message: format!(
                "Must be at least {}, got {}",
                MIN_BODY_BYTES, settings.server.max_body_bytes
            ),
        });
    }

    let form = &settings.form;
    if form.default_age > AGE_RANGE.1 {
        return Err(ValidationError::InvalidValue {
            field: "form.default_age".to_string(),
            message: format!("Must be in [0, {}], got {}", AGE_RANGE.1, form.default_age),
        });
    }
    if form.default_children > CHILDREN_RANGE.1 {
        return Err(ValidationError::InvalidValue {
            field: "form.default_children".to_string(),
            message: format!(
                "Must be in [0, {}], got {}",
                CHILDREN_RANGE.1, form.default_children
            ),
        });
    }
    if !form.default_income.is_finite() || form.default_income < 0.0 {
        return Err(ValidationError::InvalidValue {
            field: "form.default_income".to_string(),
            message: format!("Must be a non-negative number, got {}", form.default_income),
        });
    }
    if !form.income_step.is_finite() || form.income_step <= 0.0 {
        return Err(ValidationError::InvalidValue {
            field: "form.income_step".to_string(),
            message: format!("Must be positive, got {}", form.income_step),
        });
    }

    Ok(())
}
