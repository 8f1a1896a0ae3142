//! Model loading and inference errors.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for artifact loading.
pub type ModelResult<T> = std::result::Result<T, ModelError>;

/// The artifact could not be turned into a usable classifier.
#[derive(Error, Debug)]
pub enum ModelError {
    #[error("model artifact not found: {path}")]
    NotFound { path: PathBuf },

    #[error("failed to read model artifact {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid artifact JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("artifact schema version mismatch: expected {expected}, got {actual}")]
    VersionMismatch { expected: String, actual: String },

    #[error("unsupported model type: {0}")]
    UnsupportedModelType(String),

    #[error("feature schema mismatch at column {index}: expected {expected:?}, got {actual:?}")]
    FeatureMismatch {
        index: usize,
        expected: String,
        actual: String,
    },

    #[error("artifact declares {actual} features, expected {expected}")]
    FeatureCount { expected: usize, actual: usize },

    #[error("malformed tree: {0}")]
    Malformed(String),
}

impl ModelError {
    /// Error code for structured error reporting.
    pub fn code(&self) -> u32 {
        match self {
            ModelError::NotFound { .. } => 20,
            ModelError::Io { .. } => 21,
            ModelError::Parse(_) => 22,
            ModelError::VersionMismatch { .. } => 23,
            ModelError::UnsupportedModelType(_) => 24,
            ModelError::FeatureMismatch { .. } => 25,
            ModelError::FeatureCount { .. } => 26,
            ModelError::Malformed(_) => 27,
        }
    }
}

impl From<ModelError> for ra_common::Error {
    fn from(err: ModelError) -> Self {
        ra_common::Error::ModelLoad(err.to_string())
    }
}

/// A feature row the classifier cannot evaluate.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InferenceError {
    #[error("expected {expected} features, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    #[error("feature {index} is not a finite number ({value})")]
    NonFinite { index: usize, value: f64 },

    #[error("classifier produced class {0}, which is not a known risk label")]
    UnknownClass(i64),
}

impl From<InferenceError> for ra_common::Error {
    fn from(err: InferenceError) -> Self {
        ra_common::Error::Inference(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_artifact_reason_line() {
        let err: ra_common::Error = ModelError::NotFound {
            path: PathBuf::from("/etc/risk-assess/model.json"),
        }
        .into();
        let human = ra_common::format_error_human(&err, false);
        assert!(human.contains(
            "Reason: failed to load model artifact: model artifact not found: /etc/risk-assess/model.json"
        ));
        assert_eq!(err.code(), 20);
    }
}
