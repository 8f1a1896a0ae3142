//! Error types for risk assessment.
//!
//! [`EncodeError`] covers everything that can be wrong with a single survey
//! submission and is meant to be shown next to the offending field.
//! [`Error`] is what the binary reports. Each variant has a stable numeric
//! code, a category, and a one-line fix for people reading stderr:
//!
//! ```text
//! ✗ Model Load Error
//!   Reason: failed to load model artifact: model artifact not found: /etc/risk-assess/model.json
//!   Fix: Pass --model <path> or set RISK_ASSESS_MODEL to a valid decision-tree artifact.
//! ```
//!
//! and a JSON form for scripts:
//!
//! ```json
//! {
//!   "code": 11,
//!   "category": "input",
//!   "message": "unknown category for Marital Status: \"Engaged\"",
//!   "recoverable": true,
//!   "context": { "field": "Marital Status", "value": "Engaged" }
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

use crate::field::SurveyField;

/// Result type alias for risk assessment operations.
pub type Result<T> = std::result::Result<T, Error>;

/// A survey submission that cannot be encoded.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EncodeError {
    #[error("missing required field: {field}")]
    MissingField { field: SurveyField },

    #[error("unknown category for {field}: {value:?}")]
    UnknownCategory { field: SurveyField, value: String },

    #[error("invalid value for {field}: {reason} (got {value:?})")]
    InvalidNumber {
        field: SurveyField,
        value: String,
        reason: String,
    },
}

impl EncodeError {
    /// The question the error refers to.
    pub fn field(&self) -> SurveyField {
        match self {
            EncodeError::MissingField { field }
            | EncodeError::UnknownCategory { field, .. }
            | EncodeError::InvalidNumber { field, .. } => *field,
        }
    }

    /// Short message suitable for display under a form field.
    pub fn field_message(&self) -> String {
        match self {
            EncodeError::MissingField { .. } => "This field is required.".to_string(),
            EncodeError::UnknownCategory { field, value } => {
                let allowed = field
                    .options()
                    .map(|opts| opts.iter().map(|(l, _)| *l).collect::<Vec<_>>().join(", "))
                    .unwrap_or_default();
                format!("\"{}\" is not a valid choice. Choose one of: {}.", value, allowed)
            }
            EncodeError::InvalidNumber { reason, .. } => {
                let mut msg = reason.clone();
                if let Some(first) = msg.get_mut(0..1) {
                    first.make_ascii_uppercase();
                }
                format!("{}.", msg)
            }
        }
    }
}

/// Coarse grouping of [`Error`] variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    Input,
    Model,
    Inference,
    Config,
    Io,
}

impl ErrorCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCategory::Input => "input",
            ErrorCategory::Model => "model",
            ErrorCategory::Inference => "inference",
            ErrorCategory::Config => "config",
            ErrorCategory::Io => "io",
        }
    }
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Anything a command can fail with.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Encode(#[from] EncodeError),

    #[error("failed to load model artifact: {0}")]
    ModelLoad(String),

    #[error("inference failed: {0}")]
    Inference(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Fixed facts about one kind of failure.
struct Descriptor {
    code: u32,
    category: ErrorCategory,
    recoverable: bool,
    headline: &'static str,
    fix: &'static str,
}

impl Error {
    // Codes: 10-19 input, 20s model, 30s inference, 40s config, 60s I/O.
    fn descriptor(&self) -> Descriptor {
        use ErrorCategory::*;
        let d = |code, category, recoverable, headline, fix| Descriptor {
            code,
            category,
            recoverable,
            headline,
            fix,
        };
        match self {
            Error::Encode(EncodeError::MissingField { .. }) => d(
                10,
                Input,
                true,
                "Missing Field",
                "All fourteen survey answers are required. Fill in the named field and retry.",
            ),
            Error::Encode(EncodeError::UnknownCategory { .. }) => d(
                11,
                Input,
                true,
                "Unknown Category",
                "Use one of the labels listed by 'risk-assess categories' (matching is case-sensitive).",
            ),
            Error::Encode(EncodeError::InvalidNumber { .. }) => d(
                12,
                Input,
                true,
                "Invalid Number",
                "Age must be 0-120, Number of Children 0-20, and Income a non-negative number.",
            ),
            // Nothing to retry against until the artifact is fixed.
            Error::ModelLoad(_) => d(
                20,
                Model,
                false,
                "Model Load Error",
                "Pass --model <path> or set RISK_ASSESS_MODEL to a valid decision-tree artifact. Run 'risk-assess check' to validate it.",
            ),
            Error::Inference(_) => d(
                30,
                Inference,
                true,
                "Inference Error",
                "The model rejected the feature vector. Correct the input and retry; if persistent, re-export the artifact.",
            ),
            Error::Config(_) => d(
                40,
                Config,
                false,
                "Configuration Error",
                "Run 'risk-assess check' to validate settings.json, or remove it to use built-in defaults.",
            ),
            Error::Io(_) => d(
                60,
                Io,
                true,
                "I/O Error",
                "Check that the file exists and is readable, then retry.",
            ),
            Error::Json(_) => d(
                61,
                Io,
                true,
                "JSON Parse Error",
                "Invalid JSON input. Check syntax with 'jq . <file>' and retry.",
            ),
        }
    }

    /// Stable numeric code for machine consumers.
    pub fn code(&self) -> u32 {
        self.descriptor().code
    }

    pub fn category(&self) -> ErrorCategory {
        self.descriptor().category
    }

    /// Whether the session can go on with another submission.
    pub fn is_recoverable(&self) -> bool {
        self.descriptor().recoverable
    }

    pub fn headline(&self) -> &'static str {
        self.descriptor().headline
    }

    pub fn remediation(&self) -> &'static str {
        self.descriptor().fix
    }
}

/// JSON shape of an [`Error`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructuredError {
    pub code: u32,
    pub category: ErrorCategory,
    pub message: String,
    pub recoverable: bool,
    /// Offending field label and raw value, for input errors.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub context: BTreeMap<String, serde_json::Value>,
}

impl From<&Error> for StructuredError {
    fn from(err: &Error) -> Self {
        let mut context = BTreeMap::new();
        if let Error::Encode(encode) = err {
            context.insert("field".into(), encode.field().label().into());
            if let EncodeError::UnknownCategory { value, .. }
            | EncodeError::InvalidNumber { value, .. } = encode
            {
                context.insert("value".into(), value.as_str().into());
            }
        }

        let d = err.descriptor();
        StructuredError {
            code: d.code,
            category: d.category,
            message: err.to_string(),
            recoverable: d.recoverable,
            context,
        }
    }
}

/// Three-line stderr rendering: headline, reason, fix.
pub fn format_error_human(err: &Error, use_color: bool) -> String {
    let paint = |code: &str, text: &str| {
        if use_color {
            format!("\x1b[{}m{}\x1b[0m", code, text)
        } else {
            text.to_string()
        }
    };
    [
        format!("{} {}", paint("31", "✗"), err.headline()),
        format!("  Reason: {}", err),
        format!("  {} {}", paint("36", "Fix:"), err.remediation()),
    ]
    .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unknown_marital() -> EncodeError {
        EncodeError::UnknownCategory {
            field: SurveyField::MaritalStatus,
            value: "Engaged".to_string(),
        }
    }

    #[test]
    fn test_error_code() {
        assert_eq!(
            Error::from(EncodeError::MissingField {
                field: SurveyField::Age
            })
            .code(),
            10
        );
        assert_eq!(Error::from(unknown_marital()).code(), 11);
        assert_eq!(Error::ModelLoad("x".into()).code(), 20);
        assert_eq!(Error::Inference("x".into()).code(), 30);
    }

    #[test]
    fn test_encode_error_display() {
        assert_eq!(
            unknown_marital().to_string(),
            "unknown category for Marital Status: \"Engaged\""
        );
        assert_eq!(
            EncodeError::MissingField {
                field: SurveyField::Income
            }
            .to_string(),
            "missing required field: Income"
        );
    }

    #[test]
    fn test_field_message_lists_choices() {
        let msg = unknown_marital().field_message();
        assert!(msg.contains("Divorced, Married, Single, Widowed"));

        let msg = EncodeError::InvalidNumber {
            field: SurveyField::Age,
            value: "200".into(),
            reason: "must be between 0 and 120".into(),
        }
        .field_message();
        assert_eq!(msg, "Must be between 0 and 120.");
    }

    #[test]
    fn test_model_load_not_recoverable() {
        assert!(!Error::ModelLoad("missing".into()).is_recoverable());
        assert!(Error::Inference("bad".into()).is_recoverable());
        assert_eq!(Error::ModelLoad("missing".into()).category(), ErrorCategory::Model);
    }

    #[test]
    fn test_structured_error_context() {
        let err = Error::from(unknown_marital());
        let structured = StructuredError::from(&err);
        assert_eq!(structured.code, 11);
        assert_eq!(structured.category, ErrorCategory::Input);
        assert_eq!(structured.context["field"], "Marital Status");
        assert_eq!(structured.context["value"], "Engaged");

        let json = serde_json::to_string(&structured).unwrap();
        assert!(json.contains("\"category\":\"input\""));
    }

    #[test]
    fn test_format_error_human() {
        let err = Error::ModelLoad("file not found".into());
        let out = format_error_human(&err, false);
        assert!(out.starts_with("✗ Model Load Error"));
        assert!(out.contains("Reason: failed to load model artifact: file not found"));
        assert!(out.contains("Fix:"));
        assert!(!out.contains("\x1b["));
    }
}
