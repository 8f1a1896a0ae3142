//! Process exit codes.
//!
//! `0` and `1` report the assessment itself so shell scripts can branch on
//! the outcome without parsing output. Codes from 10 are failures: 10-19 the
//! caller can fix (arguments, input, settings, model), 20 and up are ours.

use ra_common::{Error, RiskLabel};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Low risk, or a command without an assessment.
    Clean = 0,
    HighRisk = 1,
    ArgsError = 10,
    /// Survey answers rejected by the encoder.
    InputError = 11,
    ConfigError = 12,
    ModelError = 13,
    /// Classifier failure or a bug.
    InternalError = 20,
    IoError = 21,
}

/// Stable names used in JSON error payloads.
const CODE_NAMES: &[(ExitCode, &str)] = &[
    (ExitCode::Clean, "OK_LOW_RISK"),
    (ExitCode::HighRisk, "OK_HIGH_RISK"),
    (ExitCode::ArgsError, "ERR_ARGS"),
    (ExitCode::InputError, "ERR_INPUT"),
    (ExitCode::ConfigError, "ERR_CONFIG"),
    (ExitCode::ModelError, "ERR_MODEL"),
    (ExitCode::InternalError, "ERR_INTERNAL"),
    (ExitCode::IoError, "ERR_IO"),
];

impl ExitCode {
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    pub fn for_label(label: RiskLabel) -> Self {
        if label.is_high() {
            ExitCode::HighRisk
        } else {
            ExitCode::Clean
        }
    }

    pub fn code_name(self) -> &'static str {
        CODE_NAMES
            .iter()
            .find(|(code, _)| *code == self)
            .map_or("ERR_INTERNAL", |(_, name)| name)
    }
}

impl From<&Error> for ExitCode {
    fn from(err: &Error) -> Self {
        match err {
            Error::Encode(_) | Error::Json(_) => ExitCode::InputError,
            Error::Config(_) => ExitCode::ConfigError,
            Error::ModelLoad(_) => ExitCode::ModelError,
            Error::Inference(_) => ExitCode::InternalError,
            Error::Io(_) => ExitCode::IoError,
        }
    }
}

impl std::fmt::Display for ExitCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.code_name(), self.as_i32())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ra_common::{EncodeError, SurveyField};

    #[test]
    fn test_outcomes_are_zero_and_one() {
        assert_eq!(ExitCode::for_label(RiskLabel::Low).as_i32(), 0);
        assert_eq!(ExitCode::for_label(RiskLabel::High).as_i32(), 1);
    }

    #[test]
    fn test_every_code_has_a_distinct_name() {
        let mut names: Vec<_> = CODE_NAMES.iter().map(|(_, n)| *n).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), CODE_NAMES.len());
        assert_eq!(ExitCode::ModelError.to_string(), "ERR_MODEL (13)");
    }

    #[test]
    fn test_error_mapping() {
        let missing = Error::Encode(EncodeError::MissingField {
            field: SurveyField::Age,
        });
        assert_eq!(ExitCode::from(&missing).as_i32(), 11);
        assert_eq!(ExitCode::from(&Error::Config("port".into())).as_i32(), 12);
        assert_eq!(ExitCode::from(&Error::ModelLoad("gone".into())).as_i32(), 13);
        assert_eq!(ExitCode::from(&Error::Inference("nan".into())).as_i32(), 20);
    }
}
