//! Risk assessment common types, encoding, and errors.
//!
//! This crate is the single home of the survey definition shared by every
//! front end:
//! - The category map (label → code per categorical question)
//! - Typed survey records and raw form submissions
//! - The feature vector and its column order
//! - The encoder
//! - Common error types and output formats

pub mod categories;
pub mod encode;
pub mod error;
pub mod features;
pub mod field;
pub mod output;
pub mod record;
pub mod risk;

pub use categories::CategoryMap;
pub use encode::{encode, encode_raw};
pub use error::{format_error_human, EncodeError, Error, Result, StructuredError};
pub use features::FeatureVector;
pub use field::{FieldKind, SurveyField, FEATURE_COUNT, FEATURE_NAMES};
pub use output::OutputFormat;
pub use record::{check_answer, RawSurvey, RawValue, SurveyRecord};
pub use risk::RiskLabel;

/// Schema version of the survey payload and model artifact contract.
pub const SCHEMA_VERSION: &str = "1.0.0";
