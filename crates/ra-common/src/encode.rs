//! Survey → feature vector encoding.
//!
//! Numeric answers pass through unchanged; categorical answers are replaced by
//! their code from [`crate::categories`]. The assembly order is the training
//! column order and is checked against the artifact's declared feature names
//! when a model is loaded.

use crate::error::EncodeError;
use crate::features::FeatureVector;
use crate::record::{RawSurvey, SurveyRecord};

/// Encode a validated record.
pub fn encode(record: &SurveyRecord) -> FeatureVector {
    FeatureVector::new([
        f64::from(record.age),
        f64::from(record.marital_status.code()),
        f64::from(record.education_level.code()),
        f64::from(record.number_of_children),
        f64::from(record.smoking_status.code()),
        f64::from(record.physical_activity_level.code()),
        f64::from(record.employment_status.code()),
        record.income,
        f64::from(record.alcohol_consumption.code()),
        f64::from(record.dietary_habits.code()),
        f64::from(record.sleep_patterns.code()),
        f64::from(record.mental_illness_history.code()),
        f64::from(record.substance_abuse_history.code()),
        f64::from(record.family_history_depression.code()),
    ])
}

/// Validate and encode a raw submission.
pub fn encode_raw(raw: &RawSurvey) -> Result<FeatureVector, EncodeError> {
    SurveyRecord::from_raw(raw).map(|record| encode(&record))
}
