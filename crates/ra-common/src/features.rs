//! The fixed-order numeric input of the classifier.

use serde::{Deserialize, Serialize};

use crate::field::{SurveyField, FEATURE_COUNT, FEATURE_NAMES};

/// Fourteen features in training column order (see [`FEATURE_NAMES`]).
///
/// Serializes as a plain JSON array.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureVector([f64; FEATURE_COUNT]);

impl FeatureVector {
    pub fn new(values: [f64; FEATURE_COUNT]) -> Self {
        FeatureVector(values)
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn to_vec(&self) -> Vec<f64> {
        self.0.to_vec()
    }

    pub fn len(&self) -> usize {
        FEATURE_COUNT
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    /// Value of a single question.
    pub fn get(&self, field: SurveyField) -> f64 {
        self.0[field.index()]
    }

    /// `(column name, value)` pairs in order.
    pub fn named(&self) -> impl Iterator<Item = (&'static str, f64)> + '_ {
        FEATURE_NAMES.iter().copied().zip(self.0.iter().copied())
    }
}

impl From<FeatureVector> for Vec<f64> {
    fn from(v: FeatureVector) -> Self {
        v.to_vec()
    }
}
