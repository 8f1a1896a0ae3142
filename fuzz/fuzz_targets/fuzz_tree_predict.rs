//! Fuzz target for tree traversal on arbitrary rows.

#![no_main]

use libfuzzer_sys::fuzz_target;
use ra_common::FEATURE_NAMES;
use ra_model::testing::reference_artifact_json;
use ra_model::{Classifier, InferenceError, LoadedModel};

fuzz_target!(|row: Vec<f64>| {
    let Ok(model) = LoadedModel::from_bytes(reference_artifact_json().as_bytes(), &FEATURE_NAMES)
    else {
        return;
    };
    match model.predict_row(&row) {
        Ok(class) => assert!(class == 0 || class == 1),
        Err(InferenceError::DimensionMismatch { .. }) => assert_ne!(row.len(), 14),
        Err(InferenceError::NonFinite { .. }) => {
            assert!(row.iter().any(|v| !v.is_finite()))
        }
        Err(InferenceError::UnknownClass(_)) => unreachable!(),
    }
});
