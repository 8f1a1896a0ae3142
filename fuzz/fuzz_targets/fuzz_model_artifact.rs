//! Fuzz target for model artifact loading.
//!
//! Artifacts are user-supplied files; loading must reject anything malformed
//! with an error, and a tree that loads must terminate on every row.

#![no_main]

use libfuzzer_sys::fuzz_target;
use ra_common::{FEATURE_COUNT, FEATURE_NAMES};
use ra_model::{Classifier, LoadedModel};

fuzz_target!(|data: &[u8]| {
    if let Ok(model) = LoadedModel::from_bytes(data, &FEATURE_NAMES) {
        let _ = model.tree().depth();
        let _ = model.predict_row(&[0.0; FEATURE_COUNT]);
        let _ = model.predict_row(&[1e9; FEATURE_COUNT]);
    }
});
