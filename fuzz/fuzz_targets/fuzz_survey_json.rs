//! Fuzz target for JSON survey submissions.
//!
//! Any accepted record must encode to finite features.

#![no_main]

use libfuzzer_sys::fuzz_target;
use ra_common::{encode, RawSurvey, SurveyRecord};

fuzz_target!(|data: &[u8]| {
    let Ok(raw) = serde_json::from_slice::<RawSurvey>(data) else {
        return;
    };
    if let Ok(record) = SurveyRecord::from_raw(&raw) {
        let features = encode(&record);
        assert!(features.as_slice().iter().all(|v| v.is_finite()));
    }
});
