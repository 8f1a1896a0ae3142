//! Fixture artifacts for tests in this and dependent crates.

use crate::artifact::{ModelArtifact, ARTIFACT_SCHEMA_VERSION, DECISION_TREE_CLASSIFIER};
use crate::tree::{NodeValue, TreeArrays};
use ra_common::FEATURE_NAMES;

/// A nine-node tree over the survey features.
///
/// - no mental illness history and sleep Fair/Good → low
/// - no mental illness history and sleep Poor → high
/// - mental illness history and income ≤ 25000 → high
/// - mental illness history, higher income, no family history → low
/// - otherwise → high
pub fn reference_artifact() -> ModelArtifact {
    let counts = |low: f64, high: f64| NodeValue::PerOutput(vec![vec![low, high]]);
    ModelArtifact {
        schema_version: ARTIFACT_SCHEMA_VERSION.to_string(),
        model_id: "test-tree".to_string(),
        model_type: DECISION_TREE_CLASSIFIER.to_string(),
        feature_names: FEATURE_NAMES.iter().map(|s| s.to_string()).collect(),
        classes: vec![0, 1],
        tree: TreeArrays {
            children_left: vec![1, 3, 5, -1, -1, -1, 7, -1, -1],
            children_right: vec![2, 4, 6, -1, -1, -1, 8, -1, -1],
            feature: vec![11, 10, 7, -2, -2, -2, 13, -2, -2],
            threshold: vec![0.5, 1.5, 25000.0, -2.0, -2.0, -2.0, 0.5, -2.0, -2.0],
            value: vec![
                counts(66.0, 54.0),
                counts(46.0, 19.0),
                counts(20.0, 35.0),
                counts(40.0, 5.0),
                counts(6.0, 14.0),
                counts(3.0, 20.0),
                counts(17.0, 15.0),
                counts(15.0, 4.0),
                counts(2.0, 11.0),
            ],
        },
    }
}

/// [`reference_artifact`] as compact JSON.
pub fn reference_artifact_json() -> String {
    serde_json::to_string(&reference_artifact()).unwrap_or_default()
}
