//! The loaded classifier behind every assessment.

use ra_common::{FeatureVector, RiskLabel};
use ra_model::{Classifier, InferenceError, LoadedModel, ModelError};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Provenance of the loaded model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ModelInfo {
    pub model_id: String,
    pub schema_version: String,
    /// SHA-256 of the artifact bytes.
    pub sha256: String,
    pub path: Option<PathBuf>,
    pub node_count: usize,
    pub leaf_count: usize,
    pub depth: usize,
}

impl ModelInfo {
    pub fn from_model(model: &LoadedModel) -> Self {
        let tree = model.tree();
        ModelInfo {
            model_id: model.model_id.clone(),
            schema_version: model.schema_version.clone(),
            sha256: model.sha256.clone(),
            path: model.path.clone(),
            node_count: tree.node_count(),
            leaf_count: tree.leaf_count(),
            depth: tree.depth(),
        }
    }
}

/// Read-only classifier shared by all front ends.
///
/// Cloning is cheap; clones share the same model.
#[derive(Clone)]
pub struct Predictor {
    classifier: Arc<dyn Classifier>,
    info: ModelInfo,
}

impl std::fmt::Debug for Predictor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Predictor")
            .field("info", &self.info)
            .finish_non_exhaustive()
    }
}

impl Predictor {
    /// Load and validate an artifact. Called once at startup.
    pub fn load(path: &Path) -> Result<Self, ModelError> {
        Ok(Self::from_model(LoadedModel::from_file(path)?))
    }

    pub fn from_model(model: LoadedModel) -> Self {
        let info = ModelInfo::from_model(&model);
        Predictor {
            classifier: Arc::new(model),
            info,
        }
    }

    /// Wrap any classifier, e.g. a stub in tests.
    pub fn from_classifier(classifier: Arc<dyn Classifier>, info: ModelInfo) -> Self {
        Predictor { classifier, info }
    }

    pub fn info(&self) -> &ModelInfo {
        &self.info
    }

    /// Classify one encoded survey.
    pub fn predict(&self, features: &FeatureVector) -> Result<RiskLabel, InferenceError> {
        let classes = self.classifier.predict(&[features.to_vec()])?;
        match classes.as_slice() {
            [class] => RiskLabel::from_class(*class).ok_or(InferenceError::UnknownClass(*class)),
            other => Err(InferenceError::DimensionMismatch {
                expected: 1,
                got: other.len(),
            }),
        }
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;
    use ra_common::encode_raw;

    #[test]
    fn test_reference_predictions() {
        let predictor = reference_predictor();
        let low = encode_raw(&reference_raw()).unwrap();
        assert_eq!(predictor.predict(&low).unwrap(), RiskLabel::Low);

        let high = encode_raw(&reference_raw().with("Sleep Patterns", "Poor")).unwrap();
        assert_eq!(predictor.predict(&high).unwrap(), RiskLabel::High);
    }

    #[test]
    fn test_predict_is_deterministic() {
        let predictor = reference_predictor();
        let features = encode_raw(&reference_raw()).unwrap();
        let first = predictor.predict(&features).unwrap();
        for _ in 0..10 {
            assert_eq!(predictor.predict(&features).unwrap(), first);
        }
    }

    #[test]
    fn test_unknown_class_is_inference_error() {
        let predictor = constant_predictor(7);
        let features = encode_raw(&reference_raw()).unwrap();
        assert_eq!(
            predictor.predict(&features).unwrap_err(),
            InferenceError::UnknownClass(7)
        );
    }

    #[test]
    fn test_info_describes_tree() {
        let info = reference_predictor().info().clone();
        assert_eq!(info.model_id, "test-tree");
        assert_eq!(info.node_count, 9);
        assert_eq!(info.leaf_count, 5);
        assert_eq!(info.depth, 3);
        assert_eq!(info.sha256.len(), 64);
    }

    #[test]
    fn test_missing_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let err = Predictor::load(&dir.path().join("model.json")).unwrap_err();
        assert!(matches!(err, ModelError::NotFound { .. }));
    }

    #[test]
    fn test_clones_share_model() {
        let predictor = reference_predictor();
        let clone = predictor.clone();
        assert!(Arc::ptr_eq(&predictor.classifier, &clone.classifier));
    }
}
