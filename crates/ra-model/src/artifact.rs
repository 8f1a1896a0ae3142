//! On-disk classifier artifact.
//!
//! The artifact is a JSON document produced by exporting a fitted
//! scikit-learn `DecisionTreeClassifier`:
//!
//! ```json
//! {
//!   "schema_version": "1.0.0",
//!   "model_id": "decision_treedepression",
//!   "model_type": "decision_tree_classifier",
//!   "feature_names": ["Age", "Marital Status", "..."],
//!   "classes": [0, 1],
//!   "tree": {
//!     "children_left":  [1, -1, -1],
//!     "children_right": [2, -1, -1],
//!     "feature":        [7, -2, -2],
//!     "threshold":      [25000.5, -2.0, -2.0],
//!     "value":          [[[50, 50]], [[40, 5]], [[10, 45]]]
//!   }
//! }
//! ```
//!
//! `feature_names` is compared column by column with the encoder's order, so
//! a model trained on a different column order fails to load instead of
//! silently producing wrong predictions.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::classifier::Classifier;
use crate::error::{InferenceError, ModelError, ModelResult};
use crate::tree::{DecisionTree, TreeArrays};

/// Schema version this build reads.
pub const ARTIFACT_SCHEMA_VERSION: &str = ra_common::SCHEMA_VERSION;

/// The only supported `model_type`.
pub const DECISION_TREE_CLASSIFIER: &str = "decision_tree_classifier";

fn default_model_type() -> String {
    DECISION_TREE_CLASSIFIER.to_string()
}

/// Serialized artifact document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub schema_version: String,
    #[serde(default)]
    pub model_id: String,
    #[serde(default = "default_model_type")]
    pub model_type: String,
    pub feature_names: Vec<String>,
    pub classes: Vec<i64>,
    pub tree: TreeArrays,
}

impl ModelArtifact {
    pub fn from_json(json: &str) -> ModelResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Check version, model type and column names against what the encoder
    /// produces.
    pub fn check_schema(&self, expected_features: &[&str]) -> ModelResult<()> {
        if self.schema_version != ARTIFACT_SCHEMA_VERSION {
            return Err(ModelError::VersionMismatch {
                expected: ARTIFACT_SCHEMA_VERSION.to_string(),
                actual: self.schema_version.clone(),
            });
        }
        if self.model_type != DECISION_TREE_CLASSIFIER {
            return Err(ModelError::UnsupportedModelType(self.model_type.clone()));
        }
        for (index, (expected, actual)) in expected_features
            .iter()
            .zip(self.feature_names.iter())
            .enumerate()
        {
            if expected != actual {
                return Err(ModelError::FeatureMismatch {
                    index,
                    expected: (*expected).to_string(),
                    actual: actual.clone(),
                });
            }
        }
        if self.feature_names.len() != expected_features.len() {
            return Err(ModelError::FeatureCount {
                expected: expected_features.len(),
                actual: self.feature_names.len(),
            });
        }
        Ok(())
    }
}

/// A loaded, validated classifier with provenance.
#[derive(Debug, Clone)]
pub struct LoadedModel {
    pub model_id: String,
    pub schema_version: String,
    pub feature_names: Vec<String>,
    pub classes: Vec<i64>,
    /// SHA-256 of the artifact bytes.
    pub sha256: String,
    /// Source file, when loaded from disk.
    pub path: Option<PathBuf>,
    tree: DecisionTree,
}

impl LoadedModel {
    /// Read and validate an artifact file against the survey's column order.
    pub fn from_file(path: &Path) -> ModelResult<Self> {
        if !path.exists() {
            return Err(ModelError::NotFound {
                path: path.to_path_buf(),
            });
        }
        let bytes = std::fs::read(path).map_err(|source| ModelError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut model = Self::from_bytes(&bytes, &ra_common::FEATURE_NAMES)?;
        model.path = Some(path.to_path_buf());
        Ok(model)
    }

    /// Parse and validate artifact bytes against `expected_features`.
    pub fn from_bytes(bytes: &[u8], expected_features: &[&str]) -> ModelResult<Self> {
        let artifact: ModelArtifact = serde_json::from_slice(bytes)?;
        artifact.check_schema(expected_features)?;
        let tree = DecisionTree::from_arrays(
            &artifact.tree,
            &artifact.classes,
            artifact.feature_names.len(),
        )?;

        let sha256 = hex::encode(Sha256::digest(bytes));
        debug!(
            model_id = %artifact.model_id,
            nodes = tree.node_count(),
            sha256 = %sha256,
            "model artifact parsed"
        );

        Ok(LoadedModel {
            model_id: artifact.model_id,
            schema_version: artifact.schema_version,
            feature_names: artifact.feature_names,
            classes: artifact.classes,
            sha256,
            path: None,
            tree,
        })
    }

    pub fn tree(&self) -> &DecisionTree {
        &self.tree
    }
}

impl Classifier for LoadedModel {
    fn n_features(&self) -> usize {
        self.tree.n_features()
    }

    fn predict_row(&self, row: &[f64]) -> Result<i64, InferenceError> {
        self.tree.predict_row(row)
    }
}
