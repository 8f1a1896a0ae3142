//! Decision-tree classifier artifacts for risk assessment.
//!
//! This crate provides:
//! - The JSON artifact format and its schema check against the encoder's
//!   column order
//! - Structural validation of the exported tree arrays
//! - The [`Classifier`] trait and its decision-tree implementation
//!
//! No training happens here; artifacts are exported from a fitted model.

pub mod artifact;
pub mod classifier;
pub mod error;
pub mod tree;

#[cfg(any(test, feature = "test-utils"))]
pub mod testing;

pub use artifact::{LoadedModel, ModelArtifact, ARTIFACT_SCHEMA_VERSION};
pub use classifier::Classifier;
pub use error::{InferenceError, ModelError, ModelResult};
pub use tree::{DecisionTree, NodeValue, TreeArrays};
