//! The seam between the predictor and a concrete model.

use crate::error::InferenceError;

/// A binary classifier over fixed-width numeric rows.
///
/// Implementations must be deterministic and free of interior mutation so a
/// single instance can be shared across threads for the life of the process.
pub trait Classifier: Send + Sync {
    /// Number of columns each row must have.
    fn n_features(&self) -> usize;

    /// Class of a single row.
    fn predict_row(&self, row: &[f64]) -> Result<i64, InferenceError>;

    /// Classes of an N×`n_features` matrix, one per row.
    fn predict(&self, rows: &[Vec<f64>]) -> Result<Vec<i64>, InferenceError> {
        rows.iter().map(|row| self.predict_row(row)).collect()
    }
}
