//! Validated decision tree and its traversal.
//!
//! Trees are built from the parallel arrays scikit-learn exposes on a fitted
//! estimator's `tree_` attribute. A node is a leaf when its left child is
//! [`TREE_LEAF`]; otherwise a row goes left iff `x[feature] <= threshold`.

use serde::{Deserialize, Serialize};

use crate::error::{InferenceError, ModelError, ModelResult};

/// Child index marking a leaf.
pub const TREE_LEAF: i64 = -1;

/// Per-node class weights. scikit-learn exports `value` with shape
/// `(n_nodes, n_outputs, n_classes)`; single-output trees may also be written
/// with the output axis squeezed away.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NodeValue {
    Flat(Vec<f64>),
    PerOutput(Vec<Vec<f64>>),
}

impl NodeValue {
    fn weights(&self, node: usize) -> ModelResult<&[f64]> {
        match self {
            NodeValue::Flat(w) => Ok(w),
            NodeValue::PerOutput(outputs) if outputs.len() == 1 => Ok(&outputs[0]),
            NodeValue::PerOutput(outputs) => Err(ModelError::Malformed(format!(
                "node {} has {} outputs; only single-output trees are supported",
                node,
                outputs.len()
            ))),
        }
    }
}

/// Raw tree arrays as stored in the artifact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeArrays {
    pub children_left: Vec<i64>,
    pub children_right: Vec<i64>,
    pub feature: Vec<i64>,
    pub threshold: Vec<f64>,
    pub value: Vec<NodeValue>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Node {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        class: i64,
    },
}

/// A structurally valid decision tree classifier.
#[derive(Debug, Clone, PartialEq)]
pub struct DecisionTree {
    nodes: Vec<Node>,
    n_features: usize,
}

impl DecisionTree {
    /// Validate the arrays and resolve every leaf to its majority class.
    ///
    /// Children must point strictly forward (scikit-learn stores nodes in
    /// depth-first pre-order), which rules out cycles and guarantees that
    /// traversal terminates.
    pub fn from_arrays(arrays: &TreeArrays, classes: &[i64], n_features: usize) -> ModelResult<Self> {
        let n = arrays.children_left.len();
        if n == 0 {
            return Err(ModelError::Malformed("tree has no nodes".to_string()));
        }
        if classes.is_empty() {
            return Err(ModelError::Malformed("no classes declared".to_string()));
        }
        for (name, len) in [
            ("children_right", arrays.children_right.len()),
            ("feature", arrays.feature.len()),
            ("threshold", arrays.threshold.len()),
            ("value", arrays.value.len()),
        ] {
            if len != n {
                return Err(ModelError::Malformed(format!(
                    "{} has {} entries, children_left has {}",
                    name, len, n
                )));
            }
        }

        let mut nodes = Vec::with_capacity(n);
        for i in 0..n {
            let left = arrays.children_left[i];
            let right = arrays.children_right[i];

            if left == TREE_LEAF || right == TREE_LEAF {
                if left != right {
                    return Err(ModelError::Malformed(format!(
                        "node {} has only one child ({}, {})",
                        i, left, right
                    )));
                }
                let class = leaf_class(arrays.value[i].weights(i)?, classes, i)?;
                nodes.push(Node::Leaf { class });
                continue;
            }

            let left = child_index(left, i, n)?;
            let right = child_index(right, i, n)?;

            let feature = arrays.feature[i];
            if feature < 0 || feature as usize >= n_features {
                return Err(ModelError::Malformed(format!(
                    "node {} splits on feature {}, outside [0, {})",
                    i, feature, n_features
                )));
            }
            let threshold = arrays.threshold[i];
            if !threshold.is_finite() {
                return Err(ModelError::Malformed(format!(
                    "node {} has non-finite threshold {}",
                    i, threshold
                )));
            }
            nodes.push(Node::Split {
                feature: feature as usize,
                threshold,
                left,
                right,
            });
        }

        Ok(DecisionTree { nodes, n_features })
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn leaf_count(&self) -> usize {
        self.nodes
            .iter()
            .filter(|n| matches!(n, Node::Leaf { .. }))
            .count()
    }

    /// Longest root-to-leaf path, counted in edges.
    pub fn depth(&self) -> usize {
        let mut max_depth = 0;
        let mut stack = vec![(0usize, 0usize)];
        while let Some((idx, depth)) = stack.pop() {
            match self.nodes[idx] {
                Node::Leaf { .. } => max_depth = max_depth.max(depth),
                Node::Split { left, right, .. } => {
                    stack.push((left, depth + 1));
                    stack.push((right, depth + 1));
                }
            }
        }
        max_depth
    }

    /// Evaluate one row.
    ///
    /// Inputs are rounded to `f32` before comparison, matching how
    /// scikit-learn evaluates its trees.
    pub fn predict_row(&self, row: &[f64]) -> Result<i64, InferenceError> {
        check_row(row, self.n_features)?;
        let mut idx = 0;
        loop {
            match self.nodes[idx] {
                Node::Leaf { class } => return Ok(class),
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    let x = f64::from(row[feature] as f32);
                    idx = if x <= threshold { left } else { right };
                }
            }
        }
    }
}

/// Reject rows of the wrong width or containing NaN/infinity.
pub fn check_row(row: &[f64], n_features: usize) -> Result<(), InferenceError> {
    if row.len() != n_features {
        return Err(InferenceError::DimensionMismatch {
            expected: n_features,
            got: row.len(),
        });
    }
    if let Some((index, value)) = row.iter().enumerate().find(|(_, v)| !v.is_finite()) {
        return Err(InferenceError::NonFinite {
            index,
            value: *value,
        });
    }
    Ok(())
}

fn child_index(child: i64, parent: usize, n: usize) -> ModelResult<usize> {
    if child <= parent as i64 || child >= n as i64 {
        return Err(ModelError::Malformed(format!(
            "node {} has child {} outside ({}, {})",
            parent, child, parent, n
        )));
    }
    Ok(child as usize)
}

/// First class with the largest weight.
fn leaf_class(weights: &[f64], classes: &[i64], node: usize) -> ModelResult<i64> {
    if weights.len() != classes.len() {
        return Err(ModelError::Malformed(format!(
            "leaf {} has {} class weights for {} classes",
            node,
            weights.len(),
            classes.len()
        )));
    }
    if weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
        return Err(ModelError::Malformed(format!(
            "leaf {} has negative or non-finite class weights",
            node
        )));
    }
    let mut best = 0;
    for (i, w) in weights.iter().enumerate().skip(1) {
        if *w > weights[best] {
            best = i;
        }
    }
    Ok(classes[best])
}
