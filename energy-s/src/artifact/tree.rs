use serde::{Deserialize, Serialize};

use super::ArtifactError;

/// Child index marking a leaf, as in scikit-learn's `tree_` arrays.
pub const TREE_LEAF: i64 = -1;

/// A fitted binary tree stored as parallel node arrays.
///
/// Node `i` is a leaf when `children_left[i] == TREE_LEAF`. Otherwise a row
/// goes left when `x[feature[i]] <= threshold[i]`. `value[i]` holds the mean
/// target for regressors and the per-class weights for classifiers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tree {
    pub children_left: Vec<i64>,
    pub children_right: Vec<i64>,
    pub feature: Vec<i64>,
    pub threshold: Vec<f64>,
    pub value: Vec<Vec<f64>>,
}

impl Tree {
    /// Single-leaf tree.
    pub fn constant(value: Vec<f64>) -> Self {
        Self {
            children_left: vec![TREE_LEAF],
            children_right: vec![TREE_LEAF],
            feature: vec![-2],
            threshold: vec![-2.0],
            value: vec![value],
        }
    }

    /// One split on `feature` with two leaves.
    pub fn stump(feature: usize, threshold: f64, left: Vec<f64>, right: Vec<f64>) -> Self {
        let root_value = left.iter().zip(&right).map(|(l, r)| (l + r) / 2.0).collect();
        Self {
            children_left: vec![1, TREE_LEAF, TREE_LEAF],
            children_right: vec![2, TREE_LEAF, TREE_LEAF],
            feature: vec![feature as i64, -2, -2],
            threshold: vec![threshold, -2.0, -2.0],
            value: vec![root_value, left, right],
        }
    }

    pub fn node_count(&self) -> usize {
        self.children_left.len()
    }

    pub(crate) fn validate(&self, n_features: usize, width: usize) -> Result<(), ArtifactError> {
        let n = self.node_count();
        if n == 0 {
            return Err(ArtifactError::Invalid("tree has no nodes".into()));
        }
        if self.children_right.len() != n
            || self.feature.len() != n
            || self.threshold.len() != n
            || self.value.len() != n
        {
            return Err(ArtifactError::Invalid(format!(
                "tree node arrays differ in length (children_left has {n})"
            )));
        }

        for node in 0..n {
            if self.value[node].len() != width {
                return Err(ArtifactError::Invalid(format!(
                    "node {node} carries {} values, expected {width}",
                    self.value[node].len()
                )));
            }
            let (left, right) = (self.children_left[node], self.children_right[node]);
            if left == TREE_LEAF {
                if right != TREE_LEAF {
                    return Err(ArtifactError::Invalid(format!(
                        "node {node} has only a right child"
                    )));
                }
                continue;
            }
            // Children always come after their parent, which rules out cycles.
            for child in [left, right] {
                if child <= node as i64 || child >= n as i64 {
                    return Err(ArtifactError::Invalid(format!(
                        "node {node} points to child {child} out of {n} nodes"
                    )));
                }
            }
            let feature = self.feature[node];
            if feature < 0 || feature as usize >= n_features {
                return Err(ArtifactError::Invalid(format!(
                    "node {node} splits on feature {feature}, model has {n_features}"
                )));
            }
            if self.threshold[node].is_nan() {
                return Err(ArtifactError::Invalid(format!("node {node} has a NaN threshold")));
            }
        }
        Ok(())
    }

    /// Leaf values reached by `x`. The tree must have been validated against
    /// `x.len()` features.
    pub fn leaf(&self, x: &[f64]) -> &[f64] {
        let mut node = 0usize;
        while self.children_left[node] != TREE_LEAF {
            let feature = self.feature[node] as usize;
            node = if x[feature] <= self.threshold[node] {
                self.children_left[node] as usize
            } else {
                self.children_right[node] as usize
            };
        }
        &self.value[node]
    }
}

/// Class weights scaled to sum to one. An all-zero leaf votes uniformly.
pub(crate) fn normalized(weights: &[f64]) -> Vec<f64> {
    let total: f64 = weights.iter().sum();
    if total > 0.0 {
        weights.iter().map(|w| w / total).collect()
    } else {
        vec![1.0 / weights.len() as f64; weights.len()]
    }
}

/// Index of the largest probability; the first one wins a tie.
pub(crate) fn argmax(probabilities: &[f64]) -> usize {
    let mut best = 0;
    for (i, p) in probabilities.iter().enumerate() {
        if *p > probabilities[best] {
            best = i;
        }
    }
    best
}
