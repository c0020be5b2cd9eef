//! The serialized model artifact and its load-time validation.
//!
//! The artifact is a JSON export of a fitted random-forest classifier. Each
//! tree carries the raw node arrays of the fitted estimator:
//!
//! ```json
//! {
//!   "format_version": 1,
//!   "estimator": "random_forest_classifier",
//!   "n_features": 5,
//!   "feature_names": ["FBS", "BMI", "Age", "wc", "Hc"],
//!   "classes": ["Diabetes", "Non-Diabetes", "Pre-Diabetes"],
//!   "trees": [{
//!     "children_left":  [1, -1, -1],
//!     "children_right": [2, -1, -1],
//!     "feature":        [0, -2, -2],
//!     "threshold":      [125.5, -2.0, -2.0],
//!     "value":          [[40, 45, 15], [2, 44, 9], [38, 1, 6]],
//!     "weighted_n_node_samples": [100, 55, 45]
//!   }]
//! }
//! ```
//!
//! `feature_names` and `classes` are optional (a model fit on a bare matrix
//! has neither), but when present they must match the fixed orders exactly.

use crate::error::{ModelError, Result};
use crate::forest::{DecisionTree, RandomForest};
use crate::types::{DiabetesStatus, Feature, CLASS_COUNT, FEATURE_COUNT};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Artifact format version this build reads.
pub const FORMAT_VERSION: u32 = 1;

/// Estimator kind this build reads.
pub const ESTIMATOR: &str = "random_forest_classifier";

/// Marker for an absent child.
const TREE_LEAF: i64 = -1;

/// Serialized random forest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub format_version: u32,
    pub estimator: String,
    pub n_features: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature_names: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub classes: Option<Vec<String>>,
    /// Required when `classes` is absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub n_classes: Option<usize>,
    pub trees: Vec<TreeArtifact>,
}

/// Serialized node arrays of one tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeArtifact {
    pub children_left: Vec<i64>,
    pub children_right: Vec<i64>,
    pub feature: Vec<i64>,
    pub threshold: Vec<f64>,
    /// Per-node class counts or fractions.
    pub value: Vec<Vec<f64>>,
    pub weighted_n_node_samples: Vec<f64>,
}

impl ModelArtifact {
    /// Artifact for a forest over the standard features and classes.
    pub fn new(trees: Vec<TreeArtifact>) -> Self {
        Self {
            format_version: FORMAT_VERSION,
            estimator: ESTIMATOR.to_string(),
            n_features: FEATURE_COUNT,
            feature_names: Some(Feature::short_names()),
            classes: Some(DiabetesStatus::labels()),
            n_classes: None,
            trees,
        }
    }

    /// Read and parse an artifact file. No validation is done here.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_json(&content)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Class count declared by the artifact.
    pub fn declared_classes(&self) -> usize {
        match (&self.classes, self.n_classes) {
            (Some(labels), _) => labels.len(),
            (None, Some(n)) => n,
            (None, None) => self
                .trees
                .first()
                .and_then(|t| t.value.first())
                .map(Vec::len)
                .unwrap_or(0),
        }
    }

    /// Check the artifact against the fixed feature and class contract.
    pub fn validate(&self) -> std::result::Result<(), ModelError> {
        if self.format_version != FORMAT_VERSION {
            return Err(ModelError::UnsupportedVersion {
                expected: FORMAT_VERSION,
                found: self.format_version,
            });
        }
        if self.estimator != ESTIMATOR {
            return Err(ModelError::UnsupportedEstimator(self.estimator.clone()));
        }
        if self.n_features != FEATURE_COUNT {
            return Err(ModelError::FeatureCount {
                expected: FEATURE_COUNT,
                found: self.n_features,
            });
        }
        if let Some(names) = &self.feature_names {
            if names.len() != FEATURE_COUNT {
                return Err(ModelError::FeatureCount {
                    expected: FEATURE_COUNT,
                    found: names.len(),
                });
            }
            for (position, (feature, found)) in Feature::ALL.iter().zip(names).enumerate() {
                if feature.short_name() != found {
                    return Err(ModelError::FeatureOrder {
                        position,
                        expected: feature.short_name().to_string(),
                        found: found.clone(),
                    });
                }
            }
        }

        let n_classes = self.declared_classes();
        if n_classes != CLASS_COUNT {
            return Err(ModelError::ClassCount {
                expected: CLASS_COUNT,
                found: n_classes,
            });
        }
        if let Some(labels) = &self.classes {
            for (position, (status, found)) in DiabetesStatus::ALL.iter().zip(labels).enumerate() {
                if status.label() != found {
                    return Err(ModelError::ClassLabel {
                        position,
                        expected: status.label().to_string(),
                        found: found.clone(),
                    });
                }
            }
        }

        if self.trees.is_empty() {
            return Err(ModelError::EmptyForest);
        }
        for (i, tree) in self.trees.iter().enumerate() {
            tree.validate(i, self.n_features, n_classes)?;
        }
        Ok(())
    }

    /// Validate and build the in-memory forest.
    pub fn into_forest(self) -> std::result::Result<RandomForest, ModelError> {
        self.validate()?;
        let n_classes = self.declared_classes();
        let trees = self
            .trees
            .into_iter()
            .map(|t| t.into_tree(n_classes))
            .collect();
        Ok(RandomForest::new(trees, self.n_features, n_classes))
    }
}

impl TreeArtifact {
    pub fn n_nodes(&self) -> usize {
        self.children_left.len()
    }

    fn validate(
        &self,
        index: usize,
        n_features: usize,
        n_classes: usize,
    ) -> std::result::Result<(), ModelError> {
        let n = self.n_nodes();
        if n == 0 {
            return Err(ModelError::malformed(index, "no nodes"));
        }
        let lengths = [
            ("children_right", self.children_right.len()),
            ("feature", self.feature.len()),
            ("threshold", self.threshold.len()),
            ("value", self.value.len()),
            ("weighted_n_node_samples", self.weighted_n_node_samples.len()),
        ];
        for (name, len) in lengths {
            if len != n {
                return Err(ModelError::malformed(
                    index,
                    format!("{name} has {len} entries for {n} nodes"),
                ));
            }
        }

        for node in 0..n {
            let (left, right) = (self.children_left[node], self.children_right[node]);
            match (left == TREE_LEAF, right == TREE_LEAF) {
                (true, true) => {}
                (false, false) => {
                    // Children always follow their parent in the arrays,
                    // which also rules out cycles.
                    for child in [left, right] {
                        if child <= node as i64 || child >= n as i64 {
                            return Err(ModelError::malformed(
                                index,
                                format!("node {node} has invalid child {child}"),
                            ));
                        }
                    }
                    let feature = self.feature[node];
                    if feature < 0 || feature as usize >= n_features {
                        return Err(ModelError::malformed(
                            index,
                            format!("node {node} splits on feature {feature}"),
                        ));
                    }
                    if !self.threshold[node].is_finite() {
                        return Err(ModelError::malformed(
                            index,
                            format!("node {node} has a non-finite threshold"),
                        ));
                    }
                }
                _ => {
                    return Err(ModelError::malformed(
                        index,
                        format!("node {node} has exactly one child"),
                    ));
                }
            }

            let row = &self.value[node];
            if row.len() != n_classes {
                return Err(ModelError::malformed(
                    index,
                    format!("node {node} has {} class values, expected {n_classes}", row.len()),
                ));
            }
            let total: f64 = row.iter().sum();
            if row.iter().any(|v| !v.is_finite() || *v < 0.0) || total <= 0.0 {
                return Err(ModelError::malformed(
                    index,
                    format!("node {node} has an invalid class distribution"),
                ));
            }
            let weight = self.weighted_n_node_samples[node];
            if !weight.is_finite() || weight <= 0.0 {
                return Err(ModelError::malformed(
                    index,
                    format!("node {node} has non-positive sample weight {weight}"),
                ));
            }
        }
        Ok(())
    }

    fn into_tree(self, n_classes: usize) -> DecisionTree {
        let child = |c: i64| (c != TREE_LEAF).then_some(c as u32);
        let left = self.children_left.iter().copied().map(child).collect();
        let right = self.children_right.iter().copied().map(child).collect();
        let feature = self.feature.iter().map(|&f| f.max(0) as u32).collect();
        DecisionTree::from_parts(
            left,
            right,
            feature,
            self.threshold,
            &self.value,
            self.weighted_n_node_samples,
            n_classes,
        )
    }
}
