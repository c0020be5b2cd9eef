//! Random-forest classifier inference.
//!
//! Trees use the flat node-array layout of a fitted scikit-learn tree:
//! node `i` is a leaf when both children are absent, otherwise a sample goes
//! to the left child when `x[feature[i]] <= threshold[i]`.

use serde::{Deserialize, Serialize};

/// A classifier over a fixed-width feature row.
///
/// Implementations must be safe to call repeatedly from any thread against
/// the same loaded instance.
pub trait Classifier: Send + Sync {
    /// Number of input features.
    fn n_features(&self) -> usize;

    /// Number of output classes.
    fn n_classes(&self) -> usize;

    /// Per-class probabilities for one row.
    fn predict_proba(&self, row: &[f64]) -> Vec<f64>;

    /// Class index with the highest probability. Ties go to the lower index.
    fn predict(&self, row: &[f64]) -> usize {
        argmax(&self.predict_proba(row))
    }
}

/// Index of the first maximum.
pub fn argmax(values: &[f64]) -> usize {
    let mut best = 0;
    for (i, &v) in values.iter().enumerate() {
        if v > values[best] {
            best = i;
        }
    }
    best
}

/// One decision tree with per-class leaf distributions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTree {
    /// Left child per node, `None` at leaves.
    left: Vec<Option<u32>>,
    right: Vec<Option<u32>>,
    feature: Vec<u32>,
    threshold: Vec<f64>,
    /// Row-major `[node][class]`, normalized to sum to one at every node.
    value: Vec<f64>,
    /// Training sample weight reaching each node (TreeSHAP cover).
    cover: Vec<f64>,
    n_classes: usize,
}

impl DecisionTree {
    /// Build a tree from validated node arrays.
    ///
    /// `value` rows are normalized here, so raw class counts and fractions
    /// are both accepted.
    pub(crate) fn from_parts(
        left: Vec<Option<u32>>,
        right: Vec<Option<u32>>,
        feature: Vec<u32>,
        threshold: Vec<f64>,
        value_rows: &[Vec<f64>],
        cover: Vec<f64>,
        n_classes: usize,
    ) -> Self {
        let mut value = Vec::with_capacity(value_rows.len() * n_classes);
        for row in value_rows {
            let total: f64 = row.iter().sum();
            value.extend(row.iter().map(|v| v / total));
        }
        Self { left, right, feature, threshold, value, cover, n_classes }
    }

    pub fn n_nodes(&self) -> usize {
        self.left.len()
    }

    pub fn n_classes(&self) -> usize {
        self.n_classes
    }

    #[inline]
    pub fn is_leaf(&self, node: usize) -> bool {
        self.left[node].is_none()
    }

    #[inline]
    pub fn left_child(&self, node: usize) -> usize {
        self.left[node].unwrap_or_default() as usize
    }

    #[inline]
    pub fn right_child(&self, node: usize) -> usize {
        self.right[node].unwrap_or_default() as usize
    }

    #[inline]
    pub fn split_feature(&self, node: usize) -> usize {
        self.feature[node] as usize
    }

    #[inline]
    pub fn threshold(&self, node: usize) -> f64 {
        self.threshold[node]
    }

    #[inline]
    pub fn cover(&self, node: usize) -> f64 {
        self.cover[node]
    }

    /// Normalized class distribution at a node.
    #[inline]
    pub fn distribution(&self, node: usize) -> &[f64] {
        let start = node * self.n_classes;
        &self.value[start..start + self.n_classes]
    }

    /// Whether `row` is routed to the left child of `node`.
    ///
    /// Thresholds were fit on single-precision inputs, so the row value is
    /// rounded to `f32` before comparing.
    #[inline]
    pub fn goes_left(&self, node: usize, row: &[f64]) -> bool {
        let x = row[self.split_feature(node)] as f32 as f64;
        x <= self.threshold(node)
    }

    /// Follow `row` from the root to a leaf.
    pub fn leaf_for(&self, row: &[f64]) -> usize {
        let mut node = 0;
        while !self.is_leaf(node) {
            node = if self.goes_left(node, row) {
                self.left_child(node)
            } else {
                self.right_child(node)
            };
        }
        node
    }

    /// Longest root-to-leaf path, counted in nodes.
    pub fn depth(&self) -> usize {
        self.depth_from(0)
    }

    fn depth_from(&self, node: usize) -> usize {
        if self.is_leaf(node) {
            1
        } else {
            1 + self
                .depth_from(self.left_child(node))
                .max(self.depth_from(self.right_child(node)))
        }
    }

    /// Cover-weighted mean leaf distribution: the tree's expected output.
    pub fn expected_distribution(&self) -> Vec<f64> {
        let root_cover = self.cover(0);
        let mut expected = vec![0.0; self.n_classes];
        for node in 0..self.n_nodes() {
            if self.is_leaf(node) {
                let weight = self.cover(node) / root_cover;
                for (e, v) in expected.iter_mut().zip(self.distribution(node)) {
                    *e += weight * v;
                }
            }
        }
        expected
    }
}

/// A bagged ensemble whose probability is the mean of its trees' leaf
/// distributions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RandomForest {
    trees: Vec<DecisionTree>,
    n_features: usize,
    n_classes: usize,
}

impl RandomForest {
    pub(crate) fn new(trees: Vec<DecisionTree>, n_features: usize, n_classes: usize) -> Self {
        Self { trees, n_features, n_classes }
    }

    pub fn trees(&self) -> &[DecisionTree] {
        &self.trees
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    pub fn n_nodes(&self) -> usize {
        self.trees.iter().map(DecisionTree::n_nodes).sum()
    }

    pub fn max_depth(&self) -> usize {
        self.trees.iter().map(DecisionTree::depth).max().unwrap_or(0)
    }

    /// Expected probability per class over the training distribution.
    pub fn expected_value(&self) -> Vec<f64> {
        let mut expected = vec![0.0; self.n_classes];
        for tree in &self.trees {
            for (e, v) in expected.iter_mut().zip(tree.expected_distribution()) {
                *e += v;
            }
        }
        let n = self.trees.len() as f64;
        expected.iter_mut().for_each(|e| *e /= n);
        expected
    }
}

impl Classifier for RandomForest {
    fn n_features(&self) -> usize {
        self.n_features
    }

    fn n_classes(&self) -> usize {
        self.n_classes
    }

    fn predict_proba(&self, row: &[f64]) -> Vec<f64> {
        let mut proba = vec![0.0; self.n_classes];
        for tree in &self.trees {
            let leaf = tree.leaf_for(row);
            for (p, v) in proba.iter_mut().zip(tree.distribution(leaf)) {
                *p += v;
            }
        }
        let n = self.trees.len() as f64;
        proba.iter_mut().for_each(|p| *p /= n);
        proba
    }
}
