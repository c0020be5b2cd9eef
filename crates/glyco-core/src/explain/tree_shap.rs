//! TreeSHAP explainer for the random forest.
//!
//! Implements the exact path-dependent algorithm from Lundberg et al. (2018),
//! explaining the forest's probability output. For every class `c`:
//!
//! ```text
//! expected_value[c] + sum_f phi[c][f] == predict_proba(x)[c]
//! ```

use super::attribution::{AttributionLayout, AttributionOutput};
use super::path::FeaturePath;
use crate::error::ExplainError;
use crate::forest::{Classifier, DecisionTree, RandomForest};
use ndarray::{Array2, Array3, ArrayView2};
use tracing::trace;

/// Exact TreeSHAP over a [`RandomForest`].
#[derive(Debug, Clone)]
pub struct TreeExplainer<'a> {
    forest: &'a RandomForest,
    expected_value: Vec<f64>,
    max_depth: usize,
}

impl<'a> TreeExplainer<'a> {
    pub fn new(forest: &'a RandomForest) -> Self {
        Self {
            forest,
            expected_value: forest.expected_value(),
            max_depth: forest.max_depth(),
        }
    }

    /// Expected probability per class (the base value of every explanation).
    pub fn expected_value(&self) -> &[f64] {
        &self.expected_value
    }

    /// Attributions for a batch of rows, laid out as requested.
    ///
    /// `rows` has shape `[instance, feature]`.
    pub fn shap_values(
        &self,
        rows: ArrayView2<'_, f64>,
        layout: AttributionLayout,
    ) -> Result<AttributionOutput, ExplainError> {
        let n_features = self.forest.n_features();
        if rows.ncols() != n_features {
            return Err(ExplainError::FeatureCount {
                expected: n_features,
                found: rows.ncols(),
            });
        }

        let n_rows = rows.nrows();
        let n_classes = self.forest.n_classes();
        let mut stacked = Array3::zeros((n_rows, n_classes, n_features));
        for (r, row) in rows.outer_iter().enumerate() {
            let row = row.to_vec();
            let phi = self.explain_row(&row);
            stacked
                .index_axis_mut(ndarray::Axis(0), r)
                .assign(&phi);
        }

        let output = AttributionOutput::Stacked(stacked);
        output.to_layout(layout)
    }

    /// Attributions for one row, shape `[class, feature]`.
    pub fn explain_row(&self, row: &[f64]) -> Array2<f64> {
        let n_classes = self.forest.n_classes();
        let mut phi = Array2::zeros((n_classes, self.forest.n_features()));
        let scale = 1.0 / self.forest.n_trees() as f64;

        for (i, tree) in self.forest.trees().iter().enumerate() {
            let root = FeaturePath::with_capacity(self.max_depth);
            self.recurse(tree, row, 0, &root, 1.0, 1.0, None, scale, &mut phi);
            trace!(tree = i, "tree explained");
        }
        phi
    }

    #[allow(clippy::too_many_arguments)]
    fn recurse(
        &self,
        tree: &DecisionTree,
        row: &[f64],
        node: usize,
        parent: &FeaturePath,
        zero_fraction: f64,
        one_fraction: f64,
        feature: Option<usize>,
        scale: f64,
        phi: &mut Array2<f64>,
    ) {
        let mut path = parent.clone();
        path.extend(feature, zero_fraction, one_fraction);

        if tree.is_leaf(node) {
            let distribution = tree.distribution(node);
            for i in 1..=path.n_features() {
                let element = *path.element(i);
                let Some(f) = element.feature else { continue };
                let weight = path.unwound_sum(i);
                let factor = weight * (element.one_fraction - element.zero_fraction) * scale;
                for (c, value) in distribution.iter().enumerate() {
                    phi[[c, f]] += factor * value;
                }
            }
            return;
        }

        let split = tree.split_feature(node);
        let (hot, cold) = if tree.goes_left(node, row) {
            (tree.left_child(node), tree.right_child(node))
        } else {
            (tree.right_child(node), tree.left_child(node))
        };

        // A feature seen higher up is unwound so it appears once on the path.
        let mut incoming_zero = 1.0;
        let mut incoming_one = 1.0;
        if let Some(k) = path.position_of(split) {
            incoming_zero = path.element(k).zero_fraction;
            incoming_one = path.element(k).one_fraction;
            path.unwind(k);
        }

        let cover = tree.cover(node);
        let hot_zero = tree.cover(hot) / cover * incoming_zero;
        let cold_zero = tree.cover(cold) / cover * incoming_zero;
        self.recurse(tree, row, hot, &path, hot_zero, incoming_one, Some(split), scale, phi);
        self.recurse(tree, row, cold, &path, cold_zero, 0.0, Some(split), scale, phi);
    }
}
