//! Small hand-built forests for tests, behind the `testing` feature.
//!
//! The sample forest has three shallow trees over the standard features.
//! Node counts are consistent (every parent equals the sum of its children),
//! so TreeSHAP expected values match the root distributions.

use crate::artifact::{ModelArtifact, TreeArtifact};
use crate::context::ModelContext;
use crate::forest::{DecisionTree, RandomForest};

/// A one-split tree as an artifact: class 0 on the left, class 1 on the right.
pub fn stump_artifact(feature: i64, threshold: f64) -> TreeArtifact {
    TreeArtifact {
        children_left: vec![1, -1, -1],
        children_right: vec![2, -1, -1],
        feature: vec![feature, -2, -2],
        threshold: vec![threshold, -2.0, -2.0],
        value: vec![vec![10.0, 10.0, 0.0], vec![10.0, 0.0, 0.0], vec![0.0, 10.0, 0.0]],
        weighted_n_node_samples: vec![20.0, 10.0, 10.0],
    }
}

/// A one-split tree with explicit leaf class counts.
pub fn stump(feature: u32, threshold: f64, left: [f64; 3], right: [f64; 3]) -> DecisionTree {
    let root: Vec<f64> = left.iter().zip(&right).map(|(l, r)| l + r).collect();
    let (l_cover, r_cover) = (left.iter().sum::<f64>(), right.iter().sum::<f64>());
    DecisionTree::from_parts(
        vec![Some(1), None, None],
        vec![Some(2), None, None],
        vec![feature, 0, 0],
        vec![threshold, -2.0, -2.0],
        &[root, left.to_vec(), right.to_vec()],
        vec![l_cover + r_cover, l_cover, r_cover],
        3,
    )
}

/// A tree with a single leaf: constant output, zero attributions.
pub fn constant_tree_artifact() -> TreeArtifact {
    TreeArtifact {
        children_left: vec![-1],
        children_right: vec![-1],
        feature: vec![-2],
        threshold: vec![-2.0],
        value: vec![vec![1.0, 2.0, 1.0]],
        weighted_n_node_samples: vec![10.0],
    }
}

/// Three shallow trees splitting on all five features.
pub fn sample_artifact() -> ModelArtifact {
    let fbs_tree = TreeArtifact {
        children_left: vec![1, 2, -1, -1, -1],
        children_right: vec![4, 3, -1, -1, -1],
        feature: vec![0, 0, -2, -2, -2],
        threshold: vec![125.5, 99.5, -2.0, -2.0, -2.0],
        value: vec![
            vec![40.0, 45.0, 15.0],
            vec![3.0, 42.0, 13.0],
            vec![1.0, 37.0, 2.0],
            vec![2.0, 5.0, 11.0],
            vec![37.0, 3.0, 2.0],
        ],
        weighted_n_node_samples: vec![100.0, 58.0, 40.0, 18.0, 42.0],
    };
    let bmi_tree = TreeArtifact {
        children_left: vec![1, 2, -1, -1, 5, -1, -1],
        children_right: vec![4, 3, -1, -1, 6, -1, -1],
        feature: vec![1, 2, -2, -2, 3, -2, -2],
        threshold: vec![29.95, 44.5, -2.0, -2.0, 101.5, -2.0, -2.0],
        value: vec![
            vec![42.0, 43.0, 15.0],
            vec![12.0, 38.0, 10.0],
            vec![3.0, 29.0, 3.0],
            vec![9.0, 9.0, 7.0],
            vec![30.0, 5.0, 5.0],
            vec![7.0, 4.0, 3.0],
            vec![23.0, 1.0, 2.0],
        ],
        weighted_n_node_samples: vec![100.0, 60.0, 35.0, 25.0, 40.0, 14.0, 26.0],
    };
    let hip_tree = TreeArtifact {
        children_left: vec![1, -1, 3, -1, -1],
        children_right: vec![2, -1, 4, -1, -1],
        feature: vec![0, -2, 4, -2, -2],
        threshold: vec![110.5, -2.0, 104.5, -2.0, -2.0],
        value: vec![
            vec![38.0, 47.0, 15.0],
            vec![4.0, 41.0, 7.0],
            vec![34.0, 6.0, 8.0],
            vec![10.0, 4.0, 6.0],
            vec![24.0, 2.0, 2.0],
        ],
        weighted_n_node_samples: vec![100.0, 52.0, 48.0, 20.0, 28.0],
    };
    ModelArtifact::new(vec![fbs_tree, bmi_tree, hip_tree])
}

/// The sample artifact as an in-memory forest.
pub fn sample_forest() -> RandomForest {
    sample_artifact()
        .into_forest()
        .expect("sample artifact is valid")
}

/// A loaded context around the sample forest.
pub fn sample_context() -> ModelContext {
    ModelContext::from_artifact(sample_artifact()).expect("sample artifact is valid")
}

/// A context whose forest ignores its inputs.
pub fn constant_context() -> ModelContext {
    ModelContext::from_artifact(ModelArtifact::new(vec![constant_tree_artifact()]))
        .expect("constant artifact is valid")
}
