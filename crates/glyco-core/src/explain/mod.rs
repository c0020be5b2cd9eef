//! Explanation engine: exact TreeSHAP attributions over the forest.
//!
//! The explainer can emit its output in either of the two layouts that
//! tree explainers commonly produce:
//!
//! - **per-class list**: one `[instance, feature]` matrix per class
//! - **stacked**: a single `[instance, class, feature]` tensor
//!
//! [`AttributionOutput`] holds either layout and resolves the vector for one
//! instance and class by an explicit shape check.

mod attribution;
mod path;
mod tree_shap;

pub use attribution::{AttributionLayout, AttributionOutput};
pub use tree_shap::TreeExplainer;
