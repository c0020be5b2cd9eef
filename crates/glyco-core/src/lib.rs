//! # Glyco Core
//!
//! Diabetes status prediction with per-feature explanations.
//!
//! Given five clinical measurements this crate predicts one of three
//! diabetes status categories with a pre-trained random forest, explains the
//! prediction with exact TreeSHAP attributions, and ranks the attributions as
//! percentage shares for display:
//!
//! - **Types**: the fixed feature order, input ranges and class labels
//! - **Artifact / Context**: load and validate the model once, share it immutably
//! - **Forest**: `predict` / `predict_proba` over the tree ensemble
//! - **Explain**: TreeSHAP and the two attribution output layouts
//! - **Contribution**: absolute-share normalization and ranking
//! - **Guidance**: static health tips keyed by predicted category
//! - **Chart**: donut chart SVG and text bars for the ranked shares
//! - **Assessment**: the whole pipeline in one call
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use glyco_core::prelude::*;
//!
//! let ctx = ModelContext::load("random_forest_model.json")?;
//! let features = FeatureVector::new(126.0, 31.2, 54.0, 104.0, 108.0);
//! let assessment = assess(&ctx, &features, &AssessOptions::default())?;
//!
//! println!("Predicted Diabetes Status: {}", assessment.prediction.status);
//! # Ok::<(), glyco_core::GlycoError>(())
//! ```

pub mod artifact;
pub mod assessment;
pub mod chart;
pub mod context;
pub mod contribution;
pub mod error;
pub mod explain;
pub mod forest;
pub mod guidance;
pub mod prelude;
#[cfg(any(test, feature = "testing"))]
pub mod testing;
pub mod types;

pub use error::{GlycoError, Result};
