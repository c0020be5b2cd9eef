//! Glyco Core Prelude: convenient imports for common usage.
//!
//! ```rust
//! use glyco_core::prelude::*;
//! ```

// Re-export commonly used types
pub use crate::types::{
    Feature, FeatureRange, FeatureVector,
    DiabetesStatus, Prediction,
    FEATURE_COUNT, CLASS_COUNT,
};

// Model loading and inference
pub use crate::context::{ModelContext, ModelSummary};
pub use crate::forest::Classifier;

// Explanation and normalization
pub use crate::explain::{AttributionLayout, AttributionOutput, TreeExplainer};
pub use crate::contribution::{normalize, normalize_output, ContributionBreakdown, ContributionShare};

// Presentation
pub use crate::chart::DonutChart;
pub use crate::guidance::{tips_for, tips_for_label, HealthTips};

// The full pipeline
pub use crate::assessment::{assess, AssessOptions, Assessment, ExplanationOutcome};

// Re-export error types
pub use crate::error::{GlycoError, Result};
