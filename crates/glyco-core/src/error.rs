//! Error types for Glyco operations.
//!
//! Provides structured error handling instead of panics.

use thiserror::Error;

/// Result type for Glyco operations.
pub type Result<T> = std::result::Result<T, GlycoError>;

/// Errors that can occur during Glyco operations.
#[derive(Debug, Clone, Error)]
pub enum GlycoError {
    /// Model artifact errors.
    #[error("Model error: {0}")]
    Model(#[from] ModelError),
    /// Explanation errors.
    #[error("Explanation error: {0}")]
    Explain(#[from] ExplainError),
    /// Input measurement errors.
    #[error("Input error: {0}")]
    Input(#[from] InputError),
    /// I/O errors (wrapped).
    #[error("I/O error: {0}")]
    Io(String),
    /// Serialization errors.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<std::io::Error> for GlycoError {
    fn from(e: std::io::Error) -> Self {
        GlycoError::Io(e.to_string())
    }
}

impl From<serde_json::Error> for GlycoError {
    fn from(e: serde_json::Error) -> Self {
        GlycoError::Serialization(e.to_string())
    }
}

/// Model artifact errors. All of these are raised at load time.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModelError {
    #[error("unsupported artifact format version {found} (expected {expected})")]
    UnsupportedVersion { expected: u32, found: u32 },

    #[error("unsupported estimator '{0}'")]
    UnsupportedEstimator(String),

    #[error("model expects {found} features, this tool supplies {expected}")]
    FeatureCount { expected: usize, found: usize },

    #[error("feature {position} is '{found}', expected '{expected}'")]
    FeatureOrder {
        position: usize,
        expected: String,
        found: String,
    },

    #[error("model has {found} classes, expected {expected}")]
    ClassCount { expected: usize, found: usize },

    #[error("class {position} is '{found}', expected '{expected}'")]
    ClassLabel {
        position: usize,
        expected: String,
        found: String,
    },

    #[error("forest contains no trees")]
    EmptyForest,

    #[error("tree {tree}: {reason}")]
    MalformedTree { tree: usize, reason: String },
}

/// Explanation errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExplainError {
    #[error("unsupported attribution shape: {0}")]
    UnsupportedShape(String),

    #[error("class index {class} out of range for {n_classes} classes")]
    ClassOutOfRange { class: usize, n_classes: usize },

    #[error("instance index {instance} out of range for {n_instances} instances")]
    InstanceOutOfRange { instance: usize, n_instances: usize },

    #[error("{attributions} attributions for {names} feature names")]
    LengthMismatch { attributions: usize, names: usize },

    #[error("expected {expected} feature columns, got {found}")]
    FeatureCount { expected: usize, found: usize },

    #[error("attribution values must be finite")]
    NonFinite,
}

/// Input measurement errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InputError {
    #[error("{field} out of range: {value} (must be {min}-{max})")]
    OutOfRange {
        field: String,
        min: f64,
        max: f64,
        value: f64,
    },

    #[error("{field} must be a finite number")]
    NotFinite { field: String },

    #[error("{field} must be a whole number, got {value}")]
    NotIntegral { field: String, value: f64 },
}

// Convenience constructors
impl ModelError {
    pub fn malformed(tree: usize, reason: impl Into<String>) -> Self {
        ModelError::MalformedTree {
            tree,
            reason: reason.into(),
        }
    }
}

impl ExplainError {
    pub fn unsupported(reason: impl Into<String>) -> Self {
        ExplainError::UnsupportedShape(reason.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nested_errors_render_with_prefix() {
        let err: GlycoError = ModelError::FeatureCount {
            expected: 5,
            found: 4,
        }
        .into();
        assert_eq!(
            err.to_string(),
            "Model error: model expects 4 features, this tool supplies 5"
        );
    }

    #[test]
    fn out_of_range_message_names_bounds() {
        let err = InputError::OutOfRange {
            field: "BMI".into(),
            min: 15.0,
            max: 50.0,
            value: 61.0,
        };
        assert_eq!(err.to_string(), "BMI out of range: 61 (must be 15-50)");
    }

    #[test]
    fn io_errors_are_wrapped() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: GlycoError = io.into();
        assert!(matches!(err, GlycoError::Io(ref msg) if msg == "missing"));
    }
}
