//! The loaded model, built once per process and shared read-only.

use crate::artifact::ModelArtifact;
use crate::error::{GlycoError, Result};
use crate::explain::TreeExplainer;
use crate::forest::{argmax, Classifier, RandomForest};
use crate::types::{DiabetesStatus, FeatureVector, Prediction};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Immutable model context.
///
/// Construct it at startup and pass it by reference into inference and
/// explanation. It holds no interior mutability, so an `Arc<ModelContext>`
/// can be shared freely across threads.
#[derive(Debug, Clone)]
pub struct ModelContext {
    forest: RandomForest,
    source: Option<PathBuf>,
}

/// Descriptive statistics of the loaded forest.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelSummary {
    pub source: Option<String>,
    pub n_trees: usize,
    pub n_nodes: usize,
    pub max_depth: usize,
    pub features: Vec<String>,
    pub classes: Vec<String>,
    /// Mean predicted probability per class over the training data.
    pub expected_value: Vec<f64>,
}

impl ModelContext {
    /// Load, validate and build the model from an artifact file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!(path = %path.display(), "reading model artifact");
        let artifact = ModelArtifact::from_path(path).map_err(|e| match e {
            GlycoError::Io(msg) => GlycoError::Io(format!("{}: {}", path.display(), msg)),
            other => other,
        })?;
        let mut ctx = Self::from_artifact(artifact)?;
        ctx.source = Some(path.to_path_buf());
        info!(
            path = %path.display(),
            trees = ctx.forest.n_trees(),
            nodes = ctx.forest.n_nodes(),
            "model loaded"
        );
        Ok(ctx)
    }

    /// Validate and build the model from an in-memory artifact.
    pub fn from_artifact(artifact: ModelArtifact) -> Result<Self> {
        let forest = artifact.into_forest()?;
        Ok(Self { forest, source: None })
    }

    pub fn forest(&self) -> &RandomForest {
        &self.forest
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// TreeSHAP explainer over this context's forest.
    pub fn explainer(&self) -> TreeExplainer<'_> {
        TreeExplainer::new(&self.forest)
    }

    /// Predicted category and class probabilities for one patient.
    ///
    /// Input ranges are not checked here; see [`FeatureVector::validate`].
    pub fn predict(&self, features: &FeatureVector) -> Prediction {
        let row = features.to_array();
        let probabilities = self.forest.predict_proba(&row);
        let class_index = argmax(&probabilities);
        // Class count is validated at load, so every index maps to a status.
        let status = DiabetesStatus::from_class_index(class_index).unwrap_or(DiabetesStatus::NonDiabetes);
        debug!(class_index, status = %status, "prediction");
        Prediction { class_index, status, probabilities }
    }

    pub fn summary(&self) -> ModelSummary {
        ModelSummary {
            source: self.source.as_ref().map(|p| p.display().to_string()),
            n_trees: self.forest.n_trees(),
            n_nodes: self.forest.n_nodes(),
            max_depth: self.forest.max_depth(),
            features: crate::types::Feature::short_names(),
            classes: DiabetesStatus::labels(),
            expected_value: self.forest.expected_value(),
        }
    }
}
