//! The full prediction pipeline for one patient.
//!
//! validate -> predict -> explain -> normalize -> chart -> tips
//!
//! Only invalid input aborts an assessment. A failed or empty explanation is
//! recorded in [`ExplanationOutcome`] and the prediction is still returned.

use crate::chart::DonutChart;
use crate::context::ModelContext;
use crate::contribution::{
    normalize_output, ContributionBreakdown, ContributionShare, UNDETERMINED_MESSAGE,
};
use crate::error::{ExplainError, Result};
use crate::explain::{AttributionLayout, AttributionOutput};
use crate::guidance::{tips_for, HealthTips};
use crate::types::{Feature, FeatureVector, Prediction};
use ndarray::aview2;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Knobs for [`assess`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssessOptions {
    /// Layout the explainer emits; the result is the same either way.
    pub layout: AttributionLayout,
}

/// What came of explaining the prediction.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ExplanationOutcome {
    /// Shares of the predicted class's attribution, highest first.
    Ranked { shares: Vec<ContributionShare> },
    /// Every attribution was zero.
    Undetermined { message: String },
    /// The explainer output could not be read.
    Failed { message: String },
}

impl ExplanationOutcome {
    fn from_breakdown(breakdown: ContributionBreakdown) -> Self {
        match breakdown {
            ContributionBreakdown::Ranked(shares) => ExplanationOutcome::Ranked { shares },
            ContributionBreakdown::Undetermined => ExplanationOutcome::Undetermined {
                message: UNDETERMINED_MESSAGE.to_string(),
            },
        }
    }

    fn failed(err: &ExplainError) -> Self {
        ExplanationOutcome::Failed {
            message: format!("Could not explain this prediction: {err}"),
        }
    }

    /// Ranked shares, empty unless ranked.
    pub fn shares(&self) -> &[ContributionShare] {
        match self {
            ExplanationOutcome::Ranked { shares } => shares,
            _ => &[],
        }
    }

    /// Message to show in place of a chart, if any.
    pub fn message(&self) -> Option<&str> {
        match self {
            ExplanationOutcome::Ranked { .. } => None,
            ExplanationOutcome::Undetermined { message } | ExplanationOutcome::Failed { message } => {
                Some(message)
            }
        }
    }
}

/// Everything shown for one patient.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Assessment {
    pub features: FeatureVector,
    pub prediction: Prediction,
    /// Base value per class the attributions are measured from.
    pub expected_value: Vec<f64>,
    pub explanation: ExplanationOutcome,
    /// Present only when the explanation is ranked.
    pub chart: Option<DonutChart>,
    pub tips: &'static HealthTips,
}

impl Assessment {
    /// `Probability of <class>: <p>` lines in class-code order.
    pub fn probability_lines(&self, decimals: usize) -> Vec<String> {
        self.prediction
            .class_probabilities()
            .map(|(status, p)| format!("Probability of {status}: {p:.decimals$}"))
            .collect()
    }
}

/// Run the whole pipeline for one patient.
///
/// Returns an error only for out-of-range or non-finite measurements.
pub fn assess(ctx: &ModelContext, features: &FeatureVector, options: &AssessOptions) -> Result<Assessment> {
    features.validate()?;

    let prediction = ctx.predict(features);
    let explainer = ctx.explainer();

    let row = [features.to_array()];
    let output = explainer.shap_values(aview2(&row), options.layout);
    let explanation = explain_outcome(output, prediction.class_index);

    let chart = match &explanation {
        ExplanationOutcome::Ranked { shares } => Some(DonutChart::from_shares(shares)),
        _ => None,
    };
    debug!(
        status = %prediction.status,
        layout = %options.layout,
        charted = chart.is_some(),
        "assessment complete"
    );

    Ok(Assessment {
        features: *features,
        expected_value: explainer.expected_value().to_vec(),
        tips: tips_for(prediction.status),
        prediction,
        explanation,
        chart,
    })
}

/// Turn explainer output for the first instance into an outcome, never failing.
pub fn explain_outcome(
    output: std::result::Result<AttributionOutput, ExplainError>,
    class: usize,
) -> ExplanationOutcome {
    let breakdown = output.and_then(|output| normalize_output(&output, 0, class, &Feature::short_names()));
    match breakdown {
        Ok(breakdown) => ExplanationOutcome::from_breakdown(breakdown),
        Err(err) => {
            warn!(error = %err, "explanation unavailable");
            ExplanationOutcome::failed(&err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{GlycoError, InputError};
    use crate::testing::{constant_context, sample_context};
    use crate::types::DiabetesStatus;
    use ndarray::array;

    #[test]
    fn default_patient_is_ranked_and_charted() {
        let ctx = sample_context();
        let assessment = assess(&ctx, &FeatureVector::default(), &AssessOptions::default()).unwrap();

        assert_eq!(assessment.prediction.status, DiabetesStatus::NonDiabetes);
        assert_eq!(assessment.tips, tips_for(DiabetesStatus::NonDiabetes));
        let shares = assessment.explanation.shares();
        assert_eq!(shares.len(), 5);
        let total: f64 = shares.iter().map(|s| s.percentage).sum();
        assert!((total - 100.0).abs() < 1e-9);
        assert!(assessment.explanation.message().is_none());
        assert_eq!(assessment.chart.as_ref().map(|c| c.slices.len()), Some(5));
    }

    #[test]
    fn layouts_agree() {
        let ctx = sample_context();
        let features = FeatureVector::new(180.0, 33.0, 60.0, 110.0, 112.0);
        let per_class = assess(&ctx, &features, &AssessOptions { layout: AttributionLayout::PerClass }).unwrap();
        let stacked = assess(&ctx, &features, &AssessOptions { layout: AttributionLayout::Stacked }).unwrap();
        assert_eq!(per_class.prediction.status, DiabetesStatus::Diabetes);
        assert_eq!(per_class.explanation, stacked.explanation);
    }

    #[test]
    fn constant_model_is_undetermined_without_chart() {
        let ctx = constant_context();
        let assessment = assess(&ctx, &FeatureVector::default(), &AssessOptions::default()).unwrap();
        assert_eq!(assessment.explanation.message(), Some(UNDETERMINED_MESSAGE));
        assert!(assessment.chart.is_none());
        assert_eq!(assessment.prediction.status, DiabetesStatus::NonDiabetes);
    }

    #[test]
    fn out_of_range_input_aborts() {
        let ctx = sample_context();
        let features = FeatureVector::new(100.0, 70.0, 50.0, 90.0, 100.0);
        let err = assess(&ctx, &features, &AssessOptions::default()).unwrap_err();
        assert!(matches!(err, GlycoError::Input(InputError::OutOfRange { .. })));
    }

    #[test]
    fn unreadable_output_becomes_failed_outcome() {
        // Two classes only, while the predicted class is the third.
        let output = AttributionOutput::PerClass(vec![
            array![[1.0, 0.0, 0.0, 0.0, 0.0]],
            array![[0.0, 1.0, 0.0, 0.0, 0.0]],
        ]);
        let outcome = explain_outcome(Ok(output), 2);
        assert!(matches!(outcome, ExplanationOutcome::Failed { .. }));
        assert!(outcome.shares().is_empty());
        assert!(outcome.message().unwrap().starts_with("Could not explain this prediction"));

        let outcome = explain_outcome(Err(ExplainError::unsupported("rank 4 tensor")), 0);
        assert_eq!(
            outcome.message(),
            Some("Could not explain this prediction: unsupported attribution shape: rank 4 tensor")
        );
    }

    #[test]
    fn probability_lines_use_requested_precision() {
        let ctx = sample_context();
        let assessment = assess(&ctx, &FeatureVector::default(), &AssessOptions::default()).unwrap();
        let lines = assessment.probability_lines(2);
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("Probability of Diabetes: 0."));
        assert!(lines[1].starts_with("Probability of Non-Diabetes: "));
        assert!(lines[2].starts_with("Probability of Pre-Diabetes: "));
        assert!(lines.iter().all(|l| l.rsplit(": ").next().map(str::len) == Some(4)));
    }

    #[test]
    fn outcome_serializes_with_kind_tag() {
        let outcome = ExplanationOutcome::Undetermined { message: UNDETERMINED_MESSAGE.into() };
        assert_eq!(
            serde_json::to_value(&outcome).unwrap(),
            serde_json::json!({ "kind": "undetermined", "message": UNDETERMINED_MESSAGE })
        );
    }
}
