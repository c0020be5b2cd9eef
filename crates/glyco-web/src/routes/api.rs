//! REST API endpoints for prediction.

use crate::error::ApiResult;
use crate::state::AppState;
use axum::{extract::State, Json};
use glyco_core::assessment::{assess, AssessOptions, ExplanationOutcome};
use glyco_core::context::ModelSummary;
use glyco_core::guidance::{HealthTips, HEADING};
use glyco_core::types::{DiabetesStatus, Feature, FeatureVector};
use serde::{Deserialize, Serialize};

/// One input control.
#[derive(Debug, Serialize, Deserialize)]
pub struct FeatureSchema {
    pub name: String,
    pub description: String,
    pub min: f64,
    pub max: f64,
    pub default: f64,
    pub step: f64,
}

/// Schema response.
#[derive(Debug, Serialize, Deserialize)]
pub struct SchemaResponse {
    pub features: Vec<FeatureSchema>,
    pub classes: Vec<String>,
}

/// Input features with ranges, and class labels.
pub async fn get_schema() -> Json<SchemaResponse> {
    let features = Feature::ALL
        .iter()
        .map(|feature| {
            let range = feature.range();
            FeatureSchema {
                name: feature.short_name().to_string(),
                description: feature.description().to_string(),
                min: range.min,
                max: range.max,
                default: range.default,
                step: if range.integral { 1.0 } else { 0.1 },
            }
        })
        .collect();
    Json(SchemaResponse {
        features,
        classes: DiabetesStatus::labels(),
    })
}

/// Predict request body. Missing measurements take their defaults.
#[derive(Debug, Default, Deserialize)]
pub struct PredictRequest {
    #[serde(default, alias = "FBS")]
    pub fbs: Option<f64>,
    #[serde(default, alias = "BMI")]
    pub bmi: Option<f64>,
    #[serde(default, alias = "Age")]
    pub age: Option<f64>,
    #[serde(default)]
    pub wc: Option<f64>,
    #[serde(default, alias = "Hc")]
    pub hc: Option<f64>,
}

impl PredictRequest {
    fn features(&self) -> FeatureVector {
        let defaults = FeatureVector::default();
        FeatureVector::new(
            self.fbs.unwrap_or(defaults.fbs),
            self.bmi.unwrap_or(defaults.bmi),
            self.age.unwrap_or(defaults.age),
            self.wc.unwrap_or(defaults.waist),
            self.hc.unwrap_or(defaults.hip),
        )
    }
}

/// Probability of one class.
#[derive(Debug, Serialize)]
pub struct ClassProbability {
    pub class: DiabetesStatus,
    pub probability: f64,
    /// `Probability of <class>: <p>`
    pub text: String,
}

/// Predict response.
#[derive(Debug, Serialize)]
pub struct PredictResponse {
    pub status: DiabetesStatus,
    pub features: FeatureVector,
    pub probabilities: Vec<ClassProbability>,
    pub explanation: ExplanationOutcome,
    /// Donut chart, absent when the explanation is not ranked.
    pub chart_svg: Option<String>,
    pub tips_heading: &'static str,
    pub tips: &'static HealthTips,
}

/// Predict, explain and pick tips for one patient.
pub async fn predict(
    State(state): State<AppState>,
    Json(req): Json<PredictRequest>,
) -> ApiResult<Json<PredictResponse>> {
    let features = req.features();
    let options = AssessOptions { layout: state.layout };
    let assessment = assess(&state.ctx, &features, &options)?;

    let probabilities = assessment
        .prediction
        .class_probabilities()
        .zip(assessment.probability_lines(2))
        .map(|((class, probability), text)| ClassProbability { class, probability, text })
        .collect();

    Ok(Json(PredictResponse {
        status: assessment.prediction.status,
        features: assessment.features,
        probabilities,
        chart_svg: assessment.chart.as_ref().map(|chart| chart.to_svg()),
        explanation: assessment.explanation,
        tips_heading: HEADING,
        tips: assessment.tips,
    }))
}

/// Health response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub model: ModelSummary,
}

/// Liveness plus a model summary.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        model: state.ctx.summary(),
    })
}
