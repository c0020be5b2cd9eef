//! Shared types: the feature order, input ranges and class labels.
//!
//! Both orders are a contract with the trained model. Permuting either one
//! produces wrong predictions without any error, so they live here as named
//! enumerations and are checked against the artifact when it is loaded.

use crate::error::InputError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of measurements the model consumes.
pub const FEATURE_COUNT: usize = 5;

/// Number of diabetes status categories.
pub const CLASS_COUNT: usize = 3;

/// One clinical measurement, in the order the classifier was trained on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Feature {
    /// Fasting blood sugar.
    FastingBloodSugar,
    /// Body mass index.
    BodyMassIndex,
    /// Age in years.
    Age,
    /// Waist circumference.
    WaistCircumference,
    /// Hip circumference.
    HipCircumference,
}

impl Feature {
    /// All features in model column order.
    pub const ALL: [Feature; FEATURE_COUNT] = [
        Feature::FastingBloodSugar,
        Feature::BodyMassIndex,
        Feature::Age,
        Feature::WaistCircumference,
        Feature::HipCircumference,
    ];

    /// Column name used by the training data and in explanation labels.
    pub fn short_name(self) -> &'static str {
        match self {
            Feature::FastingBloodSugar => "FBS",
            Feature::BodyMassIndex => "BMI",
            Feature::Age => "Age",
            Feature::WaistCircumference => "wc",
            Feature::HipCircumference => "Hc",
        }
    }

    /// Human-readable description for input controls.
    pub fn description(self) -> &'static str {
        match self {
            Feature::FastingBloodSugar => "Fasting Blood Sugar",
            Feature::BodyMassIndex => "Body Mass Index",
            Feature::Age => "Age",
            Feature::WaistCircumference => "Waist Circumference",
            Feature::HipCircumference => "Hip Circumference",
        }
    }

    /// Model column index.
    pub fn index(self) -> usize {
        Feature::ALL
            .iter()
            .position(|f| *f == self)
            .unwrap_or_default()
    }

    /// Accepted input range and default value.
    pub fn range(self) -> FeatureRange {
        match self {
            Feature::FastingBloodSugar => FeatureRange::continuous(50.0, 300.0, 100.0),
            Feature::BodyMassIndex => FeatureRange::continuous(15.0, 50.0, 25.0),
            Feature::Age => FeatureRange::integral(18.0, 100.0, 50.0),
            Feature::WaistCircumference => FeatureRange::continuous(50.0, 150.0, 90.0),
            Feature::HipCircumference => FeatureRange::continuous(70.0, 150.0, 100.0),
        }
    }

    /// Short names of all features in model order.
    pub fn short_names() -> Vec<String> {
        Feature::ALL.iter().map(|f| f.short_name().to_string()).collect()
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_name())
    }
}

/// Bounds and default of one input control.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureRange {
    pub min: f64,
    pub max: f64,
    pub default: f64,
    /// Whole numbers only (age).
    pub integral: bool,
}

impl FeatureRange {
    pub const fn continuous(min: f64, max: f64, default: f64) -> Self {
        Self { min, max, default, integral: false }
    }

    pub const fn integral(min: f64, max: f64, default: f64) -> Self {
        Self { min, max, default, integral: true }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    /// Check a value for `feature` against this range.
    pub fn check(&self, feature: Feature, value: f64) -> Result<(), InputError> {
        let field = feature.short_name().to_string();
        if !value.is_finite() {
            return Err(InputError::NotFinite { field });
        }
        if !self.contains(value) {
            return Err(InputError::OutOfRange {
                field,
                min: self.min,
                max: self.max,
                value,
            });
        }
        if self.integral && value.fract() != 0.0 {
            return Err(InputError::NotIntegral { field, value });
        }
        Ok(())
    }
}

/// The five measurements for one patient.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    pub fbs: f64,
    pub bmi: f64,
    pub age: f64,
    pub waist: f64,
    pub hip: f64,
}

impl FeatureVector {
    pub fn new(fbs: f64, bmi: f64, age: f64, waist: f64, hip: f64) -> Self {
        Self { fbs, bmi, age, waist, hip }
    }

    /// Value of one feature.
    pub fn get(&self, feature: Feature) -> f64 {
        match feature {
            Feature::FastingBloodSugar => self.fbs,
            Feature::BodyMassIndex => self.bmi,
            Feature::Age => self.age,
            Feature::WaistCircumference => self.waist,
            Feature::HipCircumference => self.hip,
        }
    }

    /// Values in model column order.
    pub fn to_array(&self) -> [f64; FEATURE_COUNT] {
        Feature::ALL.map(|f| self.get(f))
    }

    /// Check every measurement against its input range.
    pub fn validate(&self) -> Result<(), InputError> {
        for feature in Feature::ALL {
            feature.range().check(feature, self.get(feature))?;
        }
        Ok(())
    }
}

impl Default for FeatureVector {
    fn default() -> Self {
        let [fbs, bmi, age, waist, hip] = Feature::ALL.map(|f| f.range().default);
        Self { fbs, bmi, age, waist, hip }
    }
}

/// Predicted diabetes status. Variant order matches the model's class codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DiabetesStatus {
    #[serde(rename = "Diabetes")]
    Diabetes,
    #[serde(rename = "Non-Diabetes")]
    NonDiabetes,
    #[serde(rename = "Pre-Diabetes")]
    PreDiabetes,
}

impl DiabetesStatus {
    /// All categories in class-code order.
    pub const ALL: [DiabetesStatus; CLASS_COUNT] = [
        DiabetesStatus::Diabetes,
        DiabetesStatus::NonDiabetes,
        DiabetesStatus::PreDiabetes,
    ];

    pub fn from_class_index(index: usize) -> Option<Self> {
        DiabetesStatus::ALL.get(index).copied()
    }

    pub fn class_index(self) -> usize {
        match self {
            DiabetesStatus::Diabetes => 0,
            DiabetesStatus::NonDiabetes => 1,
            DiabetesStatus::PreDiabetes => 2,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DiabetesStatus::Diabetes => "Diabetes",
            DiabetesStatus::NonDiabetes => "Non-Diabetes",
            DiabetesStatus::PreDiabetes => "Pre-Diabetes",
        }
    }

    /// Exact label match.
    pub fn from_label(label: &str) -> Option<Self> {
        DiabetesStatus::ALL.into_iter().find(|s| s.label() == label)
    }

    /// Labels in class-code order.
    pub fn labels() -> Vec<String> {
        DiabetesStatus::ALL.iter().map(|s| s.label().to_string()).collect()
    }
}

impl fmt::Display for DiabetesStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Output of one inference call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub class_index: usize,
    pub status: DiabetesStatus,
    /// One probability per class, in class-code order.
    pub probabilities: Vec<f64>,
}

impl Prediction {
    /// `(status, probability)` pairs in class-code order.
    pub fn class_probabilities(&self) -> impl Iterator<Item = (DiabetesStatus, f64)> + '_ {
        DiabetesStatus::ALL
            .into_iter()
            .zip(self.probabilities.iter().copied())
    }
}
