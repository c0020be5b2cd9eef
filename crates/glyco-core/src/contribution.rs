//! Contribution normalizer: attributions to ranked percentage shares.
//!
//! Only the magnitude of each feature's influence is shown, so signs are
//! dropped before computing shares of the total.

use crate::error::ExplainError;
use crate::explain::AttributionOutput;
use serde::{Deserialize, Serialize};

/// Message shown when every attribution is zero.
pub const UNDETERMINED_MESSAGE: &str = "Feature contributions could not be determined.";

/// One feature's share of the total absolute attribution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContributionShare {
    pub feature: String,
    /// Percentage in `[0, 100]`.
    pub percentage: f64,
}

impl ContributionShare {
    /// Display label, e.g. `BMI (60.0%)`.
    pub fn label(&self) -> String {
        format!("{} ({:.1}%)", self.feature, self.percentage)
    }
}

/// Result of normalizing one attribution vector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "shares", rename_all = "snake_case")]
pub enum ContributionBreakdown {
    /// Shares sorted by percentage, descending; they sum to 100.
    Ranked(Vec<ContributionShare>),
    /// Total absolute attribution was zero.
    Undetermined,
}

impl ContributionBreakdown {
    /// Ranked shares, empty when undetermined.
    pub fn shares(&self) -> &[ContributionShare] {
        match self {
            ContributionBreakdown::Ranked(shares) => shares,
            ContributionBreakdown::Undetermined => &[],
        }
    }

    pub fn is_determined(&self) -> bool {
        matches!(self, ContributionBreakdown::Ranked(_))
    }

    /// Display labels in rank order.
    pub fn labels(&self) -> Vec<String> {
        self.shares().iter().map(ContributionShare::label).collect()
    }
}

/// Rank `attributions` (one per entry of `names`) by share of the total
/// absolute attribution.
///
/// Ties keep their input order.
pub fn normalize<S: AsRef<str>>(
    attributions: &[f64],
    names: &[S],
) -> Result<ContributionBreakdown, ExplainError> {
    if attributions.len() != names.len() {
        return Err(ExplainError::LengthMismatch {
            attributions: attributions.len(),
            names: names.len(),
        });
    }

    if attributions.iter().any(|a| !a.is_finite()) {
        return Err(ExplainError::NonFinite);
    }

    let mut magnitudes: Vec<f64> = attributions.iter().map(|a| a.abs()).collect();
    let mut total: f64 = magnitudes.iter().sum();
    if total == 0.0 {
        return Ok(ContributionBreakdown::Undetermined);
    }
    if total.is_infinite() {
        // Finite values near f64::MAX overflow the sum; rescale to at most 1.
        let max_abs = magnitudes.iter().copied().fold(0.0_f64, f64::max);
        magnitudes.iter_mut().for_each(|m| *m /= max_abs);
        total = magnitudes.iter().sum();
    }

    let mut shares: Vec<ContributionShare> = names
        .iter()
        .zip(&magnitudes)
        .map(|(name, m)| ContributionShare {
            feature: name.as_ref().to_string(),
            percentage: m / total * 100.0,
        })
        .collect();

    // sort_by is stable
    shares.sort_by(|a, b| b.percentage.total_cmp(&a.percentage));
    Ok(ContributionBreakdown::Ranked(shares))
}

/// Pick the vector for `class` of `instance` out of an explainer's output and
/// normalize it.
pub fn normalize_output<S: AsRef<str>>(
    output: &AttributionOutput,
    instance: usize,
    class: usize,
    names: &[S],
) -> Result<ContributionBreakdown, ExplainError> {
    let attributions = output.for_class(instance, class)?;
    normalize(&attributions, names)
}
