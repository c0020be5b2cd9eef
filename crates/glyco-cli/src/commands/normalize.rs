//! Rank attributions produced by an external explainer.

use anyhow::{Context, Result};
use colored::Colorize;
use glyco_core::chart::text_bars;
use glyco_core::contribution::{normalize_output, ContributionBreakdown};
use glyco_core::error::ExplainError;
use glyco_core::explain::{AttributionLayout, AttributionOutput};
use glyco_core::types::{DiabetesStatus, Feature, CLASS_COUNT};
use serde::Deserialize;
use std::path::Path;

const BAR_WIDTH: usize = 30;

/// Attribution export: `values` is nested `[class][instance][feature]` for
/// `per_class` and `[instance][class][feature]` for `stacked`.
#[derive(Debug, Clone, Deserialize)]
pub struct AttributionFile {
    #[serde(default)]
    pub layout: AttributionLayout,
    pub values: serde_json::Value,
    #[serde(default)]
    pub feature_names: Option<Vec<String>>,
}

impl AttributionFile {
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read attributions: {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse attributions: {}", path.display()))
    }

    /// Check the nesting depth, then build the typed output.
    pub fn output(&self) -> Result<AttributionOutput, ExplainError> {
        let depth = array_depth(&self.values);
        if depth != 3 {
            return Err(ExplainError::unsupported(format!(
                "expected a 3-dimensional array, got {depth} dimension(s)"
            )));
        }
        let nested: Vec<Vec<Vec<f64>>> = serde_json::from_value(self.values.clone())
            .map_err(|e| ExplainError::unsupported(e.to_string()))?;
        AttributionOutput::from_nested(self.layout, nested)
    }

    pub fn names(&self) -> Vec<String> {
        self.feature_names.clone().unwrap_or_else(Feature::short_names)
    }
}

/// Ranked shares for one class of an export.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassBreakdown {
    pub class: usize,
    /// Only set when the export has exactly the model's classes.
    pub status: Option<DiabetesStatus>,
    pub breakdown: ContributionBreakdown,
}

impl ClassBreakdown {
    pub fn heading(&self) -> String {
        match self.status {
            Some(status) => format!("Class {} ({status})", self.class),
            None => format!("Class {}", self.class),
        }
    }
}

/// Breakdown per requested class; every class when `class` is `None`.
pub fn breakdowns(
    file: &AttributionFile,
    class: Option<usize>,
    instance: usize,
) -> Result<Vec<ClassBreakdown>, ExplainError> {
    let output = file.output()?;
    let (_, n_classes, _) = output.shape()?;
    let names = file.names();
    let classes: Vec<usize> = match class {
        Some(c) => vec![c],
        None => (0..n_classes).collect(),
    };
    classes
        .into_iter()
        .map(|c| {
            let breakdown = normalize_output(&output, instance, c, &names)?;
            let status = if n_classes == CLASS_COUNT {
                DiabetesStatus::from_class_index(c)
            } else {
                None
            };
            Ok(ClassBreakdown { class: c, status, breakdown })
        })
        .collect()
}

pub fn run(path: &Path, class: Option<usize>, instance: usize) -> Result<()> {
    let file = AttributionFile::from_path(path)?;
    println!(
        "{} Ranking {} attributions from {}",
        "→".blue(),
        file.layout,
        path.display()
    );
    for result in breakdowns(&file, class, instance)? {
        println!();
        println!("{}", result.heading().blue().bold());
        match &result.breakdown {
            ContributionBreakdown::Ranked(shares) => {
                for bar in text_bars(shares, BAR_WIDTH) {
                    println!("  {bar}");
                }
            }
            ContributionBreakdown::Undetermined => {
                println!("  {}", glyco_core::contribution::UNDETERMINED_MESSAGE.yellow());
            }
        }
    }
    Ok(())
}

/// Nesting depth, following the first element at each level.
fn array_depth(value: &serde_json::Value) -> usize {
    match value {
        serde_json::Value::Array(items) => 1 + items.first().map(array_depth).unwrap_or(0),
        _ => 0,
    }
}
