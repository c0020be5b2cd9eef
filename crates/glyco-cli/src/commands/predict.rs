//! Predict diabetes status for one patient and explain it.

use anyhow::{Context, Result};
use colored::Colorize;
use glyco_core::assessment::{assess, AssessOptions, Assessment, ExplanationOutcome};
use glyco_core::chart::text_bars;
use glyco_core::context::ModelContext;
use glyco_core::explain::AttributionLayout;
use glyco_core::guidance::HEADING;
use glyco_core::types::{Feature, FeatureVector};
use std::path::PathBuf;

use crate::config::Config;

const BAR_WIDTH: usize = 30;

/// Measurements and output options; omitted measurements use range defaults.
#[derive(Debug, Clone, Default)]
pub struct PredictArgs {
    pub fbs: Option<f64>,
    pub bmi: Option<f64>,
    pub age: Option<f64>,
    pub wc: Option<f64>,
    pub hc: Option<f64>,
    pub json: bool,
    pub svg: Option<PathBuf>,
    pub layout: AttributionLayout,
}

impl PredictArgs {
    pub fn features(&self) -> FeatureVector {
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

pub fn run(ctx: &ModelContext, args: &PredictArgs, config: &Config) -> Result<()> {
    let features = args.features();
    let options = AssessOptions { layout: args.layout };
    let assessment = assess(ctx, &features, &options)?;

    if let Some(path) = &args.svg {
        match &assessment.chart {
            Some(chart) => {
                std::fs::write(path, chart.to_svg())
                    .with_context(|| format!("Failed to write chart: {}", path.display()))?;
                if !args.json {
                    println!("{} Chart written to {}", "✓".green(), path.display());
                }
            }
            None => eprintln!(
                "{} No chart to write: {}",
                "•".yellow(),
                assessment.explanation.message().unwrap_or("no contributions")
            ),
        }
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&assessment)?);
    } else {
        print!("{}", render(&assessment, config.display.probability_decimals));
    }
    Ok(())
}

/// Human-readable report.
pub fn render(assessment: &Assessment, decimals: usize) -> String {
    let mut out = String::new();
    let mut line = |s: String| {
        out.push_str(&s);
        out.push('\n');
    };

    line(format!("{}", "Measurements".blue().bold()));
    for feature in Feature::ALL {
        line(format!(
            "  {:<4} {:>7.1}  {}",
            feature.short_name(),
            assessment.features.get(feature),
            feature.description().dimmed()
        ));
    }
    line(String::new());

    line(format!(
        "{} {}",
        "Predicted Diabetes Status:".bold(),
        assessment.prediction.status.to_string().cyan().bold()
    ));
    line(String::new());

    line(format!("{}", "Class Probabilities".blue().bold()));
    for text in assessment.probability_lines(decimals) {
        line(format!("  {} {}", "•".yellow(), text));
    }
    line(String::new());

    line(format!("{}", "Feature Contributions".blue().bold()));
    match &assessment.explanation {
        ExplanationOutcome::Ranked { shares } => {
            for bar in text_bars(shares, BAR_WIDTH) {
                line(format!("  {bar}"));
            }
        }
        ExplanationOutcome::Undetermined { message } => line(format!("  {}", message.yellow())),
        ExplanationOutcome::Failed { message } => line(format!("  {}", message.red())),
    }
    line(String::new());

    line(format!("{}", HEADING.blue().bold()));
    line(format!("{}", assessment.tips.title.bold()));
    for (i, tip) in assessment.tips.tips.iter().enumerate() {
        line(format!("  {} {}", format!("{}.", i + 1).blue(), tip));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use glyco_core::testing::{constant_context, sample_context};

    fn plain() {
        colored::control::set_override(false);
    }

    #[test]
    fn omitted_measurements_use_defaults() {
        let args = PredictArgs { bmi: Some(31.2), ..Default::default() };
        assert_eq!(args.features(), FeatureVector::new(100.0, 31.2, 50.0, 90.0, 100.0));
    }

    #[test]
    fn report_lists_prediction_probabilities_and_tips() {
        plain();
        let ctx = sample_context();
        let assessment = assess(&ctx, &FeatureVector::default(), &AssessOptions::default()).unwrap();
        let report = render(&assessment, 2);

        assert!(report.contains("Predicted Diabetes Status: Non-Diabetes"));
        assert!(report.contains("• Probability of Diabetes: 0.18"));
        assert!(report.contains("• Probability of Non-Diabetes: 0.48"));
        assert!(report.contains("• Probability of Pre-Diabetes: 0.34"));
        assert!(report.contains("Health Tips (According to WHO)"));
        assert!(report.contains("Tips for maintaining Non-Diabetes status"));
        assert!(report.contains("  1. Continue healthy eating habits"));
    }

    #[test]
    fn undetermined_report_shows_message() {
        plain();
        let ctx = constant_context();
        let assessment = assess(&ctx, &FeatureVector::default(), &AssessOptions::default()).unwrap();
        let report = render(&assessment, 2);
        assert!(report.contains("Feature contributions could not be determined."));
    }

    #[test]
    fn svg_is_written_when_ranked() {
        plain();
        let dir = tempfile::tempdir().unwrap();
        let svg = dir.path().join("chart.svg");
        let args = PredictArgs { svg: Some(svg.clone()), json: true, ..Default::default() };
        run(&sample_context(), &args, &Config::default()).unwrap();

        let text = std::fs::read_to_string(&svg).unwrap();
        assert!(text.starts_with("<svg"));
    }

    #[test]
    fn out_of_range_measurement_is_an_error() {
        let args = PredictArgs { fbs: Some(20.0), ..Default::default() };
        let err = run(&sample_context(), &args, &Config::default()).unwrap_err();
        assert!(err.to_string().contains("FBS"), "{err}");
    }
}
