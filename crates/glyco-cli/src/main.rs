//! Glyco CLI - Diabetes status prediction from the command line.

mod commands;
mod config;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use glyco_core::context::ModelContext;
use glyco_core::explain::AttributionLayout;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use crate::config::Config;

#[derive(Parser)]
#[command(name = "glyco")]
#[command(author, version, about = "Glyco - Diabetes status prediction with per-feature explanations", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Model artifact (overrides the config file)
    #[arg(long, global = true)]
    model: Option<PathBuf>,

    /// Config file (default: glyco.toml in the current or parent directories)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default glyco.toml
    Init {
        /// Project directory (default: current directory)
        #[arg(short, long)]
        path: Option<String>,
    },

    /// Predict diabetes status and explain the prediction
    Predict {
        /// Fasting blood sugar, mg/dL
        #[arg(long)]
        fbs: Option<f64>,

        /// Body mass index
        #[arg(long)]
        bmi: Option<f64>,

        /// Age, years
        #[arg(long)]
        age: Option<f64>,

        /// Waist circumference, cm
        #[arg(long)]
        wc: Option<f64>,

        /// Hip circumference, cm
        #[arg(long)]
        hc: Option<f64>,

        /// Print the assessment as JSON
        #[arg(long)]
        json: bool,

        /// Write the contribution chart to an SVG file
        #[arg(long)]
        svg: Option<PathBuf>,

        /// Attribution layout the explainer emits (per-class or stacked)
        #[arg(long)]
        layout: Option<AttributionLayout>,
    },

    /// Rank attributions exported by another explainer
    Normalize {
        /// JSON file with "layout", "values" and optional "feature_names"
        file: PathBuf,

        /// Class to rank (default: every class)
        #[arg(long)]
        class: Option<usize>,

        /// Instance to rank
        #[arg(long, default_value = "0")]
        instance: usize,
    },

    /// Show a summary of the model artifact
    Model,

    /// List input ranges and defaults
    Ranges,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = Config::load(cli.config.as_deref())?;
    tracing::debug!(source = ?config.source, "config loaded");
    if !config.display.color {
        colored::control::set_override(false);
    }

    match cli.command {
        Commands::Init { path } => commands::init::run(path),
        Commands::Predict { fbs, bmi, age, wc, hc, json, svg, layout } => {
            let ctx = load_model(&config.model_path(cli.model.as_deref()))?;
            let args = commands::predict::PredictArgs {
                fbs,
                bmi,
                age,
                wc,
                hc,
                json,
                svg,
                layout: layout.unwrap_or(config.explain.layout),
            };
            commands::predict::run(&ctx, &args, &config)
        }
        Commands::Normalize { file, class, instance } => {
            commands::normalize::run(&file, class, instance)
        }
        Commands::Model => {
            let ctx = load_model(&config.model_path(cli.model.as_deref()))?;
            commands::model::run(&ctx)
        }
        Commands::Ranges => commands::ranges::run(),
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("glyco=debug,glyco_core=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_model(path: &Path) -> Result<ModelContext> {
    ModelContext::load(path)
        .with_context(|| format!("Failed to load model: {}", path.display()))
}
