//! Show a summary of the loaded model artifact.

use anyhow::Result;
use colored::Colorize;
use glyco_core::context::ModelContext;

pub fn run(ctx: &ModelContext) -> Result<()> {
    let summary = ctx.summary();

    println!("{}", "Glyco Model".white().bold());
    println!("{}", "═".repeat(40).dimmed());
    println!();

    println!("{}", "Artifact".blue().bold());
    println!(
        "  Source:            {}",
        summary.source.as_deref().unwrap_or("(in memory)").cyan()
    );
    println!("  Trees:             {}", summary.n_trees.to_string().cyan());
    println!("  Nodes:             {}", summary.n_nodes.to_string().cyan());
    println!("  Max depth:         {}", summary.max_depth.to_string().cyan());
    println!();

    println!("{}", "Features (model order)".blue().bold());
    println!("  {}", summary.features.join(", "));
    println!();

    println!("{}", "Expected Value".blue().bold());
    for (class, value) in summary.classes.iter().zip(&summary.expected_value) {
        println!("  {:<14} {:.4}", class, value);
    }

    println!();
    println!("{}", "═".repeat(40).dimmed());
    Ok(())
}
