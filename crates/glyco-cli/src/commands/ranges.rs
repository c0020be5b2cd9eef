//! List accepted input ranges and defaults.

use anyhow::Result;
use colored::Colorize;
use glyco_core::types::Feature;

pub fn run() -> Result<()> {
    println!("{}", "Input Ranges".blue().bold());
    for line in range_lines() {
        println!("  {line}");
    }
    Ok(())
}

/// One line per feature in model order.
pub fn range_lines() -> Vec<String> {
    Feature::ALL
        .iter()
        .map(|feature| {
            let range = feature.range();
            let kind = if range.integral { "whole number" } else { "decimal" };
            format!(
                "{:<4} {:<20} {:>6.1} - {:<6.1} default {:<6.1} ({kind})",
                feature.short_name(),
                feature.description(),
                range.min,
                range.max,
                range.default
            )
        })
        .collect()
}
