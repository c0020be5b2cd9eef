//! Initialize a Glyco project directory.

use anyhow::{Context, Result};
use colored::Colorize;
use std::path::{Path, PathBuf};

use crate::config::{Config, CONFIG_FILE};

pub fn run(path: Option<String>) -> Result<()> {
    let base_path = match path {
        Some(p) => PathBuf::from(p),
        None => std::env::current_dir().context("Failed to read current directory")?,
    };

    println!("{} Initializing Glyco project...", "→".blue());
    let created = write_default_config(&base_path)?;
    let config_path = base_path.join(CONFIG_FILE);
    if created {
        println!("  {} Created {}", "✓".green(), config_path.display());
    } else {
        println!("  {} {} already exists", "•".yellow(), config_path.display());
    }

    println!();
    println!("{} Glyco project initialized!", "✓".green().bold());
    println!();
    println!("Next steps:");
    println!("  {} point [model] path at your exported random_forest_model.json", "1.".blue());
    println!("  {} glyco model", "2.".blue());
    println!("  {} glyco predict --fbs 126 --bmi 31.2 --age 54 --wc 104 --hc 108", "3.".blue());

    Ok(())
}

/// Write glyco.toml under `base`, leaving an existing one alone.
/// Returns whether a file was written.
pub fn write_default_config(base: &Path) -> Result<bool> {
    std::fs::create_dir_all(base)
        .with_context(|| format!("Failed to create {}", base.display()))?;
    let config_path = base.join(CONFIG_FILE);
    if config_path.exists() {
        return Ok(false);
    }
    Config::default().save(&config_path)?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_once_and_keeps_existing() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().join("project");

        assert!(write_default_config(&base).unwrap());
        let path = base.join(CONFIG_FILE);
        assert_eq!(Config::from_path(&path).unwrap().model, Config::default().model);

        std::fs::write(&path, "[display]\ncolor = false\n").unwrap();
        assert!(!write_default_config(&base).unwrap());
        assert!(!Config::from_path(&path).unwrap().display.color);
    }
}
