//! Configuration management for Glyco CLI.

use anyhow::{Context, Result};
use glyco_core::explain::AttributionLayout;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Name of the project config file.
pub const CONFIG_FILE: &str = "glyco.toml";

/// Glyco configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub model: ModelConfig,
    #[serde(default)]
    pub explain: ExplainConfig,
    #[serde(default)]
    pub display: DisplayConfig,
    /// File this config was read from.
    #[serde(skip)]
    pub source: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Model artifact; relative paths resolve against the config file.
    #[serde(default = "default_model_path")]
    pub path: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExplainConfig {
    #[serde(default)]
    pub layout: AttributionLayout,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayConfig {
    #[serde(default = "default_color")]
    pub color: bool,
    #[serde(default = "default_probability_decimals")]
    pub probability_decimals: usize,
}

// Default value functions
fn default_model_path() -> PathBuf { PathBuf::from("random_forest_model.json") }
fn default_color() -> bool { true }
fn default_probability_decimals() -> usize { 2 }

impl Default for Config {
    fn default() -> Self {
        Self {
            model: ModelConfig::default(),
            explain: ExplainConfig::default(),
            display: DisplayConfig::default(),
            source: None,
        }
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self { path: default_model_path() }
    }
}

impl Default for ExplainConfig {
    fn default() -> Self {
        Self { layout: AttributionLayout::default() }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            color: default_color(),
            probability_decimals: default_probability_decimals(),
        }
    }
}

impl Config {
    /// Load config from `explicit`, else glyco.toml in the current or parent
    /// directories, else the user config directory. Defaults when none exist.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(path) => Some(path.to_path_buf()),
            None => find_config_file().or_else(user_config_file),
        };
        match path {
            Some(path) => Self::from_path(&path),
            None => Ok(Config::default()),
        }
    }

    /// Read and parse one config file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        let mut config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config: {}", path.display()))?;
        config.source = Some(path.to_path_buf());
        Ok(config)
    }

    /// Save config to the specified path.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .context("Failed to serialize config")?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config: {}", path.display()))?;
        Ok(())
    }

    /// Generate default config as TOML string.
    pub fn default_toml() -> Result<String> {
        toml::to_string_pretty(&Config::default()).context("Failed to serialize config")
    }

    /// Model artifact to load: the CLI override as given, else the configured
    /// path relative to the config file's directory.
    pub fn model_path(&self, cli_override: Option<&Path>) -> PathBuf {
        if let Some(path) = cli_override {
            return path.to_path_buf();
        }
        match self.source.as_deref().and_then(Path::parent) {
            Some(dir) if self.model.path.is_relative() => dir.join(&self.model.path),
            _ => self.model.path.clone(),
        }
    }
}

/// Find glyco.toml in current or parent directories.
fn find_config_file() -> Option<PathBuf> {
    let dir = std::env::current_dir().ok()?;
    find_config_from(dir)
}

fn find_config_from(mut dir: PathBuf) -> Option<PathBuf> {
    loop {
        let config_path = dir.join(CONFIG_FILE);
        if config_path.exists() {
            return Some(config_path);
        }
        if !dir.pop() {
            break;
        }
    }
    None
}

/// `<config dir>/glyco/glyco.toml`, if present.
fn user_config_file() -> Option<PathBuf> {
    let path = dirs::config_dir()?.join("glyco").join(CONFIG_FILE);
    path.exists().then_some(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.model.path, PathBuf::from("random_forest_model.json"));
        assert_eq!(config.explain.layout, AttributionLayout::PerClass);
        assert!(config.display.color);
        assert_eq!(config.display.probability_decimals, 2);
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config: Config = toml::from_str(
            "[explain]\nlayout = \"stacked\"\n\n[display]\ncolor = false\n",
        )
        .unwrap();
        assert_eq!(config.explain.layout, AttributionLayout::Stacked);
        assert!(!config.display.color);
        assert_eq!(config.display.probability_decimals, 2);
        assert_eq!(config.model, ModelConfig::default());
    }

    #[test]
    fn unknown_layout_is_rejected() {
        assert!(toml::from_str::<Config>("[explain]\nlayout = \"flat\"\n").is_err());
    }

    #[test]
    fn default_toml_round_trips() {
        let text = Config::default_toml().unwrap();
        assert!(text.contains("[model]"));
        assert!(text.contains("layout = \"per_class\""));
        let parsed: Config = toml::from_str(&text).unwrap();
        assert_eq!(parsed, Config::default());
    }

    #[test]
    fn save_then_load_records_source() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        let mut config = Config::default();
        config.display.probability_decimals = 3;
        config.save(&path).unwrap();

        let loaded = Config::load(Some(&path)).unwrap();
        assert_eq!(loaded.display.probability_decimals, 3);
        assert_eq!(loaded.source.as_deref(), Some(path.as_path()));
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load(Some(&dir.path().join("nope.toml"))).unwrap_err();
        assert!(err.to_string().contains("Failed to read config"));
    }

    #[test]
    fn model_path_resolves_against_config_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, "[model]\npath = \"models/rf.json\"\n").unwrap();
        let config = Config::load(Some(&path)).unwrap();

        assert_eq!(config.model_path(None), dir.path().join("models/rf.json"));
        assert_eq!(
            config.model_path(Some(Path::new("other.json"))),
            PathBuf::from("other.json")
        );
        assert_eq!(
            Config::default().model_path(None),
            PathBuf::from("random_forest_model.json")
        );
    }

    #[test]
    fn config_is_found_in_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE), "").unwrap();
        assert_eq!(find_config_from(nested), Some(dir.path().join(CONFIG_FILE)));
    }
}
