//! Configuration management for the Mermaid checker and language server.
//!
//! Handles:
//! - Command-line argument parsing for the language server
//! - Threshold files: explicit path, or user-global then project-local
//! - Command-line overrides on top of file settings

use anyhow::{Context, Result};
use clap::Parser;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::complexity::Thresholds;

/// File name searched for in the working directory and its ancestors
pub const PROJECT_CONFIG_FILE: &str = ".mermaid-check.toml";

/// Command-line arguments for the Mermaid language server
#[derive(Debug, Parser)]
#[command(name = "mermaid-ls")]
#[command(about = "Language server for Mermaid diagram files")]
#[command(version)]
pub struct Args {
    /// Configuration file to use instead of the discovered ones
    #[arg(long, help = "Path to a mermaid-check TOML configuration file")]
    pub config: Option<PathBuf>,

    /// Score below which a diagram is simple
    #[arg(long, help = "Simple complexity threshold (default: 25)")]
    pub simple: Option<u32>,

    /// Score below which a diagram is moderate
    #[arg(long, help = "Moderate complexity threshold (default: 40)")]
    pub moderate: Option<u32>,

    /// Log level for the language server
    #[arg(
        long,
        default_value = "info",
        help = "Log level (trace, debug, info, warn, error)"
    )]
    pub log_level: String,
}

/// On-disk configuration (TOML)
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    #[serde(default)]
    pub thresholds: ThresholdOverrides,
}

/// Optional threshold settings; zero counts as unset
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ThresholdOverrides {
    pub simple: Option<u32>,
    pub moderate: Option<u32>,
}

impl ThresholdOverrides {
    pub fn new(simple: Option<u32>, moderate: Option<u32>) -> Self {
        Self { simple, moderate }
    }

    fn apply(&self, thresholds: &mut Thresholds) {
        if let Some(simple) = self.simple.filter(|v| *v > 0) {
            thresholds.simple = simple;
        }
        if let Some(moderate) = self.moderate.filter(|v| *v > 0) {
            thresholds.moderate = moderate;
        }
    }
}

impl ConfigFile {
    /// Parse a configuration file
    pub fn from_path(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_toml(&text)
            .with_context(|| format!("Invalid config file {}", path.display()))
    }

    pub fn from_toml(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }
}

/// Combined configuration from all sources
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub thresholds: Thresholds,
    /// Files that contributed, in the order they were applied
    pub sources: Vec<PathBuf>,
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            thresholds: Thresholds::default(),
            sources: Vec::new(),
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// Create the language server configuration from parsed arguments
    pub fn from_args(args: Args) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to determine working directory")?;
        let mut config = Self::load(args.config.as_deref(), &cwd)?;
        config.apply_overrides(ThresholdOverrides::new(args.simple, args.moderate));
        config.log_level = args.log_level;
        Ok(config)
    }

    /// Load thresholds from `explicit`, or discover the user and project files
    pub fn load(explicit: Option<&Path>, start_dir: &Path) -> Result<Self> {
        match explicit {
            Some(path) => Self::from_files(&[path.to_path_buf()]),
            None => {
                let mut files = Vec::new();
                if let Some(user) = user_config_path().filter(|p| p.is_file()) {
                    files.push(user);
                }
                if let Some(project) = find_project_config(start_dir) {
                    files.push(project);
                }
                Self::from_files(&files)
            }
        }
    }

    /// Apply configuration files in order; later files win per key
    pub fn from_files(files: &[PathBuf]) -> Result<Self> {
        let mut config = Config::default();

        for path in files {
            let file = ConfigFile::from_path(path)?;
            file.thresholds.apply(&mut config.thresholds);
            config.sources.push(path.clone());
            log::debug!("loaded configuration from {}", path.display());
        }

        config.warn_if_inverted();
        Ok(config)
    }

    /// Command-line threshold flags take precedence over every file
    pub fn apply_overrides(&mut self, overrides: ThresholdOverrides) {
        overrides.apply(&mut self.thresholds);
        self.warn_if_inverted();
    }

    fn warn_if_inverted(&self) {
        if self.thresholds.moderate <= self.thresholds.simple {
            log::warn!(
                "moderate threshold ({}) should exceed simple threshold ({})",
                self.thresholds.moderate,
                self.thresholds.simple
            );
        }
    }
}

/// `<config dir>/mermaid-check/config.toml`
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("mermaid-check").join("config.toml"))
}

/// Nearest [`PROJECT_CONFIG_FILE`] in `start` or one of its ancestors
pub fn find_project_config(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .map(|dir| dir.join(PROJECT_CONFIG_FILE))
        .find(|candidate| candidate.is_file())
}
