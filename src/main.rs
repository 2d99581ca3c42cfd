use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use env_logger::Env;

use mermaid_check::complexity::{check_complexity, ComplexityReport, Level};
use mermaid_check::config::{Config, ThresholdOverrides};
use mermaid_check::output;
use mermaid_check::validation::validate_with;

/// Complexity scoring and validation for Mermaid diagrams
#[derive(Debug, Parser)]
#[command(name = "mermaid-check")]
#[command(version)]
struct Cli {
    /// Configuration file to use instead of the discovered ones
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Score a diagram and suggest how to simplify it
    Complexity {
        /// Diagram file, or `-` for stdin
        file: PathBuf,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,

        /// Simple complexity threshold (default: 25)
        #[arg(long)]
        simple: Option<u32>,

        /// Moderate complexity threshold (default: 40)
        #[arg(long)]
        moderate: Option<u32>,
    },
    /// Check a diagram for syntax problems
    Validate {
        /// Markdown or diagram file, or `-` for stdin
        file: PathBuf,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
}

fn read_input(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("Failed to read standard input")?;
        return Ok(text);
    }

    fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

fn display_name(path: &Path) -> String {
    if path == Path::new("-") {
        "<stdin>".to_string()
    } else {
        path.display().to_string()
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    let cwd = std::env::current_dir().context("Failed to determine working directory")?;
    let mut config = Config::load(cli.config.as_deref(), &cwd)?;

    match cli.command {
        Command::Complexity {
            file,
            json,
            simple,
            moderate,
        } => {
            config.apply_overrides(ThresholdOverrides::new(simple, moderate));
            let content = read_input(&file)?;

            let report = check_complexity(&content, &config.thresholds);
            let analysis = match &report {
                ComplexityReport::Analyzed(analysis) => analysis,
                ComplexityReport::Undetected { error, .. } => {
                    eprintln!("Error: {}", error);
                    return Ok(ExitCode::FAILURE);
                }
            };

            if json {
                println!("{}", output::to_json(&report)?);
            } else {
                println!("{}", output::render_complexity(analysis, &display_name(&file)));
            }

            Ok(if analysis.complexity.level == Level::Complex {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            })
        }
        Command::Validate { file, json } => {
            let content = read_input(&file)?;
            let result = validate_with(&content, &config.thresholds);

            if json {
                println!("{}", output::to_json(&result)?);
            } else {
                println!("{}", output::render_validation(&result, &display_name(&file)));
            }

            Ok(if result.valid {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
    }
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    env_logger::Builder::from_env(Env::default().default_filter_or(cli.log_level.as_str())).init();

    run(cli)
}
