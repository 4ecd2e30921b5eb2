//! Light Curve Pipeline CLI
//!
//! `normalize` turns the raw per-class light curves into fixed-length
//! normalized curves; `features` builds the selected feature matrix from them.

mod commands;
mod config;

pub use crate::config::{PathsConfig, PipelineConfig};
pub use commands::{run_features, run_normalize};

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// Light curve normalization and feature extraction
#[derive(Debug, Parser)]
#[command(name = "lightcurve-pipeline", version, about)]
pub struct Cli {
    /// TOML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Pipeline stages
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Normalize every raw curve into the processed directory layout
    Normalize(NormalizeArgs),

    /// Extract and select features from the normalized curves
    Features(FeaturesArgs),

    /// Print the effective configuration as JSON
    ShowConfig,
}

/// Options for `normalize`
#[derive(Debug, Args)]
pub struct NormalizeArgs {
    /// Raw curve root (overrides config)
    #[arg(long)]
    pub raw_dir: Option<PathBuf>,

    /// Output root (overrides config)
    #[arg(long)]
    pub processed_dir: Option<PathBuf>,

    /// Rows per normalized curve (overrides config)
    #[arg(long)]
    pub segment_length: Option<usize>,

    /// Write the batch summary as JSON to this file
    #[arg(long)]
    pub summary: Option<PathBuf>,
}

/// Options for `features`
#[derive(Debug, Args)]
pub struct FeaturesArgs {
    /// Normalized curve root (overrides config)
    #[arg(long)]
    pub processed_dir: Option<PathBuf>,

    /// Feature matrix CSV (overrides config)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// False discovery rate for feature selection (overrides config)
    #[arg(long)]
    pub fdr_level: Option<f64>,
}

/// Initialize logging
pub fn init_logging(verbose: bool, json: bool) -> anyhow::Result<()> {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let builder = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true);

    let installed = if json {
        tracing::subscriber::set_global_default(builder.json().finish())
    } else {
        tracing::subscriber::set_global_default(builder.finish())
    };
    installed.context("Failed to set tracing subscriber")
}

/// Dispatch a parsed command line
pub fn run(cli: Cli) -> anyhow::Result<()> {
    let config = PipelineConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;

    match cli.command {
        Commands::Normalize(args) => run_normalize(config, args).map(|_| ()),
        Commands::Features(args) => run_features(config, args).map(|_| ()),
        Commands::ShowConfig => {
            println!("{}", serde_json::to_string_pretty(&config)?);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_normalize() {
        let cli = Cli::try_parse_from([
            "lightcurve-pipeline",
            "--verbose",
            "normalize",
            "--segment-length",
            "500",
            "--raw-dir",
            "/tmp/raw",
        ])
        .unwrap();

        assert!(cli.verbose);
        assert!(!cli.log_json);
        match cli.command {
            Commands::Normalize(args) => {
                assert_eq!(args.segment_length, Some(500));
                assert_eq!(args.raw_dir, Some(PathBuf::from("/tmp/raw")));
                assert!(args.summary.is_none());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_features_with_global_config() {
        let cli = Cli::try_parse_from([
            "lightcurve-pipeline",
            "features",
            "-o",
            "out.csv",
            "--config",
            "pipeline.toml",
            "--log-json",
        ])
        .unwrap();

        assert_eq!(cli.config, Some(PathBuf::from("pipeline.toml")));
        assert!(cli.log_json);
        assert!(matches!(
            cli.command,
            Commands::Features(FeaturesArgs { output: Some(_), .. })
        ));
    }
}
