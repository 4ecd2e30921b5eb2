//! Pipeline Configuration
//!
//! Layered as: built-in defaults, then an optional TOML file, then `LCP_*`
//! environment variables (nested keys joined by `__`, e.g.
//! `LCP_NORMALIZER__SEGMENT_LENGTH=1000`).

use config::{Config, ConfigError, Environment, File};
use curve_io::ColumnMapping;
use curve_normalizer::NormalizerConfig;
use feature_engine::FeatureBuilderConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Dataset locations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Raw curves, with `positive`/`negative` subdirectories
    pub raw_dir: PathBuf,
    /// Normalized curves, same layout
    pub processed_dir: PathBuf,
    /// Selected feature matrix
    pub features_path: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            raw_dir: PathBuf::from("data/raw"),
            processed_dir: PathBuf::from("data/processed"),
            features_path: PathBuf::from("data/features.csv"),
        }
    }
}

/// Complete pipeline configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub paths: PathsConfig,
    pub columns: ColumnMapping,
    pub normalizer: NormalizerConfig,
    pub features: FeatureBuilderConfig,
}

impl PipelineConfig {
    /// Load defaults, then `path` if given, then the environment
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder().add_source(Config::try_from(&PipelineConfig::default())?);

        if let Some(path) = path {
            builder = builder.add_source(File::from(path));
        }

        builder
            .add_source(
                Environment::with_prefix("LCP")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}
