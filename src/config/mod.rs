//! Configuration for evaluation runs.
//!
//! Settings come from three layers, highest precedence first: command-line
//! flags, a `.tooleval.toml` file, then built-in defaults.

pub mod loader;

pub use loader::{load_config, load_config_from, parse_config, CONFIG_FILE_NAME};

use crate::output::{HumanFormat, StructuredFormat};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_CRITERIA_PATH: &str = "criteria.yaml";
pub const DEFAULT_SCORES_PATH: &str = "scores.csv";
pub const DEFAULT_OUTPUT_DIR: &str = "output";
pub const DEFAULT_PRECISION: usize = 3;

/// Root of `.tooleval.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EvalConfig {
    #[serde(default)]
    pub inputs: InputsConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub scoring: ScoringConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InputsConfig {
    #[serde(default = "default_criteria_path")]
    pub criteria: PathBuf,
    #[serde(default = "default_scores_path")]
    pub scores: PathBuf,
}

impl Default for InputsConfig {
    fn default() -> Self {
        Self {
            criteria: default_criteria_path(),
            scores: default_scores_path(),
        }
    }
}

fn default_criteria_path() -> PathBuf {
    PathBuf::from(DEFAULT_CRITERIA_PATH)
}

fn default_scores_path() -> PathBuf {
    PathBuf::from(DEFAULT_SCORES_PATH)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    #[serde(default = "default_output_dir")]
    pub dir: PathBuf,
    #[serde(default)]
    pub structured_format: StructuredFormat,
    #[serde(default)]
    pub human_format: HumanFormat,
    /// Decimal places for totals and scores.
    #[serde(default = "default_precision")]
    pub precision: usize,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
            structured_format: StructuredFormat::default(),
            human_format: HumanFormat::default(),
            precision: default_precision(),
        }
    }
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(DEFAULT_OUTPUT_DIR)
}

fn default_precision() -> usize {
    DEFAULT_PRECISION
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScoringConfig {
    /// Reject criteria whose weights do not sum to 1.0.
    #[serde(default)]
    pub require_unit_weight_sum: bool,
}

/// Command-line values that override the configuration file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub criteria: Option<PathBuf>,
    pub scores: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub structured_format: Option<StructuredFormat>,
    pub human_format: Option<HumanFormat>,
    pub strict_weights: bool,
}

impl EvalConfig {
    /// Resolve relative input and output paths against `base` (pure).
    ///
    /// Paths written in a config file are relative to that file's directory.
    pub fn relative_to(mut self, base: &Path) -> Self {
        self.inputs.criteria = base.join(&self.inputs.criteria);
        self.inputs.scores = base.join(&self.inputs.scores);
        self.output.dir = base.join(&self.output.dir);
        self
    }

    /// Apply command-line overrides on top of this configuration (pure).
    pub fn with_overrides(mut self, overrides: Overrides) -> Self {
        if let Some(criteria) = overrides.criteria {
            self.inputs.criteria = criteria;
        }
        if let Some(scores) = overrides.scores {
            self.inputs.scores = scores;
        }
        if let Some(dir) = overrides.output_dir {
            self.output.dir = dir;
        }
        if let Some(format) = overrides.structured_format {
            self.output.structured_format = format;
        }
        if let Some(format) = overrides.human_format {
            self.output.human_format = format;
        }
        self.scoring.require_unit_weight_sum |= overrides.strict_weights;
        self
    }
}
