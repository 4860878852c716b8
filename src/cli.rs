use crate::config::Overrides;
use crate::output::{HumanFormat, StructuredFormat};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "tooleval")]
#[command(about = "Score tools against weighted evaluation criteria", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Score every tool and write the structured and readable reports
    Evaluate {
        #[command(flatten)]
        inputs: InputArgs,

        /// Directory the reports are written to
        #[arg(short, long = "output-dir")]
        output_dir: Option<PathBuf>,

        /// Machine-readable report format
        #[arg(long = "structured-format", value_enum)]
        structured_format: Option<StructuredFormat>,

        /// Human-readable report format
        #[arg(long = "human-format", value_enum)]
        human_format: Option<HumanFormat>,
    },

    /// Check criteria and scores without writing any report
    Validate {
        #[command(flatten)]
        inputs: InputArgs,
    },

    /// Create a starter configuration, criteria and scores
    Init {
        /// Force overwrite existing files
        #[arg(short, long)]
        force: bool,
    },
}

#[derive(Args, Debug, Clone, Default)]
pub struct InputArgs {
    /// Criteria and weights file (.yaml, .yml, .json or .csv)
    #[arg(long)]
    pub criteria: Option<PathBuf>,

    /// Tool scores file (.csv, .yaml, .yml or .json)
    #[arg(long)]
    pub scores: Option<PathBuf>,

    /// Require criteria weights to sum to 1.0
    #[arg(long = "strict-weights")]
    pub strict_weights: bool,

    /// Configuration file (defaults to the nearest .tooleval.toml)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (can be repeated: -v, -vv, -vvv)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbosity: u8,
}

impl InputArgs {
    pub fn overrides(&self) -> Overrides {
        Overrides {
            criteria: self.criteria.clone(),
            scores: self.scores.clone(),
            strict_weights: self.strict_weights,
            ..Overrides::default()
        }
    }
}
