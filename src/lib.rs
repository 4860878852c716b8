// Export modules for library usage
pub mod aggregate;
pub mod cli;
pub mod commands;
pub mod config;
pub mod core;
pub mod error;
pub mod io;
pub mod loaders;
pub mod observability;
pub mod output;

// Re-export commonly used types
pub use crate::core::{
    AggregateResult, CriteriaSet, Criterion, CriterionContribution, Evaluation, Scale, ScoreTable,
    ToolScores,
};

pub use crate::aggregate::{aggregate, rank_results, ranking_key, score_tool};
pub use crate::config::{EvalConfig, Overrides};
pub use crate::error::{ErrorCode, EvalError, Result};
pub use crate::loaders::{load_criteria, load_scores, parse_criteria, parse_scores, InputFormat};
pub use crate::output::{
    render_human, render_structured, write_reports, HumanFormat, OutputWriter, ReportPaths,
    StructuredFormat,
};
