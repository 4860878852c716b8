//! CLI command implementations.
//!
//! - **evaluate**: load inputs, aggregate, and write both reports
//! - **validate**: load inputs and aggregate without writing anything
//! - **init**: write a starter configuration with sample criteria and scores
//!
//! Every command resolves its settings the same way: explicit `--config` file or
//! the nearest `.tooleval.toml`, then command-line overrides on top.

pub mod evaluate;
pub mod init;
pub mod validate;

pub use evaluate::{handle_evaluate, EvaluateOutcome};
pub use init::init_project;
pub use validate::handle_validate;

use crate::aggregate::aggregate;
use crate::config::{load_config, EvalConfig, Overrides};
use crate::core::Evaluation;
use crate::error::Result;
use crate::loaders::{load_criteria, load_scores};
use std::path::Path;
use tracing::info_span;

/// Load the configuration and apply command-line overrides.
pub fn resolve_config(explicit: Option<&Path>, overrides: Overrides) -> Result<EvalConfig> {
    Ok(load_config(explicit)?.with_overrides(overrides))
}

/// Load criteria and scores and aggregate them. Stops at the first error.
pub fn load_evaluation(config: &EvalConfig) -> Result<Evaluation> {
    let criteria = {
        let _span = info_span!("load_criteria", path = %config.inputs.criteria.display()).entered();
        load_criteria(
            &config.inputs.criteria,
            config.scoring.require_unit_weight_sum,
        )?
    };
    let scores = {
        let _span = info_span!("load_scores", path = %config.inputs.scores.display()).entered();
        load_scores(&config.inputs.scores, &criteria)?
    };

    let _span = info_span!("aggregate").entered();
    aggregate(&criteria, &scores)
}
