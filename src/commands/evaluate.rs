use super::{load_evaluation, resolve_config};
use crate::config::{EvalConfig, Overrides};
use crate::core::Evaluation;
use crate::output::{write_reports, ReportPaths};
use anyhow::Result;
use std::path::Path;

#[derive(Debug)]
pub struct EvaluateOutcome {
    pub evaluation: Evaluation,
    pub reports: ReportPaths,
}

pub fn handle_evaluate(config_path: Option<&Path>, overrides: Overrides) -> Result<EvaluateOutcome> {
    let config = resolve_config(config_path, overrides)?;
    run_evaluation(&config)
}

/// Run one evaluation with fully resolved settings.
///
/// Reports are only written once loading and aggregation have succeeded.
pub fn run_evaluation(config: &EvalConfig) -> Result<EvaluateOutcome> {
    let evaluation = load_evaluation(config)?;
    let reports = write_reports(&evaluation, &config.output)?;
    Ok(EvaluateOutcome {
        evaluation,
        reports,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EvalError;
    use indoc::indoc;
    use std::fs;
    use tempfile::TempDir;

    fn write_inputs(dir: &Path, scores: &str) -> EvalConfig {
        let criteria_path = dir.join("criteria.yaml");
        let scores_path = dir.join("scores.csv");
        fs::write(
            &criteria_path,
            indoc! {"
                criteria:
                  - criterion: cost
                    weight: 0.5
                  - criterion: usability
                    weight: 0.3
                  - criterion: support
                    weight: 0.2
            "},
        )
        .unwrap();
        fs::write(&scores_path, scores).unwrap();

        EvalConfig::default().with_overrides(Overrides {
            criteria: Some(criteria_path),
            scores: Some(scores_path),
            output_dir: Some(dir.join("output")),
            ..Overrides::default()
        })
    }

    #[test]
    fn test_run_evaluation_writes_both_reports() {
        let temp_dir = TempDir::new().unwrap();
        let config = write_inputs(
            temp_dir.path(),
            "tool,cost,usability,support\nGlobex,3,4,4\nAcme,4,5,3\n",
        );

        let outcome = run_evaluation(&config).unwrap();
        let ranking: Vec<_> = outcome.evaluation.ranking().collect();
        assert_eq!(ranking, vec!["Acme", "Globex"]);
        assert!(outcome.reports.structured.ends_with("output/results.json"));
        assert!(outcome.reports.human.is_file());
    }

    #[test]
    fn test_invalid_scores_leave_no_reports() {
        let temp_dir = TempDir::new().unwrap();
        let config = write_inputs(temp_dir.path(), "tool,cost,usability\nAcme,4,5\n");

        let err = run_evaluation(&config).unwrap_err();
        let eval_err = err.downcast_ref::<EvalError>().unwrap();
        assert!(eval_err.is_validation());
        assert!(!temp_dir.path().join("output").exists());
    }
}
