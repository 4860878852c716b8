use super::{load_evaluation, resolve_config};
use crate::config::Overrides;
use crate::core::Evaluation;
use anyhow::Result;
use std::path::Path;
use tracing::info;

/// Load and aggregate the inputs without writing any report.
pub fn handle_validate(config_path: Option<&Path>, overrides: Overrides) -> Result<Evaluation> {
    let config = resolve_config(config_path, overrides)?;
    let evaluation = load_evaluation(&config)?;
    info!(
        criteria = %config.inputs.criteria.display(),
        scores = %config.inputs.scores.display(),
        "Inputs are valid"
    );
    Ok(evaluation)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{EvalError, ErrorCode};
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn overrides(dir: &Path) -> Overrides {
        Overrides {
            criteria: Some(dir.join("criteria.yaml")),
            scores: Some(dir.join("scores.csv")),
            output_dir: Some(dir.join("output")),
            ..Overrides::default()
        }
    }

    #[test]
    fn test_validate_reports_unknown_criterion() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(
            temp_dir.path().join("criteria.yaml"),
            "criteria:\n  - criterion: cost\n    weight: 1\n",
        )
        .unwrap();
        fs::write(
            temp_dir.path().join("scores.csv"),
            "tool,cost,speed\nAcme,4,5\n",
        )
        .unwrap();

        let err = handle_validate(None, overrides(temp_dir.path())).unwrap_err();
        let eval_err = err.downcast_ref::<EvalError>().unwrap();
        assert_eq!(eval_err.code(), ErrorCode::VALIDATION_UNKNOWN_CRITERION);
        assert_eq!(
            eval_err.path(),
            Some(&temp_dir.path().join("scores.csv"))
        );
    }

    #[test]
    fn test_validate_writes_nothing() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(
            temp_dir.path().join("criteria.yaml"),
            "criteria:\n  - criterion: cost\n    weight: 1\n",
        )
        .unwrap();
        fs::write(temp_dir.path().join("scores.csv"), "tool,cost\nAcme,4\n").unwrap();

        let evaluation = handle_validate(None, overrides(temp_dir.path())).unwrap();
        assert_eq!(evaluation.results.len(), 1);
        assert!(!temp_dir.path().join("output").exists());
    }

    #[test]
    fn test_validate_missing_input_is_io_error() {
        let err = handle_validate(
            None,
            Overrides {
                criteria: Some(PathBuf::from("/nonexistent/criteria.yaml")),
                ..Overrides::default()
            },
        )
        .unwrap_err();
        let eval_err = err.downcast_ref::<EvalError>().unwrap();
        assert_eq!(eval_err.exit_code(), 1);
    }
}
