//! Input loaders for criteria and score sources.
//!
//! The format of each source is picked from its file extension.

pub mod criteria;
pub mod scores;

pub use criteria::{load_criteria, parse_criteria};
pub use scores::{load_scores, parse_scores};

use crate::error::{EvalError, Result};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    Yaml,
    Json,
    Csv,
}

impl InputFormat {
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match extension.as_deref() {
            Some("yaml" | "yml") => Ok(Self::Yaml),
            Some("json") => Ok(Self::Json),
            Some("csv") => Ok(Self::Csv),
            _ => Err(EvalError::malformed(
                "unsupported input format, expected .yaml, .yml, .json or .csv",
                Some(path),
            )),
        }
    }
}

pub(crate) fn yaml_error(err: serde_yaml::Error) -> EvalError {
    EvalError::malformed(format!("invalid YAML: {err}"), None)
}

pub(crate) fn json_error(err: serde_json::Error) -> EvalError {
    EvalError::malformed(format!("invalid JSON: {err}"), None)
}

pub(crate) fn csv_error(err: csv::Error) -> EvalError {
    EvalError::malformed(format!("invalid CSV: {err}"), None)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_extension() {
        assert_eq!(
            InputFormat::from_path(Path::new("criteria.YAML")).unwrap(),
            InputFormat::Yaml
        );
        assert_eq!(
            InputFormat::from_path(Path::new("x/scores.csv")).unwrap(),
            InputFormat::Csv
        );
        assert_eq!(
            InputFormat::from_path(Path::new("scores.json")).unwrap(),
            InputFormat::Json
        );
        assert!(InputFormat::from_path(Path::new("scores.txt")).is_err());
    }
}
