use crate::config::{CONFIG_FILE_NAME, DEFAULT_CRITERIA_PATH, DEFAULT_SCORES_PATH};
use crate::io;
use anyhow::Result;
use std::path::{Path, PathBuf};

const DEFAULT_CONFIG: &str = r#"# tooleval configuration

[inputs]
criteria = "criteria.yaml"
scores = "scores.csv"

[output]
dir = "output"
structured_format = "json"   # json | csv
human_format = "markdown"    # markdown | text
precision = 3

[scoring]
# Reject criteria whose weights do not sum to 1.0
require_unit_weight_sum = false
"#;

const SAMPLE_CRITERIA: &str = r#"# Scores must fall inside the scale (inclusive).
scale:
  min: 1
  max: 5

criteria:
  - criterion: cost
    name: Cost
    weight: 0.5
  - criterion: usability
    name: Usability
    weight: 0.3
  - criterion: support
    name: Support
    weight: 0.2
"#;

const SAMPLE_SCORES: &str = "\
tool,cost,usability,support,notes
Acme Suite,4,5,3,Strong onboarding
Globex Platform,3,4,4,
Initech Cloud,5,2,3,Cheapest option
";

/// Write a starter configuration plus sample inputs into `dir`.
///
/// Refuses to overwrite any existing file unless `force` is set.
pub fn init_project(dir: &Path, force: bool) -> Result<Vec<PathBuf>> {
    let files = [
        (dir.join(CONFIG_FILE_NAME), DEFAULT_CONFIG),
        (dir.join(DEFAULT_CRITERIA_PATH), SAMPLE_CRITERIA),
        (dir.join(DEFAULT_SCORES_PATH), SAMPLE_SCORES),
    ];

    if !force {
        if let Some((existing, _)) = files.iter().find(|(path, _)| path.exists()) {
            anyhow::bail!(
                "{} already exists. Use --force to overwrite.",
                existing.display()
            );
        }
    }

    io::ensure_dir(dir)?;
    for (path, contents) in &files {
        io::write_file(path, contents)?;
        tracing::info!("Created {}", path.display());
    }

    Ok(files.into_iter().map(|(path, _)| path).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::evaluate::run_evaluation;
    use crate::config::{load_config_from, Overrides};
    use tempfile::TempDir;

    #[test]
    fn test_init_creates_runnable_project() {
        let temp_dir = TempDir::new().unwrap();
        let created = init_project(temp_dir.path(), false).unwrap();
        assert_eq!(created.len(), 3);

        let config = load_config_from(&temp_dir.path().join(CONFIG_FILE_NAME))
            .unwrap()
            .with_overrides(Overrides {
                criteria: Some(temp_dir.path().join(DEFAULT_CRITERIA_PATH)),
                scores: Some(temp_dir.path().join(DEFAULT_SCORES_PATH)),
                output_dir: Some(temp_dir.path().join("output")),
                ..Overrides::default()
            });
        let outcome = run_evaluation(&config).unwrap();
        let ranking: Vec<_> = outcome.evaluation.ranking().collect();
        assert_eq!(ranking, vec!["Acme Suite", "Initech Cloud", "Globex Platform"]);
    }

    #[test]
    fn test_init_refuses_to_overwrite() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join(DEFAULT_SCORES_PATH), "keep me").unwrap();

        let err = init_project(temp_dir.path(), false).unwrap_err();
        assert!(err.to_string().contains("--force"));
        assert_eq!(
            std::fs::read_to_string(temp_dir.path().join(DEFAULT_SCORES_PATH)).unwrap(),
            "keep me"
        );

        init_project(temp_dir.path(), true).unwrap();
        assert_ne!(
            std::fs::read_to_string(temp_dir.path().join(DEFAULT_SCORES_PATH)).unwrap(),
            "keep me"
        );
    }
}
