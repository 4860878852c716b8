//! Criteria loader.
//!
//! YAML and JSON documents carry an optional `scale` and a `criteria` list.
//! CSV sources have a `criterion,weight[,name]` header and use the default scale.

use super::{csv_error, json_error, yaml_error, InputFormat};
use crate::core::{CriteriaSet, Criterion, Scale};
use crate::error::{EvalError, Result};
use serde::Deserialize;
use std::path::Path;
use tracing::debug;

#[derive(Debug, Deserialize)]
struct CriteriaDocument {
    #[serde(default)]
    scale: ScaleSpec,
    #[serde(default)]
    criteria: Vec<CriterionSpec>,
}

#[derive(Debug, Deserialize)]
struct ScaleSpec {
    #[serde(default = "default_scale_min")]
    min: f64,
    #[serde(default = "default_scale_max")]
    max: f64,
}

impl Default for ScaleSpec {
    fn default() -> Self {
        Self {
            min: default_scale_min(),
            max: default_scale_max(),
        }
    }
}

fn default_scale_min() -> f64 {
    Scale::default().min
}

fn default_scale_max() -> f64 {
    Scale::default().max
}

#[derive(Debug, Deserialize)]
struct CriterionSpec {
    #[serde(alias = "id")]
    criterion: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    weight: Option<f64>,
}

impl CriterionSpec {
    fn into_criterion(self) -> Result<Criterion> {
        let id = self.criterion.trim().to_string();
        let weight = self.weight.ok_or_else(|| {
            EvalError::criterion(id.as_str(), format!("criterion '{id}' has no weight"))
        })?;
        let name = self
            .name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| id.clone());
        Ok(Criterion::new(id, weight).with_name(name))
    }
}

/// Load and validate criteria from a file.
///
/// With `strict_weights` the weights must also sum to 1.0.
pub fn load_criteria(path: &Path, strict_weights: bool) -> Result<CriteriaSet> {
    let format = InputFormat::from_path(path)?;
    let contents = crate::io::read_file(path)?;
    let criteria = parse_criteria(&contents, format)
        .and_then(|set| {
            if strict_weights {
                set.require_unit_weight_sum()?;
            }
            Ok(set)
        })
        .map_err(|e| e.at_path(path))?;

    debug!(
        path = %path.display(),
        criteria = criteria.len(),
        total_weight = criteria.total_weight(),
        "Loaded criteria"
    );
    Ok(criteria)
}

/// Parse and validate criteria from text in the given format.
pub fn parse_criteria(contents: &str, format: InputFormat) -> Result<CriteriaSet> {
    let document = match format {
        InputFormat::Yaml => serde_yaml::from_str::<CriteriaDocument>(contents).map_err(yaml_error)?,
        InputFormat::Json => serde_json::from_str::<CriteriaDocument>(contents).map_err(json_error)?,
        InputFormat::Csv => read_csv_document(contents)?,
    };

    let criteria = document
        .criteria
        .into_iter()
        .map(CriterionSpec::into_criterion)
        .collect::<Result<Vec<_>>>()?;

    let scale = Scale::new(document.scale.min, document.scale.max)?;
    CriteriaSet::new(scale, criteria)
}

fn read_csv_document(contents: &str) -> Result<CriteriaDocument> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(contents.as_bytes());

    let criteria = reader
        .deserialize::<CriterionSpec>()
        .map(|row| row.map_err(csv_error))
        .collect::<Result<Vec<_>>>()?;

    Ok(CriteriaDocument {
        scale: ScaleSpec::default(),
        criteria,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use indoc::indoc;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::TempDir;

    const CRITERIA_YAML: &str = indoc! {"
        scale:
          min: 0
          max: 10
        criteria:
          - criterion: cost
            name: Cost
            weight: 0.5
          - id: usability
            weight: 0.3
          - criterion: support
            name: Vendor Support
            weight: 0.2
    "};

    #[test]
    fn test_parse_yaml_keeps_declaration_order() {
        let set = parse_criteria(CRITERIA_YAML, InputFormat::Yaml).unwrap();
        let ids: Vec<_> = set.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["cost", "usability", "support"]);
        assert_eq!(set.scale(), Scale::new(0.0, 10.0).unwrap());
        assert_eq!(set.get("usability").unwrap().name, "usability");
        assert_eq!(set.get("support").unwrap().name, "Vendor Support");
    }

    #[test]
    fn test_default_scale_when_omitted() {
        let set = parse_criteria(
            "criteria:\n  - criterion: cost\n    weight: 1.0\n",
            InputFormat::Yaml,
        )
        .unwrap();
        assert_eq!(set.scale(), Scale::default());
    }

    #[test]
    fn test_missing_weight_is_validation_error() {
        let err = parse_criteria(
            "criteria:\n  - criterion: cost\n  - criterion: support\n    weight: 1\n",
            InputFormat::Yaml,
        )
        .unwrap_err();
        assert!(err.is_validation());
        assert!(err.message().contains("'cost' has no weight"));
    }

    #[test]
    fn test_duplicate_criterion_rejected() {
        let err = parse_criteria(
            r#"{"criteria": [{"criterion": "cost", "weight": 0.5}, {"criterion": "cost", "weight": 0.5}]}"#,
            InputFormat::Json,
        )
        .unwrap_err();
        assert_eq!(err.code(), ErrorCode::VALIDATION_DUPLICATE);
    }

    #[test]
    fn test_malformed_yaml_is_validation_error() {
        let err = parse_criteria("criteria: [", InputFormat::Yaml).unwrap_err();
        assert_eq!(err.code(), ErrorCode::VALIDATION_MALFORMED);
    }

    #[test]
    fn test_parse_csv_criteria() {
        let set = parse_criteria(
            "criterion,weight,name\ncost,0.5,Cost\nsupport,0.5,\n",
            InputFormat::Csv,
        )
        .unwrap();
        assert_eq!(set.len(), 2);
        assert_eq!(set.get("support").unwrap().name, "support");
    }

    #[test]
    fn test_load_strict_weights_rejects_non_unit_sum() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("criteria.yaml");
        fs::write(
            &path,
            "criteria:\n  - criterion: cost\n    weight: 2\n  - criterion: support\n    weight: 1\n",
        )
        .unwrap();

        assert!(load_criteria(&path, false).is_ok());
        let err = load_criteria(&path, true).unwrap_err();
        assert!(err.message().contains("sum to 1.0"));
        assert_eq!(err.path(), Some(&path));
    }
}
