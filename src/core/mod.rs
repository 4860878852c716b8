//! Evaluation data model.
//!
//! Criteria keep their declaration order for the whole run: aggregation sums
//! in that order and reports list breakdowns in that order.

use crate::error::{EvalError, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// Tolerance used when weights are required to sum to exactly 1.0.
pub const UNIT_WEIGHT_TOLERANCE: f64 = 1e-5;

/// Round to a fixed number of decimal places.
pub fn round_to(value: f64, precision: usize) -> f64 {
    let factor = 10f64.powi(precision as i32);
    (value * factor).round() / factor
}

/// Inclusive range valid scores must fall into.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Scale {
    pub min: f64,
    pub max: f64,
}

impl Default for Scale {
    fn default() -> Self {
        Self { min: 1.0, max: 5.0 }
    }
}

impl Scale {
    pub fn new(min: f64, max: f64) -> Result<Self> {
        if !min.is_finite() || !max.is_finite() {
            return Err(EvalError::validation(format!(
                "scale bounds must be finite numbers, got {min}..={max}"
            )));
        }
        if min >= max {
            return Err(EvalError::validation(format!(
                "scale minimum {min} must be below maximum {max}"
            )));
        }
        Ok(Self { min, max })
    }

    pub fn contains(&self, score: f64) -> bool {
        (self.min..=self.max).contains(&score)
    }
}

/// A named dimension of evaluation with its weight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Criterion {
    #[serde(rename = "criterion")]
    pub id: String,
    pub name: String,
    pub weight: f64,
}

impl Criterion {
    pub fn new(id: impl Into<String>, weight: f64) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            weight,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}

/// Validated criteria in declaration order, plus the score scale.
#[derive(Debug, Clone, PartialEq)]
pub struct CriteriaSet {
    scale: Scale,
    criteria: Vec<Criterion>,
}

impl CriteriaSet {
    /// Build a criteria set, rejecting empty, duplicate, negative or all-zero weights.
    pub fn new(scale: Scale, criteria: Vec<Criterion>) -> Result<Self> {
        let scale = Scale::new(scale.min, scale.max)?;

        if criteria.is_empty() {
            return Err(EvalError::with_code(
                crate::error::ErrorCode::VALIDATION_CRITERION,
                "no criteria defined",
            ));
        }

        let mut seen = HashSet::new();
        for criterion in &criteria {
            validate_criterion(criterion)?;
            if !seen.insert(criterion.id.as_str()) {
                return Err(EvalError::duplicate("criterion", &criterion.id)
                    .for_criterion(criterion.id.as_str()));
            }
        }

        let set = Self { scale, criteria };
        if set.total_weight() <= 0.0 {
            return Err(EvalError::with_code(
                crate::error::ErrorCode::VALIDATION_CRITERION,
                "at least one criterion must carry a positive weight",
            ));
        }
        Ok(set)
    }

    pub fn scale(&self) -> Scale {
        self.scale
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Criterion> {
        self.criteria.iter()
    }

    pub fn as_slice(&self) -> &[Criterion] {
        &self.criteria
    }

    pub fn len(&self) -> usize {
        self.criteria.len()
    }

    pub fn is_empty(&self) -> bool {
        self.criteria.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Criterion> {
        self.criteria.iter().find(|c| c.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Sum of weights, accumulated in declaration order.
    pub fn total_weight(&self) -> f64 {
        self.criteria.iter().map(|c| c.weight).sum()
    }

    /// Reject weight sets that do not sum to 1.0.
    pub fn require_unit_weight_sum(&self) -> Result<()> {
        let total = self.total_weight();
        if (total - 1.0).abs() > UNIT_WEIGHT_TOLERANCE {
            return Err(EvalError::with_code(
                crate::error::ErrorCode::VALIDATION_CRITERION,
                format!("criteria weights must sum to 1.0, but sum to {total:.6}"),
            ));
        }
        Ok(())
    }
}

fn validate_criterion(criterion: &Criterion) -> Result<()> {
    if criterion.id.trim().is_empty() {
        return Err(EvalError::criterion("", "criterion identifier must not be empty"));
    }
    if !criterion.weight.is_finite() {
        return Err(EvalError::criterion(
            criterion.id.as_str(),
            format!(
                "criterion '{}' has a non-finite weight {}",
                criterion.id, criterion.weight
            ),
        ));
    }
    if criterion.weight < 0.0 {
        return Err(EvalError::criterion(
            criterion.id.as_str(),
            format!(
                "criterion '{}' has negative weight {}",
                criterion.id, criterion.weight
            ),
        ));
    }
    Ok(())
}

/// Raw scores for a single tool.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ToolScores {
    pub tool: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub scores: BTreeMap<String, f64>,
}

impl ToolScores {
    pub fn new(tool: impl Into<String>) -> Self {
        Self {
            tool: tool.into(),
            ..Self::default()
        }
    }

    pub fn with_score(mut self, criterion: impl Into<String>, score: f64) -> Self {
        self.scores.insert(criterion.into(), score);
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }

    pub fn score(&self, criterion: &str) -> Option<f64> {
        self.scores.get(criterion).copied()
    }
}

/// Scores for every tool, in input order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ScoreTable {
    tools: Vec<ToolScores>,
}

impl ScoreTable {
    pub fn new(tools: Vec<ToolScores>) -> Self {
        Self { tools }
    }

    pub fn tools(&self) -> &[ToolScores] {
        &self.tools
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Check the table against the criteria.
    ///
    /// Every tool must be named once and score every defined criterion inside
    /// the scale; scores for undefined criteria are rejected.
    pub fn validate(&self, criteria: &CriteriaSet) -> Result<()> {
        if self.tools.is_empty() {
            return Err(EvalError::validation("no tool scores found"));
        }

        let scale = criteria.scale();
        let mut seen = HashSet::new();
        for entry in &self.tools {
            if entry.tool.trim().is_empty() {
                return Err(EvalError::validation("tool name must not be empty"));
            }
            if !seen.insert(entry.tool.as_str()) {
                return Err(EvalError::duplicate("tool", &entry.tool).for_tool(entry.tool.as_str()));
            }
            if let Some(unknown) = entry.scores.keys().find(|id| !criteria.contains(id)) {
                return Err(EvalError::unknown_criterion(&entry.tool, unknown));
            }
            for criterion in criteria.iter() {
                let score = entry
                    .score(&criterion.id)
                    .ok_or_else(|| EvalError::missing_score(&entry.tool, &criterion.id))?;
                if !score.is_finite() || !scale.contains(score) {
                    return Err(EvalError::out_of_range(
                        &entry.tool,
                        &criterion.id,
                        score,
                        scale.min,
                        scale.max,
                    ));
                }
            }
        }
        Ok(())
    }
}

/// One criterion's share of a tool's total.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CriterionContribution {
    pub criterion: String,
    pub weight: f64,
    pub score: f64,
    pub contribution: f64,
}

/// Weighted result for one tool.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregateResult {
    pub rank: usize,
    pub tool: String,
    /// Sum over criteria of weight times score.
    pub weighted_total: f64,
    /// `weighted_total` divided by the sum of weights, on the score scale.
    pub normalized_score: f64,
    /// `normalized_score` as a percentage of the scale maximum.
    pub percent: f64,
    pub notes: String,
    pub breakdown: Vec<CriterionContribution>,
}

/// Ranked results of one evaluation run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Evaluation {
    pub scale: Scale,
    pub criteria: Vec<Criterion>,
    pub total_weight: f64,
    pub results: Vec<AggregateResult>,
}

impl Evaluation {
    pub fn result(&self, tool: &str) -> Option<&AggregateResult> {
        self.results.iter().find(|r| r.tool == tool)
    }

    pub fn ranking(&self) -> impl Iterator<Item = &str> {
        self.results.iter().map(|r| r.tool.as_str())
    }
}
