//! Weighted aggregation and ranking.
//!
//! Each tool's total is `Σ weight[c] * score[c]`, summed over criteria in
//! declaration order so repeated runs produce identical floating-point results.
//! Both the raw weighted sum and a weight-normalized score are reported; the raw
//! sum is the ranking key.

use crate::core::{
    round_to, AggregateResult, CriteriaSet, CriterionContribution, Evaluation, ScoreTable,
    ToolScores,
};
use crate::error::{EvalError, Result};
use tracing::{debug, info};

/// Decimal places weighted totals are compared at when ranking. Totals that
/// differ only in their last bits rank as ties.
pub const RANKING_PRECISION: usize = 9;

/// Aggregate every tool in the table and rank the results.
///
/// Fails on the first tool that lacks a score for a defined criterion; missing
/// entries are never treated as zero.
pub fn aggregate(criteria: &CriteriaSet, scores: &ScoreTable) -> Result<Evaluation> {
    if scores.is_empty() {
        return Err(EvalError::validation("no tool scores found"));
    }

    let total_weight = criteria.total_weight();
    let results = scores
        .tools()
        .iter()
        .map(|entry| score_tool(criteria, total_weight, entry))
        .collect::<Result<Vec<_>>>()?;

    let results = rank_results(results);
    if let Some(top) = results.first() {
        info!(
            tools = results.len(),
            criteria = criteria.len(),
            leader = %top.tool,
            "Aggregated evaluation"
        );
    }

    Ok(Evaluation {
        scale: criteria.scale(),
        criteria: criteria.as_slice().to_vec(),
        total_weight,
        results,
    })
}

/// Compute one tool's weighted total and per-criterion breakdown (pure).
pub fn score_tool(
    criteria: &CriteriaSet,
    total_weight: f64,
    entry: &ToolScores,
) -> Result<AggregateResult> {
    let breakdown = criteria
        .iter()
        .map(|criterion| {
            let score = entry
                .score(&criterion.id)
                .ok_or_else(|| EvalError::missing_score(&entry.tool, &criterion.id))?;
            Ok(CriterionContribution {
                criterion: criterion.id.clone(),
                weight: criterion.weight,
                score,
                contribution: criterion.weight * score,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let weighted_total: f64 = breakdown.iter().map(|c| c.contribution).sum();
    let normalized_score = weighted_total / total_weight;
    let percent = normalized_score * 100.0 / criteria.scale().max;

    debug!(tool = %entry.tool, weighted_total, normalized_score, "Scored tool");

    Ok(AggregateResult {
        rank: 0,
        tool: entry.tool.clone(),
        weighted_total,
        normalized_score,
        percent,
        notes: entry.notes.clone(),
        breakdown,
    })
}

/// The value tools are ordered by: the weighted total at [`RANKING_PRECISION`].
pub fn ranking_key(weighted_total: f64) -> f64 {
    round_to(weighted_total, RANKING_PRECISION)
}

/// Sort results by weighted total, highest first, and assign 1-based ranks (pure).
///
/// The sort is stable, so tools with equal totals keep their input order.
pub fn rank_results(mut results: Vec<AggregateResult>) -> Vec<AggregateResult> {
    results.sort_by(|a, b| {
        ranking_key(b.weighted_total).total_cmp(&ranking_key(a.weighted_total))
    });
    for (idx, result) in results.iter_mut().enumerate() {
        result.rank = idx + 1;
    }
    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Criterion, Scale};
    use crate::error::ErrorCode;

    fn criteria() -> CriteriaSet {
        CriteriaSet::new(
            Scale::default(),
            vec![
                Criterion::new("Cost", 0.5),
                Criterion::new("Usability", 0.3),
                Criterion::new("Support", 0.2),
            ],
        )
        .unwrap()
    }

    fn tool(name: &str, cost: f64, usability: f64, support: f64) -> ToolScores {
        ToolScores::new(name)
            .with_score("Cost", cost)
            .with_score("Usability", usability)
            .with_score("Support", support)
    }

    #[test]
    fn test_weighted_total_matches_manual_computation() {
        let table = ScoreTable::new(vec![tool("Acme", 4.0, 5.0, 3.0)]);
        let evaluation = aggregate(&criteria(), &table).unwrap();
        let acme = evaluation.result("Acme").unwrap();

        assert!((acme.weighted_total - 4.1).abs() < 1e-12);
        assert!((acme.normalized_score - 4.1).abs() < 1e-12);
        assert!((acme.percent - 82.0).abs() < 1e-9);
        assert_eq!(acme.rank, 1);

        let contributions: Vec<f64> = acme.breakdown.iter().map(|c| c.contribution).collect();
        assert_eq!(contributions, vec![2.0, 1.5, 0.6000000000000001]);
    }

    #[test]
    fn test_normalizes_by_weight_sum() {
        let criteria = CriteriaSet::new(
            Scale::new(0.0, 10.0).unwrap(),
            vec![Criterion::new("a", 2.0), Criterion::new("b", 3.0)],
        )
        .unwrap();
        let table = ScoreTable::new(vec![ToolScores::new("T")
            .with_score("a", 10.0)
            .with_score("b", 5.0)]);
        let result = &aggregate(&criteria, &table).unwrap().results[0];

        assert_eq!(result.weighted_total, 35.0);
        assert_eq!(result.normalized_score, 7.0);
        assert_eq!(result.percent, 70.0);
    }

    #[test]
    fn test_missing_score_is_error_not_zero() {
        let table = ScoreTable::new(vec![ToolScores::new("Acme")
            .with_score("Cost", 4.0)
            .with_score("Usability", 5.0)]);
        let err = aggregate(&criteria(), &table).unwrap_err();
        assert_eq!(err.code(), ErrorCode::VALIDATION_MISSING_SCORE);
        assert!(err.message().contains("'Support'"));
    }

    #[test]
    fn test_ranking_descending_with_stable_ties() {
        let table = ScoreTable::new(vec![
            tool("Low", 1.0, 1.0, 1.0),
            tool("TieFirst", 3.0, 3.0, 3.0),
            tool("High", 5.0, 5.0, 5.0),
            tool("TieSecond", 3.0, 3.0, 3.0),
        ]);
        let evaluation = aggregate(&criteria(), &table).unwrap();
        let ranking: Vec<_> = evaluation.ranking().collect();
        assert_eq!(ranking, vec!["High", "TieFirst", "TieSecond", "Low"]);
        let ranks: Vec<_> = evaluation.results.iter().map(|r| r.rank).collect();
        assert_eq!(ranks, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_ties_within_rounding_noise_keep_input_order() {
        // 0.5 + 0.9 + 0.2 and 0.5 + 0.3 + 0.8 differ in the last bit.
        let table = ScoreTable::new(vec![
            tool("First", 1.0, 3.0, 1.0),
            tool("Second", 1.0, 1.0, 4.0),
        ]);
        let evaluation = aggregate(&criteria(), &table).unwrap();

        let ranking: Vec<_> = evaluation.ranking().collect();
        assert_eq!(ranking, vec!["First", "Second"]);
        assert_eq!(
            ranking_key(evaluation.results[0].weighted_total),
            ranking_key(evaluation.results[1].weighted_total)
        );
    }

    #[test]
    fn test_distinct_totals_are_not_merged() {
        let table = ScoreTable::new(vec![
            tool("Lower", 3.0, 3.0, 3.0),
            tool("Higher", 3.0, 3.0, 3.001),
        ]);
        let evaluation = aggregate(&criteria(), &table).unwrap();
        let ranking: Vec<_> = evaluation.ranking().collect();
        assert_eq!(ranking, vec!["Higher", "Lower"]);
    }

    #[test]
    fn test_empty_table_rejected() {
        assert!(aggregate(&criteria(), &ScoreTable::default()).is_err());
    }
}
