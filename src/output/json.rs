use super::{round_to, OutputWriter};
use crate::core::{AggregateResult, Evaluation, Scale};
use crate::error::{EvalError, Result};
use serde::Serialize;
use std::io::Write;

/// JSON document layout. Field order here is the serialized order.
#[derive(Debug, Serialize)]
struct JsonReport<'a> {
    generator: &'static str,
    version: &'static str,
    scale: Scale,
    total_weight: f64,
    criteria: Vec<JsonCriterion<'a>>,
    tools: Vec<JsonTool<'a>>,
}

#[derive(Debug, Serialize)]
struct JsonCriterion<'a> {
    criterion: &'a str,
    name: &'a str,
    weight: f64,
}

#[derive(Debug, Serialize)]
struct JsonTool<'a> {
    rank: usize,
    tool: &'a str,
    weighted_total: f64,
    normalized_score: f64,
    percent: f64,
    notes: &'a str,
    breakdown: Vec<JsonContribution<'a>>,
}

#[derive(Debug, Serialize)]
struct JsonContribution<'a> {
    criterion: &'a str,
    weight: f64,
    score: f64,
    contribution: f64,
}

pub struct JsonWriter<W: Write> {
    writer: W,
    precision: usize,
}

impl<W: Write> JsonWriter<W> {
    pub fn new(writer: W, precision: usize) -> Self {
        Self { writer, precision }
    }

    fn tool_record<'a>(&self, result: &'a AggregateResult) -> JsonTool<'a> {
        let p = self.precision;
        JsonTool {
            rank: result.rank,
            tool: &result.tool,
            weighted_total: round_to(result.weighted_total, p),
            normalized_score: round_to(result.normalized_score, p),
            percent: round_to(result.percent, 1),
            notes: &result.notes,
            breakdown: result
                .breakdown
                .iter()
                .map(|c| JsonContribution {
                    criterion: &c.criterion,
                    weight: c.weight,
                    score: c.score,
                    contribution: round_to(c.contribution, p),
                })
                .collect(),
        }
    }
}

impl<W: Write> OutputWriter for JsonWriter<W> {
    fn write_evaluation(&mut self, evaluation: &Evaluation) -> Result<()> {
        let report = JsonReport {
            generator: env!("CARGO_PKG_NAME"),
            version: env!("CARGO_PKG_VERSION"),
            scale: evaluation.scale,
            total_weight: round_to(evaluation.total_weight, self.precision),
            criteria: evaluation
                .criteria
                .iter()
                .map(|c| JsonCriterion {
                    criterion: &c.id,
                    name: &c.name,
                    weight: c.weight,
                })
                .collect(),
            tools: evaluation
                .results
                .iter()
                .map(|r| self.tool_record(r))
                .collect(),
        };

        let json = serde_json::to_string_pretty(&report)
            .map_err(|e| EvalError::io(format!("failed to serialize report: {e}"), None))?;
        self.writer.write_all(json.as_bytes())?;
        self.writer.write_all(b"\n")?;
        Ok(())
    }
}
