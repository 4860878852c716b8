use super::{fixed, percent, OutputWriter};
use crate::core::Evaluation;
use crate::error::{EvalError, Result};
use std::io::Write;

const COLUMNS: [&str; 6] = [
    "rank",
    "tool",
    "weighted_score",
    "normalized_score",
    "percent",
    "notes",
];

/// One row per tool in rank order. Per-criterion detail lives in the JSON report.
pub struct CsvWriter<W: Write> {
    writer: W,
    precision: usize,
}

impl<W: Write> CsvWriter<W> {
    pub fn new(writer: W, precision: usize) -> Self {
        Self { writer, precision }
    }
}

fn csv_write_error(err: csv::Error) -> EvalError {
    EvalError::io(format!("failed to write CSV: {err}"), None)
}

impl<W: Write> OutputWriter for CsvWriter<W> {
    fn write_evaluation(&mut self, evaluation: &Evaluation) -> Result<()> {
        let mut csv = csv::Writer::from_writer(&mut self.writer);

        csv.write_record(COLUMNS).map_err(csv_write_error)?;

        for result in &evaluation.results {
            csv.write_record([
                result.rank.to_string(),
                result.tool.clone(),
                fixed(result.weighted_total, self.precision),
                fixed(result.normalized_score, self.precision),
                percent(result.percent),
                result.notes.clone(),
            ])
            .map_err(csv_write_error)?;
        }

        csv.flush()?;
        Ok(())
    }
}
