use super::{fixed, percent, OutputWriter};
use crate::core::{AggregateResult, Evaluation};
use crate::error::Result;
use std::io::Write;

pub struct MarkdownWriter<W: Write> {
    writer: W,
    precision: usize,
}

impl<W: Write> MarkdownWriter<W> {
    pub fn new(writer: W, precision: usize) -> Self {
        Self { writer, precision }
    }
}

impl<W: Write> OutputWriter for MarkdownWriter<W> {
    fn write_evaluation(&mut self, evaluation: &Evaluation) -> Result<()> {
        self.write_header(evaluation)?;
        self.write_ranking(evaluation)?;
        self.write_criteria(evaluation)?;
        self.write_breakdowns(evaluation)?;
        Ok(())
    }
}

impl<W: Write> MarkdownWriter<W> {
    fn write_header(&mut self, evaluation: &Evaluation) -> Result<()> {
        writeln!(self.writer, "# Tool Evaluation Results")?;
        writeln!(self.writer)?;
        writeln!(
            self.writer,
            "{} tools scored against {} criteria on a {}-{} scale.",
            evaluation.results.len(),
            evaluation.criteria.len(),
            evaluation.scale.min,
            evaluation.scale.max
        )?;
        writeln!(self.writer)?;
        Ok(())
    }

    fn write_ranking(&mut self, evaluation: &Evaluation) -> Result<()> {
        writeln!(self.writer, "## Ranking")?;
        writeln!(self.writer)?;
        writeln!(
            self.writer,
            "| Rank | Tool | Weighted Score | Normalized ({}-{}) | Percent | Notes |",
            evaluation.scale.min, evaluation.scale.max
        )?;
        writeln!(self.writer, "|---:|---|---:|---:|---:|---|")?;
        for result in &evaluation.results {
            self.write_ranking_row(result)?;
        }
        writeln!(self.writer)?;
        Ok(())
    }

    fn write_ranking_row(&mut self, result: &AggregateResult) -> Result<()> {
        writeln!(
            self.writer,
            "| {} | {} | {} | {} | {} | {} |",
            result.rank,
            escape_cell(&result.tool),
            fixed(result.weighted_total, self.precision),
            fixed(result.normalized_score, self.precision),
            percent(result.percent),
            escape_cell(&result.notes)
        )?;
        Ok(())
    }

    fn write_criteria(&mut self, evaluation: &Evaluation) -> Result<()> {
        writeln!(self.writer, "## Criteria")?;
        writeln!(self.writer)?;
        writeln!(self.writer, "| Criterion | Name | Weight |")?;
        writeln!(self.writer, "|---|---|---:|")?;
        for criterion in &evaluation.criteria {
            writeln!(
                self.writer,
                "| {} | {} | {} |",
                escape_cell(&criterion.id),
                escape_cell(&criterion.name),
                criterion.weight
            )?;
        }
        writeln!(self.writer)?;
        Ok(())
    }

    fn write_breakdowns(&mut self, evaluation: &Evaluation) -> Result<()> {
        writeln!(self.writer, "## Breakdown")?;
        for result in &evaluation.results {
            writeln!(self.writer)?;
            writeln!(
                self.writer,
                "### {}. {}",
                result.rank,
                escape_cell(&result.tool)
            )?;
            writeln!(self.writer)?;
            writeln!(self.writer, "| Criterion | Weight | Score | Contribution |")?;
            writeln!(self.writer, "|---|---:|---:|---:|")?;
            for contribution in &result.breakdown {
                writeln!(
                    self.writer,
                    "| {} | {} | {} | {} |",
                    escape_cell(&contribution.criterion),
                    contribution.weight,
                    contribution.score,
                    fixed(contribution.contribution, self.precision)
                )?;
            }
        }
        Ok(())
    }
}

/// Keep table cells on one line and stop `|` from splitting them.
fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|").replace(['\r', '\n'], " ")
}
