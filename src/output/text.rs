use super::{fixed, percent, OutputWriter};
use crate::core::Evaluation;
use crate::error::Result;
use comfy_table::presets::ASCII_FULL;
use comfy_table::{CellAlignment, Table};
use std::io::Write;

/// Plain-text ranking rendered with comfy-table.
pub struct TextWriter<W: Write> {
    writer: W,
    precision: usize,
}

impl<W: Write> TextWriter<W> {
    pub fn new(writer: W, precision: usize) -> Self {
        Self { writer, precision }
    }

    fn ranking_table(&self, evaluation: &Evaluation) -> Table {
        let mut table = Table::new();
        table.load_preset(ASCII_FULL).set_header(vec![
            "Rank",
            "Tool",
            "Weighted Score",
            "Normalized",
            "Percent",
            "Notes",
        ]);

        for result in &evaluation.results {
            table.add_row(vec![
                result.rank.to_string(),
                result.tool.clone(),
                fixed(result.weighted_total, self.precision),
                fixed(result.normalized_score, self.precision),
                percent(result.percent),
                result.notes.clone(),
            ]);
        }

        for idx in [0, 2, 3, 4] {
            if let Some(column) = table.column_mut(idx) {
                column.set_cell_alignment(CellAlignment::Right);
            }
        }
        table
    }
}

impl<W: Write> OutputWriter for TextWriter<W> {
    fn write_evaluation(&mut self, evaluation: &Evaluation) -> Result<()> {
        let table = self.ranking_table(evaluation);
        writeln!(self.writer, "Tool Evaluation Results")?;
        writeln!(
            self.writer,
            "Scale {}-{}, {} criteria, total weight {}",
            evaluation.scale.min,
            evaluation.scale.max,
            evaluation.criteria.len(),
            fixed(evaluation.total_weight, self.precision)
        )?;
        writeln!(self.writer)?;
        writeln!(self.writer, "{table}")?;
        Ok(())
    }
}
