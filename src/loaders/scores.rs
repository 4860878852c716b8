//! Score loader.
//!
//! CSV sources come in two layouts, told apart by their header:
//! - wide: `tool,<criterion>...[,notes]`, one row per tool
//! - long: `tool,criterion,score[,notes]`, one row per tool and criterion
//!
//! YAML and JSON sources hold a `tools` list of `{ tool, notes, scores }` records.

use super::{csv_error, json_error, yaml_error, InputFormat};
use crate::core::{CriteriaSet, ScoreTable, ToolScores};
use crate::error::{EvalError, ErrorCode, Result};
use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer};
use std::collections::HashSet;
use std::fmt;
use std::path::Path;
use tracing::debug;

const TOOL_COLUMN: &str = "tool";
const CRITERION_COLUMN: &str = "criterion";
const SCORE_COLUMN: &str = "score";
const NOTES_COLUMN: &str = "notes";

#[derive(Debug, Deserialize)]
struct ScoresDocument {
    #[serde(default)]
    tools: Vec<ToolRecord>,
}

#[derive(Debug, Deserialize)]
struct ToolRecord {
    tool: String,
    #[serde(default)]
    notes: String,
    /// Entries in document order, repeated keys included.
    #[serde(default, deserialize_with = "deserialize_score_entries")]
    scores: Vec<(String, f64)>,
}

impl ToolRecord {
    fn into_tool_scores(self) -> Result<ToolScores> {
        let mut entry = ToolScores::new(self.tool).with_notes(self.notes);
        for (criterion, score) in self.scores {
            if entry.scores.contains_key(&criterion) {
                return Err(repeated_score(&entry.tool, &criterion));
            }
            entry.scores.insert(criterion, score);
        }
        Ok(entry)
    }
}

/// Read a `criterion: score` map without collapsing repeated keys.
fn deserialize_score_entries<'de, D>(
    deserializer: D,
) -> std::result::Result<Vec<(String, f64)>, D::Error>
where
    D: Deserializer<'de>,
{
    struct EntriesVisitor;

    impl<'de> Visitor<'de> for EntriesVisitor {
        type Value = Vec<(String, f64)>;

        fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
            formatter.write_str("a map of criterion to score")
        }

        fn visit_map<A>(self, mut map: A) -> std::result::Result<Self::Value, A::Error>
        where
            A: MapAccess<'de>,
        {
            let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
            while let Some(entry) = map.next_entry::<String, f64>()? {
                entries.push(entry);
            }
            Ok(entries)
        }
    }

    deserializer.deserialize_map(EntriesVisitor)
}

fn repeated_score(tool: &str, criterion: &str) -> EvalError {
    EvalError::with_code(
        ErrorCode::VALIDATION_DUPLICATE,
        format!("tool '{tool}' scores criterion '{criterion}' more than once"),
    )
    .for_tool(tool)
    .for_criterion(criterion)
}

/// Load scores from a file and validate them against the criteria.
pub fn load_scores(path: &Path, criteria: &CriteriaSet) -> Result<ScoreTable> {
    let format = InputFormat::from_path(path)?;
    let contents = crate::io::read_file(path)?;
    let table = parse_scores(&contents, format, criteria).map_err(|e| e.at_path(path))?;

    debug!(path = %path.display(), tools = table.len(), "Loaded scores");
    Ok(table)
}

/// Parse scores from text and validate them against the criteria.
pub fn parse_scores(
    contents: &str,
    format: InputFormat,
    criteria: &CriteriaSet,
) -> Result<ScoreTable> {
    let tools = match format {
        InputFormat::Yaml => serde_yaml::from_str::<ScoresDocument>(contents)
            .map_err(yaml_error)?
            .tools
            .into_iter()
            .map(ToolRecord::into_tool_scores)
            .collect::<Result<Vec<_>>>()?,
        InputFormat::Json => serde_json::from_str::<ScoresDocument>(contents)
            .map_err(json_error)?
            .tools
            .into_iter()
            .map(ToolRecord::into_tool_scores)
            .collect::<Result<Vec<_>>>()?,
        InputFormat::Csv => read_csv(contents)?,
    };

    let tools = tools
        .into_iter()
        .map(|mut entry| {
            entry.tool = entry.tool.trim().to_string();
            entry.notes = entry.notes.trim().to_string();
            entry
        })
        .collect();

    let table = ScoreTable::new(tools);
    table.validate(criteria)?;
    Ok(table)
}

fn read_csv(contents: &str) -> Result<Vec<ToolScores>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(contents.as_bytes());
    let headers = reader.headers().map_err(csv_error)?.clone();

    let column = |name: &str| headers.iter().position(|h| h.eq_ignore_ascii_case(name));
    let tool_idx = column(TOOL_COLUMN).ok_or_else(|| {
        EvalError::with_code(
            ErrorCode::VALIDATION_MALFORMED,
            "scores CSV must contain a 'tool' column",
        )
    })?;
    let notes_idx = column(NOTES_COLUMN);

    let long_layout = headers.iter().all(|h| {
        [TOOL_COLUMN, CRITERION_COLUMN, SCORE_COLUMN, NOTES_COLUMN]
            .iter()
            .any(|known| h.eq_ignore_ascii_case(known))
    });

    match (column(CRITERION_COLUMN), column(SCORE_COLUMN)) {
        (Some(criterion_idx), Some(score_idx)) if long_layout => {
            let layout = LongLayout {
                tool_idx,
                criterion_idx,
                score_idx,
                notes_idx,
            };
            read_long_rows(&mut reader, &layout)
        }
        _ => {
            let criterion_columns: Vec<(usize, String)> = headers
                .iter()
                .enumerate()
                .filter(|(idx, _)| *idx != tool_idx && Some(*idx) != notes_idx)
                .map(|(idx, name)| (idx, name.to_string()))
                .collect();
            if let Some(repeated) = repeated_column(&criterion_columns) {
                return Err(EvalError::duplicate("criterion column", repeated)
                    .for_criterion(repeated));
            }
            read_wide_rows(&mut reader, tool_idx, notes_idx, &criterion_columns)
        }
    }
}

fn read_wide_rows(
    reader: &mut csv::Reader<&[u8]>,
    tool_idx: usize,
    notes_idx: Option<usize>,
    criterion_columns: &[(usize, String)],
) -> Result<Vec<ToolScores>> {
    let mut tools = Vec::new();
    for record in reader.records() {
        let record = record.map_err(csv_error)?;
        let line = record.position().map_or(0, |p| p.line());
        let tool = record.get(tool_idx).unwrap_or_default();
        let mut entry = ToolScores::new(tool);
        if let Some(notes) = notes_idx.and_then(|idx| record.get(idx)) {
            entry.notes = notes.to_string();
        }

        for (idx, criterion) in criterion_columns {
            // Blank cells stay absent so validation reports them as missing.
            let raw = record.get(*idx).unwrap_or_default();
            if raw.is_empty() {
                continue;
            }
            let score = parse_cell(raw, tool, criterion, line)?;
            entry.scores.insert(criterion.clone(), score);
        }
        tools.push(entry);
    }
    Ok(tools)
}

fn repeated_column(columns: &[(usize, String)]) -> Option<&str> {
    let mut seen = HashSet::new();
    columns
        .iter()
        .map(|(_, name)| name.as_str())
        .find(|name| !seen.insert(*name))
}

struct LongLayout {
    tool_idx: usize,
    criterion_idx: usize,
    score_idx: usize,
    notes_idx: Option<usize>,
}

fn read_long_rows(reader: &mut csv::Reader<&[u8]>, layout: &LongLayout) -> Result<Vec<ToolScores>> {
    let mut tools: Vec<ToolScores> = Vec::new();
    for record in reader.records() {
        let record = record.map_err(csv_error)?;
        let line = record.position().map_or(0, |p| p.line());
        let tool = record.get(layout.tool_idx).unwrap_or_default();
        let criterion = record.get(layout.criterion_idx).unwrap_or_default();
        let raw = record.get(layout.score_idx).unwrap_or_default();

        let position = match tools.iter().position(|t| t.tool == tool) {
            Some(position) => position,
            None => {
                tools.push(ToolScores::new(tool));
                tools.len() - 1
            }
        };
        let entry = &mut tools[position];

        if let Some(notes) = layout.notes_idx.and_then(|idx| record.get(idx)) {
            if entry.notes.is_empty() {
                entry.notes = notes.to_string();
            }
        }
        if raw.is_empty() {
            continue;
        }
        if entry.scores.contains_key(criterion) {
            return Err(repeated_score(tool, criterion));
        }
        let score = parse_cell(raw, tool, criterion, line)?;
        entry.scores.insert(criterion.to_string(), score);
    }
    Ok(tools)
}

fn parse_cell(raw: &str, tool: &str, criterion: &str, line: u64) -> Result<f64> {
    raw.parse::<f64>().map_err(|_| {
        EvalError::with_code(
            ErrorCode::VALIDATION_MALFORMED,
            format!(
                "score '{raw}' for tool '{tool}', criterion '{criterion}' on line {line} is not a number"
            ),
        )
        .for_tool(tool)
        .for_criterion(criterion)
    })
}
