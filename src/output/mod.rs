//! Report rendering.
//!
//! Each run produces two artifacts: a structured one (`json` or `csv`) and a
//! human-readable one (`markdown` or `text`). Output is a pure function of the
//! evaluation and the precision setting, so rendering twice gives identical bytes.

pub mod csv_writer;
pub mod json;
pub mod markdown;
pub mod text;

pub use csv_writer::CsvWriter;
pub use json::JsonWriter;
pub use markdown::MarkdownWriter;
pub use text::TextWriter;

use crate::config::OutputConfig;
pub(crate) use crate::core::round_to;
use crate::core::Evaluation;
use crate::error::{EvalError, Result};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub trait OutputWriter {
    fn write_evaluation(&mut self, evaluation: &Evaluation) -> Result<()>;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StructuredFormat {
    /// Pretty-printed JSON document with a record per tool
    #[default]
    Json,
    /// One CSV row per tool
    Csv,
}

impl StructuredFormat {
    pub fn file_name(&self) -> &'static str {
        match self {
            Self::Json => "results.json",
            Self::Csv => "results.csv",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HumanFormat {
    /// Markdown ranking table with per-criterion breakdown
    #[default]
    Markdown,
    /// Plain-text ranking table
    Text,
}

impl HumanFormat {
    pub fn file_name(&self) -> &'static str {
        match self {
            Self::Markdown => "results.md",
            Self::Text => "results.txt",
        }
    }
}

/// Where the two artifacts of a run were written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportPaths {
    pub structured: PathBuf,
    pub human: PathBuf,
}

pub fn create_structured_writer<'a, W: Write + 'a>(
    format: StructuredFormat,
    writer: W,
    precision: usize,
) -> Box<dyn OutputWriter + 'a> {
    match format {
        StructuredFormat::Json => Box::new(JsonWriter::new(writer, precision)),
        StructuredFormat::Csv => Box::new(CsvWriter::new(writer, precision)),
    }
}

pub fn create_human_writer<'a, W: Write + 'a>(
    format: HumanFormat,
    writer: W,
    precision: usize,
) -> Box<dyn OutputWriter + 'a> {
    match format {
        HumanFormat::Markdown => Box::new(MarkdownWriter::new(writer, precision)),
        HumanFormat::Text => Box::new(TextWriter::new(writer, precision)),
    }
}

/// Render the structured artifact into memory.
pub fn render_structured(
    evaluation: &Evaluation,
    format: StructuredFormat,
    precision: usize,
) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    create_structured_writer(format, &mut buffer, precision).write_evaluation(evaluation)?;
    Ok(buffer)
}

/// Render the human-readable artifact into memory.
pub fn render_human(
    evaluation: &Evaluation,
    format: HumanFormat,
    precision: usize,
) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    create_human_writer(format, &mut buffer, precision).write_evaluation(evaluation)?;
    Ok(buffer)
}

/// Render both artifacts, then write them into the configured output directory.
///
/// Either both artifacts of a run end up on disk or neither does: rendering
/// happens before any file is touched, and files are staged before being moved
/// into place.
pub fn write_reports(evaluation: &Evaluation, config: &OutputConfig) -> Result<ReportPaths> {
    let structured = render_structured(evaluation, config.structured_format, config.precision)?;
    let human = render_human(evaluation, config.human_format, config.precision)?;

    crate::io::ensure_dir(&config.dir)?;
    let paths = ReportPaths {
        structured: config.dir.join(config.structured_format.file_name()),
        human: config.dir.join(config.human_format.file_name()),
    };
    commit_artifacts(&[
        (paths.structured.as_path(), structured.as_slice()),
        (paths.human.as_path(), human.as_slice()),
    ])?;

    info!(
        structured = %paths.structured.display(),
        human = %paths.human.display(),
        "Wrote evaluation reports"
    );
    Ok(paths)
}

/// Write every artifact to a staging file, then rename them into place.
///
/// On failure the staging files and any artifact already moved are removed.
fn commit_artifacts(artifacts: &[(&Path, &[u8])]) -> Result<()> {
    let staged: Vec<PathBuf> = artifacts
        .iter()
        .map(|(path, _)| staging_path(path))
        .collect();

    for ((_, bytes), staging) in artifacts.iter().zip(&staged) {
        if let Err(e) = write_artifact(staging, bytes) {
            remove_files(staged.iter());
            return Err(e);
        }
    }

    for (idx, ((path, _), staging)) in artifacts.iter().zip(&staged).enumerate() {
        if let Err(e) = fs::rename(staging, path) {
            remove_files(staged[idx..].iter());
            remove_files(artifacts[..idx].iter().map(|(done, _)| *done));
            return Err(EvalError::from_io_error(e, Some(path.to_path_buf())));
        }
    }
    Ok(())
}

fn staging_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!(".{name}.tmp"))
}

fn remove_files<P: AsRef<Path>>(paths: impl Iterator<Item = P>) {
    for path in paths {
        if let Err(e) = fs::remove_file(path.as_ref()) {
            debug!("Could not remove {}: {}", path.as_ref().display(), e);
        }
    }
}

fn write_artifact(path: &Path, bytes: &[u8]) -> Result<()> {
    fs::write(path, bytes).map_err(|e| EvalError::from_io_error(e, Some(path.to_path_buf())))
}

pub(crate) fn fixed(value: f64, precision: usize) -> String {
    format!("{value:.precision$}")
}

pub(crate) fn percent(value: f64) -> String {
    format!("{value:.1}")
}
