//! Error type for tooleval runs.
//!
//! Every failure falls into one of two categories:
//! - `Validation`: the criteria, scores or configuration are malformed or inconsistent
//! - `Io`: an input could not be read or an output could not be written
//!
//! # Error Codes
//!
//! - E001-E009: I/O and filesystem errors
//! - E050-E059: Validation errors
//!
//! A run stops at the first error; nothing is written once one is raised.

use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

/// Structured error code for documentation and programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ErrorCode(&'static str);

impl ErrorCode {
    /// I/O error - file not found
    pub const IO_FILE_NOT_FOUND: ErrorCode = ErrorCode("E001");
    /// I/O error - permission denied
    pub const IO_PERMISSION_DENIED: ErrorCode = ErrorCode("E002");
    /// I/O error - generic
    pub const IO_GENERIC: ErrorCode = ErrorCode("E009");

    /// Validation error - generic
    pub const VALIDATION_GENERIC: ErrorCode = ErrorCode("E050");
    /// Validation error - document could not be parsed
    pub const VALIDATION_MALFORMED: ErrorCode = ErrorCode("E051");
    /// Validation error - invalid criterion or weight
    pub const VALIDATION_CRITERION: ErrorCode = ErrorCode("E052");
    /// Validation error - missing score for a defined criterion
    pub const VALIDATION_MISSING_SCORE: ErrorCode = ErrorCode("E053");
    /// Validation error - score outside the declared scale
    pub const VALIDATION_OUT_OF_RANGE: ErrorCode = ErrorCode("E054");
    /// Validation error - score references an undefined criterion
    pub const VALIDATION_UNKNOWN_CRITERION: ErrorCode = ErrorCode("E055");
    /// Validation error - tool or criterion given more than once
    pub const VALIDATION_DUPLICATE: ErrorCode = ErrorCode("E056");

    /// Get the error code string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        self.0
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Error raised while loading, aggregating or reporting an evaluation.
#[derive(Debug, Clone, Error)]
pub enum EvalError {
    /// Malformed or inconsistent input data.
    #[error("[{code}] Validation error: {message}{}", location_suffix(.path))]
    Validation {
        /// Error code for documentation lookup.
        code: ErrorCode,
        /// Human-readable message naming the offending tool or criterion.
        message: String,
        /// Offending tool, if any.
        tool: Option<String>,
        /// Offending criterion, if any.
        criterion: Option<String>,
        /// Source file, if known.
        path: Option<PathBuf>,
    },

    /// Unreadable input or unwritable output.
    #[error("[{code}] I/O error: {message}{}", location_suffix(.path))]
    Io {
        code: ErrorCode,
        message: String,
        path: Option<PathBuf>,
        #[source]
        source: Option<Arc<std::io::Error>>,
    },
}

fn location_suffix(path: &Option<PathBuf>) -> String {
    path.as_ref()
        .map(|p| format!(" (file: {})", p.display()))
        .unwrap_or_default()
}

impl EvalError {
    /// Create a generic validation error.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::with_code(ErrorCode::VALIDATION_GENERIC, message)
    }

    /// Create a validation error with a specific code.
    #[must_use]
    pub fn with_code(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::Validation {
            code,
            message: message.into(),
            tool: None,
            criterion: None,
            path: None,
        }
    }

    /// Create a validation error for a document that failed to parse.
    #[must_use]
    pub fn malformed(message: impl Into<String>, path: Option<&Path>) -> Self {
        Self::with_code(ErrorCode::VALIDATION_MALFORMED, message).at_path_opt(path)
    }

    /// Create an invalid-criterion error.
    #[must_use]
    pub fn criterion(criterion: impl Into<String>, message: impl Into<String>) -> Self {
        Self::with_code(ErrorCode::VALIDATION_CRITERION, message).for_criterion(criterion)
    }

    /// A tool has no score for a defined criterion.
    #[must_use]
    pub fn missing_score(tool: &str, criterion: &str) -> Self {
        Self::with_code(
            ErrorCode::VALIDATION_MISSING_SCORE,
            format!("tool '{tool}' is missing a score for criterion '{criterion}'"),
        )
        .for_tool(tool)
        .for_criterion(criterion)
    }

    /// A score references a criterion that is not defined.
    #[must_use]
    pub fn unknown_criterion(tool: &str, criterion: &str) -> Self {
        Self::with_code(
            ErrorCode::VALIDATION_UNKNOWN_CRITERION,
            format!("tool '{tool}' scores undefined criterion '{criterion}'"),
        )
        .for_tool(tool)
        .for_criterion(criterion)
    }

    /// A score lies outside the declared scale.
    #[must_use]
    pub fn out_of_range(tool: &str, criterion: &str, score: f64, min: f64, max: f64) -> Self {
        Self::with_code(
            ErrorCode::VALIDATION_OUT_OF_RANGE,
            format!(
                "score {score} for tool '{tool}', criterion '{criterion}' is outside the scale {min}..={max}"
            ),
        )
        .for_tool(tool)
        .for_criterion(criterion)
    }

    /// A tool or criterion identifier appears more than once.
    #[must_use]
    pub fn duplicate(kind: &str, name: &str) -> Self {
        Self::with_code(
            ErrorCode::VALIDATION_DUPLICATE,
            format!("{kind} '{name}' is defined more than once"),
        )
    }

    /// Create an I/O error with a message and optional path.
    #[must_use]
    pub fn io(message: impl Into<String>, path: Option<PathBuf>) -> Self {
        Self::Io {
            code: ErrorCode::IO_GENERIC,
            message: message.into(),
            path,
            source: None,
        }
    }

    /// Create an I/O error from a std::io::Error.
    #[must_use]
    pub fn from_io_error(err: std::io::Error, path: Option<PathBuf>) -> Self {
        let code = match err.kind() {
            std::io::ErrorKind::NotFound => ErrorCode::IO_FILE_NOT_FOUND,
            std::io::ErrorKind::PermissionDenied => ErrorCode::IO_PERMISSION_DENIED,
            _ => ErrorCode::IO_GENERIC,
        };
        Self::Io {
            code,
            message: err.to_string(),
            path,
            source: Some(Arc::new(err)),
        }
    }

    /// Attach the offending tool.
    #[must_use]
    pub fn for_tool(mut self, name: impl Into<String>) -> Self {
        if let Self::Validation { tool, .. } = &mut self {
            *tool = Some(name.into());
        }
        self
    }

    /// Attach the offending criterion.
    #[must_use]
    pub fn for_criterion(mut self, name: impl Into<String>) -> Self {
        if let Self::Validation { criterion, .. } = &mut self {
            *criterion = Some(name.into());
        }
        self
    }

    /// Attach the source file, keeping any path already recorded.
    #[must_use]
    pub fn at_path(mut self, file: impl Into<PathBuf>) -> Self {
        match &mut self {
            Self::Validation { path, .. } | Self::Io { path, .. } => {
                if path.is_none() {
                    *path = Some(file.into());
                }
            }
        }
        self
    }

    fn at_path_opt(self, file: Option<&Path>) -> Self {
        match file {
            Some(p) => self.at_path(p),
            None => self,
        }
    }

    /// Get the error code.
    #[must_use]
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Validation { code, .. } | Self::Io { code, .. } => *code,
        }
    }

    /// Get the error category name.
    #[must_use]
    pub fn category(&self) -> &'static str {
        match self {
            Self::Validation { .. } => "Validation",
            Self::Io { .. } => "I/O",
        }
    }

    /// Get the error message without code or location.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::Validation { message, .. } | Self::Io { message, .. } => message,
        }
    }

    /// Get the associated path, if any.
    #[must_use]
    pub fn path(&self) -> Option<&PathBuf> {
        match self {
            Self::Validation { path, .. } | Self::Io { path, .. } => path.as_ref(),
        }
    }

    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }

    /// Get the process exit code for this error.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Validation { .. } => 4,
            Self::Io { .. } => 1,
        }
    }
}

impl Serialize for EvalError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeStruct;

        let mut state = serializer.serialize_struct("EvalError", 3)?;
        state.serialize_field("code", &self.code().as_str())?;
        state.serialize_field("category", &self.category())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

impl From<std::io::Error> for EvalError {
    fn from(err: std::io::Error) -> Self {
        Self::from_io_error(err, None)
    }
}

/// Result type alias using the evaluation error type.
pub type Result<T> = std::result::Result<T, EvalError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_score_names_tool_and_criterion() {
        let err = EvalError::missing_score("Acme", "cost");
        assert_eq!(err.code(), ErrorCode::VALIDATION_MISSING_SCORE);
        assert_eq!(err.category(), "Validation");
        assert!(err.to_string().contains("'Acme'"));
        assert!(err.to_string().contains("'cost'"));
        match err {
            EvalError::Validation {
                tool, criterion, ..
            } => {
                assert_eq!(tool.as_deref(), Some("Acme"));
                assert_eq!(criterion.as_deref(), Some("cost"));
            }
            EvalError::Io { .. } => panic!("expected validation error"),
        }
    }

    #[test]
    fn test_io_error_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err = EvalError::from_io_error(io_err, Some(PathBuf::from("/test")));
        assert_eq!(err.code(), ErrorCode::IO_FILE_NOT_FOUND);
        assert_eq!(err.exit_code(), 1);
        assert!(err.to_string().contains("(file: /test)"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_at_path_keeps_first_path() {
        let err = EvalError::validation("bad")
            .at_path("scores.csv")
            .at_path("other.csv");
        assert_eq!(err.path(), Some(&PathBuf::from("scores.csv")));
    }

    #[test]
    fn test_exit_codes_by_category() {
        assert_eq!(EvalError::validation("x").exit_code(), 4);
        assert_eq!(EvalError::io("x", None).exit_code(), 1);
    }

    #[test]
    fn test_serialize_includes_code_and_category() {
        let err = EvalError::duplicate("tool", "Acme");
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["code"], "E056");
        assert_eq!(json["category"], "Validation");
    }
}
