use std::fs;
use std::path::{Path, PathBuf};

use super::EvalConfig;
use crate::error::{EvalError, Result};

pub const CONFIG_FILE_NAME: &str = ".tooleval.toml";

const MAX_TRAVERSAL_DEPTH: usize = 10;

/// Pure function to parse config from a TOML string
pub fn parse_config(contents: &str) -> Result<EvalConfig> {
    let config = toml::from_str::<EvalConfig>(contents).map_err(|e| {
        EvalError::malformed(format!("failed to parse {CONFIG_FILE_NAME}: {e}"), None)
    })?;
    if config.output.precision > 12 {
        return Err(EvalError::validation(format!(
            "output precision {} is too large (maximum 12)",
            config.output.precision
        )));
    }
    Ok(config)
}

/// Load configuration from an explicit path; any failure is an error.
pub fn load_config_from(path: &Path) -> Result<EvalConfig> {
    let contents = crate::io::read_file(path)?;
    let config = parse_config(&contents).map_err(|e| e.at_path(path))?;
    tracing::debug!("Loaded config from {}", path.display());
    Ok(config.relative_to(config_dir(path)))
}

/// Try a discovered config path; unreadable or invalid files are skipped
fn try_load_config_from_path(config_path: &Path) -> Option<EvalConfig> {
    let contents = match fs::read_to_string(config_path) {
        Ok(contents) => contents,
        Err(e) => {
            handle_read_error(config_path, &e);
            return None;
        }
    };

    match parse_config(&contents) {
        Ok(config) => {
            tracing::debug!("Loaded config from {}", config_path.display());
            Some(config.relative_to(config_dir(config_path)))
        }
        Err(e) => {
            tracing::warn!("{} ({}). Ignoring it.", e, config_path.display());
            None
        }
    }
}

fn config_dir(config_path: &Path) -> &Path {
    config_path.parent().unwrap_or_else(|| Path::new(""))
}

/// Only log actual errors, not "file not found"
fn handle_read_error(config_path: &Path, error: &std::io::Error) {
    if error.kind() != std::io::ErrorKind::NotFound {
        tracing::warn!(
            "Failed to read config file {}: {}",
            config_path.display(),
            error
        );
    }
}

/// Pure function to generate directory ancestors up to a depth limit
pub fn directory_ancestors(start: PathBuf, max_depth: usize) -> impl Iterator<Item = PathBuf> {
    std::iter::successors(Some(start), |dir| {
        let mut parent = dir.clone();
        if parent.pop() {
            Some(parent)
        } else {
            None
        }
    })
    .take(max_depth)
}

/// Find the nearest `.tooleval.toml` from `start` upwards, falling back to defaults.
pub fn discover_config(start: PathBuf) -> EvalConfig {
    directory_ancestors(start, MAX_TRAVERSAL_DEPTH)
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .find_map(|path| try_load_config_from_path(&path))
        .unwrap_or_else(|| {
            tracing::debug!(
                "No config found after checking {} directories. Using default config.",
                MAX_TRAVERSAL_DEPTH
            );
            EvalConfig::default()
        })
}

/// Load the explicit config if given, otherwise discover one from the current directory.
pub fn load_config(explicit: Option<&Path>) -> Result<EvalConfig> {
    if let Some(path) = explicit {
        return load_config_from(path);
    }

    match std::env::current_dir() {
        Ok(dir) => Ok(discover_config(dir)),
        Err(e) => {
            tracing::warn!(
                "Failed to get current directory: {}. Using default config.",
                e
            );
            Ok(EvalConfig::default())
        }
    }
}
