use crate::error::{EvalError, Result};
use std::fs;
use std::path::Path;

pub fn read_file(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| EvalError::from_io_error(e, Some(path.to_path_buf())))
}

pub fn write_file(path: &Path, content: &str) -> Result<()> {
    fs::write(path, content).map_err(|e| EvalError::from_io_error(e, Some(path.to_path_buf())))
}

pub fn ensure_dir(path: &Path) -> Result<()> {
    if !path.as_os_str().is_empty() && !path.exists() {
        fs::create_dir_all(path)
            .map_err(|e| EvalError::from_io_error(e, Some(path.to_path_buf())))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use tempfile::TempDir;

    #[test]
    fn test_read_missing_file_reports_path() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("missing.yaml");
        let err = read_file(&path).unwrap_err();
        assert_eq!(err.code(), ErrorCode::IO_FILE_NOT_FOUND);
        assert_eq!(err.path(), Some(&path));
    }

    #[test]
    fn test_ensure_dir_creates_nested_directories() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("a").join("b");
        ensure_dir(&nested).unwrap();
        assert!(nested.is_dir());
        write_file(&nested.join("out.txt"), "ok").unwrap();
        assert_eq!(read_file(&nested.join("out.txt")).unwrap(), "ok");
    }
}
