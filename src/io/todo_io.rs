use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use directories::BaseDirs;
use tempfile::NamedTempFile;

use crate::ops::task_ops::TaskError;

/// Error type for operations against the task file
#[derive(Debug, thiserror::Error)]
pub enum TodoError {
    #[error("task file not found: {0}")]
    NotFound(PathBuf),
    #[error(transparent)]
    Task(#[from] TaskError),
    #[error("could not access {path}: {source}")]
    Io { path: PathBuf, source: io::Error },
}

/// The current user's home directory, if the platform reports one
pub fn home_dir() -> Option<PathBuf> {
    BaseDirs::new().map(|dirs| dirs.home_dir().to_path_buf())
}

/// Replace a leading `~` (alone or followed by a separator) with `home`.
pub fn expand_tilde(path: &str, home: Option<&Path>) -> PathBuf {
    let Some(home) = home else {
        return PathBuf::from(path);
    };
    if path == "~" {
        return home.to_path_buf();
    }
    match path.strip_prefix("~/").or_else(|| path.strip_prefix("~\\")) {
        Some(rest) => home.join(rest),
        None => PathBuf::from(path),
    }
}

/// Read the whole task file. A missing file is `Ok(None)`.
pub fn read_todo_file(path: &Path) -> Result<Option<String>, TodoError> {
    match fs::read_to_string(path) {
        Ok(text) => Ok(Some(text)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(TodoError::Io {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}

/// Read the task file, failing if it does not exist
pub fn read_existing_todo_file(path: &Path) -> Result<String, TodoError> {
    read_todo_file(path)?.ok_or_else(|| TodoError::NotFound(path.to_path_buf()))
}

/// Replace the task file's content
pub fn write_todo_file(path: &Path, content: &str) -> Result<(), TodoError> {
    atomic_write(path, content.as_bytes()).map_err(|e| TodoError::Io {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Write `content` to `path` atomically using a temp file + rename.
pub fn atomic_write(path: &Path, content: &[u8]) -> io::Result<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content)?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
