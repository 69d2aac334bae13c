//! Manifest file handling
//!
//! A manifest is a UTF-8 text file listing one relative file path per line.
//! Lines are trimmed and blank lines are skipped; there is no comment syntax,
//! so a line starting with `#` is an ordinary entry. Entries keep manifest
//! order, which becomes the output order of an aggregation run.

use crate::error::AggregateError;
use crate::target::FileTask;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Parsed manifest: ordered entries plus the directory they resolve against
#[derive(Debug, Clone)]
pub struct Manifest {
    base_dir: Arc<Path>,
    entries: Vec<String>,
}

impl Manifest {
    /// Read and parse a manifest file
    ///
    /// The manifest's parent directory becomes the base directory. Any failure
    /// to open, read, or decode the file is `ManifestUnreadable`.
    pub fn from_file(path: &Path) -> Result<Self, AggregateError> {
        let content = fs::read_to_string(path).map_err(|source| unreadable(path, source))?;
        Ok(Self::from_string(&content, base_dir_of(path)))
    }

    /// Async variant of [`Manifest::from_file`] for use on a Tokio runtime
    pub async fn load(path: &Path) -> Result<Self, AggregateError> {
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| unreadable(path, source))?;
        Ok(Self::from_string(&content, base_dir_of(path)))
    }

    /// Parse manifest content with an explicit base directory
    pub fn from_string(content: &str, base_dir: impl Into<PathBuf>) -> Self {
        let entries = content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect();

        Self {
            base_dir: Arc::from(base_dir.into()),
            entries,
        }
    }

    /// Ordered task list, one task per entry
    pub fn tasks(&self) -> Vec<FileTask> {
        self.entries
            .iter()
            .enumerate()
            .map(|(index, entry)| FileTask::new(index, entry.as_str(), Arc::clone(&self.base_dir)))
            .collect()
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn unreadable(path: &Path, source: std::io::Error) -> AggregateError {
    AggregateError::ManifestUnreadable {
        path: path.to_path_buf(),
        source,
    }
}

/// Parent directory of the manifest, `.` for a bare file name
fn base_dir_of(manifest_path: &Path) -> PathBuf {
    match manifest_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}
