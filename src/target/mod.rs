//! Aggregation targets
//!
//! A target is one manifest entry paired with its position in the manifest.
//! The position is the only thing that decides where the entry's result lands
//! in the output sequence.

pub mod manifest;

pub use manifest::Manifest;

use std::path::{Path, PathBuf};
use std::sync::Arc;

/// One unit of work: a manifest entry and its original position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileTask {
    /// Position in the manifest (dense, starts at 0)
    pub index: usize,
    /// Entry exactly as listed in the manifest, trimmed
    pub relative_path: String,
    /// Directory the entry is resolved against
    pub base_dir: Arc<Path>,
}

impl FileTask {
    pub fn new(index: usize, relative_path: impl Into<String>, base_dir: Arc<Path>) -> Self {
        Self {
            index,
            relative_path: relative_path.into(),
            base_dir,
        }
    }

    /// Path the worker reads
    ///
    /// Uses `Path::join`, so an absolute manifest entry resolves to itself.
    pub fn absolute_path(&self) -> PathBuf {
        self.base_dir.join(&self.relative_path)
    }
}
