//! Run summary
//!
//! Folds an ordered result sequence into totals for logging. The sequence
//! itself is left untouched; the summary is a derived view.
//!
//! # Example
//!
//! ```
//! use filetally::stats::{FileResult, FileStats, aggregator::RunSummary};
//!
//! let results = vec![
//!     FileResult::ok("a.txt", FileStats { lines: 2, words: 3 }),
//!     FileResult::timeout("b.txt"),
//! ];
//!
//! let summary = RunSummary::from_results(&results);
//! assert_eq!(summary.total, 2);
//! assert_eq!(summary.ok, 1);
//! assert_eq!(summary.timed_out, 1);
//! assert_eq!(summary.words, 3);
//! ```

use crate::stats::FileResult;
use std::fmt;

/// Totals over one aggregation run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Number of manifest entries
    pub total: usize,
    /// Entries with `ok` status
    pub ok: usize,
    /// Entries with `timeout` status
    pub timed_out: usize,
    /// Entries with `failed` status (detailed policy only)
    pub failed: usize,
    /// Sum of line counts over successful entries
    pub lines: usize,
    /// Sum of word counts over successful entries
    pub words: usize,
}

impl RunSummary {
    pub fn from_results(results: &[FileResult]) -> Self {
        let mut summary = Self::default();
        for result in results {
            summary.add(result);
        }
        summary
    }

    /// Fold one more result into the totals
    pub fn add(&mut self, result: &FileResult) {
        self.total += 1;
        match result {
            FileResult::Ok { lines, words, .. } => {
                self.ok += 1;
                self.lines += lines;
                self.words += words;
            }
            FileResult::Timeout { .. } => self.timed_out += 1,
            FileResult::Failed { .. } => self.failed += 1,
        }
    }

    /// True when every entry succeeded
    pub fn all_ok(&self) -> bool {
        self.ok == self.total
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} entries: {} ok, {} timeout",
            self.total, self.ok, self.timed_out
        )?;
        if self.failed > 0 {
            write!(f, ", {} failed", self.failed)?;
        }
        write!(f, " ({} lines, {} words)", self.lines, self.words)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::{FailureReason, FileStats};

    #[test]
    fn test_empty_summary() {
        let summary = RunSummary::from_results(&[]);
        assert_eq!(summary, RunSummary::default());
        assert!(summary.all_ok());
    }

    #[test]
    fn test_summary_counts() {
        let results = vec![
            FileResult::ok("a", FileStats { lines: 2, words: 3 }),
            FileResult::ok("b", FileStats { lines: 1, words: 3 }),
            FileResult::timeout("c"),
            FileResult::failed("d", FailureReason::Unreadable),
        ];
        let summary = RunSummary::from_results(&results);

        assert_eq!(summary.total, 4);
        assert_eq!(summary.ok, 2);
        assert_eq!(summary.timed_out, 1);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.lines, 3);
        assert_eq!(summary.words, 6);
        assert!(!summary.all_ok());
    }

    #[test]
    fn test_summary_display() {
        let results = vec![
            FileResult::ok("a", FileStats { lines: 2, words: 3 }),
            FileResult::timeout("b"),
        ];
        let summary = RunSummary::from_results(&results);
        assert_eq!(
            summary.to_string(),
            "2 entries: 1 ok, 1 timeout (2 lines, 3 words)"
        );
    }
}
