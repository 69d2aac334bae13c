//! Per-file statistics and result records
//!
//! A [`FileResult`] is produced exactly once per manifest entry. Its serialized
//! form is an object tagged by `status`:
//!
//! ```text
//! {"status":"ok","path":"a.txt","lines":2,"words":3}
//! {"status":"timeout","path":"b.txt"}
//! ```
//!
//! # Example
//!
//! ```
//! use filetally::stats::{FileResult, FileStats};
//!
//! let stats = FileStats::from_text("hello world\nfoo");
//! assert_eq!(stats, FileStats { lines: 2, words: 3 });
//!
//! let result = FileResult::ok("a.txt", stats);
//! assert!(result.is_ok());
//! assert_eq!(result.path(), "a.txt");
//! ```

pub mod aggregator;

use serde::{Deserialize, Serialize};
use std::fmt;

/// Line and word counts for one file
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileStats {
    pub lines: usize,
    pub words: usize,
}

impl FileStats {
    /// Count lines and whitespace-separated words across `lines`
    pub fn from_lines<'a, I>(lines: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        lines.into_iter().fold(Self::default(), |acc, line| Self {
            lines: acc.lines + 1,
            words: acc.words + line.split_whitespace().count(),
        })
    }

    /// Count a whole text; a trailing newline does not start a new line
    pub fn from_text(text: &str) -> Self {
        Self::from_lines(text.lines())
    }
}

/// Why an entry failed, reported only under the detailed failure policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureReason {
    /// The file could not be opened, read, or decoded as UTF-8
    Unreadable,
    /// `#sleep=` marker without a non-negative integer
    MalformedMarker,
    /// Requested delay was longer than the timeout and was skipped
    DelayExceedsTimeout,
    /// The worker died before reporting
    Aborted,
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureReason::Unreadable => write!(f, "unreadable"),
            FailureReason::MalformedMarker => write!(f, "malformed marker"),
            FailureReason::DelayExceedsTimeout => write!(f, "delay exceeds timeout"),
            FailureReason::Aborted => write!(f, "aborted"),
        }
    }
}

/// Outcome for one manifest entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum FileResult {
    Ok {
        path: String,
        lines: usize,
        words: usize,
    },
    Timeout {
        path: String,
    },
    Failed {
        path: String,
        reason: FailureReason,
    },
}

impl FileResult {
    pub fn ok(path: impl Into<String>, stats: FileStats) -> Self {
        Self::Ok {
            path: path.into(),
            lines: stats.lines,
            words: stats.words,
        }
    }

    pub fn timeout(path: impl Into<String>) -> Self {
        Self::Timeout { path: path.into() }
    }

    pub fn failed(path: impl Into<String>, reason: FailureReason) -> Self {
        Self::Failed {
            path: path.into(),
            reason,
        }
    }

    /// Manifest path this result belongs to
    pub fn path(&self) -> &str {
        match self {
            Self::Ok { path, .. } | Self::Timeout { path } | Self::Failed { path, .. } => path,
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok { .. })
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }

    /// Counts for a successful entry
    pub fn stats(&self) -> Option<FileStats> {
        match self {
            Self::Ok { lines, words, .. } => Some(FileStats {
                lines: *lines,
                words: *words,
            }),
            _ => None,
        }
    }
}

impl fmt::Display for FileResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ok { path, lines, words } => {
                write!(f, "{}: ok ({} lines, {} words)", path, lines, words)
            }
            Self::Timeout { path } => write!(f, "{}: timeout", path),
            Self::Failed { path, reason } => write!(f, "{}: failed ({})", path, reason),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_basic() {
        let stats = FileStats::from_text("hello world\nfoo");
        assert_eq!(stats.lines, 2);
        assert_eq!(stats.words, 3);
    }

    #[test]
    fn test_stats_trailing_newline_and_crlf() {
        assert_eq!(FileStats::from_text("a b\r\nc\n"), FileStats { lines: 2, words: 3 });
        assert_eq!(FileStats::from_text(""), FileStats::default());
    }

    #[test]
    fn test_stats_blank_lines_count_as_lines() {
        let stats = FileStats::from_text("one\n\n   \ntwo  three\t four");
        assert_eq!(stats.lines, 4);
        assert_eq!(stats.words, 4);
    }

    #[test]
    fn test_result_json_shape() {
        let ok = FileResult::ok("a.txt", FileStats { lines: 2, words: 3 });
        let json = serde_json::to_value(&ok).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"status": "ok", "path": "a.txt", "lines": 2, "words": 3})
        );

        let timeout = FileResult::timeout("b.txt");
        let json = serde_json::to_value(&timeout).unwrap();
        assert_eq!(json, serde_json::json!({"status": "timeout", "path": "b.txt"}));

        let failed = FileResult::failed("c.txt", FailureReason::DelayExceedsTimeout);
        let json = serde_json::to_value(&failed).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"status": "failed", "path": "c.txt", "reason": "delay_exceeds_timeout"})
        );
    }

    #[test]
    fn test_result_accessors() {
        let ok = FileResult::ok("x", FileStats { lines: 1, words: 0 });
        assert!(ok.is_ok());
        assert!(!ok.is_timeout());
        assert_eq!(ok.stats(), Some(FileStats { lines: 1, words: 0 }));

        let t = FileResult::timeout("y");
        assert_eq!(t.path(), "y");
        assert!(t.is_timeout());
        assert_eq!(t.stats(), None);
    }

    #[test]
    fn test_result_display() {
        let ok = FileResult::ok("a.txt", FileStats { lines: 2, words: 3 });
        assert_eq!(ok.to_string(), "a.txt: ok (2 lines, 3 words)");
        assert_eq!(FileResult::timeout("b").to_string(), "b: timeout");
    }
}
