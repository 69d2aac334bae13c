//! Error types for filetally
//!
//! Two layers:
//! - [`AggregateError`]: failures that abort a whole aggregation run
//! - [`WorkerFault`]: per-entry failures, which never escape a run and are
//!   folded into that entry's `FileResult` by the failure policy

use crate::stats::FailureReason;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that stop `aggregate` before any result is produced
#[derive(Error, Debug)]
pub enum AggregateError {
    /// The manifest itself could not be opened, read, or decoded
    #[error("Failed to read manifest '{}': {source}", .path.display())]
    ManifestUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Request parameters out of range
    #[error("Invalid aggregation request: {0}")]
    InvalidRequest(String),

    /// The async runtime backing the worker pool could not be started
    #[error("Failed to start runtime: {0}")]
    Runtime(#[source] std::io::Error),
}

/// Faults a worker can hit while processing one manifest entry
#[derive(Error, Debug)]
pub enum WorkerFault {
    /// Missing file, permission denied, invalid UTF-8, ...
    #[error("Failed to read '{}': {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// First line starts with `#sleep=` but carries no non-negative integer
    #[error("Malformed sleep marker: {line:?}")]
    MalformedMarker { line: String },

    /// The requested delay would outlast the deadline, so it was never started
    #[error("Requested delay of {requested} units exceeds timeout of {timeout} units")]
    DelayExceedsTimeout { requested: u64, timeout: f64 },
}

impl WorkerFault {
    /// Reason reported under the detailed failure policy
    pub fn reason(&self) -> FailureReason {
        match self {
            WorkerFault::Read { .. } => FailureReason::Unreadable,
            WorkerFault::MalformedMarker { .. } => FailureReason::MalformedMarker,
            WorkerFault::DelayExceedsTimeout { .. } => FailureReason::DelayExceedsTimeout,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manifest_error_names_path() {
        let err = AggregateError::ManifestUnreadable {
            path: PathBuf::from("/nope/list.txt"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        };
        let msg = err.to_string();
        assert!(msg.contains("/nope/list.txt"));
        assert!(msg.contains("missing"));
    }

    #[test]
    fn test_fault_reasons() {
        let read = WorkerFault::Read {
            path: PathBuf::from("a.txt"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert_eq!(read.reason(), FailureReason::Unreadable);

        let marker = WorkerFault::MalformedMarker { line: "#sleep=x".to_string() };
        assert_eq!(marker.reason(), FailureReason::MalformedMarker);

        let delay = WorkerFault::DelayExceedsTimeout { requested: 5, timeout: 2.0 };
        assert_eq!(delay.reason(), FailureReason::DelayExceedsTimeout);
        assert!(delay.to_string().contains("5 units"));
    }
}
