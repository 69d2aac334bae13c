//! Worker implementation
//!
//! A [`Worker`] turns one [`FileTask`] into one [`FileResult`]. It resolves the
//! entry against the manifest directory, reads the file, honours an optional
//! simulated delay, and counts lines and words.
//!
//! # Sleep marker
//!
//! A file may begin with a line of the form `#sleep=N` (N a non-negative
//! integer). The worker then suspends for `N` time units before counting, and
//! the marker line is excluded from the counts. When `N` is larger than the
//! timeout the delay is never started and the entry fails straight away.
//!
//! # Example
//!
//! ```no_run
//! use filetally::target::Manifest;
//! use filetally::worker::{Worker, WorkerSettings};
//! use std::path::Path;
//!
//! # async fn demo() -> anyhow::Result<()> {
//! let manifest = Manifest::from_file(Path::new("data/list.txt"))?;
//! let worker = Worker::new(WorkerSettings::default());
//!
//! for task in manifest.tasks() {
//!     println!("{}", worker.run(&task).await);
//! }
//! # Ok(())
//! # }
//! ```

pub mod pool;

use crate::config::workload::FailurePolicy;
use crate::error::WorkerFault;
use crate::stats::{FileResult, FileStats};
use crate::target::FileTask;
use std::time::Duration;
use tracing::debug;

/// Prefix of the simulated-delay marker line
pub const SLEEP_MARKER: &str = "#sleep=";

/// Per-run settings a worker needs
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorkerSettings {
    /// Per-entry timeout, in time units
    pub timeout: f64,
    /// Wall-clock length of one time unit
    pub time_unit: Duration,
    /// How faults are reported
    pub failure_policy: FailurePolicy,
}

impl Default for WorkerSettings {
    fn default() -> Self {
        Self {
            timeout: 2.0,
            time_unit: Duration::from_secs(1),
            failure_policy: FailurePolicy::Uniform,
        }
    }
}

/// Processes single manifest entries
///
/// Workers hold no mutable state; one instance can be cloned into every
/// pool job.
#[derive(Debug, Clone)]
pub struct Worker {
    settings: WorkerSettings,
}

impl Worker {
    pub fn new(settings: WorkerSettings) -> Self {
        Self { settings }
    }

    /// Process a task and apply the failure policy to the outcome
    pub async fn run(&self, task: &FileTask) -> FileResult {
        match self.process(task).await {
            Ok(stats) => {
                debug!(index = task.index, path = %task.relative_path, lines = stats.lines, words = stats.words, "Entry counted");
                FileResult::ok(task.relative_path.as_str(), stats)
            }
            Err(fault) => {
                debug!(index = task.index, path = %task.relative_path, error = %fault, "Entry failed");
                match self.settings.failure_policy {
                    FailurePolicy::Uniform => FileResult::timeout(task.relative_path.as_str()),
                    FailurePolicy::Detailed => {
                        FileResult::failed(task.relative_path.as_str(), fault.reason())
                    }
                }
            }
        }
    }

    /// Read, delay, and count one entry
    pub async fn process(&self, task: &FileTask) -> Result<FileStats, WorkerFault> {
        let path = task.absolute_path();
        let content = tokio::fs::read_to_string(&path)
            .await
            .map_err(|source| WorkerFault::Read { path, source })?;

        let mut lines = content.lines().peekable();

        if let Some(marker) = lines.peek().and_then(|first| parse_sleep_marker(first)) {
            let units = marker?;
            self.delay(units).await?;
            lines.next();
        }

        Ok(FileStats::from_lines(lines))
    }

    /// Suspend for `units` time units, refusing delays longer than the timeout
    async fn delay(&self, units: u64) -> Result<(), WorkerFault> {
        if units as f64 > self.settings.timeout {
            return Err(WorkerFault::DelayExceedsTimeout {
                requested: units,
                timeout: self.settings.timeout,
            });
        }

        if units > 0 {
            tokio::time::sleep(self.settings.time_unit.mul_f64(units as f64)).await;
        }
        Ok(())
    }
}

/// Parse a `#sleep=N` line
///
/// Returns `None` when `line` is not a marker at all, and an error when it
/// starts with the marker prefix but carries no non-negative integer.
pub fn parse_sleep_marker(line: &str) -> Option<Result<u64, WorkerFault>> {
    let value = line.strip_prefix(SLEEP_MARKER)?;
    Some(
        value
            .trim()
            .parse::<u64>()
            .map_err(|_| WorkerFault::MalformedMarker {
                line: line.to_string(),
            }),
    )
}
