//! Aggregation coordinator
//!
//! Orchestrates one aggregation run: reads the manifest, submits every entry
//! to the worker pool, waits for each entry under its own deadline, and places
//! each outcome into the output slot matching the entry's manifest position.
//!
//! Per-entry lifecycle:
//!
//! ```text
//! Pending ──▶ Dispatched ──▶ Completed(ok | timeout)
//!                       └──▶ Abandoned(timeout)
//! ```
//!
//! Only a manifest that cannot be read fails the run. Every other fault is
//! confined to its own entry.
//!
//! # Example
//!
//! ```no_run
//! use filetally::coordinator::aggregate;
//!
//! let results = aggregate("data/list.txt", 4, 2.0)?;
//! for result in &results {
//!     println!("{}", result);
//! }
//! # Ok::<(), filetally::error::AggregateError>(())
//! ```

use crate::config::workload::FailurePolicy;
use crate::error::AggregateError;
use crate::stats::{FailureReason, FileResult};
use crate::target::{FileTask, Manifest};
use crate::util::time::format_duration;
use crate::worker::pool::{WaitError, WorkerPool};
use crate::worker::{Worker, WorkerSettings};
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Default number of concurrently running workers
pub const DEFAULT_WORKERS: usize = 4;

/// Default per-entry timeout, in time units
pub const DEFAULT_TIMEOUT: f64 = 2.0;

/// Default length of one time unit
pub const DEFAULT_TIME_UNIT: Duration = Duration::from_secs(1);

/// Parameters of one aggregation run
#[derive(Debug, Clone, PartialEq)]
pub struct AggregationRequest {
    /// Manifest listing the entries; its directory is the base for every entry
    pub manifest_path: PathBuf,
    /// Maximum number of entries processed at once
    pub workers: usize,
    /// Per-entry timeout, in time units
    pub timeout: f64,
    /// Wall-clock length of one time unit (timeout and `#sleep` steps)
    pub time_unit: Duration,
    /// How per-entry faults are reported
    pub failure_policy: FailurePolicy,
}

impl AggregationRequest {
    /// Request with the default workers, timeout and time unit
    pub fn new(manifest_path: impl Into<PathBuf>) -> Self {
        Self {
            manifest_path: manifest_path.into(),
            workers: DEFAULT_WORKERS,
            timeout: DEFAULT_TIMEOUT,
            time_unit: DEFAULT_TIME_UNIT,
            failure_policy: FailurePolicy::default(),
        }
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    pub fn with_timeout(mut self, timeout: f64) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_time_unit(mut self, time_unit: Duration) -> Self {
        self.time_unit = time_unit;
        self
    }

    pub fn with_failure_policy(mut self, failure_policy: FailurePolicy) -> Self {
        self.failure_policy = failure_policy;
        self
    }

    /// Check parameter ranges
    pub fn validate(&self) -> Result<(), AggregateError> {
        if self.workers == 0 {
            return Err(AggregateError::InvalidRequest(
                "workers must be at least 1".to_string(),
            ));
        }
        if !self.timeout.is_finite() || self.timeout <= 0.0 {
            return Err(AggregateError::InvalidRequest(format!(
                "timeout must be a positive number of time units, got {}",
                self.timeout
            )));
        }
        if self.time_unit.is_zero() {
            return Err(AggregateError::InvalidRequest(
                "time unit must be longer than zero".to_string(),
            ));
        }
        if Duration::try_from_secs_f64(self.time_unit.as_secs_f64() * self.timeout).is_err() {
            return Err(AggregateError::InvalidRequest(format!(
                "timeout of {} units is too large",
                self.timeout
            )));
        }
        Ok(())
    }

    /// Per-entry deadline as wall-clock time
    pub fn deadline(&self) -> Duration {
        self.time_unit.mul_f64(self.timeout)
    }

    fn worker_settings(&self) -> WorkerSettings {
        WorkerSettings {
            timeout: self.timeout,
            time_unit: self.time_unit,
            failure_policy: self.failure_policy,
        }
    }
}

/// Runs aggregation requests
#[derive(Debug, Clone)]
pub struct Aggregator {
    request: AggregationRequest,
}

impl Aggregator {
    /// Validate `request` and build an aggregator for it
    pub fn new(request: AggregationRequest) -> Result<Self, AggregateError> {
        request.validate()?;
        Ok(Self { request })
    }

    pub fn request(&self) -> &AggregationRequest {
        &self.request
    }

    /// Run the aggregation on the current Tokio runtime
    ///
    /// The returned sequence has one result per non-blank manifest line, in
    /// manifest order.
    pub async fn run(&self) -> Result<Vec<FileResult>, AggregateError> {
        let manifest = Manifest::load(&self.request.manifest_path).await?;
        Ok(self.run_manifest(&manifest).await)
    }

    /// Run the aggregation over an already parsed manifest
    pub async fn run_manifest(&self, manifest: &Manifest) -> Vec<FileResult> {
        let start = Instant::now();
        let tasks = manifest.tasks();
        let deadline = self.request.deadline();

        info!(
            manifest = %self.request.manifest_path.display(),
            entries = tasks.len(),
            workers = self.request.workers,
            deadline = %format_duration(deadline),
            "Starting aggregation"
        );

        let mut slots: Vec<Option<FileResult>> = (0..tasks.len()).map(|_| None).collect();

        let pool = WorkerPool::new(self.request.workers);
        let worker = Worker::new(self.request.worker_settings());

        let handles: Vec<_> = tasks
            .iter()
            .map(|task| {
                let worker = worker.clone();
                let task = task.clone();
                pool.submit(async move { worker.run(&task).await })
            })
            .collect();

        for (task, handle) in tasks.iter().zip(handles) {
            let result = match handle.wait(Some(deadline)).await {
                Ok(result) => result,
                Err(e) => self.unfinished_result(task, e),
            };

            let slot = &mut slots[task.index];
            debug_assert!(slot.is_none(), "slot {} written twice", task.index);
            *slot = Some(result);
        }

        let results: Vec<FileResult> = slots
            .into_iter()
            .zip(&tasks)
            .map(|(slot, task)| slot.unwrap_or_else(|| FileResult::timeout(task.relative_path.as_str())))
            .collect();

        info!(
            entries = results.len(),
            ok = results.iter().filter(|r| r.is_ok()).count(),
            elapsed = %format_duration(start.elapsed()),
            "Aggregation finished"
        );

        results
    }

    /// Result for an entry whose worker did not report in time
    fn unfinished_result(&self, task: &FileTask, error: WaitError) -> FileResult {
        match error {
            WaitError::Deadline => {
                warn!(index = task.index, path = %task.relative_path, "Deadline expired; abandoning worker");
                FileResult::timeout(task.relative_path.as_str())
            }
            WaitError::Lost => {
                debug!(index = task.index, path = %task.relative_path, "Worker ended without a result");
                match self.request.failure_policy {
                    FailurePolicy::Uniform => FileResult::timeout(task.relative_path.as_str()),
                    FailurePolicy::Detailed => {
                        FileResult::failed(task.relative_path.as_str(), FailureReason::Aborted)
                    }
                }
            }
        }
    }
}

/// Aggregate a manifest with explicit workers and timeout (in seconds)
///
/// Blocking entry point. Starts its own runtime, so it must not be called
/// from within an async context; use [`Aggregator::run`] there.
pub fn aggregate(
    manifest_path: impl Into<PathBuf>,
    workers: usize,
    timeout_secs: f64,
) -> Result<Vec<FileResult>, AggregateError> {
    aggregate_with(
        AggregationRequest::new(manifest_path)
            .with_workers(workers)
            .with_timeout(timeout_secs),
    )
}

/// Blocking entry point for a full request
///
/// Workers still running when the last slot is filled are left to the
/// runtime's background shutdown; the call returns without waiting for them.
pub fn aggregate_with(request: AggregationRequest) -> Result<Vec<FileResult>, AggregateError> {
    let aggregator = Aggregator::new(request)?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(aggregator.request().workers.clamp(1, 16))
        .enable_all()
        .build()
        .map_err(AggregateError::Runtime)?;

    let results = runtime.block_on(aggregator.run());
    runtime.shutdown_background();
    results
}
