//! Bounded worker pool
//!
//! The pool runs submitted jobs on the Tokio runtime, at most `size` at a time.
//! Submission never blocks: every job is spawned immediately and queues on the
//! pool's semaphore until a slot frees. Queue order is roughly FIFO but not
//! guaranteed, and completion order is unrelated to submission order. The pool
//! does no result reordering.
//!
//! Each submission returns a [`TaskHandle`]. Waiting on a handle with a
//! deadline is best-effort: when the deadline passes the caller stops
//! waiting, but the job is not interrupted. It keeps its slot until it
//! finishes and its output is dropped. The deadline bounds the whole wait,
//! including time the job spends queued behind slots held by other jobs,
//! so a job that never finishes cannot hold up callers waiting on others.
//!
//! # Example
//!
//! ```
//! use filetally::worker::pool::{WaitError, WorkerPool};
//! use std::time::Duration;
//!
//! # #[tokio::main]
//! # async fn main() {
//! let pool = WorkerPool::new(2);
//!
//! let fast = pool.submit(async { 21 * 2 });
//! let slow = pool.submit(async {
//!     tokio::time::sleep(Duration::from_secs(5)).await;
//!     0
//! });
//!
//! assert_eq!(fast.wait(Some(Duration::from_secs(1))).await, Ok(42));
//! assert_eq!(
//!     slow.wait(Some(Duration::from_millis(10))).await,
//!     Err(WaitError::Deadline)
//! );
//! # }
//! ```

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::{oneshot, Semaphore};
use tracing::trace;

/// Why waiting on a handle produced no output
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitError {
    /// The deadline passed before the job finished; the job was abandoned
    #[error("deadline expired before the job finished")]
    Deadline,
    /// The job panicked or was dropped before reporting
    #[error("job ended without reporting an output")]
    Lost,
}

/// Fixed-size concurrency limiter for async jobs
#[derive(Debug, Clone)]
pub struct WorkerPool {
    slots: Arc<Semaphore>,
    size: usize,
}

impl WorkerPool {
    /// Create a pool running at most `size` jobs at once (minimum 1)
    pub fn new(size: usize) -> Self {
        let size = size.max(1);
        Self {
            slots: Arc::new(Semaphore::new(size)),
            size,
        }
    }

    /// Concurrency bound
    pub fn size(&self) -> usize {
        self.size
    }

    /// Slots not currently held by a running job
    pub fn available(&self) -> usize {
        self.slots.available_permits()
    }

    /// Queue a job and return a handle to its eventual output
    ///
    /// Must be called from within a Tokio runtime.
    pub fn submit<F, T>(&self, job: F) -> TaskHandle<T>
    where
        F: Future<Output = T> + Send + 'static,
        T: Send + 'static,
    {
        let (output_tx, output_rx) = oneshot::channel();
        let slots = Arc::clone(&self.slots);

        tokio::spawn(async move {
            // The semaphore is never closed; an error here only means the
            // pool is being torn down, and dropping the sender reports Lost.
            let Ok(permit) = slots.acquire_owned().await else {
                return;
            };
            trace!("Job dispatched");

            let output = job.await;
            drop(permit);

            // The receiver is gone when the caller gave up on this job
            if output_tx.send(output).is_err() {
                trace!("Output of abandoned job discarded");
            }
        });

        TaskHandle { output: output_rx }
    }
}

/// Handle to one submitted job
#[derive(Debug)]
pub struct TaskHandle<T> {
    output: oneshot::Receiver<T>,
}

impl<T> TaskHandle<T> {
    /// Wait for the job's output
    ///
    /// The deadline window opens when `wait` is called and covers both the
    /// time the job is still queued for a slot and the time it runs.
    /// Dropping the handle, or returning [`WaitError::Deadline`], detaches
    /// from the job without stopping it.
    pub async fn wait(self, deadline: Option<Duration>) -> Result<T, WaitError> {
        let output = async move { self.output.await.map_err(|_| WaitError::Lost) };

        match deadline {
            None => output.await,
            Some(window) => tokio::time::timeout(window, output)
                .await
                .unwrap_or(Err(WaitError::Deadline)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn test_submit_and_wait() {
        let pool = WorkerPool::new(2);
        let handle = pool.submit(async { "done" });
        assert_eq!(handle.wait(None).await, Ok("done"));
    }

    #[tokio::test]
    async fn test_zero_size_is_clamped() {
        let pool = WorkerPool::new(0);
        assert_eq!(pool.size(), 1);
        assert_eq!(pool.submit(async { 1 }).wait(None).await, Ok(1));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrency_bound_respected() {
        let pool = WorkerPool::new(2);
        let running = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));

        let handles: Vec<_> = (0..6)
            .map(|_| {
                let running = Arc::clone(&running);
                let peak = Arc::clone(&peak);
                pool.submit(async move {
                    let now = running.fetch_add(1, Ordering::SeqCst) + 1;
                    peak.fetch_max(now, Ordering::SeqCst);
                    tokio::time::sleep(Duration::from_millis(30)).await;
                    running.fetch_sub(1, Ordering::SeqCst);
                })
            })
            .collect();

        for handle in handles {
            handle.wait(None).await.unwrap();
        }
        assert_eq!(peak.load(Ordering::SeqCst), 2);
        assert_eq!(pool.available(), 2);
    }

    #[tokio::test]
    async fn test_deadline_abandons_without_cancelling() {
        let pool = WorkerPool::new(1);
        let finished = Arc::new(AtomicUsize::new(0));

        let flag = Arc::clone(&finished);
        let handle = pool.submit(async move {
            tokio::time::sleep(Duration::from_millis(200)).await;
            flag.fetch_add(1, Ordering::SeqCst);
        });

        let start = std::time::Instant::now();
        assert_eq!(
            handle.wait(Some(Duration::from_millis(20))).await,
            Err(WaitError::Deadline)
        );
        assert!(start.elapsed() < Duration::from_millis(150));

        // The abandoned job still holds the only slot and runs to completion
        assert_eq!(pool.available(), 0);
        tokio::time::sleep(Duration::from_millis(300)).await;
        assert_eq!(finished.load(Ordering::SeqCst), 1);
        assert_eq!(pool.available(), 1);
    }

    #[tokio::test]
    async fn test_window_opens_at_wait() {
        let pool = WorkerPool::new(1);
        let first = pool.submit(async {
            tokio::time::sleep(Duration::from_millis(100)).await;
            1
        });
        let second = pool.submit(async {
            tokio::time::sleep(Duration::from_millis(50)).await;
            2
        });

        // The second wait starts once the first job is done and its slot is free
        assert_eq!(first.wait(Some(Duration::from_millis(150))).await, Ok(1));
        assert_eq!(second.wait(Some(Duration::from_millis(80))).await, Ok(2));
    }

    #[tokio::test]
    async fn test_queued_job_deadline_is_bounded() {
        let pool = WorkerPool::new(1);
        let stuck = pool.submit(std::future::pending::<u32>());
        let queued = pool.submit(async { 5u32 });

        let start = std::time::Instant::now();
        assert_eq!(stuck.wait(Some(Duration::from_millis(30))).await, Err(WaitError::Deadline));
        // Never dispatched: the only slot is still held by the stuck job
        assert_eq!(queued.wait(Some(Duration::from_millis(30))).await, Err(WaitError::Deadline));
        assert!(start.elapsed() < Duration::from_millis(500));
        assert_eq!(pool.available(), 0);
    }

    #[tokio::test]
    async fn test_panicking_job_is_lost() {
        let pool = WorkerPool::new(1);
        let handle = pool.submit(async {
            if true {
                panic!("worker blew up");
            }
            0u32
        });
        assert_eq!(handle.wait(Some(Duration::from_secs(1))).await, Err(WaitError::Lost));

        // The slot is released during unwinding
        let next = pool.submit(async { 7u32 });
        assert_eq!(next.wait(Some(Duration::from_secs(1))).await, Ok(7));
    }
}
