//! filetally - concurrent per-file statistics over a manifest
//!
//! filetally reads a manifest of relative file paths and counts lines and
//! words in every listed file. Entries are processed concurrently under a
//! bounded worker pool, each entry gets its own deadline, and the output
//! always follows manifest order no matter which entry finishes first.
//!
//! # Architecture
//!
//! - **Manifest reader** (`target`): ordered, trimmed, non-blank entries
//! - **Worker** (`worker`): reads one file, honours `#sleep=N`, counts
//! - **Worker pool** (`worker::pool`): semaphore-bounded, best-effort deadlines
//! - **Coordinator** (`coordinator`): submits everything, fills index-addressed slots
//! - **Results** (`stats`): `ok` / `timeout` records and run summaries
//!
//! # Example
//!
//! ```no_run
//! use filetally::coordinator::aggregate;
//!
//! let results = aggregate("data/list.txt", 4, 2.0)?;
//! println!("{}", serde_json::to_string_pretty(&results)?);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod config;
pub mod coordinator;
pub mod error;
pub mod stats;
pub mod target;
pub mod util;
pub mod worker;

// Re-export commonly used types
pub use config::Config;
pub use coordinator::{aggregate, aggregate_with, AggregationRequest, Aggregator};
pub use error::AggregateError;
pub use stats::FileResult;

/// Result type used by the application layer (configuration, CLI)
pub type Result<T> = anyhow::Result<T>;
