//! Configuration module
//!
//! Handles CLI argument parsing, TOML configuration files, and validation.

pub mod cli;
pub mod cli_convert;
pub mod toml;
pub mod validator;
pub mod workload;

use crate::coordinator::{AggregationRequest, DEFAULT_TIMEOUT, DEFAULT_WORKERS};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;
use workload::FailurePolicy;

/// Complete run configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub aggregation: AggregationConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub runtime: RuntimeConfig,
}

impl Config {
    /// Build the aggregation request for `manifest_path`
    pub fn to_request(&self, manifest_path: impl Into<PathBuf>) -> AggregationRequest {
        AggregationRequest::new(manifest_path)
            .with_workers(self.aggregation.workers)
            .with_timeout(self.aggregation.timeout)
            .with_time_unit(self.aggregation.time_unit())
            .with_failure_policy(self.aggregation.failure_policy)
    }
}

/// Aggregation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregationConfig {
    /// Number of concurrently running workers
    #[serde(default = "default_workers")]
    pub workers: usize,
    /// Per-entry timeout, in time units
    #[serde(default = "default_timeout")]
    pub timeout: f64,
    /// Length of one time unit in milliseconds
    #[serde(default = "default_time_unit_ms")]
    pub time_unit_ms: u64,
    /// How per-entry faults are reported
    #[serde(default)]
    pub failure_policy: FailurePolicy,
}

fn default_workers() -> usize {
    DEFAULT_WORKERS
}

fn default_timeout() -> f64 {
    DEFAULT_TIMEOUT
}

fn default_time_unit_ms() -> u64 {
    1000
}

impl AggregationConfig {
    pub fn time_unit(&self) -> Duration {
        Duration::from_millis(self.time_unit_ms)
    }
}

impl Default for AggregationConfig {
    fn default() -> Self {
        Self {
            workers: default_workers(),
            timeout: default_timeout(),
            time_unit_ms: default_time_unit_ms(),
            failure_policy: FailurePolicy::default(),
        }
    }
}

/// Output settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Pretty-print the JSON result array
    #[serde(default)]
    pub pretty: bool,
}

/// Runtime configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RuntimeConfig {
    /// Parse and validate only; do not process entries
    #[serde(default)]
    pub dry_run: bool,
    /// Enable debug logging
    #[serde(default)]
    pub debug: bool,
}

// Display trait implementations

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Configuration:")?;
        writeln!(f, "  Aggregation: {}", self.aggregation)?;
        writeln!(f, "  Output: {}", self.output)?;
        writeln!(f, "  Runtime: {}", self.runtime)?;
        Ok(())
    }
}

impl fmt::Display for AggregationConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "workers={}, timeout={} units, time_unit={}ms, failure_policy={}",
            self.workers, self.timeout, self.time_unit_ms, self.failure_policy
        )
    }
}

impl fmt::Display for OutputConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "json{}", if self.pretty { " (pretty)" } else { "" })
    }
}

impl fmt::Display for RuntimeConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut flags = Vec::new();
        if self.dry_run {
            flags.push("dry_run");
        }
        if self.debug {
            flags.push("debug");
        }
        if flags.is_empty() {
            write!(f, "default")
        } else {
            write!(f, "{}", flags.join(", "))
        }
    }
}
