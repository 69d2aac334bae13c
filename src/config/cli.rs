//! CLI argument parsing using clap

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Failure reporting policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FailurePolicy {
    /// Report every fault as "timeout"
    Uniform,
    /// Keep "timeout" for deadline expiry; report other faults as "failed" with a reason
    Detailed,
}

/// filetally - concurrent line and word counts over a manifest of files
#[derive(Parser, Debug)]
#[command(name = "filetally")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Manifest file: one path per line, relative to the manifest's directory
    #[arg(value_name = "MANIFEST")]
    pub manifest: PathBuf,

    /// TOML configuration file (CLI flags take precedence)
    #[arg(short = 'c', long, env = "FILETALLY_CONFIG")]
    pub config: Option<PathBuf>,

    /// Number of concurrent workers [default: 4]
    #[arg(short = 'w', long)]
    pub workers: Option<usize>,

    /// Per-entry timeout in time units [default: 2]
    #[arg(short = 't', long)]
    pub timeout: Option<f64>,

    /// Length of one time unit (e.g., 1s, 250ms) [default: 1s]
    #[arg(long)]
    pub time_unit: Option<String>,

    /// How per-entry faults are reported [default: uniform]
    #[arg(long, value_enum)]
    pub failure_policy: Option<FailurePolicy>,

    /// Pretty-print the JSON output
    #[arg(long)]
    pub pretty: bool,

    /// Parse the manifest and configuration, then exit without processing
    #[arg(long)]
    pub dry_run: bool,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}

impl Cli {
    /// Parse CLI arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate CLI arguments that clap cannot check on its own
    pub fn validate(&self) -> crate::Result<()> {
        if let Some(workers) = self.workers {
            if workers == 0 {
                anyhow::bail!("--workers must be at least 1");
            }
        }
        if let Some(timeout) = self.timeout {
            if !timeout.is_finite() || timeout <= 0.0 {
                anyhow::bail!("--timeout must be a positive number, got {}", timeout);
            }
        }
        Ok(())
    }
}
