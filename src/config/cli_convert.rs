//! CLI to Config conversion utilities

use crate::config::cli;
use crate::config::workload;
use crate::util::time::parse_duration;
use crate::Result;
use std::time::Duration;

/// Parse a time unit string (e.g., "1s", "250ms") to a non-zero duration
pub fn parse_time_unit(s: &str) -> Result<Duration> {
    let unit = parse_duration(s)?;
    if unit.is_zero() {
        anyhow::bail!("Time unit must be longer than zero: {}", s);
    }
    Ok(unit)
}

/// Time unit as whole milliseconds, the granularity the config file stores
pub fn time_unit_to_millis(unit: Duration) -> Result<u64> {
    let millis = u64::try_from(unit.as_millis())?;
    if millis == 0 {
        anyhow::bail!("Time unit must be at least 1ms, got {:?}", unit);
    }
    Ok(millis)
}

/// Convert CLI FailurePolicy to workload FailurePolicy
pub fn convert_failure_policy(cli_policy: cli::FailurePolicy) -> workload::FailurePolicy {
    match cli_policy {
        cli::FailurePolicy::Uniform => workload::FailurePolicy::Uniform,
        cli::FailurePolicy::Detailed => workload::FailurePolicy::Detailed,
    }
}
