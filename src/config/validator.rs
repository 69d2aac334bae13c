//! Configuration validation

use super::*;
use crate::Result;
use tracing::warn;

/// Pool sizes above this get a warning; they rarely help I/O-bound runs
const LARGE_POOL_WARNING: usize = 512;

/// Validate complete configuration
pub fn validate_config(config: &Config) -> Result<()> {
    validate_aggregation(&config.aggregation)?;
    Ok(())
}

/// Validate aggregation configuration
pub fn validate_aggregation(aggregation: &AggregationConfig) -> Result<()> {
    if aggregation.workers == 0 {
        anyhow::bail!("workers must be at least 1, got 0");
    }

    if !aggregation.timeout.is_finite() || aggregation.timeout <= 0.0 {
        anyhow::bail!(
            "timeout must be a positive number of time units, got {}",
            aggregation.timeout
        );
    }

    if aggregation.time_unit_ms == 0 {
        anyhow::bail!("time_unit_ms must be at least 1");
    }

    let deadline_secs = aggregation.timeout * aggregation.time_unit_ms as f64 / 1000.0;
    if Duration::try_from_secs_f64(deadline_secs).is_err() {
        anyhow::bail!(
            "timeout of {} units at {}ms per unit is out of range",
            aggregation.timeout,
            aggregation.time_unit_ms
        );
    }

    if aggregation.workers > LARGE_POOL_WARNING {
        warn!(
            workers = aggregation.workers,
            "Very large worker pool; each worker may hold an open file"
        );
    }

    if deadline_secs < 0.01 {
        warn!(
            deadline_ms = deadline_secs * 1000.0,
            "Deadline below 10ms; most entries will likely time out"
        );
    }

    Ok(())
}
