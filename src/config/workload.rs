//! Aggregation workload types
//!
//! Enum-valued settings shared between the config file, the CLI and the
//! coordinator.

use serde::{Deserialize, Serialize};
use std::fmt;

/// How per-entry faults are reported
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Every fault is reported as `timeout`
    #[default]
    Uniform,
    /// Deadline expiry stays `timeout`; worker faults become `failed` with a reason
    Detailed,
}

impl fmt::Display for FailurePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailurePolicy::Uniform => write!(f, "uniform"),
            FailurePolicy::Detailed => write!(f, "detailed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_uniform() {
        assert_eq!(FailurePolicy::default(), FailurePolicy::Uniform);
    }

    #[test]
    fn test_display() {
        assert_eq!(FailurePolicy::Uniform.to_string(), "uniform");
        assert_eq!(FailurePolicy::Detailed.to_string(), "detailed");
    }
}
