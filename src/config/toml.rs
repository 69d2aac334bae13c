//! TOML configuration file parsing

use super::*;
use crate::config::cli::Cli;
use crate::config::cli_convert::{convert_failure_policy, parse_time_unit, time_unit_to_millis};
use crate::Result;
use anyhow::Context;
use std::fs;
use std::path::Path;

/// Parse TOML configuration file
pub fn parse_toml_file(path: &Path) -> Result<Config> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    parse_toml_string(&contents)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Parse TOML configuration from string
pub fn parse_toml_string(contents: &str) -> Result<Config> {
    let config: Config = ::toml::from_str(contents)
        .context("Failed to parse TOML configuration")?;

    Ok(config)
}

/// Merge CLI arguments with TOML configuration (CLI takes precedence)
pub fn merge_cli_with_config(cli: &Cli, mut config: Config) -> Result<Config> {
    if let Some(workers) = cli.workers {
        config.aggregation.workers = workers;
    }
    if let Some(timeout) = cli.timeout {
        config.aggregation.timeout = timeout;
    }
    if let Some(ref unit) = cli.time_unit {
        let unit = parse_time_unit(unit).context("Invalid --time-unit")?;
        config.aggregation.time_unit_ms = time_unit_to_millis(unit)?;
    }
    if let Some(policy) = cli.failure_policy {
        config.aggregation.failure_policy = convert_failure_policy(policy);
    }

    // Flags can only switch options on
    if cli.pretty {
        config.output.pretty = true;
    }
    if cli.dry_run {
        config.runtime.dry_run = true;
    }
    if cli.debug {
        config.runtime.debug = true;
    }

    Ok(config)
}

/// Load the effective configuration: optional file, then CLI overrides
pub fn load_config(cli: &Cli) -> Result<Config> {
    let base = match cli.config {
        Some(ref path) => parse_toml_file(path)?,
        None => Config::default(),
    };
    merge_cli_with_config(cli, base)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use tempfile::TempDir;

    #[test]
    fn test_parse_toml_basic() {
        let toml = r#"
[aggregation]
workers = 8
timeout = 3.5
time_unit_ms = 250
failure_policy = "detailed"

[output]
pretty = true
"#;

        let config = parse_toml_string(toml).unwrap();
        assert_eq!(config.aggregation.workers, 8);
        assert_eq!(config.aggregation.timeout, 3.5);
        assert_eq!(config.aggregation.time_unit_ms, 250);
        assert_eq!(config.aggregation.failure_policy, FailurePolicy::Detailed);
        assert!(config.output.pretty);
        assert!(!config.runtime.debug);
    }

    #[test]
    fn test_parse_toml_empty_uses_defaults() {
        let config = parse_toml_string("").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_parse_toml_partial_section() {
        let config = parse_toml_string("[aggregation]\nworkers = 2\n").unwrap();
        assert_eq!(config.aggregation.workers, 2);
        assert_eq!(config.aggregation.timeout, 2.0);
        assert_eq!(config.aggregation.time_unit_ms, 1000);
    }

    #[test]
    fn test_parse_toml_rejects_bad_policy() {
        assert!(parse_toml_string("[aggregation]\nfailure_policy = \"loud\"\n").is_err());
    }

    #[test]
    fn test_merge_cli_overrides() {
        let config = parse_toml_string("[aggregation]\nworkers = 8\ntimeout = 5.0\n").unwrap();
        let cli = Cli::try_parse_from([
            "filetally",
            "list.txt",
            "--workers",
            "3",
            "--time-unit",
            "100ms",
            "--debug",
        ])
        .unwrap();

        let merged = merge_cli_with_config(&cli, config).unwrap();
        assert_eq!(merged.aggregation.workers, 3);
        assert_eq!(merged.aggregation.timeout, 5.0);
        assert_eq!(merged.aggregation.time_unit_ms, 100);
        assert!(merged.runtime.debug);
    }

    #[test]
    fn test_merge_rejects_bad_time_unit() {
        let cli = Cli::try_parse_from(["filetally", "m", "--time-unit", "whenever"]).unwrap();
        assert!(merge_cli_with_config(&cli, Config::default()).is_err());
    }

    #[test]
    fn test_load_config_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("filetally.toml");
        fs::write(&path, "[aggregation]\ntimeout = 4.0\n[runtime]\ndry_run = true\n").unwrap();

        let cli = Cli::try_parse_from([
            "filetally",
            "list.txt",
            "--config",
            path.to_str().unwrap(),
        ])
        .unwrap();

        let config = load_config(&cli).unwrap();
        assert_eq!(config.aggregation.timeout, 4.0);
        assert!(config.runtime.dry_run);
    }

    #[test]
    fn test_load_config_missing_file() {
        let cli = Cli::try_parse_from(["filetally", "m", "--config", "/nonexistent/filetally.toml"])
            .unwrap();
        assert!(load_config(&cli).is_err());
    }
}
