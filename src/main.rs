//! filetally CLI entry point
//!
//! Runs one aggregation and writes the result array as JSON to stdout.
//! Logs go to stderr.

use anyhow::Context;
use filetally::config::{cli::Cli, toml::load_config, validator::validate_config};
use filetally::coordinator::aggregate_with;
use filetally::stats::aggregator::RunSummary;
use filetally::target::Manifest;
use filetally::Result;
use std::io::Write;
use std::time::Instant;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let cli = Cli::parse_args();
    cli.validate()?;

    let config = load_config(&cli).context("Failed to load configuration")?;
    init_logging(config.runtime.debug)?;

    validate_config(&config).context("Configuration validation failed")?;
    debug!("{}", config);

    let request = config.to_request(&cli.manifest);

    if config.runtime.dry_run {
        let manifest = Manifest::from_file(&request.manifest_path)?;
        info!(
            entries = manifest.len(),
            base_dir = %manifest.base_dir().display(),
            "Dry run - manifest and configuration validated"
        );
        return Ok(());
    }

    let start = Instant::now();
    let results = aggregate_with(request)?;

    let summary = RunSummary::from_results(&results);
    let elapsed_secs = start.elapsed().as_secs_f64();
    if summary.all_ok() {
        info!(elapsed_secs, "{}", summary);
    } else {
        warn!(elapsed_secs, "{}", summary);
    }

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    if config.output.pretty {
        serde_json::to_writer_pretty(&mut out, &results)?;
    } else {
        serde_json::to_writer(&mut out, &results)?;
    }
    writeln!(out)?;

    Ok(())
}

/// Install the stderr tracing subscriber; `RUST_LOG` wins unless `--debug` is set
fn init_logging(debug: bool) -> Result<()> {
    let filter = if debug {
        EnvFilter::new("filetally=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("filetally=info"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    Ok(())
}
