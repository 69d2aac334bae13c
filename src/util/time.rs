//! Timing utilities
//!
//! Parsing and formatting of the wall-clock durations used for time units,
//! deadlines, and run timings in log output.

use crate::Result;
use anyhow::Context;
use std::time::Duration;

/// Format a duration in human-readable form
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use filetally::util::time::format_duration;
///
/// assert_eq!(format_duration(Duration::from_nanos(500)), "500ns");
/// assert_eq!(format_duration(Duration::from_nanos(1500)), "1.50us");
/// assert_eq!(format_duration(Duration::from_micros(2500)), "2.50ms");
/// assert_eq!(format_duration(Duration::from_secs(5)), "5.00s");
/// ```
pub fn format_duration(duration: Duration) -> String {
    let nanos = duration.as_nanos();

    if nanos < 1_000 {
        format!("{}ns", nanos)
    } else if nanos < 1_000_000 {
        format!("{:.2}us", nanos as f64 / 1_000.0)
    } else if nanos < 1_000_000_000 {
        format!("{:.2}ms", nanos as f64 / 1_000_000.0)
    } else {
        format!("{:.2}s", nanos as f64 / 1_000_000_000.0)
    }
}

/// Parse a duration string (e.g. "250ms", "1s", "500us", "2m")
///
/// A bare number is taken as milliseconds.
///
/// ```
/// use std::time::Duration;
/// use filetally::util::time::parse_duration;
///
/// assert_eq!(parse_duration("250ms").unwrap(), Duration::from_millis(250));
/// assert_eq!(parse_duration("1s").unwrap(), Duration::from_secs(1));
/// ```
pub fn parse_duration(s: &str) -> Result<Duration> {
    let s = s.trim().to_lowercase();

    let (num_str, micros_per_unit) = if let Some(n) = s.strip_suffix("us") {
        (n, 1u64)
    } else if let Some(n) = s.strip_suffix("ms") {
        (n, 1_000)
    } else if let Some(n) = s.strip_suffix("sec") {
        (n, 1_000_000)
    } else if let Some(n) = s.strip_suffix('s') {
        (n, 1_000_000)
    } else if let Some(n) = s.strip_suffix("min") {
        (n, 60_000_000)
    } else if let Some(n) = s.strip_suffix('m') {
        (n, 60_000_000)
    } else {
        (s.as_str(), 1_000)
    };

    let num: u64 = num_str
        .trim()
        .parse()
        .with_context(|| format!("Invalid duration format: {}", s))?;

    let micros = num
        .checked_mul(micros_per_unit)
        .with_context(|| format!("Duration out of range: {}", s))?;

    Ok(Duration::from_micros(micros))
}
