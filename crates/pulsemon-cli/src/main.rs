mod config;

use anyhow::{Context, Result};
use config::CliConfig;
use pulsemon_common::types::{AlertDirection, RawRecord};
use pulsemon_engine::monitor::Monitor;
use std::io::{BufRead, BufReader};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[allow(clippy::print_stderr)]
fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  pulsemon [config.toml] [events.jsonl]    Monitor a JSON-Lines event stream");
    eprintln!();
    eprintln!("Events are read from stdin when the file argument is omitted.");
    eprintln!("Each line: {{\"timestamp\": <ISO-8601|epoch secs>, \"outcome\": \"success\"|\"failure\", \"source\": <optional>}}");
    eprintln!("Exit codes: 0 no alert, 1 alert triggered, 2 configuration/usage error.");
}

#[derive(Debug, Default)]
struct StreamStats {
    lines: u64,
    ingested: u64,
    skipped: u64,
    filtered: u64,
    triggers: u64,
    clears: u64,
}

fn parse_record(line: &str) -> Result<RawRecord, serde_json::Error> {
    serde_json::from_str(line)
}

/// Events without a source always pass the filter; sourced events must match
/// the glob pattern.
fn source_allowed(pattern: Option<&str>, source: Option<&str>) -> bool {
    match (pattern, source) {
        (None, _) | (Some(_), None) | (Some("*"), _) => true,
        (Some(pattern), Some(source)) => glob_match::glob_match(pattern, source),
    }
}

fn run() -> Result<bool> {
    let args: Vec<String> = std::env::args().collect();
    if matches!(args.get(1).map(String::as_str), Some("--help" | "-h")) {
        print_usage();
        return Ok(false);
    }

    let config_path = args
        .get(1)
        .map(String::as_str)
        .unwrap_or("config/pulsemon.toml");
    let config = CliConfig::load(config_path)
        .with_context(|| format!("failed to load config '{config_path}'"))?;
    let mut monitor =
        Monitor::from_config(&config.monitor).context("invalid monitor configuration")?;

    tracing::info!(config = %config_path, "pulsemon starting");

    let reader: Box<dyn BufRead> = match args.get(2) {
        Some(path) => {
            let file = std::fs::File::open(path)
                .with_context(|| format!("failed to open event stream '{path}'"))?;
            Box::new(BufReader::new(file))
        }
        None => Box::new(BufReader::new(std::io::stdin())),
    };

    let mut stats = StreamStats::default();
    for line in reader.lines() {
        let line = line.context("failed to read event stream")?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        stats.lines += 1;

        let record = match parse_record(line) {
            Ok(record) => record,
            Err(e) => {
                stats.skipped += 1;
                tracing::warn!(line = stats.lines, error = %e, "Skipping malformed line");
                continue;
            }
        };

        if !source_allowed(config.source_filter.as_deref(), record.source.as_deref()) {
            stats.filtered += 1;
            continue;
        }

        match monitor.ingest_record(&record) {
            Ok(()) => stats.ingested += 1,
            Err(e) => {
                stats.skipped += 1;
                tracing::warn!(line = stats.lines, error = %e, "Skipping invalid event record");
                continue;
            }
        }

        for alert in monitor.check() {
            match alert.direction {
                AlertDirection::Trigger => stats.triggers += 1,
                AlertDirection::Clear => stats.clears += 1,
            }
            println!("{}", serde_json::to_string(&alert)?);
        }
    }

    if config.summary {
        println!("{}", serde_json::to_string(&monitor.summarize())?);
    }

    tracing::info!(
        lines = stats.lines,
        ingested = stats.ingested,
        skipped = stats.skipped,
        filtered = stats.filtered,
        triggers = stats.triggers,
        clears = stats.clears,
        "Stream ended"
    );

    Ok(stats.triggers > 0)
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(
                "pulsemon=info"
                    .parse()
                    .unwrap_or_else(|_| tracing_subscriber::filter::LevelFilter::INFO.into()),
            ),
        )
        .with_writer(std::io::stderr)
        .init();

    match run() {
        Ok(triggered) => {
            if triggered {
                ExitCode::from(1)
            } else {
                ExitCode::SUCCESS
            }
        }
        Err(e) => {
            let chain = format!("{e:#}");
            tracing::error!(error = %chain, "pulsemon failed");
            ExitCode::from(2)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_epoch_and_iso_timestamps() {
        let record = parse_record(r#"{"timestamp": 1772366400, "outcome": "failure"}"#).unwrap();
        assert!(record.source.is_none());
        assert!(record.timestamp.resolve().is_ok());

        let record = parse_record(
            r#"{"timestamp": "2026-03-01T12:00:00Z", "outcome": "success", "source": "web-01"}"#,
        )
        .unwrap();
        assert_eq!(record.source.as_deref(), Some("web-01"));
        assert_eq!(record.outcome, "success");
    }

    #[test]
    fn rejects_records_missing_outcome() {
        assert!(parse_record(r#"{"timestamp": 1772366400}"#).is_err());
        assert!(parse_record("not json").is_err());
    }

    #[test]
    fn source_filter_globs_sourced_events_only() {
        assert!(source_allowed(None, Some("web-01")));
        assert!(source_allowed(Some("web-*"), Some("web-01")));
        assert!(!source_allowed(Some("web-*"), Some("db-01")));
        assert!(source_allowed(Some("web-*"), None));
        assert!(source_allowed(Some("*"), Some("db-01")));
    }
}
