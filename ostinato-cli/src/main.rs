//! CLI for the ostinato time-series engine.
//!
//! Provides commands for generating indexes, collecting partitioned series
//! jobs into local tables, and aligning series onto other indexes.

use std::path::PathBuf;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use ostinato::{DateTimeIndex, Frequency, Series, SeriesCollection, TimeSeries};
use serde::Deserialize;
use tracing_subscriber::EnvFilter;

/// ostinato — date-time indexing and aligned time-series collection CLI.
#[derive(Parser)]
#[command(name = "ostinato", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Available CLI commands.
#[derive(Subcommand)]
enum Commands {
    /// Generate a date-time index and print its timestamps.
    Index {
        /// Start timestamp (RFC3339) for a uniform index.
        #[arg(long, conflicts_with = "at")]
        start: Option<DateTime<Utc>>,

        /// Number of periods for a uniform index.
        #[arg(long, requires = "start", default_value = "10")]
        periods: i64,

        /// Frequency for a uniform index (e.g. "1d", "4h", "30m").
        #[arg(long, requires = "start", default_value = "1d")]
        every: String,

        /// Explicit timestamp (RFC3339) for an irregular index; repeatable.
        #[arg(long)]
        at: Vec<DateTime<Utc>>,

        /// Output format.
        #[arg(long, default_value = "csv")]
        format: OutputFormat,
    },

    /// Collect a partitioned job file into a local table.
    Collect {
        /// Path to the JSON job file.
        job: PathBuf,

        /// Output format.
        #[arg(long, default_value = "csv")]
        format: OutputFormat,
    },

    /// Align a series onto a target index.
    Align {
        /// Path to the JSON job file.
        job: PathBuf,

        /// Output format.
        #[arg(long, default_value = "csv")]
        format: OutputFormat,
    },
}

/// Output format for command results.
#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Comma-separated values.
    Csv,
    /// JSON object.
    Json,
}

/// One named vector in a job file.
#[derive(Deserialize)]
struct JobEntry {
    key: String,
    values: Vec<f64>,
}

/// Job file for `collect`: an index plus partitioned entries.
#[derive(Deserialize)]
struct CollectJob {
    index: DateTimeIndex,
    partitions: Vec<Vec<JobEntry>>,
}

/// Job file for `align`: a source series and a target index.
#[derive(Deserialize)]
struct AlignJob {
    key: String,
    index: DateTimeIndex,
    values: Vec<f64>,
    target: DateTimeIndex,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Index {
            start,
            periods,
            every,
            at,
            format,
        } => cmd_index(start, periods, &every, at, format),
        Commands::Collect { job, format } => cmd_collect(&job, format),
        Commands::Align { job, format } => cmd_align(&job, format),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

/// Implements `ostinato index`.
fn cmd_index(
    start: Option<DateTime<Utc>>,
    periods: i64,
    every: &str,
    at: Vec<DateTime<Utc>>,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let index = match start {
        Some(start) => {
            let frequency: Frequency = every.parse()?;
            DateTimeIndex::uniform(start, periods, frequency)?
        }
        None if !at.is_empty() => DateTimeIndex::irregular(at)?,
        None => return Err("provide either --start or at least one --at".into()),
    };

    match format {
        OutputFormat::Csv => {
            println!("timestamp");
            for ts in index.iter() {
                println!("{}", ts.to_rfc3339());
            }
        }
        OutputFormat::Json => {
            let timestamps: Vec<String> = index.iter().map(|ts| ts.to_rfc3339()).collect();
            println!("{}", serde_json::to_string_pretty(&timestamps)?);
        }
    }
    Ok(())
}

/// Implements `ostinato collect <job>`.
fn cmd_collect(job_path: &PathBuf, format: OutputFormat) -> Result<(), Box<dyn std::error::Error>> {
    let data = std::fs::read_to_string(job_path)?;
    let job: CollectJob = serde_json::from_str(&data)?;

    let index = job.index.into_shared();
    let partitions = job
        .partitions
        .into_iter()
        .map(|partition| {
            partition
                .into_iter()
                .map(|entry| (entry.key, entry.values))
                .collect()
        })
        .collect();

    let table = SeriesCollection::new(index, partitions)?.collect()?;
    print_table(&table, format)
}

/// Implements `ostinato align <job>`.
fn cmd_align(job_path: &PathBuf, format: OutputFormat) -> Result<(), Box<dyn std::error::Error>> {
    let data = std::fs::read_to_string(job_path)?;
    let job: AlignJob = serde_json::from_str(&data)?;

    let series = Series::new(job.key, job.index.into_shared(), job.values)?;
    let aligned = series.align_to(&job.target.into_shared());

    match format {
        OutputFormat::Csv => {
            println!("timestamp,{}", aligned.key());
            for (position, ts) in aligned.index().iter().enumerate() {
                let value = aligned.at(position)?;
                if Series::is_missing(value) {
                    println!("{},", ts.to_rfc3339());
                } else {
                    println!("{},{value}", ts.to_rfc3339());
                }
            }
        }
        OutputFormat::Json => {
            let body = serde_json::json!({
                "key": aligned.key(),
                "index": aligned.index().iter().map(|ts| ts.to_rfc3339()).collect::<Vec<_>>(),
                "values": nullable_values(aligned.values()),
            });
            println!("{}", serde_json::to_string_pretty(&body)?);
        }
    }
    Ok(())
}

/// Prints a collected table, keys sorted for deterministic output.
fn print_table(table: &TimeSeries, format: OutputFormat) -> Result<(), Box<dyn std::error::Error>> {
    let keys = table.sorted_keys();

    match format {
        OutputFormat::Csv => {
            println!("timestamp,{}", keys.join(","));
            for (position, ts) in table.index().iter().enumerate() {
                let mut row = ts.to_rfc3339();
                for key in &keys {
                    let value = table.get(key).expect("sorted key must exist").at(position)?;
                    row.push(',');
                    if !Series::is_missing(value) {
                        row.push_str(&value.to_string());
                    }
                }
                println!("{row}");
            }
        }
        OutputFormat::Json => {
            let series: serde_json::Map<String, serde_json::Value> = keys
                .iter()
                .map(|&key| {
                    let values = table.get(key).expect("sorted key must exist").values();
                    (key.to_string(), serde_json::json!(nullable_values(values)))
                })
                .collect();
            let body = serde_json::json!({
                "index": table.index().iter().map(|ts| ts.to_rfc3339()).collect::<Vec<_>>(),
                "series": series,
            });
            println!("{}", serde_json::to_string_pretty(&body)?);
        }
    }
    Ok(())
}

/// Maps the missing sentinel to `null` so JSON output stays valid.
fn nullable_values(values: &[f64]) -> Vec<Option<f64>> {
    values
        .iter()
        .map(|&v| if Series::is_missing(v) { None } else { Some(v) })
        .collect()
}
