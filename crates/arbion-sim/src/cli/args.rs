// Copyright (c) 2025 SOLARE S.R.O.
//
// This file is part of Arbion.

//! CLI argument definitions using clap.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "arbion-sim")]
#[command(author, version, about = "Arbion battery arbitrage simulator")]
#[command(
    long_about = "Simulate a price-threshold battery arbitrage policy and compare it with the\n\
    best achievable offline profit.\n\
    \nPrices come from a PSE CSV export, a JSON file or a synthetic scenario.\n\
    \nExamples:\n  \
    arbion-sim run                                  # Synthetic usual week\n  \
    arbion-sim run --from-csv rce.csv --csv-path out.csv\n  \
    arbion-sim benchmark --scenario volatile --days 30\n  \
    arbion-sim sweep --config sweep.toml --time-limit-secs 60"
)]
pub struct Cli {
    /// Settings file (defaults to ./arbion.toml when present)
    #[arg(long, global = true, value_name = "PATH")]
    pub settings: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run the online policy over a price series and compare with the benchmark
    #[command(
        long_about = "Run the online policy hour by hour over the whole series, then solve the\n\
        offline benchmark with the same number of round trips (or --budget).\n\
        \nExamples:\n  \
        arbion-sim run --scenario negative --days 14\n  \
        arbion-sim run --from-json prices.json --method greedy --json summary.json"
    )]
    Run(RunArgs),

    /// Per-day offline benchmark with summary statistics
    #[command(
        long_about = "Solve the offline benchmark independently for every calendar day with a\n\
        budget of capacity / min(capacity, bandwidth) round trips.\n\
        \nExamples:\n  \
        arbion-sim benchmark --from-csv rce.csv\n  \
        arbion-sim benchmark --scenario volatile --csv-path days.csv"
    )]
    Benchmark(BenchmarkArgs),

    /// Parameter sweep from a TOML configuration file
    #[command(
        long_about = "Evaluate every combination of the capacities, bandwidths, windows and\n\
        quantile pairs listed in a sweep file, in parallel.\n\
        \nExamples:\n  \
        arbion-sim sweep --config sweep.toml\n  \
        arbion-sim sweep --config sweep.toml --time-limit-secs 30 --csv-path sweep.csv"
    )]
    Sweep(SweepArgs),

    /// List the synthetic price scenarios
    Scenarios,

    /// Print an example sweep configuration
    ExampleConfig,
}

/// Where the prices come from
#[derive(Debug, Clone, Args)]
pub struct SourceArgs {
    /// Synthetic price scenario (usual_day, volatile, negative, flat)
    #[arg(
        long,
        default_value = "usual_day",
        help = "Synthetic price scenario to simulate",
        long_help = "Available scenarios:\n  \
          - usual_day: cheap night, elevated morning, midday dip, evening peak\n  \
          - volatile: large swings with several peaks\n  \
          - negative: negative prices around midday\n  \
          - flat: constant price\n\
          \nRun `arbion-sim scenarios` for the full list.\n\
          Ignored when using --from-csv or --from-json"
    )]
    pub scenario: String,

    /// Number of synthetic days
    #[arg(long, default_value_t = 7, help = "Days of synthetic prices")]
    pub days: u32,

    /// Seed for synthetic prices
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// First synthetic day
    #[arg(
        long,
        value_name = "YYYY-MM-DD",
        help = "Start date of synthetic prices (defaults to 2024-01-01)"
    )]
    pub start: Option<String>,

    /// Load prices from a PSE CSV export
    #[arg(
        long,
        value_name = "PATH",
        conflicts_with = "from_json",
        help = "Path to a semicolon-separated PSE export",
        long_help = "Load prices from a PSE market export.\n\
          Expects the columns Data (YYYYMMDD), Time (hour 1-24) and RCE (price).\n\
          \nExample: --from-csv rce_2024.csv"
    )]
    pub from_csv: Option<PathBuf>,

    /// Load prices from JSON
    #[arg(
        long,
        value_name = "PATH",
        help = "Path to a JSON array of {timestamp, price} objects"
    )]
    pub from_json: Option<PathBuf>,

    /// Only keep hours from this day on
    #[arg(long, value_name = "YYYY-MM-DD")]
    pub from: Option<String>,

    /// Only keep hours before this day
    #[arg(long, value_name = "YYYY-MM-DD")]
    pub to: Option<String>,
}

#[derive(Debug, Parser)]
pub struct RunArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Benchmark method
    #[arg(long, value_parser = ["greedy", "exact"],
          help = "Offline benchmark (defaults to the settings value)")]
    pub method: Option<String>,

    /// Round trips for the benchmark (defaults to the policy's sells)
    #[arg(long)]
    pub budget: Option<f64>,

    /// Storage capacity override (MWh)
    #[arg(long)]
    pub capacity: Option<f64>,

    /// Bandwidth override (MW)
    #[arg(long)]
    pub bandwidth: Option<f64>,

    /// Rolling window override (hours)
    #[arg(long)]
    pub window: Option<usize>,

    /// Write the hourly trajectory to CSV
    #[arg(
        long,
        value_name = "PATH",
        help = "Where to save the hourly trajectory",
        long_help = "CSV export with one row per hour: price, action, band, load and\n\
          cumulative cost, income and profit.\n\
          \nExample: --csv-path trajectory.csv"
    )]
    pub csv_path: Option<PathBuf>,

    /// Write the run summary as JSON
    #[arg(long, value_name = "PATH")]
    pub json: Option<PathBuf>,
}

#[derive(Debug, Parser)]
pub struct BenchmarkArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Benchmark method
    #[arg(long, value_parser = ["greedy", "exact"],
          help = "Offline benchmark (defaults to the settings value)")]
    pub method: Option<String>,

    /// Write one row per day to CSV
    #[arg(long, value_name = "PATH")]
    pub csv_path: Option<PathBuf>,
}

#[derive(Debug, Parser)]
pub struct SweepArgs {
    /// Path to the sweep TOML file
    #[arg(
        long,
        value_name = "PATH",
        help = "Sweep configuration file",
        long_help = "TOML file with a price source and the parameter grid.\n\
          Run `arbion-sim example-config` for the format.\n\
          \nExample: --config sweep.toml"
    )]
    pub config: PathBuf,

    /// Stop starting new runs after this many seconds
    #[arg(long)]
    pub time_limit_secs: Option<u64>,

    /// Write all outcomes to CSV
    #[arg(long, value_name = "PATH")]
    pub csv_path: Option<PathBuf>,
}
