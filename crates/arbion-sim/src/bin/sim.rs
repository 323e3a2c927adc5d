// Copyright (c) 2025 SOLARE S.R.O.
//
// This file is part of Arbion.

//! CLI entry point for the Arbion simulator

use anyhow::{Context, Result, bail};
use arbion_core::{AbortSignal, BenchmarkMethod, OnlinePolicy, daily_benchmark};
use arbion_sim::cli::{
    BenchmarkArgs, Cli, Commands, CsvFormatter, JsonPriceLoader, PriceLoader, PseCsvLoader,
    RunArgs, SourceArgs, SweepArgs, SweepConfig, SyntheticLoader, TableFormatter,
    default_start_date,
};
use arbion_sim::{PRICE_PRESETS, PriceScenario, RunSummary, Settings, preset_ids};
use arbion_types::PriceSeries;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use clap::Parser;
use std::fs;
use std::time::Duration;
use tracing::{info, warn};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("arbion=info".parse()?),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Scenarios => {
            println!("{}", TableFormatter::format_scenarios(PRICE_PRESETS));
            Ok(())
        }
        Commands::ExampleConfig => {
            println!("{}", SweepConfig::example_toml());
            Ok(())
        }
        Commands::Run(args) => run_command(&args, Settings::load(cli.settings.as_deref())?),
        Commands::Benchmark(args) => {
            benchmark_command(&args, &Settings::load(cli.settings.as_deref())?)
        }
        Commands::Sweep(args) => sweep_command(&args),
    }
}

fn run_command(args: &RunArgs, mut settings: Settings) -> Result<()> {
    if let Some(capacity) = args.capacity {
        settings.storage.capacity_mwh = capacity;
    }
    if let Some(bandwidth) = args.bandwidth {
        settings.storage.bandwidth_mw = bandwidth;
    }
    if let Some(window) = args.window {
        settings.thresholds.window_hours = window;
    }
    settings.validate()?;

    if let Some(budget) = args.budget
        && (budget.is_nan() || budget < 0.0)
    {
        bail!("--budget must be a non-negative number, got {budget}");
    }
    let method = resolve_method(args.method.as_deref(), settings.benchmark)?;

    let loader = build_loader(&args.source)?;
    let series = load_series(loader.as_ref(), &args.source)?;

    let config = settings.arbitrage();
    let run = OnlinePolicy::new(config)?
        .run(&series)
        .context("Policy run failed")?;

    let summary = RunSummary::new(loader.describe(), &series, config, &run, method, args.budget);
    println!("{}", TableFormatter::format_run(&summary));

    if let Some(path) = &args.csv_path {
        CsvFormatter::write_trajectory(path, &run.trajectory)?;
        info!("Trajectory written to {}", path.display());
    }
    if let Some(path) = &args.json {
        let json = serde_json::to_string_pretty(&summary).context("Failed to encode summary")?;
        fs::write(path, json)
            .with_context(|| format!("Failed to write summary: {}", path.display()))?;
        info!("Summary written to {}", path.display());
    }
    Ok(())
}

fn benchmark_command(args: &BenchmarkArgs, settings: &Settings) -> Result<()> {
    let method = resolve_method(args.method.as_deref(), settings.benchmark)?;
    let loader = build_loader(&args.source)?;
    let series = load_series(loader.as_ref(), &args.source)?;

    let days = daily_benchmark(&series, &settings.storage, method)
        .context("Invalid storage settings")?;

    println!("{}", TableFormatter::format_benchmark(&days));
    println!(
        "Source: {} | Storage: {} MWh @ {} MW | Method: {}",
        loader.describe(),
        settings.storage.capacity_mwh,
        settings.storage.bandwidth_mw,
        method
    );

    if let Some(path) = &args.csv_path {
        CsvFormatter::write_daily(path, &days)?;
        info!("Daily results written to {}", path.display());
    }
    Ok(())
}

fn sweep_command(args: &SweepArgs) -> Result<()> {
    let config = SweepConfig::from_file(&args.config)?;
    let loader = config.loader()?;
    let series = loader.load()?;
    if series.is_empty() {
        bail!("Price source '{}' has no prices", loader.describe());
    }

    let sweep = config.to_sweep();
    let abort = match args.time_limit_secs {
        Some(secs) => AbortSignal::with_time_limit(Duration::from_secs(secs)),
        None => AbortSignal::new(),
    };
    let outcomes = sweep.run(&series, &abort);

    println!("{}", TableFormatter::format_sweep(&outcomes));
    println!(
        "Source: {} | {} hours | Method: {}",
        loader.describe(),
        series.len(),
        config.benchmark
    );

    if let Some(path) = &args.csv_path {
        CsvFormatter::write_sweep(path, &outcomes)?;
        info!("Sweep results written to {}", path.display());
    }
    Ok(())
}

fn resolve_method(arg: Option<&str>, fallback: BenchmarkMethod) -> Result<BenchmarkMethod> {
    match arg {
        Some(name) => name.parse().map_err(anyhow::Error::msg),
        None => Ok(fallback),
    }
}

fn build_loader(source: &SourceArgs) -> Result<Box<dyn PriceLoader>> {
    if let Some(path) = &source.from_csv {
        return Ok(Box::new(PseCsvLoader::new(path)));
    }
    if let Some(path) = &source.from_json {
        return Ok(Box::new(JsonPriceLoader::new(path)));
    }

    let scenario = PriceScenario::from_id(&source.scenario).unwrap_or_else(|| {
        warn!(
            "Unknown scenario '{}' (available: {}), using 'usual_day'",
            source.scenario,
            preset_ids()
        );
        PriceScenario::UsualDay
    });
    if source.days == 0 {
        bail!("--days must be at least 1");
    }
    let start = match &source.start {
        Some(raw) => parse_date(raw, "--start")?,
        None => default_start_date(),
    };

    Ok(Box::new(SyntheticLoader {
        scenario,
        start,
        days: source.days,
        seed: source.seed,
    }))
}

/// Load and apply the optional `--from` / `--to` day filter
fn load_series(loader: &dyn PriceLoader, source: &SourceArgs) -> Result<PriceSeries> {
    let series = loader.load()?;
    if source.from.is_none() && source.to.is_none() {
        return Ok(series);
    }

    let from = match &source.from {
        Some(raw) => midnight(parse_date(raw, "--from")?),
        None => DateTime::<Utc>::MIN_UTC,
    };
    let to = match &source.to {
        Some(raw) => midnight(parse_date(raw, "--to")?),
        None => DateTime::<Utc>::MAX_UTC,
    };

    let filtered = series.between(from, to);
    if filtered.is_empty() {
        bail!(
            "No prices between {} and {} in {}",
            source.from.as_deref().unwrap_or("start"),
            source.to.as_deref().unwrap_or("end"),
            loader.describe()
        );
    }
    info!(
        "Kept {} of {} hours after date filter",
        filtered.len(),
        series.len()
    );
    Ok(filtered)
}

fn parse_date(raw: &str, flag: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").with_context(|| {
        format!(
            "Invalid date for {flag}: '{raw}'\n\n\
            Expected format: YYYY-MM-DD (e.g., 2024-03-15)"
        )
    })
}

fn midnight(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}
