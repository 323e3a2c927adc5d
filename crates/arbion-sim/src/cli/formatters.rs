// Copyright (c) 2025 SOLARE S.R.O.
//
// This file is part of Arbion.

//! Output formatters for CLI results.

use anyhow::{Context, Result};
use arbion_core::{DailyBenchmark, ProfitSummary, SweepOutcome};
use arbion_types::{StoreAction, TrajectoryPoint};
use chrono::{DateTime, NaiveDate, Utc};
use comfy_table::{Attribute, Cell, Color, Table, presets::UTF8_FULL};
use serde::Serialize;
use std::fmt::Write as _;
use std::path::Path;

use crate::price_scenarios::PriceScenarioPreset;
use crate::report::RunSummary;

/// Formatter for pretty tables
#[derive(Debug)]
pub struct TableFormatter;

/// Formatter for CSV export
#[derive(Debug)]
pub struct CsvFormatter;

fn header(titles: &[&str]) -> Vec<Cell> {
    titles
        .iter()
        .map(|t| Cell::new(t).add_attribute(Attribute::Bold))
        .collect()
}

fn ratio_cell(ratio: Option<f64>) -> Cell {
    ratio.map_or_else(
        || Cell::new("-"),
        |r| Cell::new(format!("{:.1}%", r * 100.0)),
    )
}

impl TableFormatter {
    /// Policy run next to its benchmark
    #[must_use]
    pub fn format_run(summary: &RunSummary) -> String {
        let mut table = Table::new();
        table.load_preset(UTF8_FULL);
        table.set_header(header(&[
            "",
            "Trades\n(buys / sells)",
            "Profit",
            "Net Profit",
            "Final Load\n(MWh)",
        ]));

        table.add_row(vec![
            Cell::new("Online policy").add_attribute(Attribute::Bold),
            Cell::new(format!("{} / {}", summary.buys, summary.sells)),
            Cell::new(format!("{:.2}", summary.profit)),
            Cell::new(format!("{:.2}", summary.profit_net)),
            Cell::new(format!("{:.3}", summary.final_load)),
        ]);
        let efficiency = summary.config.storage.net_efficiency_factor;
        table.add_row(vec![
            Cell::new(format!("Offline ({})", summary.benchmark)).fg(Color::Green),
            Cell::new(format!("{:.2} round trips", summary.benchmark_budget)),
            Cell::new(format!("{:.2}", summary.benchmark_profit)),
            Cell::new(format!("{:.2}", summary.benchmark_profit * efficiency)),
            Cell::new("-"),
        ]);

        let mut output = table.to_string();
        output.push('\n');

        let storage = &summary.config.storage;
        let thresholds = &summary.config.thresholds;
        let _ = writeln!(
            output,
            "Source: {} | {} hours ({} - {})",
            summary.source,
            summary.hours,
            format_hour(summary.first_hour),
            format_hour(summary.last_hour)
        );
        let _ = writeln!(
            output,
            "Storage: {} MWh @ {} MW, efficiency {:.3} | Window: {} h, quantiles {} / {}",
            storage.capacity_mwh,
            storage.bandwidth_mw,
            storage.net_efficiency_factor,
            thresholds.window_hours,
            thresholds.lower_quantile,
            thresholds.upper_quantile
        );
        if let Some(stats) = &summary.price_stats {
            let _ = writeln!(
                output,
                "Prices: min {:.2} | mean {:.2} | max {:.2} | spread {:.2}",
                stats.min,
                stats.mean,
                stats.max,
                stats.spread()
            );
        }
        if let Some(ratio) = summary.capture_ratio() {
            let _ = writeln!(output, "Captured {:.1}% of the offline profit", ratio * 100.0);
        }
        output
    }

    /// Available synthetic scenarios
    #[must_use]
    pub fn format_scenarios(presets: &[PriceScenarioPreset]) -> String {
        let mut table = Table::new();
        table.load_preset(UTF8_FULL);
        table.set_header(header(&["Id", "Name", "Description"]));
        for preset in presets {
            table.add_row(vec![
                Cell::new(preset.id).add_attribute(Attribute::Bold),
                Cell::new(preset.name),
                Cell::new(preset.description),
            ]);
        }
        table.to_string()
    }

    /// One row per day plus summary statistics of the net profit
    #[must_use]
    pub fn format_benchmark(days: &[DailyBenchmark]) -> String {
        let mut table = Table::new();
        table.load_preset(UTF8_FULL);
        table.set_header(header(&["Date", "Hours", "Trades", "Gross Profit", "Net Profit"]));

        let best = days
            .iter()
            .max_by(|a, b| a.net_profit.total_cmp(&b.net_profit))
            .map(|d| d.date);

        for day in days {
            let date_cell = if Some(day.date) == best {
                Cell::new(day.date)
                    .fg(Color::Green)
                    .add_attribute(Attribute::Bold)
            } else {
                Cell::new(day.date)
            };
            table.add_row(vec![
                date_cell,
                Cell::new(day.hours),
                Cell::new(day.trades.len()),
                Cell::new(format!("{:.2}", day.gross_profit)),
                Cell::new(format!("{:.2}", day.net_profit)),
            ]);
        }

        let mut output = table.to_string();
        output.push('\n');

        if let Some(summary) = ProfitSummary::of_days(days) {
            let mut stats = Table::new();
            stats.load_preset(UTF8_FULL);
            stats.set_header(header(&[
                "Days", "Total", "Mean", "Std Dev", "Min", "Median", "Max",
            ]));
            stats.add_row(vec![
                Cell::new(summary.count),
                Cell::new(format!("{:.2}", summary.total)),
                Cell::new(format!("{:.2}", summary.mean)),
                Cell::new(format!("{:.2}", summary.std_dev)),
                Cell::new(format!("{:.2}", summary.min)),
                Cell::new(format!("{:.2}", summary.median)),
                Cell::new(format!("{:.2}", summary.max)),
            ]);
            output.push_str("Net profit per day:\n");
            output.push_str(&stats.to_string());
            output.push('\n');
        } else {
            output.push_str("No priced days\n");
        }
        output
    }

    /// Completed runs ranked by net profit, then failures and skips
    #[must_use]
    pub fn format_sweep(outcomes: &[SweepOutcome]) -> String {
        let mut table = Table::new();
        table.load_preset(UTF8_FULL);
        table.set_header(header(&[
            "#",
            "Configuration",
            "Buys / Sells",
            "Profit",
            "Net Profit",
            "Benchmark",
            "Captured",
        ]));

        let mut completed: Vec<_> = outcomes.iter().filter_map(SweepOutcome::result).collect();
        completed.sort_by(|a, b| b.profit_net.total_cmp(&a.profit_net));

        for (rank, result) in completed.iter().enumerate() {
            let label = Cell::new(result.point.label());
            let label = if rank == 0 {
                label.fg(Color::Green).add_attribute(Attribute::Bold)
            } else {
                label
            };
            table.add_row(vec![
                Cell::new(result.point.index),
                label,
                Cell::new(format!("{} / {}", result.buys, result.sells)),
                Cell::new(format!("{:.2}", result.profit)),
                Cell::new(format!("{:.2}", result.profit_net)),
                Cell::new(format!("{:.2}", result.benchmark_profit)),
                ratio_cell(result.capture_ratio()),
            ]);
        }

        for outcome in outcomes {
            let status = match outcome {
                SweepOutcome::Completed(_) => continue,
                SweepOutcome::Failed { error, .. } => format!("failed: {error}"),
                SweepOutcome::Skipped { .. } => "skipped".to_owned(),
            };
            table.add_row(vec![
                Cell::new(outcome.point().index),
                Cell::new(outcome.point().label()).fg(Color::Red),
                Cell::new(status),
            ]);
        }

        let mut output = table.to_string();
        output.push('\n');
        let _ = writeln!(
            output,
            "{} of {} configurations completed",
            completed.len(),
            outcomes.len()
        );
        output
    }
}

fn format_hour(hour: Option<DateTime<Utc>>) -> String {
    hour.map_or_else(|| "-".to_owned(), |h| h.format("%Y-%m-%d %H:%M").to_string())
}

#[derive(Debug, Serialize)]
struct TrajectoryRow {
    timestamp: DateTime<Utc>,
    price: f64,
    action: StoreAction,
    lower_bound: f64,
    upper_bound: f64,
    window_mean: f64,
    load_mwh: f64,
    cumulative_cost: f64,
    cumulative_income: f64,
    profit: f64,
}

impl From<&TrajectoryPoint> for TrajectoryRow {
    fn from(point: &TrajectoryPoint) -> Self {
        Self {
            timestamp: point.timestamp,
            price: point.price,
            action: point.action,
            lower_bound: point.thresholds.lower_bound,
            upper_bound: point.thresholds.upper_bound,
            window_mean: point.thresholds.window_mean,
            load_mwh: point.load,
            cumulative_cost: point.cumulative_cost,
            cumulative_income: point.cumulative_income,
            profit: point.profit,
        }
    }
}

#[derive(Debug, Serialize)]
struct DailyRow {
    date: NaiveDate,
    hours: usize,
    budget: f64,
    trades: usize,
    gross_profit: f64,
    net_profit: f64,
}

#[derive(Debug, Serialize)]
struct SweepRow {
    index: usize,
    status: &'static str,
    capacity_mwh: f64,
    bandwidth_mw: f64,
    window_hours: usize,
    lower_quantile: f64,
    upper_quantile: f64,
    buys: Option<usize>,
    sells: Option<usize>,
    profit: Option<f64>,
    profit_net: Option<f64>,
    benchmark_profit: Option<f64>,
}

impl From<&SweepOutcome> for SweepRow {
    fn from(outcome: &SweepOutcome) -> Self {
        let point = outcome.point();
        let result = outcome.result();
        Self {
            index: point.index,
            status: match outcome {
                SweepOutcome::Completed(_) => "completed",
                SweepOutcome::Failed { .. } => "failed",
                SweepOutcome::Skipped { .. } => "skipped",
            },
            capacity_mwh: point.config.storage.capacity_mwh,
            bandwidth_mw: point.config.storage.bandwidth_mw,
            window_hours: point.config.thresholds.window_hours,
            lower_quantile: point.config.thresholds.lower_quantile,
            upper_quantile: point.config.thresholds.upper_quantile,
            buys: result.map(|r| r.buys),
            sells: result.map(|r| r.sells),
            profit: result.map(|r| r.profit),
            profit_net: result.map(|r| r.profit_net),
            benchmark_profit: result.map(|r| r.benchmark_profit),
        }
    }
}

impl CsvFormatter {
    /// Export the hourly trajectory
    pub fn write_trajectory(path: &Path, trajectory: &[TrajectoryPoint]) -> Result<()> {
        write_rows(path, trajectory.iter().map(TrajectoryRow::from))
    }

    /// Export one row per benchmarked day
    pub fn write_daily(path: &Path, days: &[DailyBenchmark]) -> Result<()> {
        write_rows(
            path,
            days.iter().map(|d| DailyRow {
                date: d.date,
                hours: d.hours,
                budget: d.budget,
                trades: d.trades.len(),
                gross_profit: d.gross_profit,
                net_profit: d.net_profit,
            }),
        )
    }

    /// Export every sweep outcome in sweep order
    pub fn write_sweep(path: &Path, outcomes: &[SweepOutcome]) -> Result<()> {
        write_rows(path, outcomes.iter().map(SweepRow::from))
    }
}

fn write_rows<T: Serialize>(path: &Path, rows: impl IntoIterator<Item = T>) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create CSV file: {}", path.display()))?;
    for row in rows {
        writer
            .serialize(row)
            .with_context(|| format!("Failed to write CSV row to {}", path.display()))?;
    }
    writer
        .flush()
        .with_context(|| format!("Failed to flush CSV file: {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use arbion_core::{AbortSignal, ParameterSweep};
    use arbion_types::PriceSeries;
    use chrono::TimeZone;

    #[test]
    fn test_sweep_table_lists_skipped_runs() {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let series = PriceSeries::hourly(start, &[1.0; 30]).unwrap();
        let abort = AbortSignal::new();
        abort.abort();

        let outcomes =
            ParameterSweep::grid(&[0.1], &[0.01], &[6, 12], &[(0.4, 0.6)], 1.0).run(&series, &abort);
        let table = TableFormatter::format_sweep(&outcomes);

        assert_eq!(table.matches("skipped").count(), 2);
        assert!(table.contains("0 of 2 configurations completed"));
    }

    #[test]
    fn test_run_table_shows_price_range() {
        use arbion_core::{BenchmarkMethod, OnlinePolicy};
        use arbion_types::{ArbitrageConfig, StorageConfig, ThresholdConfig};

        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let series = PriceSeries::hourly(start, &[10.0, 10.0, 2.0, 30.0, 10.0]).unwrap();
        let config = ArbitrageConfig {
            storage: StorageConfig {
                capacity_mwh: 1.0,
                bandwidth_mw: 1.0,
                net_efficiency_factor: 1.0,
            },
            thresholds: ThresholdConfig {
                window_hours: 5,
                ..Default::default()
            },
        };
        let run = OnlinePolicy::new(config).unwrap().run(&series).unwrap();
        let summary = RunSummary::new("test", &series, config, &run, BenchmarkMethod::Exact, None);

        let output = TableFormatter::format_run(&summary);

        assert!(output.contains("Prices: min 2.00 | mean 12.40 | max 30.00 | spread 28.00"));
        assert!(output.contains("Captured 100.0% of the offline profit"));
    }

    #[test]
    fn test_scenario_table_lists_every_preset() {
        let table = TableFormatter::format_scenarios(crate::PRICE_PRESETS);

        for preset in crate::PRICE_PRESETS {
            assert!(table.contains(preset.id));
        }
    }

    #[test]
    fn test_empty_benchmark_table() {
        let output = TableFormatter::format_benchmark(&[]);

        assert!(output.contains("No priced days"));
    }
}
