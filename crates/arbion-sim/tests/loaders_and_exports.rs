// Copyright (c) 2025 SOLARE S.R.O.
//
// This file is part of Arbion.

use arbion_core::{BenchmarkMethod, OnlinePolicy, daily_benchmark};
use arbion_sim::Settings;
use arbion_sim::cli::{
    CsvFormatter, JsonPriceLoader, PriceLoader, PseCsvLoader, SweepConfig, TableFormatter,
};
use arbion_types::{ArbitrageConfig, PriceSeries, StorageConfig, ThresholdConfig};
use chrono::{TimeZone, Utc};
use std::fs;
use tempfile::TempDir;

const PSE_EXPORT: &str = "\
Data;Time;RCE;Doba
20240331;1;1,050.00;x
20240331;2;980.50;x
20240331;2a;975.00;x
20240331;3;920.00;x
20240330;24;1,100.00;x
20240331;3;921.00;x
";

#[test]
fn test_pse_export_is_cleaned_and_ordered() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("rce.csv");
    fs::write(&path, PSE_EXPORT).unwrap();

    let series = PseCsvLoader::new(&path).load().unwrap();

    // "2a" dropped, the repeated hour 3 kept once, the previous day sorted first
    assert_eq!(series.len(), 4);
    assert_eq!(series.prices(), vec![1100.0, 1050.0, 980.5, 920.0]);
    assert_eq!(
        series.first_timestamp(),
        Some(Utc.with_ymd_and_hms(2024, 3, 30, 23, 0, 0).unwrap())
    );
    assert_eq!(
        series.last_timestamp(),
        Some(Utc.with_ymd_and_hms(2024, 3, 31, 2, 0, 0).unwrap())
    );
}

#[test]
fn test_pse_export_with_bad_price_fails() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.csv");
    fs::write(&path, "Data;Time;RCE\n20240101;1;cheap\n").unwrap();

    let err = PseCsvLoader::new(&path).load().unwrap_err();

    assert!(format!("{err:#}").contains("Invalid RCE 'cheap' at line 2"));
}

#[test]
fn test_missing_file_reports_path() {
    let err = JsonPriceLoader::new("/nonexistent/prices.json")
        .load()
        .unwrap_err();

    assert!(err.to_string().contains("/nonexistent/prices.json"));
}

#[test]
fn test_json_prices_load() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("prices.json");
    fs::write(
        &path,
        r#"[
            {"timestamp": "2024-05-01T00:00:00Z", "price": 310.5},
            {"timestamp": "2024-05-01T01:00:00Z", "price": -12.0}
        ]"#,
    )
    .unwrap();

    let series = JsonPriceLoader::new(&path).load().unwrap();

    assert_eq!(series.prices(), vec![310.5, -12.0]);
}

#[test]
fn test_json_rejects_unordered_timestamps() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("prices.json");
    fs::write(
        &path,
        r#"[
            {"timestamp": "2024-05-01T01:00:00Z", "price": 1.0},
            {"timestamp": "2024-05-01T00:00:00Z", "price": 2.0}
        ]"#,
    )
    .unwrap();

    assert!(JsonPriceLoader::new(&path).load().is_err());
}

#[test]
fn test_trajectory_csv_has_one_row_per_hour() {
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

    let dir = TempDir::new().unwrap();
    let path = dir.path().join("trajectory.csv");
    CsvFormatter::write_trajectory(&path, &run.trajectory).unwrap();

    let mut reader = csv::Reader::from_path(&path).unwrap();
    let headers = reader.headers().unwrap().clone();
    assert_eq!(&headers[0], "timestamp");
    assert_eq!(&headers[2], "action");

    let rows: Vec<csv::StringRecord> = reader.records().map(Result::unwrap).collect();
    assert_eq!(rows.len(), 5);
    assert_eq!(&rows[2][2], "buy");
    assert_eq!(&rows[3][2], "sell");
    assert_eq!(rows[4][9].parse::<f64>().unwrap(), 28.0);
}

#[test]
fn test_daily_csv_and_table() {
    let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let prices: Vec<f64> = (0..48_i32).map(|h| f64::from((h * 7) % 24)).collect();
    let series = PriceSeries::hourly(start, &prices).unwrap();
    let days = daily_benchmark(&series, &StorageConfig::default(), BenchmarkMethod::Exact).unwrap();

    let table = TableFormatter::format_benchmark(&days);
    assert!(table.contains("2024-01-01"));
    assert!(table.contains("Net profit per day"));

    let dir = TempDir::new().unwrap();
    let path = dir.path().join("days.csv");
    CsvFormatter::write_daily(&path, &days).unwrap();
    let content = fs::read_to_string(&path).unwrap();
    assert_eq!(content.lines().count(), 3);
    assert!(content.starts_with("date,hours,budget,trades,gross_profit,net_profit"));
}

#[test]
fn test_sweep_from_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("sweep.toml");
    fs::write(
        &path,
        r#"
benchmark = "greedy"

[source]
type = "synthetic"
scenario = "usual_day"
days = 3

[grid]
capacities_mwh = [0.1, 0.2]
bandwidths_mw = [0.05]
window_hours = [12, 24]
"#,
    )
    .unwrap();

    let config = SweepConfig::from_file(&path).unwrap();
    let series = config.loader().unwrap().load().unwrap();
    let outcomes = config
        .to_sweep()
        .run(&series, &arbion_core::AbortSignal::new());

    assert_eq!(outcomes.len(), 4);
    assert!(outcomes.iter().all(|o| o.result().is_some()));

    let csv_path = dir.path().join("sweep.csv");
    CsvFormatter::write_sweep(&csv_path, &outcomes).unwrap();
    let content = fs::read_to_string(&csv_path).unwrap();
    assert_eq!(content.lines().count(), 5);
    assert!(content.lines().skip(1).all(|l| l.contains("completed")));
}

#[test]
fn test_settings_file_is_loaded() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("arbion.toml");
    fs::write(
        &path,
        r#"
[storage]
capacity_mwh = 4.0
bandwidth_mw = 1.0

[thresholds]
window_hours = 48
"#,
    )
    .unwrap();

    let settings = Settings::from_file(&path).unwrap();

    assert_eq!(settings.storage.capacity_mwh, 4.0);
    assert_eq!(settings.thresholds.window_hours, 48);
    assert_eq!(settings.benchmark, BenchmarkMethod::Exact);
    assert!(settings.validate().is_ok());
}

#[test]
fn test_malformed_settings_file_fails() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("arbion.toml");
    fs::write(&path, "[storage\ncapacity_mwh = 1").unwrap();

    let err = Settings::load(Some(path.as_path())).unwrap_err();

    assert!(err.to_string().contains("Failed to parse settings file"));
}
