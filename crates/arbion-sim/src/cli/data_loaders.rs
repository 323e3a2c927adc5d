// Copyright (c) 2025 SOLARE S.R.O.
//
// This file is part of Arbion.

//! Data loaders turning the supported sources into a [`PriceSeries`].

use anyhow::{Context, Result};
use arbion_types::{PricePoint, PriceSeries};
use chrono::{Duration, NaiveDate, TimeZone, Utc};
use serde::Deserialize;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::price_scenarios::PriceScenario;

/// Trait for loading prices from various sources
pub trait PriceLoader {
    fn load(&self) -> Result<PriceSeries>;

    /// Short label shown in reports
    fn describe(&self) -> String;
}

/// Loader for the semicolon-separated PSE market export.
///
/// Columns used: `Data` (YYYYMMDD), `Time` (hour 1-24) and `RCE` (price).
/// Rows whose `Time` is not a whole hour in 1-24, such as the repeated
/// `2a` hour or hour 25 on daylight-saving days, are dropped. Hour `t` starts
/// at `Data + (t - 1) h` in UTC.
#[derive(Debug, Clone)]
pub struct PseCsvLoader {
    path: PathBuf,
}

#[derive(Debug, Deserialize)]
struct PseRecord {
    #[serde(rename = "Data")]
    date: String,
    #[serde(rename = "Time")]
    time: String,
    #[serde(rename = "RCE")]
    price: String,
}

impl PseCsvLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Parse an export from any reader
    pub fn parse<R: Read>(reader: R) -> Result<PriceSeries> {
        let mut csv = csv::ReaderBuilder::new()
            .delimiter(b';')
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut points = Vec::new();
        let mut dropped = 0_usize;
        for (idx, record) in csv.deserialize::<PseRecord>().enumerate() {
            let line = idx + 2;
            let record = record.with_context(|| format!("Malformed PSE row at line {line}"))?;

            let Some(hour) = parse_hour(&record.time) else {
                debug!("Dropping row at line {}: Time '{}'", line, record.time);
                dropped += 1;
                continue;
            };
            let date = NaiveDate::parse_from_str(&record.date, "%Y%m%d")
                .with_context(|| format!("Invalid Data '{}' at line {line}", record.date))?;
            let price: f64 = record
                .price
                .replace(',', "")
                .parse()
                .with_context(|| format!("Invalid RCE '{}' at line {line}", record.price))?;

            let timestamp = Utc.from_utc_datetime(&date.and_time(chrono::NaiveTime::MIN))
                + Duration::hours(hour - 1);
            points.push(PricePoint::new(timestamp, price));
        }

        points.sort_by_key(|p| p.timestamp);
        let before = points.len();
        points.dedup_by_key(|p| p.timestamp);
        if dropped > 0 || before != points.len() {
            info!(
                "PSE export: dropped {} rows outside hours 1-24 and {} duplicate hours",
                dropped,
                before - points.len()
            );
        }

        PriceSeries::new(points).context("PSE export does not form a valid price series")
    }
}

/// Whole hour of the day, 1-24
fn parse_hour(raw: &str) -> Option<i64> {
    let value: f64 = raw.parse().ok()?;
    if value.fract() == 0.0 && (1.0..=24.0).contains(&value) {
        #[expect(clippy::cast_possible_truncation, reason = "whole number, range checked")]
        let hour = value as i64;
        Some(hour)
    } else {
        None
    }
}

impl PriceLoader for PseCsvLoader {
    fn load(&self) -> Result<PriceSeries> {
        let file = std::fs::File::open(&self.path)
            .with_context(|| format!("Failed to open PSE export: {}", self.path.display()))?;
        let series = Self::parse(file)
            .with_context(|| format!("Failed to load PSE export: {}", self.path.display()))?;
        info!(
            "Loaded {} hourly prices from {}",
            series.len(),
            self.path.display()
        );
        Ok(series)
    }

    fn describe(&self) -> String {
        format!("PSE export ({})", file_name(&self.path))
    }
}

/// Loader for a JSON array of `{"timestamp": ..., "price": ...}` objects.
///
/// Timestamps are RFC 3339 and must strictly increase.
#[derive(Debug, Clone)]
pub struct JsonPriceLoader {
    path: PathBuf,
}

impl JsonPriceLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl PriceLoader for JsonPriceLoader {
    fn load(&self) -> Result<PriceSeries> {
        let content = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read JSON file: {}", self.path.display()))?;
        let series: PriceSeries = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse JSON file: {}", self.path.display()))?;
        info!(
            "Loaded {} hourly prices from {}",
            series.len(),
            self.path.display()
        );
        Ok(series)
    }

    fn describe(&self) -> String {
        format!("JSON ({})", file_name(&self.path))
    }
}

/// Loader for seeded synthetic scenarios
#[derive(Debug, Clone)]
pub struct SyntheticLoader {
    pub scenario: PriceScenario,
    pub start: NaiveDate,
    pub days: u32,
    pub seed: u64,
}

impl PriceLoader for SyntheticLoader {
    fn load(&self) -> Result<PriceSeries> {
        self.scenario
            .generate_series(self.start, self.days, self.seed)
            .context("Failed to generate synthetic prices")
    }

    fn describe(&self) -> String {
        format!(
            "{} ({} days, seed {})",
            self.scenario.name(),
            self.days,
            self.seed
        )
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .unwrap_or_default()
        .to_string_lossy()
        .into_owned()
}
