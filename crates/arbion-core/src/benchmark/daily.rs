// Copyright (c) 2025 SOLARE S.R.O.
//
// This file is part of Arbion.

//! Per-day offline benchmark and profit statistics.

use arbion_types::{ConfigError, PriceSeries, StorageConfig, Trade};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::BenchmarkMethod;

/// Offline benchmark result for one calendar day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyBenchmark {
    pub date: NaiveDate,
    /// Number of priced hours in the day
    pub hours: usize,
    /// Round trips allowed for the day
    pub budget: f64,
    /// Profit in currency, scaled by the trade size
    pub gross_profit: f64,
    /// Gross profit after round-trip losses
    pub net_profit: f64,
    pub trades: Vec<Trade>,
}

/// Run the offline benchmark independently for each calendar day.
///
/// The daily budget is `capacity / min(capacity, bandwidth)` round trips of
/// `min(capacity, bandwidth)` MWh each.
pub fn daily_benchmark(
    series: &PriceSeries,
    storage: &StorageConfig,
    method: BenchmarkMethod,
) -> Result<Vec<DailyBenchmark>, ConfigError> {
    storage.validate()?;

    let trade_size = storage.trade_size_mwh();
    let budget = storage.capacity_mwh / trade_size;

    let days: Vec<DailyBenchmark> = series
        .split_by_day()
        .into_iter()
        .map(|(date, day)| {
            let result = method.solve(&day.prices(), budget);
            let gross_profit = result.total_profit * trade_size;
            DailyBenchmark {
                date,
                hours: day.len(),
                budget,
                gross_profit,
                net_profit: gross_profit * storage.net_efficiency_factor,
                trades: result.trades,
            }
        })
        .collect();

    info!(
        "Daily {} benchmark over {} days (budget {:.2} trades/day)",
        method,
        days.len(),
        budget
    );
    Ok(days)
}

/// Descriptive statistics of a set of profits
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProfitSummary {
    pub count: usize,
    pub total: f64,
    pub mean: f64,
    /// Sample standard deviation (zero for fewer than two values)
    pub std_dev: f64,
    pub min: f64,
    pub median: f64,
    pub max: f64,
}

impl ProfitSummary {
    /// `None` for an empty input
    #[must_use]
    #[expect(clippy::integer_division, reason = "index of the middle element")]
    pub fn from_values(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }

        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);

        let count = sorted.len();
        let total: f64 = sorted.iter().sum();
        let mean = total / count as f64;
        let std_dev = if count > 1 {
            let squares: f64 = sorted.iter().map(|v| (v - mean).powi(2)).sum();
            (squares / (count - 1) as f64).sqrt()
        } else {
            0.0
        };

        let middle = count / 2;
        let median = if count % 2 == 1 {
            sorted[middle]
        } else {
            f64::midpoint(sorted[middle - 1], sorted[middle])
        };

        Some(Self {
            count,
            total,
            mean,
            std_dev,
            min: sorted[0],
            median,
            max: sorted[count - 1],
        })
    }

    /// Summary of the net profits of a daily benchmark
    #[must_use]
    pub fn of_days(days: &[DailyBenchmark]) -> Option<Self> {
        let values: Vec<f64> = days.iter().map(|d| d.net_profit).collect();
        Self::from_values(&values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn two_days() -> PriceSeries {
        let start = Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap();
        let mut prices = vec![50.0; 48];
        // Day 1: cheap night, expensive evening
        prices[3] = 10.0;
        prices[19] = 90.0;
        // Day 2: one small rise
        prices[30] = 40.0;
        prices[31] = 60.0;
        PriceSeries::hourly(start, &prices).unwrap()
    }

    #[test]
    fn test_splits_by_calendar_day() {
        let storage = StorageConfig {
            capacity_mwh: 2.0,
            bandwidth_mw: 1.0,
            net_efficiency_factor: 0.5,
        };
        let days = daily_benchmark(&two_days(), &storage, BenchmarkMethod::Exact).unwrap();

        assert_eq!(days.len(), 2);
        assert_eq!(days[0].hours, 24);
        assert_eq!(days[0].budget, 2.0);
        // (3, 19) = 80; splitting it into two trades gains nothing
        assert_eq!(days[0].gross_profit, 80.0);
        assert_eq!(days[0].net_profit, 40.0);
        // 40 -> 60 alone, or 40 -> 50 plus 50 -> 60
        assert_eq!(days[1].gross_profit, 20.0);
    }

    #[test]
    fn test_scales_by_trade_size() {
        let storage = StorageConfig {
            capacity_mwh: 0.1,
            bandwidth_mw: 0.05,
            net_efficiency_factor: 1.0,
        };
        let days = daily_benchmark(&two_days(), &storage, BenchmarkMethod::Greedy).unwrap();

        // Budget of 2 trades of 0.05 MWh; greedy stops after (3, 19) on the flat rest
        assert!((days[0].gross_profit - 0.05 * 80.0).abs() < 1e-9);
    }

    #[test]
    fn test_rejects_invalid_storage() {
        let storage = StorageConfig {
            capacity_mwh: 1.0,
            bandwidth_mw: 0.0,
            net_efficiency_factor: 1.0,
        };

        assert!(daily_benchmark(&two_days(), &storage, BenchmarkMethod::Exact).is_err());
    }

    #[test]
    fn test_summary_statistics() {
        let summary = ProfitSummary::from_values(&[4.0, 1.0, 3.0, 2.0]).unwrap();

        assert_eq!(summary.count, 4);
        assert_eq!(summary.total, 10.0);
        assert_eq!(summary.mean, 2.5);
        assert_eq!(summary.min, 1.0);
        assert_eq!(summary.median, 2.5);
        assert_eq!(summary.max, 4.0);
        // Sample variance 5/3
        assert!((summary.std_dev - (5.0_f64 / 3.0).sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_summary_edge_cases() {
        assert!(ProfitSummary::from_values(&[]).is_none());

        let single = ProfitSummary::from_values(&[7.0]).unwrap();
        assert_eq!(single.median, 7.0);
        assert_eq!(single.std_dev, 0.0);
    }
}
