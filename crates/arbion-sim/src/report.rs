// Copyright (c) 2025 SOLARE S.R.O.
//
// This file is part of Arbion.

//! Summary of a single policy run against its offline benchmark.

use arbion_core::{BenchmarkMethod, PolicyRun};
use arbion_types::{ArbitrageConfig, PriceSeries, PriceStats};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Where the prices came from
    pub source: String,
    pub hours: usize,
    pub first_hour: Option<DateTime<Utc>>,
    pub last_hour: Option<DateTime<Utc>>,
    /// `None` for an empty series
    pub price_stats: Option<PriceStats>,
    pub config: ArbitrageConfig,
    pub buys: usize,
    pub sells: usize,
    pub profit: f64,
    pub profit_net: f64,
    /// Energy left in the store at the end (MWh)
    pub final_load: f64,
    pub benchmark: BenchmarkMethod,
    /// Round trips granted to the benchmark
    pub benchmark_budget: f64,
    /// Benchmark profit in currency, scaled by the bandwidth
    pub benchmark_profit: f64,
}

impl RunSummary {
    /// Run the benchmark for `run` and collect the figures.
    ///
    /// Without an explicit `budget` the benchmark gets as many round trips as
    /// the policy completed.
    #[must_use]
    pub fn new(
        source: impl Into<String>,
        series: &PriceSeries,
        config: ArbitrageConfig,
        run: &PolicyRun,
        benchmark: BenchmarkMethod,
        budget: Option<f64>,
    ) -> Self {
        let benchmark_budget = budget.unwrap_or_else(|| run.equivalent_budget());
        let offline = benchmark.solve(&series.prices(), benchmark_budget);

        Self {
            source: source.into(),
            hours: series.len(),
            first_hour: series.first_timestamp(),
            last_hour: series.last_timestamp(),
            price_stats: series.stats(),
            config,
            buys: run.buys,
            sells: run.sells,
            profit: run.profit(),
            profit_net: run.profit_net(),
            final_load: run.final_store.load(),
            benchmark,
            benchmark_budget,
            benchmark_profit: offline.total_profit * config.storage.bandwidth_mw,
        }
    }

    /// Share of the benchmark profit the policy captured
    #[must_use]
    pub fn capture_ratio(&self) -> Option<f64> {
        (self.benchmark_profit > 0.0).then(|| self.profit / self.benchmark_profit)
    }
}
