// Copyright (c) 2025 SOLARE S.R.O.
//
// This file is part of Arbion.
//
// Licensed under the Creative Commons Attribution-NonCommercial-NoDerivatives 4.0 International
// (CC BY-NC-ND 4.0). You may use and share this file for non-commercial purposes only and you may not
// create derivatives. See <https://creativecommons.org/licenses/by-nc-nd/4.0/>.
//
// This software is provided "AS IS", without warranty of any kind.
//
// For commercial licensing, please contact: info@solare.cz

//! Arbitrage engine for energy storage.
//!
//! Two complementary views of the same price series:
//!
//! - **Online policy**: a causal, hour-by-hour decision procedure driven by
//!   a rolling quantile band ([`OnlinePolicy`], [`OnlineSession`])
//! - **Offline benchmarks**: the best achievable profit with full knowledge
//!   of the horizon ([`FlowBenchmark`], [`GreedyPassBenchmark`])
//!
//! # Example
//!
//! ```
//! use arbion_core::{BenchmarkMethod, OnlinePolicy};
//! use arbion_types::{ArbitrageConfig, PriceSeries};
//! use chrono::{TimeZone, Utc};
//!
//! let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
//! let series = PriceSeries::hourly(start, &[10.0, 5.0, 20.0, 6.0, 30.0]).unwrap();
//!
//! let best = BenchmarkMethod::Exact.solve(&series.prices(), 1.0);
//! assert_eq!(best.total_profit, 25.0);
//!
//! let mut config = ArbitrageConfig::default();
//! config.thresholds.window_hours = 4;
//! let run = OnlinePolicy::new(config).unwrap().run(&series).unwrap();
//! assert_eq!(run.trajectory.len(), 5);
//! ```

pub mod benchmark;
pub mod error;
pub mod policy;
pub mod storage;
pub mod sweep;
pub mod thresholds;

pub use benchmark::{
    BenchmarkMethod, DailyBenchmark, FlowBenchmark, GreedyPassBenchmark, ProfitBenchmark,
    ProfitSummary, daily_benchmark, offline_optimal_profit,
};
pub use error::{PolicyError, Result, StoreError};
pub use policy::{OnlinePolicy, OnlineSession, PolicyRun};
pub use storage::EnergyStore;
pub use sweep::{AbortSignal, ParameterSweep, SweepOutcome, SweepPoint, SweepResult};
pub use thresholds::RollingThresholdCalculator;
