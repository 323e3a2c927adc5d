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

//! Parallel parameter sweeps.
//!
//! Every point owns its own store and window, so runs share nothing and fan
//! out over the rayon pool. The abort signal is checked before each run
//! starts; a run in progress always finishes.

use arbion_types::{ArbitrageConfig, PriceSeries, StorageConfig, ThresholdConfig};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};
use tracing::{info, warn};

use crate::benchmark::BenchmarkMethod;
use crate::error::PolicyError;
use crate::policy::OnlinePolicy;

/// Cooperative cancellation shared between the caller and sweep workers
#[derive(Debug, Clone, Default)]
pub struct AbortSignal {
    flag: Arc<AtomicBool>,
    deadline: Option<Instant>,
}

impl AbortSignal {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Signal that trips by itself once `limit` has elapsed
    #[must_use]
    pub fn with_time_limit(limit: Duration) -> Self {
        Self {
            flag: Arc::new(AtomicBool::new(false)),
            deadline: Instant::now().checked_add(limit),
        }
    }

    pub fn abort(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    #[must_use]
    pub fn is_aborted(&self) -> bool {
        if self.flag.load(Ordering::Relaxed) {
            return true;
        }
        if self.deadline.is_some_and(|deadline| Instant::now() >= deadline) {
            self.abort();
            return true;
        }
        false
    }
}

/// One configuration of a sweep
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SweepPoint {
    /// Position in the sweep, stable across runs
    pub index: usize,
    pub config: ArbitrageConfig,
}

impl SweepPoint {
    /// Compact human-readable description
    #[must_use]
    pub fn label(&self) -> String {
        let storage = &self.config.storage;
        let thresholds = &self.config.thresholds;
        format!(
            "cap {} / bw {} / {}h / q {}-{}",
            storage.capacity_mwh,
            storage.bandwidth_mw,
            thresholds.window_hours,
            thresholds.lower_quantile,
            thresholds.upper_quantile
        )
    }
}

/// Figures of a completed run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SweepResult {
    pub point: SweepPoint,
    pub profit: f64,
    pub profit_net: f64,
    pub buys: usize,
    pub sells: usize,
    /// Offline profit with the same number of round trips, in currency
    pub benchmark_profit: f64,
}

impl SweepResult {
    /// Share of the offline profit the policy captured
    #[must_use]
    pub fn capture_ratio(&self) -> Option<f64> {
        (self.benchmark_profit > 0.0).then(|| self.profit / self.benchmark_profit)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SweepOutcome {
    Completed(SweepResult),
    Failed { point: SweepPoint, error: String },
    /// Not started because the sweep was aborted
    Skipped { point: SweepPoint },
}

impl SweepOutcome {
    #[must_use]
    pub fn point(&self) -> &SweepPoint {
        match self {
            Self::Completed(result) => &result.point,
            Self::Failed { point, .. } | Self::Skipped { point } => point,
        }
    }

    #[must_use]
    pub fn result(&self) -> Option<&SweepResult> {
        match self {
            Self::Completed(result) => Some(result),
            Self::Failed { .. } | Self::Skipped { .. } => None,
        }
    }
}

/// A set of configurations evaluated against one series
#[derive(Debug, Clone)]
pub struct ParameterSweep {
    points: Vec<SweepPoint>,
    method: BenchmarkMethod,
}

impl ParameterSweep {
    #[must_use]
    pub fn new(configs: Vec<ArbitrageConfig>) -> Self {
        let points = configs
            .into_iter()
            .enumerate()
            .map(|(index, config)| SweepPoint { index, config })
            .collect();
        Self {
            points,
            method: BenchmarkMethod::default(),
        }
    }

    /// Cartesian product of the given axes
    #[must_use]
    pub fn grid(
        capacities: &[f64],
        bandwidths: &[f64],
        windows: &[usize],
        quantiles: &[(f64, f64)],
        net_efficiency_factor: f64,
    ) -> Self {
        let mut configs = Vec::new();
        for &capacity_mwh in capacities {
            for &bandwidth_mw in bandwidths {
                for &window_hours in windows {
                    for &(lower_quantile, upper_quantile) in quantiles {
                        configs.push(ArbitrageConfig {
                            storage: StorageConfig {
                                capacity_mwh,
                                bandwidth_mw,
                                net_efficiency_factor,
                            },
                            thresholds: ThresholdConfig {
                                window_hours,
                                lower_quantile,
                                upper_quantile,
                            },
                        });
                    }
                }
            }
        }
        Self::new(configs)
    }

    #[must_use]
    pub fn with_method(mut self, method: BenchmarkMethod) -> Self {
        self.method = method;
        self
    }

    #[must_use]
    pub fn points(&self) -> &[SweepPoint] {
        &self.points
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Evaluate every point. Outcomes keep the order of the points.
    #[must_use]
    pub fn run(&self, series: &PriceSeries, abort: &AbortSignal) -> Vec<SweepOutcome> {
        info!(
            "Sweeping {} configurations over {} hours",
            self.points.len(),
            series.len()
        );
        let prices = series.prices();

        let outcomes: Vec<SweepOutcome> = self
            .points
            .par_iter()
            .map(|&point| {
                if abort.is_aborted() {
                    return SweepOutcome::Skipped { point };
                }
                match self.evaluate(point, series, &prices) {
                    Ok(result) => SweepOutcome::Completed(result),
                    Err(error) => SweepOutcome::Failed {
                        point,
                        error: error.to_string(),
                    },
                }
            })
            .collect();

        let skipped = outcomes
            .iter()
            .filter(|o| matches!(o, SweepOutcome::Skipped { .. }))
            .count();
        if skipped > 0 {
            warn!(
                "Sweep aborted: {} of {} runs skipped",
                skipped,
                outcomes.len()
            );
        }
        outcomes
    }

    fn evaluate(
        &self,
        point: SweepPoint,
        series: &PriceSeries,
        prices: &[f64],
    ) -> Result<SweepResult, PolicyError> {
        let run = OnlinePolicy::new(point.config)?.run(series)?;
        let offline = self.method.solve(prices, run.equivalent_budget());

        Ok(SweepResult {
            point,
            profit: run.profit(),
            profit_net: run.profit_net(),
            buys: run.buys,
            sells: run.sells,
            benchmark_profit: offline.total_profit * point.config.storage.bandwidth_mw,
        })
    }
}
