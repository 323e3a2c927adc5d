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

//! Offline profit benchmarks.
//!
//! Given the whole price horizon and a transaction budget (number of full
//! buy/sell round trips, possibly fractional), select disjoint
//! `buy_hour < sell_hour` pairs maximizing `sum(price[sell] - price[buy])`.
//!
//! Profits are per unit of energy; callers scale by the trade size.

mod daily;
mod flow;
mod greedy;

use arbion_types::BenchmarkResult;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub use daily::{DailyBenchmark, ProfitSummary, daily_benchmark};
pub use flow::FlowBenchmark;
pub use greedy::GreedyPassBenchmark;

/// An offline solver for the budgeted trade selection problem
pub trait ProfitBenchmark {
    fn name(&self) -> &'static str;

    /// Select trades over `prices` using at most `budget` round trips.
    ///
    /// An empty series or a budget that is not strictly positive (NaN
    /// included) yields an empty result. An infinite budget is unlimited.
    fn solve(&self, prices: &[f64], budget: f64) -> BenchmarkResult;
}

/// Which benchmark implementation to run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BenchmarkMethod {
    /// Pass-per-trade greedy selection, not globally optimal
    Greedy,
    /// Min-cost flow, optimal for integer budgets
    #[default]
    Exact,
}

impl BenchmarkMethod {
    #[must_use]
    pub fn solve(self, prices: &[f64], budget: f64) -> BenchmarkResult {
        match self {
            Self::Greedy => GreedyPassBenchmark.solve(prices, budget),
            Self::Exact => FlowBenchmark.solve(prices, budget),
        }
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Greedy => GreedyPassBenchmark.name(),
            Self::Exact => FlowBenchmark.name(),
        }
    }
}

impl fmt::Display for BenchmarkMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for BenchmarkMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "greedy" => Ok(Self::Greedy),
            "exact" | "flow" => Ok(Self::Exact),
            other => Err(format!(
                "unknown benchmark method '{other}' (expected 'greedy' or 'exact')"
            )),
        }
    }
}

/// Best achievable profit for `budget` round trips using the default method
#[must_use]
pub fn offline_optimal_profit(prices: &[f64], budget: f64) -> BenchmarkResult {
    BenchmarkMethod::default().solve(prices, budget)
}

/// Transaction budget split into whole trades and a fractional remainder
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Budget {
    pub whole: usize,
    pub remainder: f64,
}

impl Budget {
    /// `None` when nothing can be traded
    pub(crate) fn split(budget: f64, hours: usize) -> Option<Self> {
        if budget.is_nan() || budget <= 0.0 || hours < 2 {
            return None;
        }
        #[expect(clippy::integer_division, reason = "each trade uses two hours")]
        let max_trades = hours / 2;

        if budget.is_infinite() || budget.floor() >= max_trades as f64 {
            return Some(Self {
                whole: max_trades,
                remainder: 0.0,
            });
        }

        // Absorb representation error so 0.1 / 0.01 counts as 10 whole trades
        let nearest = budget.round();
        let budget = if (budget - nearest).abs() < 1e-9 * nearest.max(1.0) {
            nearest
        } else {
            budget
        };

        let floor = budget.floor();
        #[expect(
            clippy::cast_possible_truncation,
            clippy::cast_sign_loss,
            reason = "0 <= floor < max_trades"
        )]
        let whole = floor as usize;
        Some(Self {
            whole,
            remainder: budget - floor,
        })
    }
}

/// Best single pair among `usable` hours.
///
/// Scans left to right keeping the cheapest usable hour seen so far. A
/// candidate replaces the current best only on strictly higher profit, and
/// the running minimum only moves on a strictly lower price, so the earliest
/// running minimum wins ties. Only strictly positive profits qualify.
pub(crate) fn best_pair(
    prices: &[f64],
    usable: impl Fn(usize) -> bool,
) -> Option<(usize, usize, f64)> {
    let mut cheapest: Option<usize> = None;
    let mut best: Option<(usize, usize, f64)> = None;

    for (hour, &price) in prices.iter().enumerate() {
        if !usable(hour) {
            continue;
        }
        if let Some(buy) = cheapest {
            let profit = price - prices[buy];
            if profit > best.map_or(0.0, |(_, _, p)| p) {
                best = Some((buy, hour, profit));
            }
        }
        if cheapest.is_none_or(|buy| price < prices[buy]) {
            cheapest = Some(hour);
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_budget_split() {
        assert_eq!(Budget::split(0.0, 10), None);
        assert_eq!(Budget::split(-1.0, 10), None);
        assert_eq!(Budget::split(f64::NAN, 10), None);
        assert_eq!(Budget::split(3.0, 1), None);

        let budget = Budget::split(2.5, 10).unwrap();
        assert_eq!(budget.whole, 2);
        assert!((budget.remainder - 0.5).abs() < 1e-12);

        let rounded = Budget::split(0.1 / 0.01, 30).unwrap();
        assert_eq!(rounded.whole, 10);
        assert_eq!(rounded.remainder, 0.0);

        let unlimited = Budget::split(f64::INFINITY, 7).unwrap();
        assert_eq!(unlimited.whole, 3);
        assert_eq!(unlimited.remainder, 0.0);

        // More trades than hours allow
        let capped = Budget::split(9.5, 6).unwrap();
        assert_eq!(capped.whole, 3);
        assert_eq!(capped.remainder, 0.0);
    }

    #[test]
    fn test_best_pair_prefers_earliest_minimum() {
        // Both 1.0 hours give profit 4; the first one is kept
        let prices = [1.0, 3.0, 1.0, 5.0];
        assert_eq!(best_pair(&prices, |_| true), Some((0, 3, 4.0)));
    }

    #[test]
    fn test_best_pair_skips_unusable_hours() {
        let prices = [1.0, 3.0, 2.0, 5.0];
        assert_eq!(best_pair(&prices, |h| h != 0), Some((2, 3, 3.0)));
    }

    #[test]
    fn test_best_pair_none_when_falling() {
        let prices = [5.0, 4.0, 3.0];
        assert_eq!(best_pair(&prices, |_| true), None);
    }

    #[test]
    fn test_method_parsing() {
        assert_eq!("greedy".parse::<BenchmarkMethod>(), Ok(BenchmarkMethod::Greedy));
        assert_eq!("EXACT".parse::<BenchmarkMethod>(), Ok(BenchmarkMethod::Exact));
        assert!("simplex".parse::<BenchmarkMethod>().is_err());
        assert_eq!(BenchmarkMethod::default(), BenchmarkMethod::Exact);
    }
}
