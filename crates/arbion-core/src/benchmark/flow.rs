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

//! Exact benchmark as a min-cost flow over the hour chain.
//!
//! Network: a source edge into every hour (buy, cost `p`), an edge from every
//! hour to the sink (sell, gain `p`) and uncapacitated edges `h -> h + 1`
//! carrying held units forward. One unit of flow is one round trip.
//!
//! Successive shortest paths on this network are optimal for every flow
//! value. Because the graph is a chain, the most profitable augmenting path
//! is found with one linear scan:
//!
//! - entry at hour `a` uses its buy edge, so `a` must not be bought yet
//! - exit at hour `b` uses its sell edge, so `b` must not be sold yet
//! - an hour whose buy and sell edges are both used only passes flow
//!   through; it trades nothing and takes no further part in paths
//! - `a < b` is always feasible
//! - `a > b` pushes flow backwards and needs every boundary in `[b, a)` to
//!   carry at least one unit

use arbion_types::{BenchmarkResult, Trade};
use tracing::debug;

use super::{Budget, ProfitBenchmark, best_pair};

#[derive(Debug, Clone, Copy, Default)]
pub struct FlowBenchmark;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HourState {
    Idle,
    Bought,
    Sold,
    /// Buy and sell edges both saturated, net position zero
    Crossed,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Augmentation {
    entry: usize,
    exit: usize,
    gain: f64,
}

/// Residual network state
struct Residual<'a> {
    prices: &'a [f64],
    state: Vec<HourState>,
    /// Units carried across the boundary `h -> h + 1`
    holding: Vec<u32>,
}

impl<'a> Residual<'a> {
    fn new(prices: &'a [f64]) -> Self {
        Self {
            prices,
            state: vec![HourState::Idle; prices.len()],
            holding: vec![0; prices.len().saturating_sub(1)],
        }
    }

    fn can_enter(&self, hour: usize) -> bool {
        matches!(self.state[hour], HourState::Idle | HourState::Sold)
    }

    fn can_exit(&self, hour: usize) -> bool {
        matches!(self.state[hour], HourState::Idle | HourState::Bought)
    }

    /// Not part of any trade
    fn is_free(&self, hour: usize) -> bool {
        matches!(self.state[hour], HourState::Idle | HourState::Crossed)
    }

    /// Most profitable augmenting path, ties resolved towards earlier hours
    fn best_augmentation(&self) -> Option<Augmentation> {
        let mut best: Option<Augmentation> = None;
        let mut consider = |entry: usize, exit: usize| {
            let gain = self.prices[exit] - self.prices[entry];
            if gain > best.map_or(0.0, |b| b.gain) {
                best = Some(Augmentation { entry, exit, gain });
            }
        };

        // Forward paths: cheapest allowed entry before each exit
        let mut cheapest_entry: Option<usize> = None;
        // Backward paths: dearest allowed exit before each entry within the
        // current run of loaded boundaries
        let mut dearest_exit: Option<usize> = None;

        for hour in 0..self.prices.len() {
            if hour > 0 && self.holding[hour - 1] == 0 {
                dearest_exit = None;
            }

            if self.can_exit(hour)
                && let Some(entry) = cheapest_entry
            {
                consider(entry, hour);
            }
            if self.can_enter(hour)
                && let Some(exit) = dearest_exit
            {
                consider(hour, exit);
            }

            let price = self.prices[hour];
            if self.can_enter(hour) && cheapest_entry.is_none_or(|e| price < self.prices[e]) {
                cheapest_entry = Some(hour);
            }
            if self.can_exit(hour) && dearest_exit.is_none_or(|e| price > self.prices[e]) {
                dearest_exit = Some(hour);
            }
        }
        best
    }

    fn augment(&mut self, path: Augmentation) {
        self.state[path.entry] = match self.state[path.entry] {
            HourState::Idle => HourState::Bought,
            HourState::Sold => HourState::Crossed,
            saturated @ (HourState::Bought | HourState::Crossed) => saturated,
        };
        self.state[path.exit] = match self.state[path.exit] {
            HourState::Idle => HourState::Sold,
            HourState::Bought => HourState::Crossed,
            saturated @ (HourState::Sold | HourState::Crossed) => saturated,
        };

        if path.entry < path.exit {
            for units in &mut self.holding[path.entry..path.exit] {
                *units += 1;
            }
        } else {
            for units in &mut self.holding[path.exit..path.entry] {
                *units -= 1;
            }
        }
    }

    /// Pair the i-th bought hour with the i-th sold hour.
    ///
    /// Flow conservation guarantees every prefix holds at least as many buys
    /// as sells, so each pair satisfies `buy < sell`. Crossed hours count on
    /// neither side.
    fn trades(&self) -> Vec<Trade> {
        let hours_in = |wanted: HourState| {
            self.state
                .iter()
                .enumerate()
                .filter(move |&(_, s)| *s == wanted)
                .map(|(h, _)| h)
        };
        hours_in(HourState::Bought)
            .zip(hours_in(HourState::Sold))
            .map(|(buy, sell)| Trade::full(buy, sell))
            .collect()
    }
}

impl ProfitBenchmark for FlowBenchmark {
    fn name(&self) -> &'static str {
        "exact"
    }

    fn solve(&self, prices: &[f64], budget: f64) -> BenchmarkResult {
        let Some(budget) = Budget::split(budget, prices.len()) else {
            return BenchmarkResult::empty();
        };

        let mut residual = Residual::new(prices);
        let mut augmentations = 0;
        while augmentations < budget.whole {
            let Some(path) = residual.best_augmentation() else {
                break;
            };
            debug!(
                "Augmenting: enter h{}, exit h{}, gain {:.4}",
                path.entry, path.exit, path.gain
            );
            residual.augment(path);
            augmentations += 1;
        }

        let mut trades = residual.trades();

        // The remainder only makes sense once the whole budget is in use
        if budget.remainder > 0.0
            && augmentations == budget.whole
            && let Some((buy, sell, _)) = best_pair(prices, |h| residual.is_free(h))
        {
            trades.push(Trade {
                buy_hour: buy,
                sell_hour: sell,
                weight: budget.remainder,
            });
        }

        let total_profit = trades.iter().map(|t| t.profit(prices)).sum();
        debug!(
            "Exact benchmark: {} trades over {} hours, profit {:.4}",
            trades.len(),
            prices.len(),
            total_profit
        );
        BenchmarkResult {
            total_profit,
            trades,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::benchmark::GreedyPassBenchmark;

    /// Exhaustive optimum over disjoint pairs, for small inputs
    fn brute_force(prices: &[f64], budget: usize) -> f64 {
        fn go(prices: &[f64], used: &mut Vec<bool>, left: usize) -> f64 {
            if left == 0 {
                return 0.0;
            }
            let mut best = 0.0_f64;
            for buy in 0..prices.len() {
                if used[buy] {
                    continue;
                }
                for sell in buy + 1..prices.len() {
                    if used[sell] || prices[sell] <= prices[buy] {
                        continue;
                    }
                    used[buy] = true;
                    used[sell] = true;
                    let total = prices[sell] - prices[buy] + go(prices, used, left - 1);
                    best = best.max(total);
                    used[buy] = false;
                    used[sell] = false;
                }
            }
            best
        }
        go(prices, &mut vec![false; prices.len()], budget)
    }

    #[test]
    fn test_single_trade_is_best_pair() {
        let result = FlowBenchmark.solve(&[10.0, 5.0, 20.0, 3.0, 30.0], 1.0);

        assert_eq!(result.trades, vec![Trade::full(3, 4)]);
        assert_eq!(result.total_profit, 27.0);
    }

    #[test]
    fn test_unique_optimum_on_lower_second_dip() {
        let result = FlowBenchmark.solve(&[10.0, 5.0, 20.0, 6.0, 30.0], 1.0);

        assert_eq!(result.buy_hours(), vec![1]);
        assert_eq!(result.sell_hours(), vec![4]);
        assert_eq!(result.total_profit, 25.0);
    }

    #[test]
    fn test_beats_greedy_by_splitting_pairs() {
        let prices = [1.0, 5.0, 2.0, 6.0];
        let result = FlowBenchmark.solve(&prices, 2.0);

        // The first augmentation takes (0, 3); the second reroutes through
        // the loaded chain into (0, 1) + (2, 3)
        assert_eq!(result.trades, vec![Trade::full(0, 1), Trade::full(2, 3)]);
        assert_eq!(result.total_profit, 8.0);
        assert!(result.total_profit > GreedyPassBenchmark.solve(&prices, 2.0).total_profit);
    }

    #[test]
    fn test_matches_brute_force() {
        let cases: [&[f64]; 5] = [
            &[3.0, 8.0, 1.0, 9.0, 2.0, 7.0, 4.0],
            &[5.0, 1.0, 4.0, 2.0, 8.0, 3.0, 6.0, 0.5],
            &[9.0, 8.0, 7.0, 6.0, 5.0],
            &[-2.0, 4.0, -1.0, 3.0, 0.0, 5.0],
            &[2.0, 2.0, 2.0, 3.0, 3.0, 1.0],
        ];
        for prices in cases {
            for budget in 1..=4 {
                let result = FlowBenchmark.solve(prices, budget as f64);
                let expected = brute_force(prices, budget);
                assert!(
                    (result.total_profit - expected).abs() < 1e-9,
                    "prices {prices:?}, budget {budget}: got {}, expected {expected}",
                    result.total_profit
                );
                assert!(result.is_well_formed(prices.len()));
            }
        }
    }

    #[test]
    fn test_fractional_remainder_uses_idle_hours() {
        let prices = [10.0, 5.0, 20.0, 3.0, 30.0];
        let result = FlowBenchmark.solve(&prices, 1.5);

        assert_eq!(result.trades[0], Trade::full(3, 4));
        assert_eq!(
            result.trades[1],
            Trade {
                buy_hour: 1,
                sell_hour: 2,
                weight: 0.5
            }
        );
        assert!((result.total_profit - 34.5).abs() < 1e-12);
    }

    #[test]
    fn test_unlimited_budget_takes_every_rise() {
        let prices = [1.0, 2.0, 1.0, 3.0, 2.0, 4.0];
        let result = FlowBenchmark.solve(&prices, f64::INFINITY);

        assert_eq!(result.total_profit, 5.0);
        assert!(result.is_well_formed(prices.len()));
    }

    #[test]
    fn test_empty_and_degenerate_inputs() {
        assert_eq!(FlowBenchmark.solve(&[], 1.0), BenchmarkResult::empty());
        assert_eq!(FlowBenchmark.solve(&[4.0], 1.0), BenchmarkResult::empty());
        assert_eq!(FlowBenchmark.solve(&[1.0, 2.0], -1.0), BenchmarkResult::empty());
        assert!(FlowBenchmark.solve(&[3.0, 2.0, 1.0], 2.0).is_empty());
    }
}
