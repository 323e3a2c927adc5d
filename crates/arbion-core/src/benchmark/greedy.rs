// Copyright (c) 2025 SOLARE S.R.O.
//
// This file is part of Arbion.

use arbion_types::{BenchmarkResult, Trade};
use tracing::debug;

use super::{Budget, ProfitBenchmark, best_pair};

/// Pass-per-trade greedy selection.
///
/// Each pass scans the unused hours for the single most profitable pair and
/// commits it. Passes repeat until the whole budget is spent or no pair with
/// positive profit remains; a fractional remainder buys one extra pass whose
/// profit is weighted by the remainder.
///
/// Committing the best pair first can block a better combination of smaller
/// pairs, so this is a lower bound on the optimum, not the optimum itself.
#[derive(Debug, Clone, Copy, Default)]
pub struct GreedyPassBenchmark;

impl ProfitBenchmark for GreedyPassBenchmark {
    fn name(&self) -> &'static str {
        "greedy"
    }

    fn solve(&self, prices: &[f64], budget: f64) -> BenchmarkResult {
        let Some(budget) = Budget::split(budget, prices.len()) else {
            return BenchmarkResult::empty();
        };

        let mut used = vec![false; prices.len()];
        let mut trades = Vec::with_capacity(budget.whole + 1);

        for pass in 0..budget.whole {
            let Some((buy, sell, profit)) = best_pair(prices, |h| !used[h]) else {
                debug!("Greedy stopped after {pass} passes: no profitable pair left");
                break;
            };
            used[buy] = true;
            used[sell] = true;
            debug!("Greedy pass {pass}: buy h{buy}, sell h{sell}, profit {profit:.4}");
            trades.push(Trade::full(buy, sell));
        }

        // Only reached with the whole budget spent; an early stop above means
        // no positive pair remains for the remainder either
        if budget.remainder > 0.0
            && trades.len() == budget.whole
            && let Some((buy, sell, profit)) = best_pair(prices, |h| !used[h])
        {
            debug!(
                "Greedy fractional pass: buy h{buy}, sell h{sell}, profit {profit:.4} x {:.4}",
                budget.remainder
            );
            trades.push(Trade {
                buy_hour: buy,
                sell_hour: sell,
                weight: budget.remainder,
            });
        }

        let total_profit = trades.iter().map(|t| t.profit(prices)).sum();
        BenchmarkResult {
            total_profit,
            trades,
        }
    }
}
