// Copyright (c) 2025 SOLARE S.R.O.
//
// This file is part of Arbion.

use serde::{Deserialize, Serialize};

/// One buy-then-sell pair chosen by an offline benchmark
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    /// Index of the hour the unit is bought
    pub buy_hour: usize,
    /// Index of the hour the unit is sold (always after `buy_hour`)
    pub sell_hour: usize,
    /// Share of a full round trip (< 1.0 only for a fractional final trade)
    pub weight: f64,
}

impl Trade {
    #[must_use]
    pub fn full(buy_hour: usize, sell_hour: usize) -> Self {
        Self {
            buy_hour,
            sell_hour,
            weight: 1.0,
        }
    }

    /// Weighted profit of this trade over the given prices
    #[must_use]
    pub fn profit(&self, prices: &[f64]) -> f64 {
        (prices[self.sell_hour] - prices[self.buy_hour]) * self.weight
    }
}

/// Output of an offline benchmark
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkResult {
    /// Total profit per unit of energy traded
    pub total_profit: f64,
    /// Chosen trades; hours are pairwise disjoint
    pub trades: Vec<Trade>,
}

impl BenchmarkResult {
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn buy_hours(&self) -> Vec<usize> {
        self.trades.iter().map(|t| t.buy_hour).collect()
    }

    #[must_use]
    pub fn sell_hours(&self) -> Vec<usize> {
        self.trades.iter().map(|t| t.sell_hour).collect()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.trades.is_empty()
    }

    /// Sum of trade weights (number of round trips, possibly fractional)
    #[must_use]
    pub fn round_trips(&self) -> f64 {
        self.trades.iter().map(|t| t.weight).sum()
    }

    /// Check the structural contract: `buy < sell`, hours pairwise disjoint,
    /// weights in (0, 1] with only the last trade below one.
    #[must_use]
    pub fn is_well_formed(&self, hours: usize) -> bool {
        let mut used = vec![false; hours];
        for (idx, trade) in self.trades.iter().enumerate() {
            if trade.buy_hour >= trade.sell_hour || trade.sell_hour >= hours {
                return false;
            }
            if used[trade.buy_hour] || used[trade.sell_hour] {
                return false;
            }
            used[trade.buy_hour] = true;
            used[trade.sell_hour] = true;

            let is_last = idx + 1 == self.trades.len();
            let weight_ok = if is_last {
                trade.weight > 0.0 && trade.weight <= 1.0
            } else {
                (trade.weight - 1.0).abs() < f64::EPSILON
            };
            if !weight_ok {
                return false;
            }
        }
        true
    }
}
