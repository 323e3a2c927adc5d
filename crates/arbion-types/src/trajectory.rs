// Copyright (c) 2025 SOLARE S.R.O.
//
// This file is part of Arbion.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Decision band for one hour, derived from the trailing price window
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    /// Buy when the price is strictly below this bound
    pub lower_bound: f64,
    /// Sell when the price is strictly above this bound
    pub upper_bound: f64,
    pub window_mean: f64,
    pub window_median: f64,
    /// Number of prices the window held (less than the window length during warm-up)
    pub samples: usize,
}

impl Thresholds {
    #[must_use]
    pub fn should_buy(&self, price: f64) -> bool {
        price < self.lower_bound
    }

    #[must_use]
    pub fn should_sell(&self, price: f64) -> bool {
        price > self.upper_bound
    }
}

/// What the online policy did in a given hour
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreAction {
    Buy,
    Sell,
    #[default]
    Hold,
}

impl fmt::Display for StoreAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Buy => "buy",
            Self::Sell => "sell",
            Self::Hold => "hold",
        };
        f.write_str(label)
    }
}

/// State of the store recorded after each simulated hour
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrajectoryPoint {
    pub timestamp: DateTime<Utc>,
    pub price: f64,
    pub action: StoreAction,
    pub thresholds: Thresholds,
    /// Stored energy after the action (MWh)
    pub load: f64,
    pub cumulative_cost: f64,
    pub cumulative_income: f64,
    /// `cumulative_income - cumulative_cost`
    pub profit: f64,
}
