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

//! Online causal policy.
//!
//! For every hour, in order:
//!
//! 1. Push the price into the rolling window and read the band
//! 2. Buy if the store has headroom and the price is below the lower bound
//! 3. Otherwise sell if the store holds energy and the price is above the
//!    upper bound
//! 4. Otherwise hold
//!
//! The guards make store errors unreachable; if one is observed anyway it is
//! logged and surfaced as [`PolicyError::InvariantViolation`].

use arbion_types::{
    ArbitrageConfig, PricePoint, PriceSeries, StoreAction, Thresholds, TrajectoryPoint,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use crate::error::{PolicyError, Result, StoreError};
use crate::storage::EnergyStore;
use crate::thresholds::RollingThresholdCalculator;

/// Streaming form of the policy: one decision per call to [`step`](Self::step)
#[derive(Debug)]
pub struct OnlineSession {
    store: EnergyStore,
    thresholds: RollingThresholdCalculator,
    buys: usize,
    sells: usize,
}

impl OnlineSession {
    pub fn new(config: &ArbitrageConfig) -> Result<Self> {
        Ok(Self {
            store: EnergyStore::new(&config.storage)?,
            thresholds: RollingThresholdCalculator::new(config.thresholds)?,
            buys: 0,
            sells: 0,
        })
    }

    /// Decide and apply the action for the next hour
    pub fn step(&mut self, point: &PricePoint) -> Result<TrajectoryPoint> {
        let band = self.thresholds.push(point.price);
        let action = self.decide(point.price, &band);

        let next = match action {
            StoreAction::Buy => self.store.buy(point.price),
            StoreAction::Sell => self.store.sell(point.price),
            StoreAction::Hold => Ok(self.store),
        };
        self.store = next.map_err(|source| violation(point, source))?;

        match action {
            StoreAction::Buy => self.buys += 1,
            StoreAction::Sell => self.sells += 1,
            StoreAction::Hold => {}
        }

        Ok(TrajectoryPoint {
            timestamp: point.timestamp,
            price: point.price,
            action,
            thresholds: band,
            load: self.store.load(),
            cumulative_cost: self.store.cost(),
            cumulative_income: self.store.income(),
            profit: self.store.profit(),
        })
    }

    fn decide(&self, price: f64, band: &Thresholds) -> StoreAction {
        if !self.store.is_full() && band.should_buy(price) {
            StoreAction::Buy
        } else if !self.store.is_discharged() && band.should_sell(price) {
            StoreAction::Sell
        } else {
            StoreAction::Hold
        }
    }

    #[must_use]
    pub fn store(&self) -> &EnergyStore {
        &self.store
    }

    #[must_use]
    pub fn buys(&self) -> usize {
        self.buys
    }

    #[must_use]
    pub fn sells(&self) -> usize {
        self.sells
    }
}

fn violation(point: &PricePoint, source: StoreError) -> PolicyError {
    error!(
        "Store invariant violated at {} (price {:.2}): {}",
        point.timestamp, point.price, source
    );
    PolicyError::InvariantViolation {
        timestamp: point.timestamp,
        source,
    }
}

/// Outcome of one forward pass over a series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyRun {
    pub trajectory: Vec<TrajectoryPoint>,
    pub final_store: EnergyStore,
    pub buys: usize,
    pub sells: usize,
}

impl PolicyRun {
    #[must_use]
    pub fn profit(&self) -> f64 {
        self.final_store.profit()
    }

    #[must_use]
    pub fn profit_net(&self) -> f64 {
        self.final_store.profit_net()
    }

    /// Completed sells, the transaction budget the offline benchmark gets
    /// for a like-for-like comparison
    #[must_use]
    pub fn equivalent_budget(&self) -> f64 {
        self.sells as f64
    }
}

/// Batch form of the policy
#[derive(Debug, Clone, Copy)]
pub struct OnlinePolicy {
    config: ArbitrageConfig,
}

impl OnlinePolicy {
    /// Validate the configuration up front so a run never starts on a
    /// degenerate store or window
    pub fn new(config: ArbitrageConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    #[must_use]
    pub fn config(&self) -> &ArbitrageConfig {
        &self.config
    }

    /// Run the policy over the whole series.
    ///
    /// An empty series yields an empty trajectory. A non-empty series shorter
    /// than the rolling window is a configuration error
    /// ([`ConfigError::WindowExceedsHistory`](arbion_types::ConfigError)),
    /// not an empty trajectory.
    pub fn run(&self, series: &PriceSeries) -> Result<PolicyRun> {
        let mut session = OnlineSession::new(&self.config)?;

        if series.is_empty() {
            debug!("Empty price series, nothing to simulate");
            return Ok(PolicyRun {
                trajectory: Vec::new(),
                final_store: *session.store(),
                buys: 0,
                sells: 0,
            });
        }
        self.config.validate_for_history(series.len())?;

        info!(
            "Running online policy over {} hours (capacity {} MWh, bandwidth {} MW, window {} h)",
            series.len(),
            self.config.storage.capacity_mwh,
            self.config.storage.bandwidth_mw,
            self.config.thresholds.window_hours
        );

        let trajectory = series
            .points()
            .iter()
            .map(|point| session.step(point))
            .collect::<Result<Vec<_>>>()?;

        let run = PolicyRun {
            trajectory,
            final_store: *session.store(),
            buys: session.buys(),
            sells: session.sells(),
        };

        info!(
            "Policy finished: {} buys, {} sells, profit {:.4}, net {:.4}",
            run.buys,
            run.sells,
            run.profit(),
            run.profit_net()
        );
        Ok(run)
    }
}
