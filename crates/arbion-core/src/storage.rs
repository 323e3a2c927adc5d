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

//! Energy store state machine.
//!
//! `EnergyStore` is an immutable value: `buy` and `sell` consume the current
//! state and return the next one, or a [`StoreError`] when the transition
//! would leave `0 <= load <= capacity`. Load is counted in whole bandwidth
//! steps, so `load()` is always an exact multiple of the bandwidth.

use arbion_types::{ConfigError, StorageConfig};
use serde::{Deserialize, Serialize};

use crate::error::StoreError;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnergyStore {
    capacity: f64,
    bandwidth: f64,
    net_efficiency_factor: f64,
    /// Number of bandwidth steps that fit into the capacity
    max_steps: u32,
    /// Number of bandwidth steps currently stored
    steps: u32,
    cost: f64,
    income: f64,
}

impl EnergyStore {
    /// Create an empty store. Degenerate configurations are rejected here,
    /// before any simulation starts.
    pub fn new(config: &StorageConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            capacity: config.capacity_mwh,
            bandwidth: config.bandwidth_mw,
            net_efficiency_factor: config.net_efficiency_factor,
            max_steps: config.step_capacity(),
            steps: 0,
            cost: 0.0,
            income: 0.0,
        })
    }

    /// Charge one hour at full bandwidth
    pub fn buy(self, price: f64) -> Result<Self, StoreError> {
        if self.is_full() {
            return Err(StoreError::CapacityExceeded {
                load: self.load(),
                bandwidth: self.bandwidth,
                capacity: self.capacity,
            });
        }
        Ok(Self {
            steps: self.steps + 1,
            cost: self.cost + price * self.bandwidth,
            ..self
        })
    }

    /// Discharge one hour at full bandwidth
    pub fn sell(self, price: f64) -> Result<Self, StoreError> {
        if self.is_discharged() {
            return Err(StoreError::InsufficientCharge {
                load: self.load(),
                bandwidth: self.bandwidth,
            });
        }
        Ok(Self {
            steps: self.steps - 1,
            income: self.income + price * self.bandwidth,
            ..self
        })
    }

    /// True when another buy would overshoot the capacity
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.steps >= self.max_steps
    }

    /// True when another sell would take the load below zero
    #[must_use]
    pub fn is_discharged(&self) -> bool {
        self.steps == 0
    }

    /// Stored energy (MWh)
    #[must_use]
    pub fn load(&self) -> f64 {
        f64::from(self.steps) * self.bandwidth
    }

    #[must_use]
    pub fn steps(&self) -> u32 {
        self.steps
    }

    #[must_use]
    pub fn capacity(&self) -> f64 {
        self.capacity
    }

    #[must_use]
    pub fn bandwidth(&self) -> f64 {
        self.bandwidth
    }

    #[must_use]
    pub fn cost(&self) -> f64 {
        self.cost
    }

    #[must_use]
    pub fn income(&self) -> f64 {
        self.income
    }

    #[must_use]
    pub fn profit(&self) -> f64 {
        self.income - self.cost
    }

    /// Profit after round-trip losses
    #[must_use]
    pub fn profit_net(&self) -> f64 {
        self.profit() * self.net_efficiency_factor
    }
}
