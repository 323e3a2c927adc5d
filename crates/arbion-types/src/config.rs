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

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

// ============= Arbitrage Configuration =============

/// Complete configuration of one simulation run
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ArbitrageConfig {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub thresholds: ThresholdConfig,
}

impl ArbitrageConfig {
    /// Validate everything that can be checked without a price series
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.storage.validate()?;
        self.thresholds.validate()
    }

    /// Validate against the amount of history a run will see
    pub fn validate_for_history(&self, available_hours: usize) -> Result<(), ConfigError> {
        self.validate()?;
        self.thresholds.validate_for_history(available_hours)
    }
}

/// Physical parameters of the storage device
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Maximum stored energy (MWh)
    #[serde(default = "default_capacity_mwh")]
    pub capacity_mwh: f64,

    /// Energy moved into or out of the store per hour (MW)
    #[serde(default = "default_bandwidth_mw")]
    pub bandwidth_mw: f64,

    /// Single multiplier for compounded round-trip losses (0-1)
    #[serde(default = "default_net_efficiency_factor")]
    pub net_efficiency_factor: f64,
}

fn default_capacity_mwh() -> f64 {
    0.1
}

fn default_bandwidth_mw() -> f64 {
    0.01
}

fn default_net_efficiency_factor() -> f64 {
    // 90% conversion efficiency compounded with 81% storage round-trip
    0.9 * 0.81
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            capacity_mwh: default_capacity_mwh(),
            bandwidth_mw: default_bandwidth_mw(),
            net_efficiency_factor: default_net_efficiency_factor(),
        }
    }
}

impl StorageConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        ensure_finite("capacity_mwh", self.capacity_mwh)?;
        ensure_finite("bandwidth_mw", self.bandwidth_mw)?;
        ensure_finite("net_efficiency_factor", self.net_efficiency_factor)?;

        if self.bandwidth_mw <= 0.0 {
            return Err(ConfigError::NonPositiveBandwidth(self.bandwidth_mw));
        }
        if self.capacity_mwh < self.bandwidth_mw {
            return Err(ConfigError::CapacityBelowBandwidth {
                capacity: self.capacity_mwh,
                bandwidth: self.bandwidth_mw,
            });
        }
        if !(0.0..=1.0).contains(&self.net_efficiency_factor) {
            return Err(ConfigError::EfficiencyOutOfRange(
                self.net_efficiency_factor,
            ));
        }
        Ok(())
    }

    /// Number of whole bandwidth steps that fit into the capacity.
    ///
    /// Equals the offline transaction budget for a single charge cycle.
    #[must_use]
    pub fn step_capacity(&self) -> u32 {
        if self.bandwidth_mw <= 0.0 || !self.capacity_mwh.is_finite() {
            return 0;
        }
        let ratio = self.capacity_mwh / self.bandwidth_mw;
        // Absorb representation error so 0.1 / 0.01 yields 10, not 9
        let steps = (ratio + ratio * 1e-9).floor();
        if steps <= 0.0 {
            0
        } else if steps >= f64::from(u32::MAX) {
            u32::MAX
        } else {
            #[expect(
                clippy::cast_possible_truncation,
                clippy::cast_sign_loss,
                reason = "range checked above"
            )]
            let steps = steps as u32;
            steps
        }
    }

    /// Energy moved per trade when benchmarking in whole-trade units
    #[must_use]
    pub fn trade_size_mwh(&self) -> f64 {
        self.capacity_mwh.min(self.bandwidth_mw)
    }
}

/// Rolling quantile band used by the online policy
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThresholdConfig {
    /// Number of trailing hours (including the current one)
    #[serde(default = "default_window_hours")]
    pub window_hours: usize,

    /// Quantile level of the buy bound
    #[serde(default = "default_lower_quantile")]
    pub lower_quantile: f64,

    /// Quantile level of the sell bound
    #[serde(default = "default_upper_quantile")]
    pub upper_quantile: f64,
}

fn default_window_hours() -> usize {
    24
}

fn default_lower_quantile() -> f64 {
    0.4
}

fn default_upper_quantile() -> f64 {
    0.6
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            window_hours: default_window_hours(),
            lower_quantile: default_lower_quantile(),
            upper_quantile: default_upper_quantile(),
        }
    }
}

impl ThresholdConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.window_hours == 0 {
            return Err(ConfigError::EmptyWindow);
        }
        ensure_quantile("lower_quantile", self.lower_quantile)?;
        ensure_quantile("upper_quantile", self.upper_quantile)?;
        if self.lower_quantile > self.upper_quantile {
            return Err(ConfigError::QuantilesInverted {
                lower: self.lower_quantile,
                upper: self.upper_quantile,
            });
        }
        Ok(())
    }

    pub fn validate_for_history(&self, available_hours: usize) -> Result<(), ConfigError> {
        if self.window_hours > available_hours {
            return Err(ConfigError::WindowExceedsHistory {
                window: self.window_hours,
                available: available_hours,
            });
        }
        Ok(())
    }
}

fn ensure_finite(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NotFinite { field, value })
    }
}

fn ensure_quantile(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::QuantileOutOfRange { field, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = ArbitrageConfig::default();

        assert!(config.validate().is_ok());
        assert_eq!(config.thresholds.window_hours, 24);
        assert!((config.storage.net_efficiency_factor - 0.729).abs() < 1e-12);
    }

    #[test]
    fn test_rejects_zero_bandwidth() {
        let storage = StorageConfig {
            bandwidth_mw: 0.0,
            ..Default::default()
        };

        assert_eq!(
            storage.validate(),
            Err(ConfigError::NonPositiveBandwidth(0.0))
        );
    }

    #[test]
    fn test_rejects_capacity_below_bandwidth() {
        let storage = StorageConfig {
            capacity_mwh: 0.5,
            bandwidth_mw: 1.0,
            net_efficiency_factor: 1.0,
        };

        assert!(matches!(
            storage.validate(),
            Err(ConfigError::CapacityBelowBandwidth { .. })
        ));
    }

    #[test]
    fn test_rejects_efficiency_above_one() {
        let storage = StorageConfig {
            net_efficiency_factor: 1.2,
            ..Default::default()
        };

        assert_eq!(
            storage.validate(),
            Err(ConfigError::EfficiencyOutOfRange(1.2))
        );
    }

    #[test]
    fn test_rejects_nan_capacity() {
        let storage = StorageConfig {
            capacity_mwh: f64::NAN,
            ..Default::default()
        };

        assert!(matches!(
            storage.validate(),
            Err(ConfigError::NotFinite {
                field: "capacity_mwh",
                ..
            })
        ));
    }

    #[test]
    fn test_threshold_validation() {
        let inverted = ThresholdConfig {
            lower_quantile: 0.7,
            upper_quantile: 0.3,
            ..Default::default()
        };
        assert!(matches!(
            inverted.validate(),
            Err(ConfigError::QuantilesInverted { .. })
        ));

        let empty = ThresholdConfig {
            window_hours: 0,
            ..Default::default()
        };
        assert_eq!(empty.validate(), Err(ConfigError::EmptyWindow));

        let out_of_range = ThresholdConfig {
            upper_quantile: 1.5,
            ..Default::default()
        };
        assert!(matches!(
            out_of_range.validate(),
            Err(ConfigError::QuantileOutOfRange { .. })
        ));
    }

    #[test]
    fn test_window_longer_than_history() {
        let config = ArbitrageConfig::default();

        assert_eq!(
            config.validate_for_history(10),
            Err(ConfigError::WindowExceedsHistory {
                window: 24,
                available: 10
            })
        );
        assert!(config.validate_for_history(24).is_ok());
    }

    #[test]
    fn test_step_capacity() {
        assert_eq!(StorageConfig::default().step_capacity(), 10);

        let storage = StorageConfig {
            capacity_mwh: 80.0,
            bandwidth_mw: 30.0,
            net_efficiency_factor: 1.0,
        };
        assert_eq!(storage.step_capacity(), 2);
        assert_eq!(storage.trade_size_mwh(), 30.0);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: ArbitrageConfig =
            serde_json::from_str(r#"{"storage": {"capacity_mwh": 2.0}}"#).unwrap();

        assert_eq!(config.storage.capacity_mwh, 2.0);
        assert_eq!(config.storage.bandwidth_mw, 0.01);
        assert_eq!(config.thresholds, ThresholdConfig::default());
    }
}
