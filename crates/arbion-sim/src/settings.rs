// Copyright (c) 2025 SOLARE S.R.O.
//
// This file is part of Arbion.

//! Simulator settings: storage, thresholds and the benchmark method.
//!
//! Lookup order:
//!
//! 1. explicit path (`--settings`)
//! 2. `arbion.toml` in the working directory
//! 3. built-in defaults
//!
//! `ARBION_*` environment variables are applied on top, then the result is
//! validated.

use anyhow::{Context, Result};
use arbion_core::BenchmarkMethod;
use arbion_types::{ArbitrageConfig, StorageConfig, ThresholdConfig};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;
use tracing::{info, warn};

/// Settings file picked up from the working directory
pub const DEFAULT_SETTINGS_FILE: &str = "arbion.toml";

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub thresholds: ThresholdConfig,

    /// Offline benchmark used for comparisons
    #[serde(default)]
    pub benchmark: BenchmarkMethod,
}

impl Settings {
    /// Load settings, apply environment overrides and validate
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = match path {
            Some(path) => Self::from_file(path)?,
            None if Path::new(DEFAULT_SETTINGS_FILE).is_file() => {
                Self::from_file(Path::new(DEFAULT_SETTINGS_FILE))?
            }
            None => {
                warn!("No settings file found, using defaults with environment overrides");
                Self::default()
            }
        };

        settings.apply_overrides(|key| std::env::var(key).ok());
        settings.validate()?;
        Ok(settings)
    }

    /// Parse a TOML settings file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file: {}", path.display()))?;
        let settings: Settings = toml::from_str(&content)
            .with_context(|| format!("Failed to parse settings file: {}", path.display()))?;
        info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Override fields from `ARBION_*` variables resolved through `lookup`.
    ///
    /// Unparseable values are ignored with a warning.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        override_from(&lookup, "ARBION_CAPACITY_MWH", &mut self.storage.capacity_mwh);
        override_from(&lookup, "ARBION_BANDWIDTH_MW", &mut self.storage.bandwidth_mw);
        override_from(
            &lookup,
            "ARBION_NET_EFFICIENCY",
            &mut self.storage.net_efficiency_factor,
        );
        override_from(&lookup, "ARBION_WINDOW_HOURS", &mut self.thresholds.window_hours);
        override_from(
            &lookup,
            "ARBION_LOWER_QUANTILE",
            &mut self.thresholds.lower_quantile,
        );
        override_from(
            &lookup,
            "ARBION_UPPER_QUANTILE",
            &mut self.thresholds.upper_quantile,
        );
        override_from(&lookup, "ARBION_BENCHMARK", &mut self.benchmark);
    }

    pub fn validate(&self) -> Result<()> {
        self.arbitrage()
            .validate()
            .context("Invalid arbitrage settings")
    }

    #[must_use]
    pub fn arbitrage(&self) -> ArbitrageConfig {
        ArbitrageConfig {
            storage: self.storage,
            thresholds: self.thresholds,
        }
    }
}

fn override_from<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    target: &mut T,
) {
    let Some(raw) = lookup(key) else {
        return;
    };
    match raw.trim().parse::<T>() {
        Ok(value) => {
            info!("{} overridden from environment: {}", key, raw.trim());
            *target = value;
        }
        Err(_) => warn!("Ignoring {}: cannot parse '{}'", key, raw),
    }
}
