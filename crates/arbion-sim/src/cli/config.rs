// Copyright (c) 2025 SOLARE S.R.O.
//
// This file is part of Arbion.

//! TOML configuration file parsing for parameter sweeps.

use anyhow::{Context, Result, bail};
use arbion_core::{BenchmarkMethod, ParameterSweep};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use super::data_loaders::{JsonPriceLoader, PriceLoader, PseCsvLoader, SyntheticLoader};
use crate::price_scenarios::{PriceScenario, preset_ids};

/// Root configuration structure for a sweep
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepConfig {
    /// Prices every configuration is evaluated against
    pub source: SourceConfig,

    /// Parameter axes
    pub grid: GridConfig,

    /// Offline benchmark used for the capture ratio
    #[serde(default)]
    pub benchmark: BenchmarkMethod,
}

/// Source of the price series
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SourceConfig {
    /// Seeded synthetic scenario
    Synthetic {
        /// Scenario id (usual_day, volatile, negative, flat)
        scenario: String,

        #[serde(default = "default_days")]
        days: u32,

        #[serde(default = "default_seed")]
        seed: u64,

        /// First day, YYYY-MM-DD
        #[serde(default)]
        start: Option<NaiveDate>,
    },

    /// PSE market export
    PseCsv { path: String },

    /// JSON array of price points
    Json { path: String },
}

/// Axes of the parameter grid; the sweep runs their cartesian product
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridConfig {
    pub capacities_mwh: Vec<f64>,

    pub bandwidths_mw: Vec<f64>,

    #[serde(default = "default_window_hours")]
    pub window_hours: Vec<usize>,

    /// `[lower, upper]` quantile pairs
    #[serde(default = "default_quantiles")]
    pub quantiles: Vec<(f64, f64)>,

    #[serde(default = "default_net_efficiency_factor")]
    pub net_efficiency_factor: f64,
}

// Default value functions
fn default_days() -> u32 {
    7
}

fn default_seed() -> u64 {
    42
}

fn default_window_hours() -> Vec<usize> {
    vec![24]
}

fn default_quantiles() -> Vec<(f64, f64)> {
    vec![(0.4, 0.6)]
}

fn default_net_efficiency_factor() -> f64 {
    0.9 * 0.81
}

/// First synthetic day when none is given
#[must_use]
pub fn default_start_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or_default()
}

impl SweepConfig {
    /// Load sweep configuration from TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: SweepConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse TOML config: {}", path.display()))?;

        config.validate()?;
        Ok(config)
    }

    /// Reject grids with an empty axis
    pub fn validate(&self) -> Result<()> {
        let grid = &self.grid;
        if grid.capacities_mwh.is_empty()
            || grid.bandwidths_mw.is_empty()
            || grid.window_hours.is_empty()
            || grid.quantiles.is_empty()
        {
            bail!("Every sweep axis needs at least one value");
        }
        Ok(())
    }

    /// Loader for the configured price source
    pub fn loader(&self) -> Result<Box<dyn PriceLoader>> {
        let loader: Box<dyn PriceLoader> = match &self.source {
            SourceConfig::Synthetic {
                scenario,
                days,
                seed,
                start,
            } => {
                let Some(scenario) = PriceScenario::from_id(scenario) else {
                    bail!(
                        "Unknown scenario '{scenario}' in sweep config (available: {})",
                        preset_ids()
                    );
                };
                Box::new(SyntheticLoader {
                    scenario,
                    start: start.unwrap_or_else(default_start_date),
                    days: *days,
                    seed: *seed,
                })
            }
            SourceConfig::PseCsv { path } => Box::new(PseCsvLoader::new(path)),
            SourceConfig::Json { path } => Box::new(JsonPriceLoader::new(path)),
        };
        Ok(loader)
    }

    /// The cartesian product of the grid
    #[must_use]
    pub fn to_sweep(&self) -> ParameterSweep {
        let grid = &self.grid;
        ParameterSweep::grid(
            &grid.capacities_mwh,
            &grid.bandwidths_mw,
            &grid.window_hours,
            &grid.quantiles,
            grid.net_efficiency_factor,
        )
        .with_method(self.benchmark)
    }

    /// Generate example sweep config as TOML string
    #[must_use]
    pub fn example_toml() -> String {
        r#"# Arbion parameter sweep - example configuration

benchmark = "exact"   # or "greedy"

[source]
type = "synthetic"    # synthetic | pse_csv | json
scenario = "volatile" # see `arbion-sim scenarios`
days = 14
seed = 42
start = "2024-01-01"

# [source]
# type = "pse_csv"
# path = "rce_2024.csv"

[grid]
capacities_mwh = [0.1, 0.2, 0.5]
bandwidths_mw = [0.01, 0.05]
window_hours = [12, 24, 48]
quantiles = [[0.4, 0.6], [0.3, 0.7]]
net_efficiency_factor = 0.729
"#
        .to_owned()
    }
}
