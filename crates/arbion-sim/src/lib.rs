// Copyright (c) 2025 SOLARE S.R.O.
//
// This file is part of Arbion.

//! Command-line simulator for the Arbion arbitrage engine.
//!
//! Loads an hourly price series (PSE export, JSON or a synthetic scenario),
//! runs the online policy and the offline benchmarks over it and prints or
//! exports the results. Parameter sweeps evaluate whole grids of storage and
//! threshold settings in parallel.

pub mod cli;
pub mod price_scenarios;
pub mod report;
pub mod settings;

pub use price_scenarios::{PRICE_PRESETS, PriceScenario, PriceScenarioPreset, preset_ids};
pub use report::RunSummary;
pub use settings::Settings;
