// Copyright (c) 2025 SOLARE S.R.O.
//
// This file is part of Arbion.

//! CLI module for the arbitrage simulator command-line interface.

pub mod args;
pub mod config;
pub mod data_loaders;
pub mod formatters;

pub use args::{BenchmarkArgs, Cli, Commands, RunArgs, SourceArgs, SweepArgs};
pub use config::{GridConfig, SourceConfig, SweepConfig, default_start_date};
pub use data_loaders::{JsonPriceLoader, PriceLoader, PseCsvLoader, SyntheticLoader};
pub use formatters::{CsvFormatter, TableFormatter};
