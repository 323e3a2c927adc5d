// Copyright (c) 2025 SOLARE S.R.O.
//
// This file is part of Arbion.

//! Error types for the arbitrage core

use arbion_types::ConfigError;
use chrono::{DateTime, Utc};
use thiserror::Error;

/// Rejected store transition
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum StoreError {
    #[error(
        "cannot buy: load {load} MWh plus {bandwidth} MW would exceed capacity {capacity} MWh"
    )]
    CapacityExceeded {
        load: f64,
        bandwidth: f64,
        capacity: f64,
    },

    #[error("cannot sell: load {load} MWh is less than one {bandwidth} MW step")]
    InsufficientCharge { load: f64, bandwidth: f64 },
}

/// Failure of an online policy run
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PolicyError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    /// The policy's own guards should make this unreachable; seeing it means a bug
    #[error("store invariant violated at {timestamp}: {source}")]
    InvariantViolation {
        timestamp: DateTime<Utc>,
        #[source]
        source: StoreError,
    },
}

pub type Result<T> = std::result::Result<T, PolicyError>;
