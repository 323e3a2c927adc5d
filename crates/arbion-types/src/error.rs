// Copyright (c) 2025 SOLARE S.R.O.
//
// This file is part of Arbion.

//! Error types shared by the data model and configuration.

use chrono::{DateTime, Utc};
use thiserror::Error;

/// Configuration rejected before a run starts
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("{field} must be a finite number, got {value}")]
    NotFinite { field: &'static str, value: f64 },

    #[error("bandwidth must be positive, got {0} MW")]
    NonPositiveBandwidth(f64),

    #[error("capacity ({capacity} MWh) must be at least one bandwidth step ({bandwidth} MW)")]
    CapacityBelowBandwidth { capacity: f64, bandwidth: f64 },

    #[error("net efficiency factor must be between 0.0 and 1.0, got {0}")]
    EfficiencyOutOfRange(f64),

    #[error("rolling window must cover at least one hour")]
    EmptyWindow,

    #[error("{field} must be between 0.0 and 1.0, got {value}")]
    QuantileOutOfRange { field: &'static str, value: f64 },

    #[error("lower quantile ({lower}) must not exceed upper quantile ({upper})")]
    QuantilesInverted { lower: f64, upper: f64 },

    #[error("rolling window of {window} hours exceeds the {available} hours of price history")]
    WindowExceedsHistory { window: usize, available: usize },
}

/// Price series failed basic sanity checks
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SeriesError {
    #[error("price at {timestamp} is not a finite number")]
    NonFinitePrice { timestamp: DateTime<Utc> },

    #[error("timestamps must strictly increase: {current} does not follow {previous}")]
    NotIncreasing {
        previous: DateTime<Utc>,
        current: DateTime<Utc>,
    },
}
