// Copyright (c) 2025 SOLARE S.R.O.
//
// This file is part of Arbion.

//! Rolling quantile thresholds.
//!
//! Keeps the last `window_hours` prices in a bounded ring buffer and derives
//! the buy/sell band for the newest hour. Only the current and past prices
//! ever enter the window. During warm-up the partial window is used.
//! Quantiles interpolate linearly between order statistics at position
//! `q * (len - 1)`.

use arbion_types::{ConfigError, ThresholdConfig, Thresholds};
use ringbuffer::{AllocRingBuffer, RingBuffer};
use std::fmt;

pub struct RollingThresholdCalculator {
    config: ThresholdConfig,
    window: AllocRingBuffer<f64>,
    /// Reused buffer for quantile selection
    scratch: Vec<f64>,
}

impl fmt::Debug for RollingThresholdCalculator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RollingThresholdCalculator")
            .field("config", &self.config)
            .field("samples", &self.window.len())
            .finish_non_exhaustive()
    }
}

impl RollingThresholdCalculator {
    pub fn new(config: ThresholdConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            window: AllocRingBuffer::new(config.window_hours),
            scratch: Vec::with_capacity(config.window_hours),
        })
    }

    #[must_use]
    pub fn config(&self) -> &ThresholdConfig {
        &self.config
    }

    /// Number of prices currently in the window
    #[must_use]
    pub fn samples(&self) -> usize {
        self.window.len()
    }

    /// True once the window holds `window_hours` prices
    #[must_use]
    pub fn is_warm(&self) -> bool {
        self.window.is_full()
    }

    /// Add the newest price and return the band for that hour
    pub fn push(&mut self, price: f64) -> Thresholds {
        self.window.push(price);

        self.scratch.clear();
        self.scratch.extend(self.window.iter().copied());

        let samples = self.scratch.len();
        let window_mean = self.scratch.iter().sum::<f64>() / samples as f64;
        let lower_bound = quantile(&mut self.scratch, self.config.lower_quantile);
        let window_median = quantile(&mut self.scratch, 0.5);
        let upper_bound = quantile(&mut self.scratch, self.config.upper_quantile);

        Thresholds {
            lower_bound,
            upper_bound,
            window_mean,
            window_median,
            samples,
        }
    }

    /// Forget all history
    pub fn reset(&mut self) {
        self.window.clear();
    }
}

/// Linear-interpolation quantile in O(n). Reorders `values`.
fn quantile(values: &mut [f64], q: f64) -> f64 {
    debug_assert!(!values.is_empty());
    let last = values.len() - 1;
    let position = q.clamp(0.0, 1.0) * last as f64;
    let floor = position.floor();
    #[expect(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "position lies in [0, len - 1]"
    )]
    let lo = (floor as usize).min(last);
    let fraction = position - floor;

    let (_, lo_value, above) = values.select_nth_unstable_by(lo, f64::total_cmp);
    let lo_value = *lo_value;
    if fraction <= 0.0 || above.is_empty() {
        return lo_value;
    }

    let hi_value = above
        .iter()
        .copied()
        .min_by(f64::total_cmp)
        .unwrap_or(lo_value);

    // Clamping keeps the result monotone in q despite rounding
    (lo_value + fraction * (hi_value - lo_value)).clamp(lo_value, hi_value)
}
