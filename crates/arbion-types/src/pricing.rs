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

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::SeriesError;

// ============= Price Series =============

/// A single hourly price observation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    /// Start of the hour this price applies to
    pub timestamp: DateTime<Utc>,

    /// Price per MWh in the market currency
    pub price: f64,
}

impl PricePoint {
    #[must_use]
    pub fn new(timestamp: DateTime<Utc>, price: f64) -> Self {
        Self { timestamp, price }
    }
}

/// Chronologically ordered hourly prices.
///
/// The ingestion layer is responsible for cleaning and ordering; construction
/// only checks that timestamps strictly increase and prices are finite.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<PricePoint>", into = "Vec<PricePoint>")]
pub struct PriceSeries {
    points: Vec<PricePoint>,
}

impl PriceSeries {
    /// Build a series, rejecting non-finite prices and out-of-order timestamps
    pub fn new(points: Vec<PricePoint>) -> Result<Self, SeriesError> {
        for (idx, point) in points.iter().enumerate() {
            if !point.price.is_finite() {
                return Err(SeriesError::NonFinitePrice {
                    timestamp: point.timestamp,
                });
            }
            if idx > 0 {
                let previous = points[idx - 1].timestamp;
                if point.timestamp <= previous {
                    return Err(SeriesError::NotIncreasing {
                        previous,
                        current: point.timestamp,
                    });
                }
            }
        }
        Ok(Self { points })
    }

    /// Build an hourly series starting at `start` from bare prices
    pub fn hourly(start: DateTime<Utc>, prices: &[f64]) -> Result<Self, SeriesError> {
        let points = prices
            .iter()
            .zip(0_i64..)
            .map(|(&price, hour)| PricePoint::new(start + Duration::hours(hour), price))
            .collect();
        Self::new(points)
    }

    #[must_use]
    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    /// Prices in chronological order, timestamps dropped
    #[must_use]
    pub fn prices(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.price).collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    #[must_use]
    pub fn first_timestamp(&self) -> Option<DateTime<Utc>> {
        self.points.first().map(|p| p.timestamp)
    }

    #[must_use]
    pub fn last_timestamp(&self) -> Option<DateTime<Utc>> {
        self.points.last().map(|p| p.timestamp)
    }

    /// Keep only points with `from <= timestamp < to`
    #[must_use]
    pub fn between(&self, from: DateTime<Utc>, to: DateTime<Utc>) -> Self {
        Self {
            points: self
                .points
                .iter()
                .filter(|p| p.timestamp >= from && p.timestamp < to)
                .copied()
                .collect(),
        }
    }

    /// Split into consecutive calendar days (UTC).
    ///
    /// Each sub-series keeps the ordering of the parent, so no re-validation
    /// is needed.
    #[must_use]
    pub fn split_by_day(&self) -> Vec<(NaiveDate, PriceSeries)> {
        let mut days: Vec<(NaiveDate, PriceSeries)> = Vec::new();
        for point in &self.points {
            let date = point.timestamp.date_naive();
            match days.last_mut() {
                Some((current, series)) if *current == date => series.points.push(*point),
                _ => days.push((
                    date,
                    PriceSeries {
                        points: vec![*point],
                    },
                )),
            }
        }
        days
    }

    /// Summary statistics, `None` for an empty series
    #[must_use]
    pub fn stats(&self) -> Option<PriceStats> {
        PriceStats::from_prices(&self.prices())
    }
}

impl TryFrom<Vec<PricePoint>> for PriceSeries {
    type Error = SeriesError;

    fn try_from(points: Vec<PricePoint>) -> Result<Self, Self::Error> {
        Self::new(points)
    }
}

impl From<PriceSeries> for Vec<PricePoint> {
    fn from(series: PriceSeries) -> Self {
        series.points
    }
}

/// Price statistics
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceStats {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub count: usize,
}

impl PriceStats {
    #[must_use]
    pub fn from_prices(prices: &[f64]) -> Option<Self> {
        if prices.is_empty() {
            return None;
        }
        let min = prices.iter().copied().fold(f64::INFINITY, f64::min);
        let max = prices.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let mean = prices.iter().sum::<f64>() / prices.len() as f64;
        Some(Self {
            min,
            max,
            mean,
            count: prices.len(),
        })
    }

    /// Spread between the most and least expensive hour
    #[must_use]
    pub fn spread(&self) -> f64 {
        self.max - self.min
    }
}
