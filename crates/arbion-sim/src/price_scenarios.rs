// Copyright (c) 2025 SOLARE S.R.O.
//
// This file is part of Arbion.

//! Synthetic hourly price scenarios.
//!
//! Prices are per MWh and loosely follow a central European day-ahead
//! market:
//!
//! - **Usual Day**: cheap night, elevated morning, midday dip, evening peak
//! - **Volatile**: large hour-to-hour swings with several peaks and valleys
//! - **Negative Prices**: a usual day whose midday drops below zero
//! - **Flat**: constant price, no arbitrage opportunity at all
//!
//! Generation is seeded, so a scenario, a day count and a seed always give
//! the same series.

use arbion_types::{PriceSeries, SeriesError};
use chrono::{NaiveDate, TimeZone, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Price scenario types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceScenario {
    UsualDay,
    Volatile,
    NegativePrices,
    Flat,
}

impl PriceScenario {
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::UsualDay => "Usual Day",
            Self::Volatile => "Volatile Prices",
            Self::NegativePrices => "Negative Prices",
            Self::Flat => "Flat",
        }
    }

    /// Look up a scenario by preset id or a common alias
    #[must_use]
    pub fn from_id(id: &str) -> Option<Self> {
        let id = id.trim().to_lowercase();
        let id = match id.as_str() {
            "usual" => "usual_day",
            "negative_prices" => "negative",
            other => other,
        };
        PRICE_PRESETS
            .iter()
            .find(|preset| preset.id == id)
            .map(|preset| preset.scenario)
    }

    /// Generate `days * 24` hourly prices
    #[must_use]
    pub fn generate_prices(&self, days: u32, seed: u64) -> Vec<f64> {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut prices = Vec::with_capacity(days as usize * 24);

        for _ in 0..days {
            for hour in 0..24_u32 {
                let price = match self {
                    Self::UsualDay => usual_day_price(hour, &mut rng),
                    Self::Volatile => volatile_price(hour, &mut rng),
                    Self::NegativePrices => negative_day_price(hour, &mut rng),
                    Self::Flat => FLAT_PRICE,
                };
                prices.push(price);
            }
        }
        prices
    }

    /// Generate an hourly series starting at midnight UTC of `start`
    pub fn generate_series(
        &self,
        start: NaiveDate,
        days: u32,
        seed: u64,
    ) -> Result<PriceSeries, SeriesError> {
        let start = Utc.from_utc_datetime(&start.and_time(chrono::NaiveTime::MIN));
        PriceSeries::hourly(start, &self.generate_prices(days, seed))
    }
}

/// Price scenario preset with metadata
#[derive(Debug, Clone)]
pub struct PriceScenarioPreset {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub scenario: PriceScenario,
}

/// Available price scenario presets
pub const PRICE_PRESETS: &[PriceScenarioPreset] = &[
    PriceScenarioPreset {
        id: "usual_day",
        name: "Usual Day",
        description: "Cheap night, elevated morning, midday dip, evening peak",
        scenario: PriceScenario::UsualDay,
    },
    PriceScenarioPreset {
        id: "volatile",
        name: "Volatile",
        description: "Large price swings, many arbitrage opportunities",
        scenario: PriceScenario::Volatile,
    },
    PriceScenarioPreset {
        id: "negative",
        name: "Negative Prices",
        description: "Negative prices around midday (renewable surplus)",
        scenario: PriceScenario::NegativePrices,
    },
    PriceScenarioPreset {
        id: "flat",
        name: "Flat",
        description: "Constant price",
        scenario: PriceScenario::Flat,
    },
];

/// Comma-separated preset ids, for help and error messages
#[must_use]
pub fn preset_ids() -> String {
    PRICE_PRESETS
        .iter()
        .map(|preset| preset.id)
        .collect::<Vec<_>>()
        .join(", ")
}

const FLAT_PRICE: f64 = 400.0;

/// Base pattern:
/// - 00:00-06:00: 300 (cheap night)
/// - 06:00-12:00: 550 (morning elevated)
/// - 12:00-14:00: 420 (midday dip)
/// - 14:00-17:00: 480 (afternoon)
/// - 17:00-20:00: 750 (evening peak)
/// - 20:00-24:00: 450 (late evening decline)
fn usual_day_price(hour: u32, rng: &mut StdRng) -> f64 {
    let base = match hour {
        0..=5 => 300.0,
        6..=11 => 550.0,
        12..=13 => 420.0,
        14..=16 => 480.0,
        17..=19 => 750.0,
        _ => 450.0,
    };
    // +/- 10% noise
    base * (1.0 + rng.gen_range(-0.10..0.10))
}

fn volatile_price(hour: u32, rng: &mut StdRng) -> f64 {
    // (low, high) per hour of day
    const PATTERN: [(f64, f64); 24] = [
        (160.0, 240.0),
        (160.0, 280.0),
        (100.0, 160.0),
        (300.0, 440.0),
        (700.0, 840.0),
        (400.0, 540.0),
        (1000.0, 1240.0),
        (600.0, 760.0),
        (1300.0, 1560.0),
        (800.0, 960.0),
        (400.0, 560.0),
        (400.0, 560.0),
        (300.0, 440.0),
        (300.0, 440.0),
        (700.0, 840.0),
        (1000.0, 1160.0),
        (1300.0, 1440.0),
        (1500.0, 1640.0),
        (1600.0, 1760.0),
        (1300.0, 1440.0),
        (800.0, 960.0),
        (500.0, 640.0),
        (300.0, 440.0),
        (200.0, 340.0),
    ];
    let (low, high) = PATTERN[hour as usize];
    rng.gen_range(low..high)
}

fn negative_day_price(hour: u32, rng: &mut StdRng) -> f64 {
    if (10..=14).contains(&hour) {
        rng.gen_range(-120.0..-5.0)
    } else {
        usual_day_price(hour, rng)
    }
}
