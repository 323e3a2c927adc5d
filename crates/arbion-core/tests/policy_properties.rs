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

use arbion_core::{
    EnergyStore, OnlinePolicy, RollingThresholdCalculator, StoreError, offline_optimal_profit,
};
use arbion_types::{ArbitrageConfig, PriceSeries, StorageConfig, StoreAction, ThresholdConfig};
use chrono::{TimeZone, Utc};
use proptest::prelude::*;

fn series(prices: &[f64]) -> PriceSeries {
    let start = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
    PriceSeries::hourly(start, prices).unwrap()
}

fn storage(steps: u32, bandwidth_mw: f64) -> StorageConfig {
    StorageConfig {
        capacity_mwh: f64::from(steps) * bandwidth_mw,
        bandwidth_mw,
        net_efficiency_factor: 1.0,
    }
}

#[test]
fn test_spike_is_bought_and_sold_once() {
    let config = ArbitrageConfig {
        storage: storage(1, 1.0),
        thresholds: ThresholdConfig {
            window_hours: 5,
            ..Default::default()
        },
    };

    let prices = [10.0, 10.0, 2.0, 30.0, 10.0];
    let run = OnlinePolicy::new(config).unwrap().run(&series(&prices)).unwrap();

    assert_eq!(run.trajectory[2].action, StoreAction::Buy);
    assert_eq!(run.trajectory[3].action, StoreAction::Sell);
    assert_eq!((run.buys, run.sells), (1, 1));
    // Unit store matches the single-transaction optimum
    let best = offline_optimal_profit(&prices, 1.0);
    assert_eq!(best.buy_hours(), vec![2]);
    assert_eq!(best.sell_hours(), vec![3]);
    assert_eq!(run.profit(), best.total_profit);
}

#[test]
fn test_store_refuses_to_overfill() {
    let store = EnergyStore::new(&storage(1, 0.5)).unwrap();
    let full = store.buy(10.0).unwrap();

    assert!(matches!(
        full.buy(10.0),
        Err(StoreError::CapacityExceeded { .. })
    ));
    assert_eq!(full.load(), 0.5);
}

proptest! {
    #[test]
    fn store_load_stays_within_bounds(
        steps in 1_u32..6,
        bandwidth in prop::sample::select(vec![0.01_f64, 0.25, 1.0, 3.0]),
        moves in proptest::collection::vec((any::<bool>(), 0.0_f64..100.0), 0..60),
    ) {
        let mut store = EnergyStore::new(&storage(steps, bandwidth)).unwrap();

        for (buy, price) in moves {
            let before = store;
            let next = if buy { store.buy(price) } else { store.sell(price) };
            match next {
                Ok(next) => store = next,
                Err(StoreError::CapacityExceeded { .. }) => {
                    prop_assert!(buy && before.is_full());
                }
                Err(StoreError::InsufficientCharge { .. }) => {
                    prop_assert!(!buy && before.is_discharged());
                }
            }
            prop_assert!(store.steps() <= steps);
            prop_assert!(store.load() >= 0.0);
            prop_assert!(store.load() <= store.capacity() * (1.0 + 1e-9));
        }
    }

    #[test]
    fn buy_then_sell_at_same_price_is_neutral(
        steps in 1_u32..6,
        price in -50.0_f64..200.0,
    ) {
        let store = EnergyStore::new(&storage(steps, 0.5)).unwrap();
        let after = store.buy(price).unwrap().sell(price).unwrap();

        prop_assert_eq!(after.load(), 0.0);
        prop_assert!(after.profit().abs() < 1e-9);
    }

    #[test]
    fn policy_never_beats_offline_optimum(
        prices in proptest::collection::vec(0.0_f64..150.0, 1..60),
        steps in 1_u32..5,
        bandwidth in prop::sample::select(vec![0.5_f64, 1.0, 2.0]),
        window in 1_usize..30,
        lower in 0.0_f64..0.5,
        upper in 0.5_f64..=1.0,
    ) {
        let config = ArbitrageConfig {
            storage: storage(steps, bandwidth),
            thresholds: ThresholdConfig {
                window_hours: window.min(prices.len()),
                lower_quantile: lower,
                upper_quantile: upper,
            },
        };

        let run = OnlinePolicy::new(config).unwrap().run(&series(&prices)).unwrap();
        let offline = offline_optimal_profit(&prices, run.equivalent_budget());

        prop_assert!(run.sells <= run.buys);
        prop_assert!(
            offline.total_profit * bandwidth + 1e-6 >= run.profit(),
            "policy {} above offline {}", run.profit(), offline.total_profit * bandwidth
        );
    }

    #[test]
    fn thresholds_are_ordered(
        prices in proptest::collection::vec(-100.0_f64..300.0, 1..80),
        window in 1_usize..30,
        lower in 0.0_f64..0.5,
        upper in 0.5_f64..=1.0,
    ) {
        let mut calculator = RollingThresholdCalculator::new(ThresholdConfig {
            window_hours: window,
            lower_quantile: lower,
            upper_quantile: upper,
        })
        .unwrap();

        for (hour, &price) in prices.iter().enumerate() {
            let band = calculator.push(price);
            let start = (hour + 1).saturating_sub(window);
            let recent = &prices[start..=hour];
            let min = recent.iter().copied().fold(f64::INFINITY, f64::min);
            let max = recent.iter().copied().fold(f64::NEG_INFINITY, f64::max);

            prop_assert_eq!(band.samples, recent.len());
            prop_assert!(min <= band.lower_bound + 1e-9);
            prop_assert!(band.lower_bound <= band.window_median + 1e-9);
            prop_assert!(band.window_median <= band.upper_bound + 1e-9);
            prop_assert!(band.upper_bound <= max + 1e-9);
        }
    }
}
