//! Property-based tests for the calculation engine.
//!
//! These tests use proptest to generate measurements and verify that the
//! lookups and engines keep their invariants for any valid input.
//!
//! # Running Property Tests
//!
//! ```bash
//! cargo test -p concrete_core --test property_tests
//!
//! # More cases
//! PROPTEST_CASES=10000 cargo test -p concrete_core --test property_tests
//! ```

use proptest::prelude::*;

use concrete_core::calculations::core_test::{reinforcement_factor, ReinforcementBar};
use concrete_core::calculations::pull_off::{compute_batch, PullOffBatchInput, PullOffSpecimenMeasurement};
use concrete_core::calculations::schmidt_hammer::{
    calibrate_anvil, compute_element, AnvilCalibration, SchmidtElementMeasurement,
};
use concrete_core::interpolation::{bilinear_lookup, nearest_standard_value, table_lookup_1d};
use concrete_core::statistics::{standard_deviation, Variance};
use concrete_core::tables::STANDARD_TABLES;

// =============================================================================
// Test Strategies
// =============================================================================

/// Ascending L/D-style table with non-decreasing factors
fn ascending_table() -> impl Strategy<Value = Vec<(f64, f64)>> {
    prop::collection::vec((0.5f64..10.0, 0.0f64..0.2), 2..8).prop_map(|steps| {
        let mut x = 10.0;
        let mut y = 0.8;
        steps
            .into_iter()
            .map(|(dx, dy)| {
                x += dx;
                y += dy;
                (x, y)
            })
            .collect()
    })
}

fn anvil_readings() -> impl Strategy<Value = Vec<u32>> {
    prop::collection::vec(70u32..90, 5..12)
}

fn rebound_readings() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(15.0f64..60.0, 9..=15)
}

fn pull_off_specimens() -> impl Strategy<Value = Vec<PullOffSpecimenMeasurement>> {
    prop::collection::vec((45.0f64..60.0, 0.5f64..8.0), 2..10).prop_map(|pairs| {
        pairs
            .into_iter()
            .map(|(diameter_mm, failure_load_kn)| PullOffSpecimenMeasurement {
                code: None,
                tested_item: None,
                failure_mode: None,
                diameter_mm,
                failure_load_kn,
            })
            .collect()
    })
}

// =============================================================================
// Interpolation Properties
// =============================================================================

mod interpolation_tests {
    use super::*;

    proptest! {
        /// Every breakpoint returns its own factor.
        #[test]
        fn breakpoints_are_exact(table in ascending_table()) {
            for &(x, y) in &table {
                prop_assert_eq!(table_lookup_1d(x, &table), y);
            }
        }

        /// Non-decreasing tables give non-decreasing lookups.
        #[test]
        fn lookup_is_monotonic(table in ascending_table(), a in 0.0f64..100.0, b in 0.0f64..100.0) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(table_lookup_1d(lo, &table) <= table_lookup_1d(hi, &table) + 1e-12);
        }

        /// Inputs beyond either end return the edge factor.
        #[test]
        fn lookup_clamps(table in ascending_table(), below in 0.0f64..10.0, above in 0.0f64..1e6) {
            let first = table[0];
            let last = table[table.len() - 1];
            prop_assert_eq!(table_lookup_1d(first.0 - below, &table), first.1);
            prop_assert_eq!(table_lookup_1d(last.0 + above, &table), last.1);
        }

        /// Swapping the axes (and transposing the grid) gives the same value.
        #[test]
        fn bilinear_axis_order_invariant(d in 0.0f64..200.0, s in 0.0f64..50.0) {
            let grid = &STANDARD_TABLES.cutting;
            let transposed: Vec<Vec<f64>> = (0..grid.strengths_mpa.len())
                .map(|j| grid.factors.iter().map(|row| row[j]).collect())
                .collect();

            let a = bilinear_lookup(d, s, &grid.diameters_mm, &grid.strengths_mpa, &grid.factors);
            let b = bilinear_lookup(s, d, &grid.strengths_mpa, &grid.diameters_mm, &transposed);
            prop_assert!((a - b).abs() < 1e-12, "{} vs {}", a, b);
        }

        /// Bilinear values stay inside the grid's range.
        #[test]
        fn bilinear_is_bounded(d in -50.0f64..300.0, s in -10.0f64..80.0) {
            let grid = &STANDARD_TABLES.cutting;
            let all = grid.factors.iter().flatten();
            let min = all.clone().cloned().fold(f64::INFINITY, f64::min);
            let max = all.cloned().fold(f64::NEG_INFINITY, f64::max);
            let v = bilinear_lookup(d, s, &grid.diameters_mm, &grid.strengths_mpa, &grid.factors);
            prop_assert!(v >= min - 1e-12 && v <= max + 1e-12);
        }

        /// Snapping returns a candidate no farther than any other.
        #[test]
        fn nearest_is_closest(x in 0.0f64..200.0) {
            let candidates = &STANDARD_TABLES.cutting.diameters_mm;
            let snapped = nearest_standard_value(x, candidates);
            prop_assert!(candidates.contains(&snapped));
            for &c in candidates {
                prop_assert!((x - snapped).abs() <= (x - c).abs());
            }
        }

        /// Candidate order never changes the snapped value, ties included.
        #[test]
        fn nearest_ignores_candidate_order(steps in 0u32..17) {
            let x = 50.0 + 12.5 * f64::from(steps);
            let ascending = &STANDARD_TABLES.cutting.diameters_mm;
            let descending: Vec<f64> = ascending.iter().rev().cloned().collect();
            prop_assert_eq!(nearest_standard_value(x, ascending), nearest_standard_value(x, &descending));
        }
    }
}

// =============================================================================
// Core Test Properties
// =============================================================================

mod core_tests {
    use super::*;

    proptest! {
        /// Any bar with positive size and distance raises the factor above 1.
        #[test]
        fn reinforcement_factor_above_one(
            bars in prop::collection::vec((1.0f64..32.0, 0.1f64..100.0), 1..4),
            diameter in 50.0f64..150.0,
            length in 50.0f64..300.0,
        ) {
            let bars: Vec<ReinforcementBar> = bars
                .into_iter()
                .map(|(diameter_mm, distance_from_end_mm)| ReinforcementBar { diameter_mm, distance_from_end_mm })
                .collect();
            prop_assert!(reinforcement_factor(&bars, diameter, length) > 1.0);
        }

        /// No bars means exactly 1.
        #[test]
        fn reinforcement_factor_without_bars(diameter in 50.0f64..150.0, length in 50.0f64..300.0) {
            prop_assert_eq!(reinforcement_factor(&[], diameter, length), 1.0);
        }
    }
}

// =============================================================================
// Schmidt Hammer Properties
// =============================================================================

mod schmidt_tests {
    use super::*;

    proptest! {
        /// RSA only depends on the pooled readings, not how they are split.
        #[test]
        fn rsa_depends_on_pool_only(before in anvil_readings(), after in anvil_readings()) {
            let forward = AnvilCalibration { before: before.clone(), after: after.clone() };
            let swapped = AnvilCalibration { before: after, after: before };
            let a = calibrate_anvil(&forward, &STANDARD_TABLES);
            let b = calibrate_anvil(&swapped, &STANDARD_TABLES);
            prop_assert_eq!(a, b);
            prop_assert!((a.rsa * a.median - 80.0).abs() < 1e-9);
        }

        /// Valid count never exceeds the number of readings.
        #[test]
        fn valid_count_bounded(readings in rebound_readings(), rsa in 0.9f64..1.1) {
            let m = SchmidtElementMeasurement { label: None, direction: None, readings };
            let r = compute_element(&m, rsa, &STANDARD_TABLES);
            prop_assert!(r.valid_readings <= r.total_readings);
            prop_assert_eq!(r.total_readings, r.corrected_readings.len());
        }

        /// Readings packed tightly around the median are all accepted.
        #[test]
        fn tight_readings_all_valid(centre in 20.0f64..50.0, offsets in prop::collection::vec(-0.05f64..0.05, 9..=15)) {
            let readings: Vec<f64> = offsets.iter().map(|o| centre * (1.0 + o)).collect();
            let m = SchmidtElementMeasurement { label: None, direction: None, readings };
            let r = compute_element(&m, 1.0, &STANDARD_TABLES);
            prop_assert_eq!(r.valid_readings, r.total_readings);
        }

        /// Expanded is always k × combined with k = 2.
        #[test]
        fn schmidt_expanded_uses_k2(readings in rebound_readings()) {
            let m = SchmidtElementMeasurement { label: None, direction: None, readings };
            let r = compute_element(&m, 1.0, &STANDARD_TABLES);
            prop_assert_eq!(r.uncertainty.coverage_factor, 2.0);
            prop_assert!((r.uncertainty.expanded - 2.0 * r.uncertainty.combined).abs() < 1e-12);
        }
    }
}

// =============================================================================
// Pull-Off and Statistics Properties
// =============================================================================

mod pull_off_tests {
    use super::*;

    proptest! {
        /// Budget components are finite and non-negative; strength stats are ordered.
        #[test]
        fn budget_is_well_formed(specimens in pull_off_specimens()) {
            let input = PullOffBatchInput { label: "prop".to_string(), specimens };
            prop_assert!(input.validate().is_ok());
            let r = compute_batch(&input, &STANDARD_TABLES);
            let u = &r.uncertainty;
            prop_assert!(u.type_a >= 0.0 && u.type_b > 0.0);
            prop_assert!(u.combined >= u.type_a && u.combined >= u.type_b);
            prop_assert!((u.expanded - 2.0 * u.combined).abs() < 1e-12);
            prop_assert!(r.strength.min <= r.strength.average && r.strength.average <= r.strength.max);
            prop_assert!(r.coefficient_of_variation >= 0.0);
        }

        /// Sample SD of a single value is 0, not NaN.
        #[test]
        fn single_value_sd_is_zero(v in -1e6f64..1e6) {
            prop_assert_eq!(standard_deviation(&[v], Variance::Sample), 0.0);
            prop_assert_eq!(standard_deviation(&[v], Variance::Population), 0.0);
        }
    }
}
