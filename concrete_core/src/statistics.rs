//! # Batch Statistics
//!
//! Summary statistics folded over the per-sample scalar results of a batch.
//!
//! The three protocols come from independently maintained worksheets and do
//! not agree on the variance denominator:
//!
//! | Protocol      | Convention                   |
//! |---------------|------------------------------|
//! | Core test     | Population (divide by n)     |
//! | Pull-off      | Sample (divide by n - 1)     |
//! | Schmidt       | Sample (divide by n - 1)     |
//!
//! Each engine passes its own [`Variance`] so the numbers match the source
//! worksheets exactly.

use serde::{Deserialize, Serialize};

/// Denominator used for the variance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Variance {
    /// Divide by n
    Population,
    /// Divide by n - 1; zero when fewer than two values
    Sample,
}

/// Mean, range and spread of a set of values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BatchStatistics {
    /// Number of values folded
    pub count: usize,
    /// Arithmetic mean
    pub average: f64,
    /// Smallest value
    pub min: f64,
    /// Largest value
    pub max: f64,
    /// Standard deviation under `convention`
    pub standard_deviation: f64,
    /// Variance denominator used
    pub convention: Variance,
}

impl BatchStatistics {
    /// Coefficient of variation in percent (`sd / mean × 100`).
    ///
    /// Returns 0 when the mean is 0.
    pub fn coefficient_of_variation(&self) -> f64 {
        if self.average == 0.0 {
            0.0
        } else {
            self.standard_deviation / self.average * 100.0
        }
    }
}

/// Fold `values` into [`BatchStatistics`].
///
/// An empty slice gives zeros throughout.
pub fn aggregate(values: &[f64], convention: Variance) -> BatchStatistics {
    if values.is_empty() {
        return BatchStatistics {
            count: 0,
            average: 0.0,
            min: 0.0,
            max: 0.0,
            standard_deviation: 0.0,
            convention,
        };
    }

    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    BatchStatistics {
        count: values.len(),
        average: mean(values),
        min,
        max,
        standard_deviation: standard_deviation(values, convention),
        convention,
    }
}

/// Arithmetic mean; 0 for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Standard deviation with the given denominator.
///
/// Population SD of a single value is 0. Sample SD with fewer than two
/// values is 0 rather than NaN.
pub fn standard_deviation(values: &[f64], convention: Variance) -> f64 {
    let n = values.len();
    let denominator = match convention {
        Variance::Population if n >= 1 => n as f64,
        Variance::Sample if n >= 2 => (n - 1) as f64,
        _ => return 0.0,
    };
    let avg = mean(values);
    let sum_sq: f64 = values.iter().map(|v| (v - avg).powi(2)).sum();
    (sum_sq / denominator).sqrt()
}

/// Median; even-length input averages the two middle values.
///
/// Returns 0 for an empty slice. NaN values sort last.
pub fn median(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aggregate_sample() {
        let stats = aggregate(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0], Variance::Sample);
        assert_eq!(stats.count, 8);
        assert_eq!(stats.average, 5.0);
        assert_eq!(stats.min, 2.0);
        assert_eq!(stats.max, 9.0);
        // Sum of squares 32, / 7
        assert!((stats.standard_deviation - (32.0_f64 / 7.0).sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_aggregate_population() {
        let stats = aggregate(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0], Variance::Population);
        assert!((stats.standard_deviation - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_single_value() {
        let pop = aggregate(&[120.31], Variance::Population);
        assert_eq!(pop.standard_deviation, 0.0);
        assert_eq!(pop.min, 120.31);
        assert_eq!(pop.max, 120.31);

        let sample = aggregate(&[120.31], Variance::Sample);
        assert_eq!(sample.standard_deviation, 0.0);
        assert!(!sample.standard_deviation.is_nan());
    }

    #[test]
    fn test_empty() {
        let stats = aggregate(&[], Variance::Sample);
        assert_eq!(stats.count, 0);
        assert_eq!(stats.average, 0.0);
        assert_eq!(stats.coefficient_of_variation(), 0.0);
    }

    #[test]
    fn test_coefficient_of_variation() {
        let stats = aggregate(&[9.0, 10.0, 11.0], Variance::Sample);
        assert!((stats.coefficient_of_variation() - 10.0).abs() < 1e-12);
    }

    #[test]
    fn test_median_odd_and_even() {
        assert_eq!(median(&[3.0, 1.0, 2.0]), 2.0);
        assert_eq!(median(&[81.0, 83.0, 84.0, 84.0, 83.0, 80.0, 80.0, 82.0, 82.0, 81.0]), 82.0);
        assert_eq!(median(&[1.0, 2.0, 3.0, 10.0]), 2.5);
        assert_eq!(median(&[]), 0.0);
    }
}
