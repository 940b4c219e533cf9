//! # Measurement Uncertainty (GUM)
//!
//! Building blocks for the uncertainty budgets of the pull-off and Schmidt
//! hammer protocols.
//!
//! ```text
//! u_res = (resolution / 2) / √3          rectangular distribution
//! u_cal = tolerance / 2                  certificate value at k = 2
//! u_c   = √(u_A² + u_B²)
//! U     = k × u_c
//! ν_eff = u_c⁴ / Σ(u_i⁴ / ν_i)           Welch–Satterthwaite
//! ```

use serde::{Deserialize, Serialize};

/// Combined result of an uncertainty budget.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UncertaintyBudget {
    /// Statistically evaluated (repeatability) uncertainty
    pub type_a: f64,
    /// Otherwise evaluated (calibration, resolution) uncertainty
    pub type_b: f64,
    /// Combined standard uncertainty √(A² + B²)
    pub combined: f64,
    /// Coverage factor k
    pub coverage_factor: f64,
    /// Expanded uncertainty k × combined
    pub expanded: f64,
}

impl UncertaintyBudget {
    /// Combine Type A and Type B and expand with `coverage_factor`
    pub fn new(type_a: f64, type_b: f64, coverage_factor: f64) -> Self {
        let combined = root_sum_square(&[type_a, type_b]);
        Self {
            type_a,
            type_b,
            combined,
            coverage_factor,
            expanded: coverage_factor * combined,
        }
    }
}

/// √(Σ uᵢ²)
pub fn root_sum_square(components: &[f64]) -> f64 {
    components.iter().map(|u| u * u).sum::<f64>().sqrt()
}

/// Standard uncertainty of a digital readout with the given resolution
pub fn resolution_uncertainty(resolution: f64) -> f64 {
    resolution / 2.0 / 3.0_f64.sqrt()
}

/// Standard uncertainty from a ± calibration tolerance quoted at k = 2
pub fn calibration_uncertainty(tolerance: f64) -> f64 {
    tolerance / 2.0
}

/// Welch–Satterthwaite effective degrees of freedom, rounded.
///
/// `components` pairs each standard uncertainty with its degrees of freedom;
/// `None` marks infinite degrees of freedom (Type B components), which add
/// nothing to the denominator. Returns `None` when the result is infinite.
pub fn effective_degrees_of_freedom(combined: f64, components: &[(f64, Option<u32>)]) -> Option<u32> {
    let denominator: f64 = components
        .iter()
        .filter_map(|&(u, dof)| dof.filter(|&d| d > 0).map(|d| u.powi(4) / d as f64))
        .sum();
    if denominator <= 0.0 || !denominator.is_finite() {
        return None;
    }
    let nu = combined.powi(4) / denominator;
    if nu.is_finite() {
        Some(nu.round() as u32)
    } else {
        None
    }
}
