//! # Schmidt Hammer Rebound
//!
//! Anvil calibration, corrected rebound numbers and their uncertainty for
//! each tested element.
//!
//! ```text
//! RSA        = 80 / median(before ∪ after)
//! R'_i       = R_i × RSA
//! R_med      = round(median(R'))
//! band       = [0.75 R_med, 1.25 R_med]
//!
//! u_rep      = √(SD² / n)
//! u_res      = (2 / 2) / √3
//! u_cal      = 0.0266 / 2
//! u_c        = √(u_rep² + u_res² + u_cal²)
//! ν_eff      = u_c⁴ / (u_rep⁴ / (n − 1))
//! U          = 2 × u_c
//! ```
//!
//! ν_eff and its tabulated Student-t factor are reported for audit only; the
//! expanded uncertainty always uses k = 2.
//!
//! The strength estimate `R_med × 11.5` kg/cm² is a rough correlation and is
//! labelled as indicative wherever it is printed.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::{field, require_count, require_positive, CalcError, CalcResult};
use crate::statistics::{aggregate, median, standard_deviation, BatchStatistics, Variance};
use crate::tables::CorrectionTables;
use crate::uncertainty::{
    calibration_uncertainty, effective_degrees_of_freedom, resolution_uncertainty, root_sum_square,
    UncertaintyBudget,
};

/// Minimum readings on the anvil, before and after the survey
pub const MIN_ANVIL_READINGS: usize = 5;
/// Allowed readings per element
pub const MIN_ELEMENT_READINGS: usize = 9;
pub const MAX_ELEMENT_READINGS: usize = 15;

// ============================================================================
// Anvil calibration
// ============================================================================

/// Rebound readings taken on the calibration anvil.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnvilCalibration {
    pub before: Vec<u32>,
    pub after: Vec<u32>,
}

impl AnvilCalibration {
    pub fn validate(&self) -> CalcResult<()> {
        self.validate_at("")
    }

    pub(crate) fn validate_at(&self, path: &str) -> CalcResult<()> {
        for (name, readings) in [("before", &self.before), ("after", &self.after)] {
            let list = field(path, name);
            require_count(list.as_str(), readings.len(), MIN_ANVIL_READINGS, None)?;
            if let Some(i) = readings.iter().position(|&r| r == 0) {
                return Err(CalcError::invalid_input(
                    format!("{}[{}]", list, i),
                    "0",
                    "Anvil reading must be positive",
                ));
            }
        }
        Ok(())
    }
}

/// Anvil correction factor and the pooled median it came from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnvilCalibrationResult {
    pub rsa: f64,
    /// Unrounded median of all anvil readings
    pub median: f64,
}

/// Pool before and after readings and derive RSA. Input is assumed valid.
pub fn calibrate_anvil(anvil: &AnvilCalibration, tables: &CorrectionTables) -> AnvilCalibrationResult {
    let pooled: Vec<f64> = anvil
        .before
        .iter()
        .chain(anvil.after.iter())
        .map(|&r| r as f64)
        .collect();
    let median = median(&pooled);
    AnvilCalibrationResult {
        rsa: tables.schmidt.anvil_reference_rebound / median,
        median,
    }
}

// ============================================================================
// Element
// ============================================================================

/// Hammer orientation at impact. Recorded only; no angle correction is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImpactDirection {
    Horizontal,
    Upward,
    Downward,
}

impl ImpactDirection {
    /// Column value in the element table
    pub fn display_name(&self) -> &'static str {
        match self {
            ImpactDirection::Horizontal => "Horizontal",
            ImpactDirection::Upward => "Upward",
            ImpactDirection::Downward => "Downward",
        }
    }
}

impl std::fmt::Display for ImpactDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Rebound readings on one tested element.
///
/// ## JSON Example
///
/// ```json
/// { "label": "Column C3", "direction": "horizontal",
///   "readings": [40, 42, 38, 41, 39, 43, 40, 44, 37, 41] }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchmidtElementMeasurement {
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub direction: Option<ImpactDirection>,
    /// Raw rebound numbers, 9 to 15 of them
    pub readings: Vec<f64>,
}

impl SchmidtElementMeasurement {
    pub fn validate(&self) -> CalcResult<()> {
        self.validate_at("")
    }

    pub(crate) fn validate_at(&self, path: &str) -> CalcResult<()> {
        let list = field(path, "readings");
        require_count(
            list.as_str(),
            self.readings.len(),
            MIN_ELEMENT_READINGS,
            Some(MAX_ELEMENT_READINGS),
        )?;
        for (i, &r) in self.readings.iter().enumerate() {
            require_positive(format!("{}[{}]", list, i), r, "Rebound reading")?;
        }
        Ok(())
    }
}

/// Uncertainty components for one element.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReboundUncertaintyComponents {
    /// √(SD² / n)
    pub repeatability: f64,
    pub resolution: f64,
    pub calibration: f64,
    /// Welch–Satterthwaite; `None` when repeatability is zero
    pub effective_degrees_of_freedom: Option<u32>,
    /// Student-t k for `effective_degrees_of_freedom` (not applied)
    pub tabulated_coverage_factor: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchmidtElementResult {
    pub label: Option<String>,
    pub direction: Option<ImpactDirection>,
    pub corrected_readings: Vec<f64>,
    /// Rounded median of the corrected readings
    pub median_rebound: f64,
    pub lower_bound: f64,
    pub upper_bound: f64,
    pub valid_readings: usize,
    pub total_readings: usize,
    /// Sample SD of the corrected readings
    pub standard_deviation: f64,
    pub components: ReboundUncertaintyComponents,
    /// Type A is repeatability, Type B is resolution and calibration
    pub uncertainty: UncertaintyBudget,
    /// Indicative compressive strength (kg/cm²). Not a certified result.
    pub indicative_strength_kg_cm2: f64,
}

/// Correct and evaluate one element. Input is assumed valid.
pub fn compute_element(
    m: &SchmidtElementMeasurement,
    rsa: f64,
    tables: &CorrectionTables,
) -> SchmidtElementResult {
    let constants = &tables.schmidt;
    let corrected: Vec<f64> = m.readings.iter().map(|r| r * rsa).collect();
    let n = corrected.len();

    let median_rebound = median(&corrected).round();
    let lower_bound = (1.0 - constants.acceptance_band) * median_rebound;
    let upper_bound = (1.0 + constants.acceptance_band) * median_rebound;
    let valid_readings = corrected
        .iter()
        .filter(|&&r| r >= lower_bound && r <= upper_bound)
        .count();

    let sd = standard_deviation(&corrected, Variance::Sample);
    let repeatability = (sd * sd / n as f64).sqrt();
    let resolution = resolution_uncertainty(constants.rebound_resolution);
    let calibration = calibration_uncertainty(constants.hammer_calibration_uncertainty);

    let type_b = root_sum_square(&[resolution, calibration]);
    let uncertainty = UncertaintyBudget::new(repeatability, type_b, constants.coverage_factor);

    let dof = n.saturating_sub(1) as u32;
    let effective_dof = effective_degrees_of_freedom(
        uncertainty.combined,
        &[(repeatability, Some(dof)), (resolution, None), (calibration, None)],
    );

    SchmidtElementResult {
        label: m.label.clone(),
        direction: m.direction,
        corrected_readings: corrected,
        median_rebound,
        lower_bound,
        upper_bound,
        valid_readings,
        total_readings: n,
        standard_deviation: sd,
        components: ReboundUncertaintyComponents {
            repeatability,
            resolution,
            calibration,
            effective_degrees_of_freedom: effective_dof,
            tabulated_coverage_factor: tables.coverage.factor(effective_dof),
        },
        uncertainty,
        indicative_strength_kg_cm2: median_rebound * constants.indicative_strength_per_rebound,
    }
}

// ============================================================================
// Batch
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchmidtHammerBatchInput {
    pub label: String,
    pub anvil: AnvilCalibration,
    pub elements: Vec<SchmidtElementMeasurement>,
}

impl SchmidtHammerBatchInput {
    pub fn validate(&self) -> CalcResult<()> {
        self.anvil.validate_at("anvil")?;
        require_count("elements", self.elements.len(), 1, None)?;
        for (i, element) in self.elements.iter().enumerate() {
            element.validate_at(&format!("elements[{}]", i))?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchmidtHammerBatchResult {
    pub label: String,
    pub anvil: AnvilCalibrationResult,
    pub elements: Vec<SchmidtElementResult>,
    /// Statistics over the element median rebounds (sample SD)
    pub median_rebound: BatchStatistics,
}

impl SchmidtHammerBatchResult {
    pub fn format_report(&self) -> String {
        let mut out = format!(
            "Schmidt Hammer Test - {}\n\
             =================================================================================\n\
             Anvil median = {:.1}   RSA = {:.4}\n\
             ---------------------------------------------------------------------------------\n\
             {:<14} {:<10} {:>6} {:>13} {:>7} {:>6} {:>8} {:>10}\n\
             ---------------------------------------------------------------------------------\n",
            self.label,
            self.anvil.median,
            self.anvil.rsa,
            "Element",
            "Direction",
            "R med",
            "Band",
            "Valid",
            "SD",
            "U (k=2)",
            "fc* kg/cm²"
        );
        for (i, e) in self.elements.iter().enumerate() {
            let label = e.label.clone().unwrap_or_else(|| format!("#{}", i + 1));
            let band = format!("{:.1}-{:.1}", e.lower_bound, e.upper_bound);
            let direction = e.direction.map(|d| d.display_name()).unwrap_or("-");
            out.push_str(&format!(
                "{:<14} {:<10} {:>6.0} {:>13} {:>3}/{:<3} {:>6.2} {:>8.2} {:>10.0}\n",
                label,
                direction,
                e.median_rebound,
                band,
                e.valid_readings,
                e.total_readings,
                e.standard_deviation,
                e.uncertainty.expanded,
                e.indicative_strength_kg_cm2
            ));
        }
        out.push_str(&format!(
            "---------------------------------------------------------------------------------\n\
             Median rebound: mean {:.1}, min {:.0}, max {:.0}, SD {:.2}\n\
             * fc is an indicative estimate from a rebound correlation, not a certified strength.",
            self.median_rebound.average,
            self.median_rebound.min,
            self.median_rebound.max,
            self.median_rebound.standard_deviation
        ));
        out
    }
}

/// Calibrate once, then evaluate every element. Input is assumed valid.
pub fn compute_batch(input: &SchmidtHammerBatchInput, tables: &CorrectionTables) -> SchmidtHammerBatchResult {
    let anvil = calibrate_anvil(&input.anvil, tables);
    let elements: Vec<SchmidtElementResult> = input
        .elements
        .iter()
        .map(|e| compute_element(e, anvil.rsa, tables))
        .collect();
    let medians: Vec<f64> = elements.iter().map(|e| e.median_rebound).collect();
    let median_rebound = aggregate(&medians, Variance::Sample);

    debug!(
        batch = %input.label,
        elements = elements.len(),
        rsa = anvil.rsa,
        "schmidt hammer batch computed"
    );

    SchmidtHammerBatchResult {
        label: input.label.clone(),
        anvil,
        elements,
        median_rebound,
    }
}

/// Validate and compute a Schmidt hammer batch.
pub fn calculate(input: &SchmidtHammerBatchInput, tables: &CorrectionTables) -> CalcResult<SchmidtHammerBatchResult> {
    input.validate()?;
    Ok(compute_batch(input, tables))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tables::STANDARD_TABLES;

    fn anvil() -> AnvilCalibration {
        AnvilCalibration {
            before: vec![81, 83, 84, 84, 83],
            after: vec![80, 80, 82, 82, 81],
        }
    }

    fn element(readings: &[f64]) -> SchmidtElementMeasurement {
        SchmidtElementMeasurement {
            label: Some("Column C3".to_string()),
            direction: Some(ImpactDirection::Horizontal),
            readings: readings.to_vec(),
        }
    }

    const READINGS: [f64; 10] = [40.0, 42.0, 38.0, 41.0, 39.0, 43.0, 40.0, 44.0, 37.0, 41.0];

    #[test]
    fn test_anvil_fixture() {
        let r = calibrate_anvil(&anvil(), &STANDARD_TABLES);
        assert_eq!(r.median, 82.0);
        assert!((r.rsa - 0.9756).abs() < 1e-4);
    }

    #[test]
    fn test_anvil_unequal_lengths() {
        let a = AnvilCalibration {
            before: vec![78, 79, 80, 81, 82, 83],
            after: vec![80, 80, 80, 80, 80],
        };
        let r = calibrate_anvil(&a, &STANDARD_TABLES);
        assert_eq!(r.median, 80.0);
        assert_eq!(r.rsa, 1.0);
    }

    #[test]
    fn test_element_corrections() {
        let rsa = 80.0 / 82.0;
        let r = compute_element(&element(&READINGS), rsa, &STANDARD_TABLES);
        assert!((r.corrected_readings[0] - 40.0 * rsa).abs() < 1e-12);
        assert_eq!(r.median_rebound, 40.0);
        assert_eq!(r.lower_bound, 30.0);
        assert_eq!(r.upper_bound, 50.0);
        assert_eq!(r.valid_readings, 10);
        assert_eq!(r.total_readings, 10);
        assert!((r.standard_deviation - 2.12007).abs() < 1e-4);
    }

    #[test]
    fn test_element_uncertainty() {
        let r = compute_element(&element(&READINGS), 80.0 / 82.0, &STANDARD_TABLES);
        let c = &r.components;
        assert!((c.repeatability - 0.67042).abs() < 1e-4);
        assert!((c.resolution - 1.0 / 3.0_f64.sqrt()).abs() < 1e-12);
        assert!((c.calibration - 0.0133).abs() < 1e-12);
        assert!((r.uncertainty.combined - 0.88486).abs() < 1e-4);
        assert!((r.uncertainty.expanded - 1.76972).abs() < 1e-4);
        assert_eq!(c.effective_degrees_of_freedom, Some(27));
        // Tabulated k is reported, never applied
        assert_eq!(c.tabulated_coverage_factor, 2.11);
        assert_eq!(r.uncertainty.coverage_factor, 2.0);
    }

    #[test]
    fn test_indicative_strength() {
        let r = compute_element(&element(&READINGS), 80.0 / 82.0, &STANDARD_TABLES);
        assert_eq!(r.indicative_strength_kg_cm2, 460.0);
    }

    #[test]
    fn test_outliers_excluded_from_valid_count() {
        let mut readings = READINGS[..9].to_vec();
        readings.push(60.0);
        readings.push(20.0);
        let r = compute_element(&element(&readings), 80.0 / 82.0, &STANDARD_TABLES);
        assert_eq!(r.median_rebound, 39.0);
        assert_eq!(r.valid_readings, 9);
        assert_eq!(r.total_readings, 11);
    }

    #[test]
    fn test_uniform_readings_have_infinite_dof() {
        let r = compute_element(&element(&[40.0; 9]), 1.0, &STANDARD_TABLES);
        assert_eq!(r.components.repeatability, 0.0);
        assert_eq!(r.components.effective_degrees_of_freedom, None);
        assert_eq!(r.components.tabulated_coverage_factor, 2.0);
    }

    #[test]
    fn test_batch() {
        let input = SchmidtHammerBatchInput {
            label: "Ground floor".to_string(),
            anvil: anvil(),
            elements: vec![element(&READINGS), element(&[36.0; 9])],
        };
        let r = calculate(&input, &STANDARD_TABLES).unwrap();
        assert_eq!(r.elements.len(), 2);
        assert_eq!(r.median_rebound.count, 2);
        assert_eq!(r.median_rebound.convention, Variance::Sample);
        // 36 × 80/82 = 35.12 → 35
        assert_eq!(r.median_rebound.min, 35.0);
        assert_eq!(r.median_rebound.max, 40.0);
    }

    #[test]
    fn test_validation_paths() {
        let mut input = SchmidtHammerBatchInput {
            label: "Bad".to_string(),
            anvil: anvil(),
            elements: vec![element(&READINGS[..8])],
        };
        let err = input.validate().unwrap_err();
        assert_eq!(err.error_code(), "INVALID_COUNT");
        assert!(err.to_string().contains("elements[0].readings"));

        input.elements = vec![element(&READINGS)];
        input.anvil.after.truncate(4);
        assert!(input.validate().unwrap_err().to_string().contains("anvil.after"));

        input.anvil = anvil();
        input.anvil.before[2] = 0;
        assert!(input.validate().unwrap_err().to_string().contains("anvil.before[2]"));

        input.anvil = anvil();
        input.elements[0].readings[4] = f64::NAN;
        assert!(input.validate().unwrap_err().to_string().contains("elements[0].readings[4]"));
    }

    #[test]
    fn test_too_many_readings() {
        let m = element(&[40.0; 16]);
        assert!(m.validate().is_err());
        assert!(element(&[40.0; 15]).validate().is_ok());
    }

    #[test]
    fn test_report_labels_indicative_strength() {
        let input = SchmidtHammerBatchInput {
            label: "Ground floor".to_string(),
            anvil: anvil(),
            elements: vec![element(&READINGS)],
        };
        let report = compute_batch(&input, &STANDARD_TABLES).format_report();
        assert!(report.contains("RSA = 0.9756"));
        assert!(report.contains("indicative"));
        assert!(report.contains("Column C3"));
        assert!(report.contains("Horizontal"));
    }
}
