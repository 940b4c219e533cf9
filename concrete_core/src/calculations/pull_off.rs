//! # Pull-Off Adhesion Strength
//!
//! Tensile adhesion strength of a bonded dolly and the GUM uncertainty of the
//! batch mean.
//!
//! ## Per specimen
//!
//! ```text
//! A = π (D/2)²            (mm²)
//! σ = P_N / A             (MPa)
//! ```
//!
//! ## Batch uncertainty
//!
//! Sensitivity coefficients are evaluated at the batch means:
//!
//! ```text
//! Cp = ∂σ/∂P = 4 / (π D̄²)
//! Cd = ∂σ/∂D = −2 σ̄ / D̄
//!
//! u_A = √((u_rep,P · Cp)² + (u_rep,D · |Cd|)²)
//! u_B = √((u_cal,P · Cp)² + (u_res,P · Cp)² + (u_cal,D · |Cd|)² + (u_res,D · |Cd|)²)
//! U   = 2 · √(u_A² + u_B²)
//! ```
//!
//! Repeatability is `SD / √3` for both quantities. The reported coefficient
//! of variation is taken from the **load** series, not the strength series,
//! matching the laboratory worksheet.
//!
//! ## Example
//!
//! ```rust
//! use concrete_core::calculations::pull_off::{compute_specimen, PullOffSpecimenMeasurement};
//!
//! let specimen = PullOffSpecimenMeasurement {
//!     code: Some("P1".to_string()),
//!     tested_item: None,
//!     failure_mode: None,
//!     diameter_mm: 55.0,
//!     failure_load_kn: 3.63,
//! };
//! let result = compute_specimen(&specimen);
//! assert!((result.tensile_strength_mpa - 1.528).abs() < 1e-3);
//! ```

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::{field, require_count, require_positive, CalcResult};
use crate::statistics::{aggregate, standard_deviation, BatchStatistics, Variance};
use crate::tables::CorrectionTables;
use crate::uncertainty::{calibration_uncertainty, resolution_uncertainty, root_sum_square, UncertaintyBudget};
use crate::units::{KiloNewtons, Millimeters, Newtons};

/// Where the specimen broke
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureMode {
    /// Cohesive failure in the concrete substrate
    Substrate,
    /// Adhesive failure between substrate and coating
    SubstrateCoatingInterface,
    /// Cohesive failure in the coating or repair layer
    Coating,
    /// Adhesive failure between coating and dolly adhesive
    CoatingAdhesiveInterface,
    /// Failure in the dolly adhesive
    Adhesive,
}

impl FailureMode {
    /// Display name for reports
    pub fn display_name(&self) -> &'static str {
        match self {
            FailureMode::Substrate => "Substrate",
            FailureMode::SubstrateCoatingInterface => "Substrate/coating",
            FailureMode::Coating => "Coating",
            FailureMode::CoatingAdhesiveInterface => "Coating/adhesive",
            FailureMode::Adhesive => "Adhesive",
        }
    }
}

impl std::fmt::Display for FailureMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// One pull-off specimen.
///
/// ## JSON Example
///
/// ```json
/// { "code": "P1", "tested_item": "Slab S2", "failure_mode": "substrate",
///   "diameter_mm": 55.0, "failure_load_kn": 3.63 }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PullOffSpecimenMeasurement {
    /// Specimen code
    #[serde(default)]
    pub code: Option<String>,
    /// Item or area tested
    #[serde(default)]
    pub tested_item: Option<String>,
    #[serde(default)]
    pub failure_mode: Option<FailureMode>,
    /// Dolly diameter (mm)
    pub diameter_mm: f64,
    /// Load at failure (kN)
    pub failure_load_kn: f64,
}

impl PullOffSpecimenMeasurement {
    /// Validate against the engine contract.
    pub fn validate(&self) -> CalcResult<()> {
        self.validate_at("")
    }

    pub(crate) fn validate_at(&self, path: &str) -> CalcResult<()> {
        require_positive(field(path, "diameter_mm"), self.diameter_mm, "Diameter")?;
        require_positive(field(path, "failure_load_kn"), self.failure_load_kn, "Failure load")?;
        Ok(())
    }
}

/// Derived values for one specimen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PullOffSpecimenResult {
    pub code: Option<String>,
    pub tested_item: Option<String>,
    pub failure_mode: Option<FailureMode>,
    pub diameter_mm: f64,
    pub failure_load_kn: f64,
    pub failure_load_n: f64,
    pub area_mm2: f64,
    pub tensile_strength_mpa: f64,
}

/// Component uncertainties and sensitivity coefficients of the batch budget.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PullOffUncertaintyComponents {
    /// SD(load) / √3 (N)
    pub load_repeatability_n: f64,
    /// Tester calibration (N)
    pub load_calibration_n: f64,
    /// Tester resolution (N)
    pub load_resolution_n: f64,
    /// SD(diameter) / √3 (mm)
    pub diameter_repeatability_mm: f64,
    /// Caliper calibration (mm)
    pub diameter_calibration_mm: f64,
    /// Caliper resolution (mm)
    pub diameter_resolution_mm: f64,
    /// Cp = 4 / (π D̄²) (MPa/N)
    pub load_sensitivity: f64,
    /// Cd = −2 σ̄ / D̄ (MPa/mm)
    pub diameter_sensitivity: f64,
}

/// A batch of pull-off specimens.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PullOffBatchInput {
    /// User label for the batch
    pub label: String,
    pub specimens: Vec<PullOffSpecimenMeasurement>,
}

impl PullOffBatchInput {
    /// Validate every specimen. The budget needs a sample SD, so at least
    /// two specimens are required.
    pub fn validate(&self) -> CalcResult<()> {
        require_count("specimens", self.specimens.len(), 2, None)?;
        for (i, specimen) in self.specimens.iter().enumerate() {
            specimen.validate_at(&format!("specimens[{}]", i))?;
        }
        Ok(())
    }
}

/// Per-specimen results, statistics and uncertainty budget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PullOffBatchResult {
    pub label: String,
    pub specimens: Vec<PullOffSpecimenResult>,
    /// Tensile strength statistics (sample SD)
    pub strength: BatchStatistics,
    /// Failure load statistics in kN (sample SD)
    pub load_kn: BatchStatistics,
    pub mean_diameter_mm: f64,
    /// SD(loads) / mean(loads) × 100
    pub coefficient_of_variation: f64,
    pub components: PullOffUncertaintyComponents,
    pub uncertainty: UncertaintyBudget,
}

impl PullOffBatchResult {
    /// Fixed-width text summary
    pub fn format_report(&self) -> String {
        let mut out = format!(
            "Pull-Off Test - {}\n\
             ============================================================\n\
             {:<8} {:>8} {:>9} {:>10} {:>8}  {}\n\
             ------------------------------------------------------------\n",
            self.label, "Code", "D mm", "Load kN", "Area mm²", "σ MPa", "Failure"
        );
        for (i, s) in self.specimens.iter().enumerate() {
            let code = s.code.clone().unwrap_or_else(|| (i + 1).to_string());
            let mode = s.failure_mode.map(|m| m.display_name()).unwrap_or("-");
            out.push_str(&format!(
                "{:<8} {:>8.2} {:>9.2} {:>10.1} {:>8.3}  {}\n",
                code, s.diameter_mm, s.failure_load_kn, s.area_mm2, s.tensile_strength_mpa, mode
            ));
        }
        let u = &self.uncertainty;
        out.push_str(&format!(
            "------------------------------------------------------------\n\
             Mean strength        = {:.3} MPa (min {:.3}, max {:.3})\n\
             SD strength          = {:.3} MPa\n\
             CV (load)            = {:.2} %\n\
             Type A               = {:.4} MPa\n\
             Type B               = {:.4} MPa\n\
             Combined u_c         = {:.4} MPa\n\
             Expanded U (k = {:.0})   = {:.3} MPa",
            self.strength.average,
            self.strength.min,
            self.strength.max,
            self.strength.standard_deviation,
            self.coefficient_of_variation,
            u.type_a,
            u.type_b,
            u.combined,
            u.coverage_factor,
            u.expanded,
        ));
        out
    }
}

/// Derive one specimen. Input is assumed valid.
pub fn compute_specimen(m: &PullOffSpecimenMeasurement) -> PullOffSpecimenResult {
    let area = Millimeters(m.diameter_mm).circle_area();
    let load: Newtons = KiloNewtons(m.failure_load_kn).into();
    let stress = load / area;

    PullOffSpecimenResult {
        code: m.code.clone(),
        tested_item: m.tested_item.clone(),
        failure_mode: m.failure_mode,
        diameter_mm: m.diameter_mm,
        failure_load_kn: m.failure_load_kn,
        failure_load_n: load.0,
        area_mm2: area.0,
        tensile_strength_mpa: stress.0,
    }
}

/// Derive every specimen, then the statistics and budget. Input is assumed valid.
pub fn compute_batch(input: &PullOffBatchInput, tables: &CorrectionTables) -> PullOffBatchResult {
    let specimens: Vec<PullOffSpecimenResult> = input.specimens.iter().map(compute_specimen).collect();

    let strengths: Vec<f64> = specimens.iter().map(|s| s.tensile_strength_mpa).collect();
    let loads_kn: Vec<f64> = specimens.iter().map(|s| s.failure_load_kn).collect();
    let loads_n: Vec<f64> = specimens.iter().map(|s| s.failure_load_n).collect();
    let diameters: Vec<f64> = specimens.iter().map(|s| s.diameter_mm).collect();

    let strength = aggregate(&strengths, Variance::Sample);
    let load_kn = aggregate(&loads_kn, Variance::Sample);
    let diameter = aggregate(&diameters, Variance::Sample);
    let coefficient_of_variation = load_kn.coefficient_of_variation();

    let constants = &tables.pull_off;
    let sqrt3 = 3.0_f64.sqrt();
    let mean_diameter = diameter.average;

    let cp = 4.0 / (std::f64::consts::PI * mean_diameter * mean_diameter);
    let cd = -2.0 * strength.average / mean_diameter;

    let components = PullOffUncertaintyComponents {
        load_repeatability_n: standard_deviation(&loads_n, Variance::Sample) / sqrt3,
        load_calibration_n: calibration_uncertainty(constants.load_calibration_tolerance_kn * 1000.0),
        load_resolution_n: resolution_uncertainty(constants.load_resolution_kn * 1000.0),
        diameter_repeatability_mm: diameter.standard_deviation / sqrt3,
        diameter_calibration_mm: calibration_uncertainty(constants.diameter_calibration_tolerance_mm),
        diameter_resolution_mm: resolution_uncertainty(constants.diameter_resolution_mm),
        load_sensitivity: cp,
        diameter_sensitivity: cd,
    };

    let c = &components;
    let type_a = root_sum_square(&[c.load_repeatability_n * cp, c.diameter_repeatability_mm * cd.abs()]);
    let type_b = root_sum_square(&[
        c.load_calibration_n * cp,
        c.load_resolution_n * cp,
        c.diameter_calibration_mm * cd.abs(),
        c.diameter_resolution_mm * cd.abs(),
    ]);
    let uncertainty = UncertaintyBudget::new(type_a, type_b, constants.coverage_factor);

    debug!(
        batch = %input.label,
        specimens = specimens.len(),
        mean_strength_mpa = strength.average,
        expanded_mpa = uncertainty.expanded,
        "pull-off batch computed"
    );

    PullOffBatchResult {
        label: input.label.clone(),
        specimens,
        strength,
        load_kn,
        mean_diameter_mm: mean_diameter,
        coefficient_of_variation,
        components,
        uncertainty,
    }
}

/// Validate and compute a pull-off batch.
pub fn calculate(input: &PullOffBatchInput, tables: &CorrectionTables) -> CalcResult<PullOffBatchResult> {
    input.validate()?;
    Ok(compute_batch(input, tables))
}
