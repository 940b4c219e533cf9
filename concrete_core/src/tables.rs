//! # Correction Tables
//!
//! Reference data for the three test protocols.
//!
//! ## Overview
//!
//! | Table              | Key                         | Used by        |
//! |--------------------|-----------------------------|----------------|
//! | Fm (moisture)      | moisture condition          | Core test      |
//! | Fg (cutting)       | diameter × strength (5×5)   | Core test      |
//! | L/D                | L/D ratio × 10              | Core test      |
//! | Coverage factor    | effective degrees of freedom| Schmidt hammer |
//! | Pull-off constants | -                           | Pull-off       |
//! | Schmidt constants  | -                           | Schmidt hammer |
//!
//! Tables are plain data. Engines receive a `&CorrectionTables` so tests and
//! laboratories can inject alternates; [`STANDARD_TABLES`] is the shared
//! default, built once on first use. Overrides load from JSON through
//! [`CorrectionTables::from_json`], which validates shape and ordering.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};
use crate::interpolation::{bilinear_lookup, nearest_standard_value, table_lookup_1d};

/// Default tables shared by every caller that does not inject its own.
pub static STANDARD_TABLES: Lazy<CorrectionTables> = Lazy::new(CorrectionTables::default);

// ============================================================================
// Moisture (Fm)
// ============================================================================

/// Moisture condition of the core at test time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MoistureCondition {
    /// Oven or air dried: Fm = 0.96
    Dry,

    /// As received from the structure: Fm = 1.00
    #[default]
    Natural,

    /// Soaked before test: Fm = 1.05
    Saturated,
}

/// Fm factor per moisture condition. Keyed lookup, never interpolated.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MoistureFactors {
    pub dry: f64,
    pub natural: f64,
    pub saturated: f64,
}

impl MoistureFactors {
    /// Fm for `condition`
    pub fn factor(&self, condition: MoistureCondition) -> f64 {
        match condition {
            MoistureCondition::Dry => self.dry,
            MoistureCondition::Natural => self.natural,
            MoistureCondition::Saturated => self.saturated,
        }
    }
}

impl Default for MoistureFactors {
    fn default() -> Self {
        Self {
            dry: 0.96,
            natural: 1.00,
            saturated: 1.05,
        }
    }
}

// ============================================================================
// Cutting factor (Fg)
// ============================================================================

/// How the core diameter enters the Fg grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum FgDiameterPolicy {
    /// Interpolate on the measured (clamped) diameter
    #[default]
    Continuous,

    /// Snap the diameter to the nearest nominal grid diameter first
    SnapToStandard,
}

impl FgDiameterPolicy {
    /// Label shown in report headers and CLI logs
    pub fn display_name(&self) -> &'static str {
        match self {
            FgDiameterPolicy::Continuous => "Continuous diameter",
            FgDiameterPolicy::SnapToStandard => "Nearest nominal diameter",
        }
    }
}

impl std::fmt::Display for FgDiameterPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Fg grid: `factors[diameter index][strength index]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CuttingFactorGrid {
    /// Nominal core diameters (mm), ascending
    pub diameters_mm: Vec<f64>,
    /// Core strengths (MPa), ascending
    pub strengths_mpa: Vec<f64>,
    /// One row per diameter, one column per strength
    pub factors: Vec<Vec<f64>>,
}

impl CuttingFactorGrid {
    /// Fg for a core of `diameter_mm` with strength `strength_mpa`.
    ///
    /// Both axes are clamped to the grid. Under
    /// [`FgDiameterPolicy::SnapToStandard`] the diameter is replaced by the
    /// nearest grid diameter before interpolating.
    pub fn factor(&self, diameter_mm: f64, strength_mpa: f64, policy: FgDiameterPolicy) -> f64 {
        let diameter = match policy {
            FgDiameterPolicy::Continuous => diameter_mm,
            FgDiameterPolicy::SnapToStandard => nearest_standard_value(diameter_mm, &self.diameters_mm),
        };
        bilinear_lookup(diameter, strength_mpa, &self.diameters_mm, &self.strengths_mpa, &self.factors)
    }
}

impl Default for CuttingFactorGrid {
    fn default() -> Self {
        Self {
            diameters_mm: vec![50.0, 75.0, 100.0, 125.0, 150.0],
            strengths_mpa: vec![15.0, 20.0, 25.0, 30.0, 35.0],
            factors: vec![
                vec![1.18, 1.16, 1.14, 1.12, 1.10],
                vec![1.15, 1.13, 1.11, 1.09, 1.07],
                vec![1.12, 1.10, 1.08, 1.06, 1.04],
                vec![1.09, 1.07, 1.05, 1.03, 1.02],
                vec![1.06, 1.05, 1.04, 1.02, 1.00],
            ],
        }
    }
}

// ============================================================================
// L/D correction
// ============================================================================

/// L/D correction table.
///
/// Breakpoints are the plain ratios 1.5 to 3.5 while the lookup key is
/// `L/D × 10`, the worksheet convention. Any real core therefore lands on
/// the last factor. The value is reported only and never enters the cube
/// strength.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlendernessTable {
    /// `(L/D, factor)` pairs, ascending
    pub points: Vec<(f64, f64)>,
}

impl SlendernessTable {
    /// Correction factor for an L/D ratio, looked up at `ld_ratio × 10`
    pub fn factor(&self, ld_ratio: f64) -> f64 {
        table_lookup_1d(ld_ratio * 10.0, &self.points)
    }
}

impl Default for SlendernessTable {
    fn default() -> Self {
        Self {
            points: vec![(1.5, 0.96), (2.0, 1.00), (2.5, 1.02), (3.0, 1.04), (3.5, 1.05)],
        }
    }
}

// ============================================================================
// Coverage factor (Student t, 95.45 %)
// ============================================================================

/// Coverage factor k by effective degrees of freedom.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoverageFactorTable {
    /// `(degrees of freedom, k)` pairs, ascending in dof
    pub points: Vec<(u32, f64)>,
    /// k for infinite degrees of freedom
    pub infinite: f64,
}

impl CoverageFactorTable {
    /// Tabulated k for `dof`.
    ///
    /// Uses the largest tabulated dof not above `dof` (the conservative
    /// row). `None` means infinite degrees of freedom.
    pub fn factor(&self, dof: Option<u32>) -> f64 {
        let Some(dof) = dof else {
            return self.infinite;
        };
        let mut k = self.points.first().map(|&(_, k)| k).unwrap_or(self.infinite);
        for &(row_dof, row_k) in &self.points {
            if row_dof <= dof {
                k = row_k;
            } else {
                break;
            }
        }
        k
    }
}

impl Default for CoverageFactorTable {
    fn default() -> Self {
        Self {
            points: vec![
                (1, 13.97),
                (2, 4.53),
                (3, 3.31),
                (4, 2.87),
                (5, 2.65),
                (6, 2.52),
                (7, 2.43),
                (8, 2.37),
                (9, 2.32),
                (10, 2.28),
                (11, 2.25),
                (12, 2.23),
                (13, 2.21),
                (14, 2.20),
                (15, 2.18),
                (16, 2.17),
                (17, 2.16),
                (18, 2.15),
                (19, 2.14),
                (20, 2.13),
                (25, 2.11),
                (30, 2.09),
                (35, 2.07),
                (40, 2.06),
                (45, 2.06),
                (50, 2.05),
                (100, 2.025),
            ],
            infinite: 2.0,
        }
    }
}

// ============================================================================
// Protocol constants
// ============================================================================

/// Instrument constants for the pull-off uncertainty budget
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PullOffConstants {
    /// Tester calibration tolerance, ± kN
    pub load_calibration_tolerance_kn: f64,
    /// Tester display resolution, kN
    pub load_resolution_kn: f64,
    /// Caliper calibration tolerance, ± mm
    pub diameter_calibration_tolerance_mm: f64,
    /// Caliper resolution, mm
    pub diameter_resolution_mm: f64,
    /// Coverage factor for the expanded uncertainty
    pub coverage_factor: f64,
}

impl Default for PullOffConstants {
    fn default() -> Self {
        Self {
            load_calibration_tolerance_kn: 0.12,
            load_resolution_kn: 0.01,
            diameter_calibration_tolerance_mm: 0.02,
            diameter_resolution_mm: 0.01,
            coverage_factor: 2.0,
        }
    }
}

/// Hammer and anvil constants for the Schmidt protocol
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SchmidtConstants {
    /// Nominal rebound of the calibration anvil
    pub anvil_reference_rebound: f64,
    /// Scale division of the hammer, rebound units
    pub rebound_resolution: f64,
    /// Expanded calibration uncertainty of the hammer (k = 2)
    pub hammer_calibration_uncertainty: f64,
    /// Half-width of the acceptance band as a fraction of the median
    pub acceptance_band: f64,
    /// kg/cm² per rebound unit for the indicative strength estimate
    pub indicative_strength_per_rebound: f64,
    /// Coverage factor for the expanded uncertainty
    pub coverage_factor: f64,
}

impl Default for SchmidtConstants {
    fn default() -> Self {
        Self {
            anvil_reference_rebound: 80.0,
            rebound_resolution: 2.0,
            hammer_calibration_uncertainty: 0.0266,
            acceptance_band: 0.25,
            indicative_strength_per_rebound: 11.5,
            coverage_factor: 2.0,
        }
    }
}

/// Engine options that travel with the tables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct EngineSettings {
    /// Diameter handling for the Fg lookup
    pub fg_diameter_policy: FgDiameterPolicy,
}

// ============================================================================
// Bundle
// ============================================================================

/// Every table and constant the engines read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct CorrectionTables {
    pub settings: EngineSettings,
    pub moisture: MoistureFactors,
    pub cutting: CuttingFactorGrid,
    pub slenderness: SlendernessTable,
    pub coverage: CoverageFactorTable,
    pub pull_off: PullOffConstants,
    pub schmidt: SchmidtConstants,
}

impl CorrectionTables {
    /// Default tables with a different Fg diameter policy
    pub fn with_fg_policy(mut self, policy: FgDiameterPolicy) -> Self {
        self.settings.fg_diameter_policy = policy;
        self
    }

    /// Parse and validate a JSON override. Missing sections keep defaults.
    pub fn from_json(json: &str) -> CalcResult<Self> {
        let tables: CorrectionTables = serde_json::from_str(json)?;
        tables.validate()?;
        Ok(tables)
    }

    /// Fm for a moisture condition
    pub fn moisture_factor(&self, condition: MoistureCondition) -> f64 {
        self.moisture.factor(condition)
    }

    /// Fg under the configured diameter policy
    pub fn cutting_factor(&self, diameter_mm: f64, strength_mpa: f64) -> f64 {
        self.cutting.factor(diameter_mm, strength_mpa, self.settings.fg_diameter_policy)
    }

    /// L/D correction factor (informational)
    pub fn slenderness_factor(&self, ld_ratio: f64) -> f64 {
        self.slenderness.factor(ld_ratio)
    }

    /// Check ordering, shape and sign of every table.
    pub fn validate(&self) -> CalcResult<()> {
        let m = &self.moisture;
        for (name, value) in [("dry", m.dry), ("natural", m.natural), ("saturated", m.saturated)] {
            positive_entry("moisture", name, value)?;
        }

        let grid = &self.cutting;
        ascending_axis("cutting.diameters_mm", &grid.diameters_mm)?;
        ascending_axis("cutting.strengths_mpa", &grid.strengths_mpa)?;
        if grid.factors.len() != grid.diameters_mm.len() {
            return Err(CalcError::invalid_table(
                "cutting.factors",
                format!("{} rows for {} diameters", grid.factors.len(), grid.diameters_mm.len()),
            ));
        }
        for (i, row) in grid.factors.iter().enumerate() {
            if row.len() != grid.strengths_mpa.len() {
                return Err(CalcError::invalid_table(
                    "cutting.factors",
                    format!("row {} has {} values for {} strengths", i, row.len(), grid.strengths_mpa.len()),
                ));
            }
            for &value in row {
                positive_entry("cutting.factors", &format!("row {}", i), value)?;
            }
        }

        let keys: Vec<f64> = self.slenderness.points.iter().map(|&(x, _)| x).collect();
        ascending_axis("slenderness.points", &keys)?;
        for &(x, factor) in &self.slenderness.points {
            positive_entry("slenderness.points", &x.to_string(), factor)?;
        }

        if !self.coverage.points.windows(2).all(|pair| pair[0].0 < pair[1].0) {
            return Err(CalcError::invalid_table(
                "coverage.points",
                "degrees of freedom must be strictly increasing",
            ));
        }
        positive_entry("coverage", "infinite", self.coverage.infinite)?;

        let p = &self.pull_off;
        positive_entry("pull_off", "load_calibration_tolerance_kn", p.load_calibration_tolerance_kn)?;
        positive_entry("pull_off", "load_resolution_kn", p.load_resolution_kn)?;
        positive_entry("pull_off", "diameter_calibration_tolerance_mm", p.diameter_calibration_tolerance_mm)?;
        positive_entry("pull_off", "diameter_resolution_mm", p.diameter_resolution_mm)?;
        positive_entry("pull_off", "coverage_factor", p.coverage_factor)?;

        let s = &self.schmidt;
        positive_entry("schmidt", "anvil_reference_rebound", s.anvil_reference_rebound)?;
        positive_entry("schmidt", "rebound_resolution", s.rebound_resolution)?;
        positive_entry("schmidt", "hammer_calibration_uncertainty", s.hammer_calibration_uncertainty)?;
        positive_entry("schmidt", "indicative_strength_per_rebound", s.indicative_strength_per_rebound)?;
        positive_entry("schmidt", "coverage_factor", s.coverage_factor)?;
        if !(s.acceptance_band > 0.0 && s.acceptance_band < 1.0) {
            return Err(CalcError::invalid_table(
                "schmidt.acceptance_band",
                format!("{} is outside (0, 1)", s.acceptance_band),
            ));
        }

        Ok(())
    }
}

fn positive_entry(table: &str, entry: &str, value: f64) -> CalcResult<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(CalcError::invalid_table(
            table,
            format!("entry '{}' must be positive, got {}", entry, value),
        ));
    }
    Ok(())
}

fn ascending_axis(table: &str, points: &[f64]) -> CalcResult<()> {
    if points.len() < 2 {
        return Err(CalcError::invalid_table(table, "needs at least two breakpoints"));
    }
    if points.iter().any(|p| !p.is_finite()) || !points.windows(2).all(|pair| pair[0] < pair[1]) {
        return Err(CalcError::invalid_table(table, "breakpoints must be strictly increasing"));
    }
    Ok(())
}
