//! # Unit Types
//!
//! Thin newtype wrappers for the laboratory units the three protocols mix:
//! millimetres for specimen geometry, kilonewtons from the press or pull-off
//! tester, metric tonnes-force for the legacy kg/cm² strength formula, and
//! megapascals for reported strengths.
//!
//! JSON stays clean (`#[serde(transparent)]`), so a value serializes as a
//! plain number.
//!
//! ## Example
//!
//! ```rust
//! use concrete_core::units::{KgfPerCm2, KiloNewtons, Megapascals, Newtons, TonnesForce};
//!
//! let load = KiloNewtons(68.4);
//! let newtons: Newtons = load.into();
//! assert_eq!(newtons.0, 68_400.0);
//!
//! let tons: TonnesForce = load.into();
//! assert!((tons.0 - 6.84).abs() < 1e-12);
//!
//! let stress: Megapascals = KgfPerCm2(100.0).into();
//! assert!((stress.0 - 9.80665).abs() < 1e-12);
//! ```

use serde::{Deserialize, Serialize};
use std::ops::{Div, Mul};

/// 1 kgf/cm² expressed in MPa (standard gravity 9.80665 m/s²).
pub const MPA_PER_KGF_CM2: f64 = 0.0980665;

/// Kilonewtons per tonne-force as used on the laboratory worksheets.
///
/// The worksheets round standard gravity to 10, so 1 tf is taken as 10 kN.
pub const KN_PER_TONNE_FORCE: f64 = 10.0;

// ============================================================================
// Geometry
// ============================================================================

/// Length in millimetres
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Millimeters(pub f64);

/// Area in square millimetres
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SqMillimeters(pub f64);

impl Millimeters {
    /// Area of a circle with this diameter
    pub fn circle_area(self) -> SqMillimeters {
        let radius = self.0 / 2.0;
        SqMillimeters(std::f64::consts::PI * radius * radius)
    }
}

// ============================================================================
// Force
// ============================================================================

/// Force in kilonewtons
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KiloNewtons(pub f64);

/// Force in newtons
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Newtons(pub f64);

/// Force in metric tonnes-force (worksheet convention, 1 tf = 10 kN)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TonnesForce(pub f64);

impl From<KiloNewtons> for Newtons {
    fn from(kn: KiloNewtons) -> Self {
        Newtons(kn.0 * 1000.0)
    }
}

impl From<KiloNewtons> for TonnesForce {
    fn from(kn: KiloNewtons) -> Self {
        TonnesForce(kn.0 / KN_PER_TONNE_FORCE)
    }
}

// ============================================================================
// Stress
// ============================================================================

/// Stress in kilograms-force per square centimetre
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KgfPerCm2(pub f64);

/// Stress in megapascals (N/mm²)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Megapascals(pub f64);

impl From<KgfPerCm2> for Megapascals {
    fn from(kgf: KgfPerCm2) -> Self {
        Megapascals(kgf.0 * MPA_PER_KGF_CM2)
    }
}

impl Div<SqMillimeters> for Newtons {
    type Output = Megapascals;
    fn div(self, area: SqMillimeters) -> Megapascals {
        Megapascals(self.0 / area.0)
    }
}

/// Applying a dimensionless correction factor
impl Mul<f64> for KgfPerCm2 {
    type Output = Self;
    fn mul(self, factor: f64) -> Self {
        KgfPerCm2(self.0 * factor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kilonewtons_to_newtons() {
        let n: Newtons = KiloNewtons(3.63).into();
        assert!((n.0 - 3630.0).abs() < 1e-9);
    }

    #[test]
    fn test_kilonewtons_to_tonnes() {
        let t: TonnesForce = KiloNewtons(68.4).into();
        assert!((t.0 - 6.84).abs() < 1e-12);
    }

    #[test]
    fn test_stress_conversion_is_exact_gravity() {
        let mpa: Megapascals = KgfPerCm2(1.0).into();
        assert_eq!(mpa.0, 0.0980665);
    }

    #[test]
    fn test_correction_factor_scales_stress() {
        let corrected = KgfPerCm2(100.0) * 1.15;
        assert!((corrected.0 - 115.0).abs() < 1e-12);
    }

    #[test]
    fn test_newtons_over_area() {
        let area = Millimeters(55.0).circle_area();
        assert!((area.0 - 2375.8294).abs() < 1e-3);
        let stress = Newtons(3630.0) / area;
        assert!((stress.0 - 1.52789).abs() < 1e-4);
    }

    #[test]
    fn test_serialization() {
        let mpa = Megapascals(12.5);
        let json = serde_json::to_string(&mpa).unwrap();
        assert_eq!(json, "12.5");

        let roundtrip: Megapascals = serde_json::from_str(&json).unwrap();
        assert_eq!(mpa, roundtrip);
    }
}
