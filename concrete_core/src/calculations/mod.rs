//! # Test Protocol Calculations
//!
//! One module per laboratory protocol. Each follows the pattern:
//!
//! - `*BatchInput` - Measurements for one batch (JSON-serializable)
//! - `*BatchResult` - Per-item results plus batch statistics (JSON-serializable)
//! - `compute_*(input, tables)` - Infallible engine, input assumed valid
//! - `calculate(input, tables) -> CalcResult<*BatchResult>` - Validate, then compute
//!
//! ## Available Protocols
//!
//! - [`core_test`] - Drilled cores, equivalent cube strength
//! - [`pull_off`] - Pull-off adhesion strength with GUM budget
//! - [`schmidt_hammer`] - Rebound hammer with anvil calibration and GUM budget

pub mod pull_off;
pub mod schmidt_hammer;

use serde::{Deserialize, Serialize};

use crate::errors::CalcResult;
use crate::tables::CorrectionTables;

// Re-export commonly used types
pub use core_test::{CoreBatchInput, CoreBatchResult};
pub use pull_off::{PullOffBatchInput, PullOffBatchResult};
pub use schmidt_hammer::{SchmidtHammerBatchInput, SchmidtHammerBatchResult};

/// Enum wrapper for all protocol batches.
///
/// Lets one file or report hold batches of different protocols while keeping
/// each payload strongly typed.
///
/// ## JSON Example
///
/// ```json
/// { "protocol": "PullOff", "label": "Deck", "specimens": [ ... ] }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "protocol")]
pub enum TestBatch {
    CoreTest(CoreBatchInput),
    PullOff(PullOffBatchInput),
    SchmidtHammer(SchmidtHammerBatchInput),
}

impl TestBatch {
    /// User-provided label of the batch
    pub fn label(&self) -> &str {
        match self {
            TestBatch::CoreTest(b) => &b.label,
            TestBatch::PullOff(b) => &b.label,
            TestBatch::SchmidtHammer(b) => &b.label,
        }
    }

    /// Protocol name as a string
    pub fn protocol(&self) -> &'static str {
        match self {
            TestBatch::CoreTest(_) => "CoreTest",
            TestBatch::PullOff(_) => "PullOff",
            TestBatch::SchmidtHammer(_) => "SchmidtHammer",
        }
    }

    /// Check the payload without computing anything
    pub fn validate(&self) -> CalcResult<()> {
        match self {
            TestBatch::CoreTest(b) => b.validate(),
            TestBatch::PullOff(b) => b.validate(),
            TestBatch::SchmidtHammer(b) => b.validate(),
        }
    }

    /// Validate and run the matching engine.
    pub fn evaluate(&self, tables: &CorrectionTables) -> CalcResult<BatchOutcome> {
        Ok(match self {
            TestBatch::CoreTest(b) => BatchOutcome::CoreTest(core_test::calculate(b, tables)?),
            TestBatch::PullOff(b) => BatchOutcome::PullOff(pull_off::calculate(b, tables)?),
            TestBatch::SchmidtHammer(b) => BatchOutcome::SchmidtHammer(schmidt_hammer::calculate(b, tables)?),
        })
    }
}

/// Result of evaluating a [`TestBatch`], tagged the same way.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "protocol")]
pub enum BatchOutcome {
    CoreTest(CoreBatchResult),
    PullOff(PullOffBatchResult),
    SchmidtHammer(SchmidtHammerBatchResult),
}

impl BatchOutcome {
    pub fn label(&self) -> &str {
        match self {
            BatchOutcome::CoreTest(r) => &r.label,
            BatchOutcome::PullOff(r) => &r.label,
            BatchOutcome::SchmidtHammer(r) => &r.label,
        }
    }

    /// Fixed-width text summary of the underlying result
    pub fn format_report(&self) -> String {
        match self {
            BatchOutcome::CoreTest(r) => r.format_report(),
            BatchOutcome::PullOff(r) => r.format_report(),
            BatchOutcome::SchmidtHammer(r) => r.format_report(),
        }
    }
}
