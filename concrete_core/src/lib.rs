//! # concrete_core - Concrete Quality Test Calculation Engine
//!
//! `concrete_core` turns raw laboratory measurements from three concrete
//! test protocols into reportable results:
//!
//! - **Core test**: equivalent 150 mm cube compressive strength of drilled cores
//! - **Pull-off test**: tensile adhesion strength with a GUM uncertainty budget
//! - **Schmidt hammer**: anvil-corrected rebound numbers with a GUM budget and
//!   an indicative strength estimate
//!
//! ## Design Philosophy
//!
//! - **Stateless**: Pure functions from a batch of measurements to a result
//! - **Injected tables**: Every engine takes a [`CorrectionTables`] value; the
//!   shipped defaults live in [`tables::STANDARD_TABLES`]
//! - **JSON-First**: All inputs and outputs implement Serialize/Deserialize
//! - **Rich Errors**: Validation reports the offending field path
//!
//! ## Quick Start
//!
//! ```rust
//! use concrete_core::calculations::TestBatch;
//! use concrete_core::tables::STANDARD_TABLES;
//!
//! let json = r#"{
//!     "protocol": "PullOff",
//!     "label": "Deck",
//!     "specimens": [
//!         { "diameter_mm": 50.0, "failure_load_kn": 3.0 },
//!         { "diameter_mm": 50.0, "failure_load_kn": 3.4 }
//!     ]
//! }"#;
//!
//! let batch: TestBatch = serde_json::from_str(json).unwrap();
//! let outcome = batch.evaluate(&STANDARD_TABLES).unwrap();
//! println!("{}", outcome.format_report());
//! ```
//!
//! ## Modules
//!
//! - [`calculations`] - The three protocol engines and the [`TestBatch`] dispatch
//! - [`tables`] - Correction tables and protocol constants
//! - [`interpolation`] - 1-D, bilinear and nearest-value lookups
//! - [`statistics`] - Batch statistics (population or sample SD)
//! - [`uncertainty`] - GUM budget building blocks
//! - [`report`] - Multi-batch report envelope
//! - [`units`] - Type-safe unit wrappers
//! - [`errors`] - Structured error types
//! - [`telemetry`] - Tracing subscriber setup

pub mod calculations;
pub mod errors;
pub mod interpolation;
pub mod report;
pub mod statistics;
pub mod tables;
pub mod telemetry;
pub mod uncertainty;
pub mod units;

// Re-export commonly used types at crate root for convenience
pub use calculations::{BatchOutcome, TestBatch};
pub use errors::{CalcError, CalcResult};
pub use report::{ReportMetadata, TestReport};
pub use tables::{CorrectionTables, EngineSettings, FgDiameterPolicy, MoistureCondition};
