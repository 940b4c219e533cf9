//! # Test Report Envelope
//!
//! `TestReport` collects evaluated batches for one job into a single
//! JSON document.
//!
//! ## Structure
//!
//! ```text
//! TestReport
//! ├── meta: ReportMetadata (version, laboratory, job info, timestamps)
//! ├── settings: EngineSettings (Fg diameter policy in force)
//! └── entries: Vec<ReportEntry> (id + BatchOutcome, in submission order)
//! ```
//!
//! ## Example
//!
//! ```rust
//! use concrete_core::report::TestReport;
//! use concrete_core::tables::STANDARD_TABLES;
//!
//! let report = TestReport::new("Materials Lab", "26-014", "City Works", STANDARD_TABLES.settings);
//! let json = serde_json::to_string_pretty(&report).unwrap();
//! assert!(json.contains("26-014"));
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::calculations::{BatchOutcome, TestBatch};
use crate::errors::CalcResult;
use crate::tables::{CorrectionTables, EngineSettings};

/// Current schema version for report documents
pub const SCHEMA_VERSION: &str = "0.1.0";

/// Root report container.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestReport {
    pub meta: ReportMetadata,

    /// Engine settings the entries were computed with
    pub settings: EngineSettings,

    /// Evaluated batches in the order they were added
    pub entries: Vec<ReportEntry>,
}

impl TestReport {
    /// Create an empty report.
    ///
    /// # Arguments
    ///
    /// * `laboratory` - Name of the testing laboratory
    /// * `job_id` - Job number (e.g., "26-014")
    /// * `client` - Client name
    /// * `settings` - Engine settings used for every entry
    pub fn new(
        laboratory: impl Into<String>,
        job_id: impl Into<String>,
        client: impl Into<String>,
        settings: EngineSettings,
    ) -> Self {
        let now = Utc::now();
        TestReport {
            meta: ReportMetadata {
                version: SCHEMA_VERSION.to_string(),
                laboratory: laboratory.into(),
                job_id: job_id.into(),
                client: client.into(),
                created: now,
                modified: now,
            },
            settings,
            entries: Vec::new(),
        }
    }

    /// Append an evaluated batch. Returns the id assigned to it.
    pub fn add_entry(&mut self, outcome: BatchOutcome) -> Uuid {
        let id = Uuid::new_v4();
        self.entries.push(ReportEntry { id, outcome });
        self.touch();
        id
    }

    /// Evaluate `batch` with `tables` and append the outcome.
    ///
    /// Nothing is added when the batch fails validation.
    pub fn evaluate_and_add(&mut self, batch: &TestBatch, tables: &CorrectionTables) -> CalcResult<Uuid> {
        let outcome = batch.evaluate(tables)?;
        Ok(self.add_entry(outcome))
    }

    /// Remove an entry by id.
    pub fn remove_entry(&mut self, id: &Uuid) -> Option<BatchOutcome> {
        let index = self.entries.iter().position(|e| &e.id == id)?;
        let entry = self.entries.remove(index);
        self.touch();
        Some(entry.outcome)
    }

    pub fn get_entry(&self, id: &Uuid) -> Option<&BatchOutcome> {
        self.entries.iter().find(|e| &e.id == id).map(|e| &e.outcome)
    }

    /// Update the modified timestamp.
    pub fn touch(&mut self) {
        self.meta.modified = Utc::now();
    }

    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }

    /// Text summaries of every entry, separated by blank lines
    pub fn format_report(&self) -> String {
        let mut out = format!(
            "{} - Job {} ({})\nGenerated {}\nFg diameter: {}\n",
            self.meta.laboratory,
            self.meta.job_id,
            self.meta.client,
            self.meta.created.format("%Y-%m-%d %H:%M UTC"),
            self.settings.fg_diameter_policy
        );
        for entry in &self.entries {
            out.push('\n');
            out.push_str(&entry.outcome.format_report());
            out.push('\n');
        }
        out
    }
}

/// Report metadata stored in the document header.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportMetadata {
    /// Schema version (for migration compatibility)
    pub version: String,
    pub laboratory: String,
    pub job_id: String,
    pub client: String,
    pub created: DateTime<Utc>,
    pub modified: DateTime<Utc>,
}

/// One evaluated batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportEntry {
    pub id: Uuid,
    pub outcome: BatchOutcome,
}
