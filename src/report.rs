//! Upgrade reporting and verification
//!
//! # Usage
//!
//! ```rust,ignore
//! use gov_migrate::MigrationReport;
//!
//! let mut report = MigrationReport::new("gov", 1, 2);
//! report.record_counts("Proposal", counts);
//! report.verification.add_count_check("Proposal", 7, 7);
//! report.complete();
//!
//! println!("Upgrade success: {}", report.is_success());
//! ```

use std::collections::BTreeMap;

use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Outcome of one upgrade run
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct MigrationReport {
    /// Module whose schema was upgraded
    pub module: String,
    /// Version the store was expected to be at
    pub source_version: u64,
    /// Version recorded by the upgrade
    pub target_version: u64,
    /// RFC 3339 start time
    pub started_at: String,
    /// RFC 3339 completion time (None if still running)
    pub completed_at: Option<String>,
    /// Changes were computed but not committed
    pub dry_run: bool,
    /// Store was already at the target version; nothing ran
    pub skipped: bool,
    /// Per-record-type counts
    pub entry_counts: BTreeMap<String, MigrationCounts>,
    /// Checks run against the staged state before commit
    pub verification: MigrationVerification,
}

/// Counts for a single record type
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MigrationCounts {
    /// Records read from the legacy shape
    pub exported: u64,
    /// Records converted to the current shape
    pub transformed: u64,
    /// Records written back
    pub imported: u64,
}

/// Post-migration checks
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct MigrationVerification {
    /// False once any check has failed
    pub passed: bool,
    /// Count checks keyed by record type
    pub count_checks: BTreeMap<String, CountCheck>,
    /// Free-form notes, including failure reasons
    pub notes: Vec<String>,
}

/// Expected vs actual record count
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct CountCheck {
    pub expected: u64,
    pub actual: u64,
    pub passed: bool,
}

impl MigrationReport {
    pub fn new(module: &str, source_version: u64, target_version: u64) -> Self {
        Self {
            module: module.to_string(),
            source_version,
            target_version,
            started_at: Utc::now().to_rfc3339(),
            completed_at: None,
            dry_run: false,
            skipped: false,
            entry_counts: BTreeMap::new(),
            verification: MigrationVerification::passed(),
        }
    }

    pub fn record_counts(&mut self, record_type: &str, counts: MigrationCounts) {
        self.entry_counts.insert(record_type.to_string(), counts);
    }

    pub fn complete(&mut self) {
        self.completed_at = Some(Utc::now().to_rfc3339());
    }

    pub fn is_success(&self) -> bool {
        self.verification.passed
    }

    pub fn total_imported(&self) -> u64 {
        self.entry_counts.values().map(|c| c.imported).sum()
    }
}

impl MigrationVerification {
    /// A verification with no checks recorded yet
    pub fn passed() -> Self {
        Self {
            passed: true,
            count_checks: BTreeMap::new(),
            notes: Vec::new(),
        }
    }

    /// Record a count check; counts must match exactly
    pub fn add_count_check(&mut self, record_type: &str, expected: u64, actual: u64) {
        let passed = expected == actual;
        self.count_checks.insert(
            record_type.to_string(),
            CountCheck {
                expected,
                actual,
                passed,
            },
        );
        self.passed = self.passed && passed;
    }

    pub fn add_note(&mut self, note: String) {
        self.notes.push(note);
    }

    /// Record a failed check that has no count attached
    pub fn fail(&mut self, note: String) {
        self.passed = false;
        self.notes.push(note);
    }
}
