//! Per-entry outcomes and the run summary

use crate::EntryError;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// What happened to one entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum EntryOutcome {
    /// Archive written and source directory removed
    Archived {
        /// Removed directory
        source: PathBuf,
        /// Created archive
        archive: PathBuf,
        /// Files written into the archive
        files: usize,
        /// Uncompressed bytes written into the archive
        bytes: u64,
    },

    /// Destination archive already existed; nothing touched
    AlreadyArchived {
        /// Directory left in place
        source: PathBuf,
        /// Existing archive
        archive: PathBuf,
    },

    /// Expired archive deleted
    ExpiredDeleted {
        /// Deleted archive
        archive: PathBuf,
    },

    /// Staging file from an interrupted archive write removed
    StagingRemoved {
        /// Removed staging file
        path: PathBuf,
    },

    /// Directory is newer than the archive-age threshold
    Fresh {
        /// Inspected directory
        path: PathBuf,
    },

    /// Dry run: this directory would be archived and removed
    WouldArchive {
        /// Stale directory
        source: PathBuf,
        /// Archive that would be written
        archive: PathBuf,
    },

    /// Dry run: this archive would be deleted
    WouldDelete {
        /// Expired archive
        archive: PathBuf,
    },

    /// Dry run: this staging file would be removed
    WouldRemoveStaging {
        /// Stale staging file
        path: PathBuf,
    },

    /// The entry failed; see the error
    Failed(EntryError),
}

impl EntryOutcome {
    /// Whether this outcome is a failure
    pub fn is_failure(&self) -> bool {
        matches!(self, EntryOutcome::Failed(_))
    }
}

/// Whether a base path could be scanned
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PathStatus {
    /// The base path was scanned
    Processed,
    /// The base path was skipped
    Invalid {
        /// Why it could not be scanned
        reason: String,
    },
}

/// Outcomes for one configured base path
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PathReport {
    /// Configured base path
    pub base_path: PathBuf,
    /// Scan status
    pub status: PathStatus,
    /// One outcome per entry, in processing order
    pub outcomes: Vec<EntryOutcome>,
}

impl PathReport {
    /// Report for a base path that is about to be processed
    pub fn processed(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
            status: PathStatus::Processed,
            outcomes: Vec::new(),
        }
    }

    /// Report for a base path that was skipped
    pub fn invalid(base_path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self {
            base_path: base_path.into(),
            status: PathStatus::Invalid {
                reason: reason.into(),
            },
            outcomes: Vec::new(),
        }
    }

    /// Record an entry outcome
    pub fn record(&mut self, outcome: EntryOutcome) {
        self.outcomes.push(outcome);
    }

    /// Whether the base path was skipped
    pub fn is_invalid(&self) -> bool {
        matches!(self.status, PathStatus::Invalid { .. })
    }

    fn count(&self, pred: impl Fn(&EntryOutcome) -> bool) -> usize {
        self.outcomes.iter().filter(|o| pred(o)).count()
    }

    /// Directories archived and removed
    pub fn archived(&self) -> usize {
        self.count(|o| matches!(o, EntryOutcome::Archived { .. }))
    }

    /// Directories skipped because their archive already existed
    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, EntryOutcome::AlreadyArchived { .. }))
    }

    /// Expired archives deleted
    pub fn expired(&self) -> usize {
        self.count(|o| matches!(o, EntryOutcome::ExpiredDeleted { .. }))
    }

    /// Leftover staging files removed
    pub fn cleaned(&self) -> usize {
        self.count(|o| matches!(o, EntryOutcome::StagingRemoved { .. }))
    }

    /// Directories still fresh
    pub fn fresh(&self) -> usize {
        self.count(|o| matches!(o, EntryOutcome::Fresh { .. }))
    }

    /// Dry-run actions that were planned but not carried out
    pub fn planned(&self) -> usize {
        self.count(|o| {
            matches!(
                o,
                EntryOutcome::WouldArchive { .. }
                    | EntryOutcome::WouldDelete { .. }
                    | EntryOutcome::WouldRemoveStaging { .. }
            )
        })
    }

    /// Failed entries
    pub fn failed(&self) -> usize {
        self.count(EntryOutcome::is_failure)
    }

    /// Iterate over the entry errors
    pub fn errors(&self) -> impl Iterator<Item = &EntryError> {
        self.outcomes.iter().filter_map(|o| match o {
            EntryOutcome::Failed(e) => Some(e),
            _ => None,
        })
    }
}

/// Everything that happened during one run
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    /// One report per configured base path, in configured order
    pub reports: Vec<PathReport>,

    /// When the run started
    #[serde(skip)]
    pub started_at: Option<SystemTime>,

    /// Wall-clock duration of the run in milliseconds
    pub runtime_ms: u64,
}

impl Default for RunSummary {
    fn default() -> Self {
        Self::new()
    }
}

impl RunSummary {
    /// Create an empty summary
    pub fn new() -> Self {
        Self {
            reports: Vec::new(),
            started_at: None,
            runtime_ms: 0,
        }
    }

    /// Report for `base_path`, if it was part of the run
    pub fn report(&self, base_path: &Path) -> Option<&PathReport> {
        self.reports.iter().find(|r| r.base_path == base_path)
    }

    /// Every outcome across all base paths
    pub fn outcomes(&self) -> impl Iterator<Item = &EntryOutcome> {
        self.reports.iter().flat_map(|r| r.outcomes.iter())
    }

    /// Total directories archived
    pub fn total_archived(&self) -> usize {
        self.reports.iter().map(PathReport::archived).sum()
    }

    /// Total skips due to existing archives
    pub fn total_skipped(&self) -> usize {
        self.reports.iter().map(PathReport::skipped).sum()
    }

    /// Total expired archives deleted
    pub fn total_expired(&self) -> usize {
        self.reports.iter().map(PathReport::expired).sum()
    }

    /// Total staging files removed
    pub fn total_cleaned(&self) -> usize {
        self.reports.iter().map(PathReport::cleaned).sum()
    }

    /// Total fresh directories
    pub fn total_fresh(&self) -> usize {
        self.reports.iter().map(PathReport::fresh).sum()
    }

    /// Total dry-run actions
    pub fn total_planned(&self) -> usize {
        self.reports.iter().map(PathReport::planned).sum()
    }

    /// Total failed entries
    pub fn total_failed(&self) -> usize {
        self.reports.iter().map(PathReport::failed).sum()
    }

    /// Base paths that could not be scanned
    pub fn invalid_paths(&self) -> Vec<&Path> {
        self.reports
            .iter()
            .filter(|r| r.is_invalid())
            .map(|r| r.base_path.as_path())
            .collect()
    }

    /// Whether any entry failed or any base path was invalid
    pub fn has_failures(&self) -> bool {
        self.total_failed() > 0 || self.reports.iter().any(PathReport::is_invalid)
    }

    /// Generate a summary report of the run
    pub fn summary(&self) -> String {
        let mut lines = vec![
            "Retention Run Summary".to_string(),
            "=====================".to_string(),
            format!("Base paths: {}", self.reports.len()),
            format!("Runtime: {}ms", self.runtime_ms),
            String::new(),
            format!("Archived: {}", self.total_archived()),
            format!("Already archived: {}", self.total_skipped()),
            format!("Expired archives deleted: {}", self.total_expired()),
            format!("Fresh: {}", self.total_fresh()),
        ];

        if self.total_cleaned() > 0 {
            lines.push(format!("Staging files removed: {}", self.total_cleaned()));
        }

        if self.total_planned() > 0 {
            lines.push(format!("Planned (dry run): {}", self.total_planned()));
        }

        let invalid = self.invalid_paths();
        if !invalid.is_empty() {
            lines.push(String::new());
            lines.push("Invalid paths:".to_string());
            for path in invalid {
                lines.push(format!("  {}", path.display()));
            }
        }

        if self.total_failed() > 0 {
            lines.push(String::new());
            lines.push(format!("Failures: {}", self.total_failed()));
            for error in self.reports.iter().flat_map(PathReport::errors) {
                lines.push(format!("  [{}] {}", error.kind(), error));
            }
        }

        lines.join("\n")
    }
}
