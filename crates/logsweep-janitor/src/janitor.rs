//! Core run loop: every base path, every entry, never stopping early

use crate::{EntryOutcome, Executor, JanitorError, PathReport, RetentionConfig, RunSummary, Scanner};
use logsweep_archive::LocalFs;
use logsweep_domain::RetentionFs;
use std::path::Path;
use std::time::Instant;

/// Retention janitor for a set of base paths
///
/// Responsible for:
/// - Scanning each configured base path in order
/// - Archiving and removing stale subdirectories
/// - Deleting expired archives
/// - Collecting one outcome per entry into a [`RunSummary`]
///
/// # Examples
///
/// ```no_run
/// use logsweep_janitor::{Janitor, RetentionConfig};
/// use logsweep_domain::SystemClock;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = RetentionConfig::load("config.json", &SystemClock)?;
/// let janitor = Janitor::local(config);
///
/// let summary = janitor.run();
/// println!("{}", summary.summary());
/// # Ok(())
/// # }
/// ```
pub struct Janitor<F: RetentionFs> {
    fs: F,
    config: RetentionConfig,
}

impl Janitor<LocalFs> {
    /// Create a janitor over the local filesystem
    pub fn local(config: RetentionConfig) -> Self {
        Self::new(LocalFs::new(), config)
    }
}

impl<F: RetentionFs> Janitor<F> {
    /// Create a janitor with the given filesystem and resolved configuration
    pub fn new(fs: F, config: RetentionConfig) -> Self {
        Self { fs, config }
    }

    /// Get a reference to the resolved configuration
    pub fn config(&self) -> &RetentionConfig {
        &self.config
    }

    /// Get a reference to the filesystem
    pub fn fs(&self) -> &F {
        &self.fs
    }

    /// Process every configured base path
    ///
    /// Never fails: invalid base paths and per-entry errors are recorded in
    /// the returned summary and the run moves on.
    pub fn run(&self) -> RunSummary {
        let start = Instant::now();
        let mut summary = RunSummary::new();
        summary.started_at = Some(self.config.resolved_at);

        tracing::debug!(
            "Thresholds: archive <= {:?}, expire < {:?}",
            self.config.archive_threshold,
            self.config.expiry_threshold
        );

        for base_path in &self.config.base_paths {
            summary.reports.push(self.process_base_path(base_path));
        }

        summary.runtime_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
        summary
    }

    /// Scan one base path and execute every decision
    pub fn process_base_path(&self, base_path: &Path) -> PathReport {
        let scanner = Scanner::new(&self.fs, &self.config);
        let scan = match scanner.scan(base_path) {
            Ok(scan) => scan,
            Err(JanitorError::InvalidPath { path, reason }) => {
                tracing::warn!("Invalid path: {} ({})", path.display(), reason);
                return PathReport::invalid(path, reason);
            }
            Err(e) => {
                tracing::warn!("Invalid path: {} ({})", base_path.display(), e);
                return PathReport::invalid(base_path, e.to_string());
            }
        };

        tracing::info!("Processing: {}", base_path.display());
        let executor = Executor::new(&self.fs, self.config.dry_run);
        let mut report = PathReport::processed(base_path);

        // Executing while iterating lets the archive pass see this run's archives
        for decision in scan {
            let outcome = match decision {
                Ok(action) => executor.execute(action),
                Err(e) => EntryOutcome::Failed(e),
            };
            report.record(outcome);
        }

        tracing::info!(
            "Finished: {} ({} archived, {} skipped, {} expired, {} failed)",
            base_path.display(),
            report.archived(),
            report.skipped(),
            report.expired(),
            report.failed()
        );
        report
    }
}
