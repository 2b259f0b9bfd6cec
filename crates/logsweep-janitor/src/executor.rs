//! Archive lifecycle executor: carries out scan decisions one entry at a time

use crate::{EntryError, EntryOutcome};
use logsweep_domain::{LifecycleAction, RetentionFs};
use std::path::PathBuf;

/// Executes [`LifecycleAction`]s against a filesystem
///
/// Every action yields exactly one [`EntryOutcome`]; failures are returned as
/// [`EntryOutcome::Failed`] and never abort the caller. A source directory is
/// only ever removed after its archive was completely written.
pub struct Executor<'a, F: RetentionFs> {
    fs: &'a F,
    dry_run: bool,
}

impl<'a, F: RetentionFs> Executor<'a, F> {
    /// Create an executor; with `dry_run` nothing is mutated
    pub fn new(fs: &'a F, dry_run: bool) -> Self {
        Self { fs, dry_run }
    }

    /// Carry out one action
    pub fn execute(&self, action: LifecycleAction) -> EntryOutcome {
        match action {
            LifecycleAction::ArchiveAndRemove {
                source,
                destination,
            } => self.archive_and_remove(source, destination),
            LifecycleAction::SkipAlreadyArchived {
                source,
                destination,
            } => {
                tracing::info!("Skip (already archived): {}", destination.display());
                EntryOutcome::AlreadyArchived {
                    source,
                    archive: destination,
                }
            }
            LifecycleAction::DeleteExpiredArchive { archive } => self.delete_expired(archive),
            LifecycleAction::RemoveStaleStaging { path } => self.remove_staging(path),
            LifecycleAction::NoAction { path } => {
                tracing::debug!("Fresh: {}", path.display());
                EntryOutcome::Fresh { path }
            }
        }
    }

    fn archive_and_remove(&self, source: PathBuf, destination: PathBuf) -> EntryOutcome {
        if self.dry_run {
            tracing::info!(
                "DRY RUN: Would archive {} into {} and delete it",
                source.display(),
                destination.display()
            );
            return EntryOutcome::WouldArchive {
                source,
                archive: destination,
            };
        }

        // The destination may have appeared since classification
        if self.fs.exists(&destination) {
            tracing::info!("Skip (already archived): {}", destination.display());
            return EntryOutcome::AlreadyArchived {
                source,
                archive: destination,
            };
        }

        let stats = match self.fs.compress_dir(&source, &destination) {
            Ok(stats) => stats,
            Err(e) => {
                tracing::warn!("Error archiving {}: {}", source.display(), e);
                return EntryOutcome::Failed(EntryError::ArchiveCreation {
                    directory: source,
                    archive: destination,
                    reason: e.to_string(),
                });
            }
        };
        tracing::info!(
            "Archived: {} -> {} ({} files)",
            source.display(),
            destination.display(),
            stats.files
        );

        if let Err(e) = self.fs.remove_dir_all(&source) {
            // The archive is complete; keep it so the next run skips this entry
            tracing::warn!("Error deleting {}: {}", source.display(), e);
            return EntryOutcome::Failed(EntryError::SourceCleanup {
                directory: source,
                archive: destination,
                reason: e.to_string(),
            });
        }
        tracing::info!("Deleted: {}", source.display());

        EntryOutcome::Archived {
            source,
            archive: destination,
            files: stats.files,
            bytes: stats.bytes,
        }
    }

    fn delete_expired(&self, archive: PathBuf) -> EntryOutcome {
        if self.dry_run {
            tracing::info!("DRY RUN: Would delete expired archive {}", archive.display());
            return EntryOutcome::WouldDelete { archive };
        }

        match self.fs.remove_file(&archive) {
            Ok(()) => {
                tracing::info!("Deleted expired archive: {}", archive.display());
                EntryOutcome::ExpiredDeleted { archive }
            }
            Err(e) => {
                tracing::warn!("Error deleting expired archive {}: {}", archive.display(), e);
                EntryOutcome::Failed(EntryError::ArchiveDeletion {
                    archive,
                    reason: e.to_string(),
                })
            }
        }
    }

    fn remove_staging(&self, path: PathBuf) -> EntryOutcome {
        if self.dry_run {
            tracing::info!("DRY RUN: Would remove stale staging file {}", path.display());
            return EntryOutcome::WouldRemoveStaging { path };
        }

        match self.fs.remove_file(&path) {
            Ok(()) => {
                tracing::info!("Removed stale staging file: {}", path.display());
                EntryOutcome::StagingRemoved { path }
            }
            Err(e) => {
                tracing::warn!("Error removing staging file {}: {}", path.display(), e);
                EntryOutcome::Failed(EntryError::StagingCleanup {
                    path,
                    reason: e.to_string(),
                })
            }
        }
    }
}
