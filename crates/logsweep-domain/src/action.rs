//! Action module - decisions produced by a scan

use std::path::{Path, PathBuf};

/// Decision for a single scanned entry
///
/// Produced by classification, consumed by execution. Classification never
/// touches the filesystem beyond reading metadata; every mutation is
/// carried out by whoever executes the action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LifecycleAction {
    /// Compress `source` into `destination`, then remove `source`
    ArchiveAndRemove {
        /// Stale directory to archive
        source: PathBuf,
        /// Archive file to create (must not exist yet)
        destination: PathBuf,
    },

    /// The destination archive already exists; leave everything as is
    SkipAlreadyArchived {
        /// Stale directory that was not touched
        source: PathBuf,
        /// Existing archive file
        destination: PathBuf,
    },

    /// Delete an archive file past the expiry threshold
    DeleteExpiredArchive {
        /// Archive file to delete
        archive: PathBuf,
    },

    /// Remove a staging file abandoned by an interrupted archive write
    RemoveStaleStaging {
        /// Leftover staging file
        path: PathBuf,
    },

    /// Entry is still fresh
    NoAction {
        /// Inspected entry
        path: PathBuf,
    },
}

impl LifecycleAction {
    /// Primary path this action concerns
    pub fn path(&self) -> &Path {
        match self {
            LifecycleAction::ArchiveAndRemove { source, .. } => source,
            LifecycleAction::SkipAlreadyArchived { source, .. } => source,
            LifecycleAction::DeleteExpiredArchive { archive } => archive,
            LifecycleAction::RemoveStaleStaging { path } => path,
            LifecycleAction::NoAction { path } => path,
        }
    }

    /// Whether executing this action changes the filesystem
    pub fn is_mutating(&self) -> bool {
        matches!(
            self,
            LifecycleAction::ArchiveAndRemove { .. }
                | LifecycleAction::DeleteExpiredArchive { .. }
                | LifecycleAction::RemoveStaleStaging { .. }
        )
    }
}

/// Sibling archive path for `source`: `<source-name>.<extension>`
///
/// The whole directory name is kept, dots included, so `2024.01.02`
/// maps to `2024.01.02.zip` rather than replacing the last segment.
/// Returns `None` when `source` has no final component (e.g. `/` or `..`).
pub fn archive_destination(source: &Path, extension: &str) -> Option<PathBuf> {
    let name = source.file_name()?;
    let mut file_name = name.to_os_string();
    file_name.push(".");
    file_name.push(extension);
    Some(source.with_file_name(file_name))
}
