//! Entry module - filesystem objects observed during a scan

use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Kind of object a scan looks at
///
/// Only immediate children of a base path are considered:
/// - Directory: a candidate for archiving
/// - Archive: a previously written archive file, candidate for expiry
/// - Staging: a partial archive left behind by an interrupted run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    /// A subdirectory of the base path
    Directory,

    /// An archive file directly under the base path
    Archive,

    /// A leftover staging file from an archive write that never finished
    Staging,
}

impl EntryKind {
    /// Get the kind name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryKind::Directory => "directory",
            EntryKind::Archive => "archive",
            EntryKind::Staging => "staging",
        }
    }
}

/// A filesystem object and its modification time at observation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanEntry {
    /// Full path of the entry
    pub path: PathBuf,

    /// Directory or archive file
    pub kind: EntryKind,

    /// Modification time read from the filesystem
    pub modified: SystemTime,
}

impl ScanEntry {
    /// Create a new scan entry
    pub fn new(path: impl Into<PathBuf>, kind: EntryKind, modified: SystemTime) -> Self {
        Self {
            path: path.into(),
            kind,
            modified,
        }
    }

    /// Get the entry path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the entry was last modified at or before `threshold`
    ///
    /// The bound is inclusive: an entry modified exactly at the threshold
    /// is eligible for archiving.
    pub fn is_archivable(&self, threshold: SystemTime) -> bool {
        self.modified <= threshold
    }

    /// Whether the entry was last modified strictly before `threshold`
    ///
    /// The bound is exclusive: an archive modified exactly at the threshold
    /// is kept.
    pub fn is_expired(&self, threshold: SystemTime) -> bool {
        self.modified < threshold
    }
}
