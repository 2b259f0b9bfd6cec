//! Trait definitions for external interactions
//!
//! These traits define the boundary between retention policy and the
//! filesystem. Implementations live in other crates (logsweep-archive).

use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Type of a directory child, as reported without following symbolic links
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileType {
    /// A real directory
    Directory,
    /// A regular file
    File,
    /// Symbolic links, sockets, devices and anything else
    Other,
}

/// One immediate child of a listed directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    /// Full path of the child
    pub path: PathBuf,
    /// Type of the child
    pub file_type: FileType,
}

impl DirEntry {
    /// Create a new directory entry
    pub fn new(path: impl Into<PathBuf>, file_type: FileType) -> Self {
        Self {
            path: path.into(),
            file_type,
        }
    }
}

/// Result of compressing one directory
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ArchiveStats {
    /// Number of regular files written into the archive
    pub files: usize,
    /// Uncompressed bytes written into the archive
    pub bytes: u64,
}

/// Filesystem capabilities used by the retention policy
///
/// Implemented by the infrastructure layer (logsweep-archive)
pub trait RetentionFs {
    /// Error type for filesystem operations
    type Error: std::fmt::Display;

    /// List the immediate children of `path`
    fn list_dir(&self, path: &Path) -> Result<Vec<DirEntry>, Self::Error>;

    /// Modification time of `path`
    fn modified(&self, path: &Path) -> Result<SystemTime, Self::Error>;

    /// Whether `path` exists and is a directory
    fn is_dir(&self, path: &Path) -> bool;

    /// Whether anything exists at `path`
    fn exists(&self, path: &Path) -> bool;

    /// Compress `source` recursively into a new archive at `destination`
    ///
    /// Must never leave a partial file at `destination` on failure and must
    /// never overwrite an existing file there.
    fn compress_dir(&self, source: &Path, destination: &Path) -> Result<ArchiveStats, Self::Error>;

    /// Remove a directory and everything below it
    fn remove_dir_all(&self, path: &Path) -> Result<(), Self::Error>;

    /// Remove a single file
    fn remove_file(&self, path: &Path) -> Result<(), Self::Error>;
}
