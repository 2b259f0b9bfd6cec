//! Logsweep Archive Layer
//!
//! Implements the [`RetentionFs`] trait on the local filesystem.
//!
//! # Architecture
//!
//! - `walkdir` for the recursive walk of a source directory
//! - `zip` (Deflate) for the archive container
//! - `tempfile` to stage each archive next to its destination and publish it
//!   with no-clobber semantics, so a failed or interrupted write never leaves
//!   a truncated archive behind
//!
//! # Examples
//!
//! ```no_run
//! use logsweep_archive::LocalFs;
//! use logsweep_domain::RetentionFs;
//! use std::path::Path;
//!
//! let fs = LocalFs::new();
//! let stats = fs.compress_dir(Path::new("logs/2024-01-01"), Path::new("logs/2024-01-01.zip")).unwrap();
//! println!("archived {} files", stats.files);
//! ```

#![warn(missing_docs)]

mod writer;

use logsweep_domain::{ArchiveStats, DirEntry, FileType, RetentionFs};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use thiserror::Error;

pub use writer::{is_staging_file, write_zip, STAGING_PREFIX, STAGING_SUFFIX};

/// Errors that can occur during filesystem operations
#[derive(Error, Debug)]
pub enum FsError {
    /// Plain I/O failure on a path
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        /// Path being accessed
        path: PathBuf,
        /// Underlying error
        source: io::Error,
    },

    /// Failure while walking a source directory
    #[error("Failed to walk {}: {source}", path.display())]
    Walk {
        /// Directory being walked
        path: PathBuf,
        /// Underlying error
        source: walkdir::Error,
    },

    /// Failure in the zip encoder
    #[error("Zip error for {}: {source}", path.display())]
    Zip {
        /// Archive being written
        path: PathBuf,
        /// Underlying error
        source: zip::result::ZipError,
    },

    /// The finished archive could not be moved into place
    #[error("Failed to publish archive {}: {source}", path.display())]
    Persist {
        /// Destination archive path
        path: PathBuf,
        /// Underlying error
        source: io::Error,
    },

    /// The source or destination cannot be archived as given
    #[error("Cannot archive {}: {reason}", path.display())]
    InvalidSource {
        /// Offending path
        path: PathBuf,
        /// Why it was rejected
        reason: String,
    },
}

impl FsError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        FsError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Local filesystem implementation of [`RetentionFs`]
///
/// Stateless; cheap to clone and safe to share between threads.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFs;

impl LocalFs {
    /// Create a new local filesystem handle
    pub fn new() -> Self {
        Self
    }
}

impl RetentionFs for LocalFs {
    type Error = FsError;

    fn list_dir(&self, path: &Path) -> Result<Vec<DirEntry>, Self::Error> {
        let mut entries = Vec::new();
        for entry in fs::read_dir(path).map_err(|e| FsError::io(path, e))? {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!("Skipping unreadable entry in {}: {}", path.display(), e);
                    continue;
                }
            };

            // file_type() does not follow symlinks
            let file_type = match entry.file_type() {
                Ok(ft) if ft.is_dir() => FileType::Directory,
                Ok(ft) if ft.is_file() => FileType::File,
                Ok(_) => FileType::Other,
                Err(e) => {
                    tracing::warn!("Cannot read type of {}: {}", entry.path().display(), e);
                    FileType::Other
                }
            };
            entries.push(DirEntry::new(entry.path(), file_type));
        }
        Ok(entries)
    }

    fn modified(&self, path: &Path) -> Result<SystemTime, Self::Error> {
        fs::symlink_metadata(path)
            .and_then(|meta| meta.modified())
            .map_err(|e| FsError::io(path, e))
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn exists(&self, path: &Path) -> bool {
        match fs::symlink_metadata(path) {
            Ok(_) => true,
            Err(e) if e.kind() == io::ErrorKind::NotFound => false,
            // Unknown counts as present: never risk writing over something
            Err(_) => true,
        }
    }

    fn compress_dir(&self, source: &Path, destination: &Path) -> Result<ArchiveStats, Self::Error> {
        write_zip(source, destination)
    }

    fn remove_dir_all(&self, path: &Path) -> Result<(), Self::Error> {
        fs::remove_dir_all(path).map_err(|e| FsError::io(path, e))
    }

    fn remove_file(&self, path: &Path) -> Result<(), Self::Error> {
        fs::remove_file(path).map_err(|e| FsError::io(path, e))
    }
}
