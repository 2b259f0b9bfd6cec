//! Retention scanner: classifies the children of one base directory

use crate::{EntryError, JanitorError, RetentionConfig};
use logsweep_archive::is_staging_file;
use logsweep_domain::{
    archive_destination, EntryKind, FileType, LifecycleAction, RetentionFs, ScanEntry,
};
use std::path::{Path, PathBuf};

/// Classifies directory children against a resolved configuration
///
/// Pure with respect to the filesystem: it only lists directories and reads
/// metadata. Every scan re-reads the filesystem, so results always reflect
/// the current state.
pub struct Scanner<'a, F: RetentionFs> {
    fs: &'a F,
    config: &'a RetentionConfig,
}

impl<F: RetentionFs> Clone for Scanner<'_, F> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<F: RetentionFs> Copy for Scanner<'_, F> {}

impl<'a, F: RetentionFs> Scanner<'a, F> {
    /// Create a scanner over `fs` using `config`'s thresholds
    pub fn new(fs: &'a F, config: &'a RetentionConfig) -> Self {
        Self { fs, config }
    }

    /// Start scanning `base_dir`
    ///
    /// Fails with [`JanitorError::InvalidPath`] when `base_dir` is missing,
    /// not a directory, or cannot be listed. Otherwise returns a lazy
    /// sequence: subdirectories first, then archive and staging files. The file
    /// listing is only taken once the directory pass is exhausted, so
    /// archives written earlier in the same pass are seen too.
    pub fn scan(&self, base_dir: &Path) -> Result<Scan<'a, F>, JanitorError> {
        if !self.fs.is_dir(base_dir) {
            return Err(JanitorError::InvalidPath {
                path: base_dir.to_path_buf(),
                reason: "does not exist or is not a directory".to_string(),
            });
        }

        let mut directories: Vec<PathBuf> = self
            .fs
            .list_dir(base_dir)
            .map_err(|e| JanitorError::InvalidPath {
                path: base_dir.to_path_buf(),
                reason: e.to_string(),
            })?
            .into_iter()
            .filter(|entry| entry.file_type == FileType::Directory)
            .map(|entry| entry.path)
            .collect();
        directories.sort();

        Ok(Scan {
            scanner: *self,
            base_dir: base_dir.to_path_buf(),
            directories: directories.into_iter(),
            files: None,
        })
    }

    /// Decide what to do with a subdirectory
    pub fn classify_directory(&self, entry: &ScanEntry) -> Result<LifecycleAction, EntryError> {
        if !entry.is_archivable(self.config.archive_threshold) {
            return Ok(LifecycleAction::NoAction {
                path: entry.path.clone(),
            });
        }

        let destination = archive_destination(&entry.path, &self.config.archive_extension)
            .ok_or_else(|| EntryError::Unreadable {
                path: entry.path.clone(),
                reason: "directory has no name".to_string(),
            })?;

        // Never overwrite: an existing archive means a previous run got here
        if self.fs.exists(&destination) {
            Ok(LifecycleAction::SkipAlreadyArchived {
                source: entry.path.clone(),
                destination,
            })
        } else {
            Ok(LifecycleAction::ArchiveAndRemove {
                source: entry.path.clone(),
                destination,
            })
        }
    }

    /// Decide what to do with an archive file
    pub fn classify_archive(&self, entry: &ScanEntry) -> LifecycleAction {
        if entry.is_expired(self.config.expiry_threshold) {
            LifecycleAction::DeleteExpiredArchive {
                archive: entry.path.clone(),
            }
        } else {
            LifecycleAction::NoAction {
                path: entry.path.clone(),
            }
        }
    }

    /// Decide what to do with a leftover staging file
    ///
    /// A write still in progress keeps touching its staging file, so only
    /// files as old as the archive threshold are treated as abandoned.
    pub fn classify_staging(&self, entry: &ScanEntry) -> LifecycleAction {
        if entry.is_archivable(self.config.archive_threshold) {
            LifecycleAction::RemoveStaleStaging {
                path: entry.path.clone(),
            }
        } else {
            LifecycleAction::NoAction {
                path: entry.path.clone(),
            }
        }
    }

    fn observe(&self, path: PathBuf, kind: EntryKind) -> Result<ScanEntry, EntryError> {
        match self.fs.modified(&path) {
            Ok(modified) => Ok(ScanEntry::new(path, kind, modified)),
            Err(e) => {
                tracing::warn!("Cannot read modification time of {}: {}", path.display(), e);
                Err(EntryError::Unreadable {
                    reason: e.to_string(),
                    path,
                })
            }
        }
    }

    fn list_files(&self, base_dir: &Path) -> Result<Vec<(PathBuf, EntryKind)>, EntryError> {
        let entries = self.fs.list_dir(base_dir).map_err(|e| EntryError::Unreadable {
            path: base_dir.to_path_buf(),
            reason: e.to_string(),
        })?;

        let mut files: Vec<(PathBuf, EntryKind)> = entries
            .into_iter()
            .filter(|entry| entry.file_type == FileType::File)
            .filter_map(|entry| {
                if is_staging_file(&entry.path) {
                    Some((entry.path, EntryKind::Staging))
                } else if self.config.is_archive_file(&entry.path) {
                    Some((entry.path, EntryKind::Archive))
                } else {
                    None
                }
            })
            .collect();
        files.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(files)
    }
}

/// Lazy sequence of decisions for one base directory
///
/// Finite and not restartable; scan again to re-read the filesystem.
pub struct Scan<'a, F: RetentionFs> {
    scanner: Scanner<'a, F>,
    base_dir: PathBuf,
    directories: std::vec::IntoIter<PathBuf>,
    files: Option<std::vec::IntoIter<(PathBuf, EntryKind)>>,
}

impl<F: RetentionFs> Scan<'_, F> {
    /// Base directory being scanned
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }
}

impl<F: RetentionFs> Iterator for Scan<'_, F> {
    type Item = Result<LifecycleAction, EntryError>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(dir) = self.directories.next() {
            let action = self
                .scanner
                .observe(dir, EntryKind::Directory)
                .and_then(|entry| self.scanner.classify_directory(&entry));
            return Some(action);
        }

        if self.files.is_none() {
            match self.scanner.list_files(&self.base_dir) {
                Ok(list) => self.files = Some(list.into_iter()),
                Err(e) => {
                    self.files = Some(Vec::new().into_iter());
                    return Some(Err(e));
                }
            }
        }

        let files = self.files.as_mut()?;
        loop {
            let (path, kind) = files.next()?;
            let entry = match self.scanner.observe(path, kind) {
                Ok(entry) => entry,
                Err(e) => return Some(Err(e)),
            };
            let action = match kind {
                EntryKind::Staging => self.scanner.classify_staging(&entry),
                _ => self.scanner.classify_archive(&entry),
            };
            match action {
                LifecycleAction::NoAction { path } => {
                    tracing::debug!("Keeping {}: {}", kind.as_str(), path.display());
                }
                action => return Some(Ok(action)),
            }
        }
    }
}
