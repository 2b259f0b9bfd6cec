//! Error types for retention runs

use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

/// Configuration could not be read, parsed or resolved
///
/// Fatal: a run never starts with a partial configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file {}: {source}", path.display())]
    FileRead {
        /// Config file path
        path: PathBuf,
        /// Underlying error
        source: std::io::Error,
    },

    /// Failed to parse JSON
    #[error("Failed to parse config JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Failed to parse TOML
    #[error("Failed to parse config TOML: {0}")]
    Toml(#[from] toml::de::Error),

    /// Values parsed but are not usable
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Errors that can end or skip part of a run
#[derive(Error, Debug)]
pub enum JanitorError {
    /// Configuration error (fatal)
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A base path is missing or not a directory (that path is skipped)
    #[error("Invalid path: {}: {reason}", path.display())]
    InvalidPath {
        /// Configured base path
        path: PathBuf,
        /// Why it could not be scanned
        reason: String,
    },

    /// Worker error (tokio runtime issues)
    #[error("Worker error: {0}")]
    Worker(String),
}

/// Failure confined to a single entry
///
/// None of these stop a run; each is recorded in the run summary and the
/// next entry is processed.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "error", rename_all = "snake_case")]
pub enum EntryError {
    /// Metadata of a child could not be read; the entry was skipped
    #[error("Cannot read {}: {reason}", path.display())]
    Unreadable {
        /// Entry path
        path: PathBuf,
        /// Underlying error text
        reason: String,
    },

    /// The archive could not be written; the source was left intact
    #[error("Failed to archive {} into {}: {reason}", directory.display(), archive.display())]
    ArchiveCreation {
        /// Directory that was not archived
        directory: PathBuf,
        /// Archive that was not created
        archive: PathBuf,
        /// Underlying error text
        reason: String,
    },

    /// The archive was written but the source directory could not be removed
    #[error("Archived {} but failed to delete it: {reason}", directory.display())]
    SourceCleanup {
        /// Directory still on disk
        directory: PathBuf,
        /// Archive that was created and kept
        archive: PathBuf,
        /// Underlying error text
        reason: String,
    },

    /// An expired archive could not be deleted
    #[error("Failed to delete expired archive {}: {reason}", archive.display())]
    ArchiveDeletion {
        /// Archive still on disk
        archive: PathBuf,
        /// Underlying error text
        reason: String,
    },

    /// A stale staging file could not be removed
    #[error("Failed to remove staging file {}: {reason}", path.display())]
    StagingCleanup {
        /// Staging file still on disk
        path: PathBuf,
        /// Underlying error text
        reason: String,
    },
}

impl EntryError {
    /// Short kind name used in reports
    pub fn kind(&self) -> &'static str {
        match self {
            EntryError::Unreadable { .. } => "unreadable",
            EntryError::ArchiveCreation { .. } => "archive_creation",
            EntryError::SourceCleanup { .. } => "source_cleanup",
            EntryError::ArchiveDeletion { .. } => "archive_deletion",
            EntryError::StagingCleanup { .. } => "staging_cleanup",
        }
    }

    /// Path the failure concerns
    pub fn path(&self) -> &std::path::Path {
        match self {
            EntryError::Unreadable { path, .. } => path,
            EntryError::ArchiveCreation { directory, .. } => directory,
            EntryError::SourceCleanup { directory, .. } => directory,
            EntryError::ArchiveDeletion { archive, .. } => archive,
            EntryError::StagingCleanup { path, .. } => path,
        }
    }
}
