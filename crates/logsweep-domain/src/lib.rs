//! Logsweep Domain Layer
//!
//! This crate contains the retention model shared by every other crate.
//! It has no external dependencies and defines the value types, decisions
//! and trait interfaces that the infrastructure and service layers build on.
//!
//! ## Key Concepts
//!
//! - **Scan entry**: a directory or archive file observed under a base path,
//!   together with its modification time
//! - **Lifecycle action**: the decision taken for one entry (archive, skip,
//!   expire, or nothing)
//! - **Archive-age threshold**: directories modified at or before it are archived
//! - **Expiry threshold**: archives modified strictly before it are deleted
//!
//! ## Architecture
//!
//! - No external crate dependencies
//! - Pure decision logic only
//! - Filesystem access lives behind [`traits::RetentionFs`]
//! - Time is observed through [`clock::Clock`] so one run sees one "now"

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod action;
pub mod clock;
pub mod entry;
pub mod traits;

// Re-exports for convenience
pub use action::{archive_destination, LifecycleAction};
pub use clock::{Clock, FixedClock, SystemClock};
pub use entry::{EntryKind, ScanEntry};
pub use traits::{ArchiveStats, DirEntry, FileType, RetentionFs};
