//! Logsweep Janitor
//!
//! Retention policy for log directories: archive stale subdirectories,
//! remove them once archived, and delete archives past their expiry.
//!
//! # Overview
//!
//! A run is a pipeline per configured base path:
//! - **Configuration resolution**: two age offsets become two absolute
//!   cutoffs, both derived from one observation of "now"
//! - **Scanning**: immediate subdirectories and archive files are classified
//!   into [`LifecycleAction`](logsweep_domain::LifecycleAction)s
//! - **Execution**: each action is carried out with per-entry failure
//!   isolation; a source directory is only removed after its archive is
//!   complete, and an existing archive is never overwritten
//!
//! Re-running against the same filesystem state is a no-op: every decision
//! is derived from current metadata and existing archives short-circuit to
//! a skip.
//!
//! # Usage
//!
//! ## One-time Run
//!
//! ```no_run
//! use logsweep_janitor::{Janitor, RetentionConfig};
//! use logsweep_domain::SystemClock;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = RetentionConfig::load("config.json", &SystemClock)?;
//! let summary = Janitor::local(config).run();
//!
//! println!("Archived: {}", summary.total_archived());
//! println!("Expired: {}", summary.total_expired());
//! println!("\n{}", summary.summary());
//! # Ok(())
//! # }
//! ```
//!
//! ## Scheduled Worker
//!
//! ```no_run
//! use logsweep_janitor::RetentionWorker;
//! use logsweep_archive::LocalFs;
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut worker = RetentionWorker::new("config.json", LocalFs::new(), Duration::from_secs(3600));
//!     worker.run().await?;
//!     Ok(())
//! }
//! ```
//!
//! # Configuration
//!
//! ```json
//! {
//!   "zip_dir":  { "days": 1,  "hours": 0, "minutes": 0 },
//!   "del_zip":  { "days": 90, "hours": 0, "minutes": 0 },
//!   "base_path_list": ["/var/log/app"],
//!   "archive_extension": "zip",
//!   "dry_run": false
//! }
//! ```

#![warn(missing_docs)]

mod config;
mod error;
mod executor;
mod janitor;
mod scanner;
mod summary;
mod worker;

#[cfg(test)]
mod testing;

pub use config::{AgeOffset, RetentionConfig, RetentionSettings};
pub use error::{ConfigError, EntryError, JanitorError};
pub use executor::Executor;
pub use janitor::Janitor;
pub use scanner::{Scan, Scanner};
pub use summary::{EntryOutcome, PathReport, PathStatus, RunSummary};
pub use worker::RetentionWorker;
