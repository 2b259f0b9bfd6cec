//! Logging sink for a run.
//!
//! Status lines go through `tracing`. The sink is either stderr or a log file
//! that is truncated when opened; the returned guard syncs the file when it
//! goes out of scope, whichever way the run ended.

use crate::error::{CliError, Result};
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Keeps the log sink open for the duration of a run.
#[derive(Debug)]
pub struct LoggingGuard {
    file: Option<(PathBuf, Arc<File>)>,
}

impl LoggingGuard {
    /// Path of the log file, if logging to a file.
    pub fn log_file(&self) -> Option<&Path> {
        self.file.as_ref().map(|(path, _)| path.as_path())
    }
}

impl Drop for LoggingGuard {
    fn drop(&mut self) {
        if let Some((path, file)) = &self.file {
            if let Err(e) = file.sync_all() {
                eprintln!("Failed to sync log file {}: {}", path.display(), e);
            }
        }
    }
}

/// Install the global subscriber.
///
/// `RUST_LOG` takes precedence over `default_level`. ANSI colors are only
/// used on stderr.
pub fn init_logging(log_file: Option<&Path>, default_level: &str, ansi: bool) -> Result<LoggingGuard> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    match log_file {
        Some(path) => {
            let file = File::create(path)
                .map(Arc::new)
                .map_err(|e| CliError::Logging(format!("cannot open {}: {}", path.display(), e)))?;

            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(Arc::clone(&file))
                .with_ansi(false)
                .with_target(false)
                .try_init()
                .map_err(|e| CliError::Logging(e.to_string()))?;

            Ok(LoggingGuard {
                file: Some((path.to_path_buf(), file)),
            })
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .with_ansi(ansi)
                .with_target(false)
                .try_init()
                .map_err(|e| CliError::Logging(e.to_string()))?;

            Ok(LoggingGuard { file: None })
        }
    }
}
