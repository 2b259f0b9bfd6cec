//! Logsweep CLI library.
//!
//! This library provides the pieces of the `logsweep` binary: argument
//! parsing, the logging sink, and summary formatting.

pub mod cli;
pub mod error;
pub mod logging;
pub mod output;

pub use cli::{Cli, CliFormat};
pub use error::{CliError, Result};
pub use logging::LoggingGuard;
pub use output::Formatter;
