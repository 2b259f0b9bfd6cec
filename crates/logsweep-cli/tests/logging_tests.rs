//! Logging sink tests.
//!
//! The global subscriber can only be installed once per process, so this
//! file holds a single test.

use logsweep_cli::logging::init_logging;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_file_sink_is_truncated_and_flushed() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("debug.log");
    fs::write(&path, "stale content from a previous run\n").unwrap();

    {
        let guard = init_logging(Some(&path), "info", false).unwrap();
        assert_eq!(guard.log_file(), Some(path.as_path()));
        tracing::info!("Processing: /var/log/app");
        tracing::debug!("hidden at info level");
    }

    let contents = fs::read_to_string(&path).unwrap();
    assert!(!contents.contains("stale content"));
    assert!(contents.contains("Processing: /var/log/app"));
    assert!(!contents.contains("hidden at info level"));

    // A second subscriber cannot be installed
    assert!(init_logging(None, "info", false).is_err());
}
