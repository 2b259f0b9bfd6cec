//! Scheduled worker for repeated retention runs

use crate::{Janitor, JanitorError, RetentionConfig, RunSummary};
use logsweep_domain::{RetentionFs, SystemClock};
use std::future::Future;
use std::path::PathBuf;
use tokio::time::{interval, Duration, MissedTickBehavior};

/// Background worker that runs the janitor on a schedule
///
/// Each cycle re-reads the configuration file and resolves it against the
/// current time, so every run takes its own snapshot of "now". Cycles never
/// overlap: the next tick is only awaited once the previous run finished.
///
/// # Examples
///
/// ```no_run
/// use logsweep_janitor::RetentionWorker;
/// use logsweep_archive::LocalFs;
/// use std::time::Duration;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let mut worker = RetentionWorker::new("config.json", LocalFs::new(), Duration::from_secs(3600));
///
///     // Run indefinitely (until Ctrl+C)
///     worker.run().await?;
///     Ok(())
/// }
/// ```
pub struct RetentionWorker<F> {
    config_path: PathBuf,
    fs: F,
    interval: Duration,
    force_dry_run: bool,
    run_count: usize,
    last_summary: Option<RunSummary>,
}

impl<F> RetentionWorker<F>
where
    F: RetentionFs + Clone + Send + 'static,
{
    /// Create a worker that runs every `interval`
    pub fn new(config_path: impl Into<PathBuf>, fs: F, interval: Duration) -> Self {
        Self {
            config_path: config_path.into(),
            fs,
            interval,
            force_dry_run: false,
            run_count: 0,
            last_summary: None,
        }
    }

    /// Force dry-run mode regardless of the config file
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.force_dry_run = dry_run;
        self
    }

    /// Number of completed runs
    pub fn run_count(&self) -> usize {
        self.run_count
    }

    /// Summary of the most recent completed run
    pub fn last_summary(&self) -> Option<&RunSummary> {
        self.last_summary.as_ref()
    }

    /// Load the configuration and perform one run on the blocking pool
    pub async fn run_once(&mut self) -> Result<&RunSummary, JanitorError> {
        let path = self.config_path.clone();
        let fs = self.fs.clone();
        let force_dry_run = self.force_dry_run;

        let summary = tokio::task::spawn_blocking(move || {
            let mut config = RetentionConfig::load(&path, &SystemClock)?;
            config.dry_run |= force_dry_run;
            Ok::<_, JanitorError>(Janitor::new(fs, config).run())
        })
        .await
        .map_err(|e| JanitorError::Worker(e.to_string()))??;

        self.run_count += 1;
        let summary: &RunSummary = self.last_summary.insert(summary);
        Ok(summary)
    }

    /// Run the worker indefinitely
    ///
    /// Runs at the configured interval until a shutdown signal (Ctrl+C) is
    /// received. A cycle whose configuration cannot be loaded is logged and
    /// retried on the next tick.
    pub async fn run(&mut self) -> Result<(), JanitorError> {
        self.run_until(tokio::signal::ctrl_c()).await
    }

    /// Run at the configured interval until `shutdown` completes
    ///
    /// `shutdown` is polled for the whole lifetime of the loop, so a signal
    /// that arrives while a run is in flight stops the worker as soon as
    /// that run has finished.
    pub async fn run_until<S: Future>(&mut self, shutdown: S) -> Result<(), JanitorError> {
        let mut ticker = interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tokio::pin!(shutdown);

        tracing::info!("Retention worker started (interval: {:?})", self.interval);

        loop {
            tokio::select! {
                biased;

                _ = &mut shutdown => {
                    tracing::info!("Shutdown signal received, stopping worker");
                    break;
                }
                _ = ticker.tick() => {
                    match self.run_once().await {
                        Ok(summary) => {
                            tracing::info!(
                                "Run completed: {} archived, {} expired, {} failed",
                                summary.total_archived(),
                                summary.total_expired(),
                                summary.total_failed()
                            );
                        }
                        Err(JanitorError::Config(e)) => {
                            tracing::error!("Run skipped: {}", e);
                        }
                        Err(e) => return Err(e),
                    }
                }
            }
        }

        tracing::info!("Retention worker stopped after {} runs", self.run_count);
        Ok(())
    }

    /// Run for a specific number of cycles
    ///
    /// Unlike [`run`](Self::run), a configuration failure ends the loop and
    /// is returned.
    pub async fn run_cycles(&mut self, cycles: usize) -> Result<(), JanitorError> {
        let mut ticker = interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        for cycle in 0..cycles {
            ticker.tick().await;
            tracing::debug!("Starting run {}/{}", cycle + 1, cycles);

            let summary = self.run_once().await?;
            tracing::info!(
                "Run {}/{} completed: {} archived, {} expired, {} failed",
                cycle + 1,
                cycles,
                summary.total_archived(),
                summary.total_expired(),
                summary.total_failed()
            );
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use logsweep_archive::LocalFs;
    use std::fs;
    use std::time::SystemTime;
    use tempfile::TempDir;

    fn write_config(dir: &TempDir, base: &std::path::Path) -> PathBuf {
        let config = serde_json::json!({
            "zip_dir": { "days": 1, "hours": 0, "minutes": 0 },
            "del_zip": { "days": 90, "hours": 0, "minutes": 0 },
            "base_path_list": [base],
        });
        let path = dir.path().join("config.json");
        fs::write(&path, config.to_string()).unwrap();
        path
    }

    fn age(path: &std::path::Path, secs_ago: u64) {
        let stamp = SystemTime::now() - Duration::from_secs(secs_ago);
        fs::File::open(path).unwrap().set_modified(stamp).unwrap();
    }

    #[tokio::test]
    async fn test_worker_creation() {
        let worker = RetentionWorker::new("config.json", LocalFs::new(), Duration::from_secs(60));
        assert_eq!(worker.run_count(), 0);
        assert!(worker.last_summary().is_none());
    }

    #[tokio::test]
    async fn test_run_cycles() {
        let dir = TempDir::new().unwrap();
        let base = dir.path().join("logs");
        let stale = base.join("2024-01-01");
        fs::create_dir_all(&stale).unwrap();
        fs::write(stale.join("app.log"), b"hello").unwrap();
        age(&stale, 3 * 86_400);
        let config = write_config(&dir, &base);

        let mut worker = RetentionWorker::new(config, LocalFs::new(), Duration::from_millis(10));
        worker.run_cycles(2).await.unwrap();

        assert_eq!(worker.run_count(), 2);
        assert!(base.join("2024-01-01.zip").exists());
        assert!(!stale.exists());
        // Second cycle found nothing left to do
        assert_eq!(worker.last_summary().unwrap().total_archived(), 0);
    }

    #[tokio::test]
    async fn test_forced_dry_run() {
        let dir = TempDir::new().unwrap();
        let base = dir.path().join("logs");
        let stale = base.join("old");
        fs::create_dir_all(&stale).unwrap();
        age(&stale, 3 * 86_400);
        let config = write_config(&dir, &base);

        let mut worker =
            RetentionWorker::new(config, LocalFs::new(), Duration::from_secs(60)).with_dry_run(true);
        let summary = worker.run_once().await.unwrap();

        assert_eq!(summary.total_planned(), 1);
        assert!(stale.exists());
        assert!(!base.join("old.zip").exists());
    }

    #[tokio::test]
    async fn test_run_until_stops_between_ticks() {
        let dir = TempDir::new().unwrap();
        let base = dir.path().join("logs");
        let stale = base.join("old");
        fs::create_dir_all(&stale).unwrap();
        age(&stale, 3 * 86_400);
        let config = write_config(&dir, &base);

        // First tick fires at once; the next would be an hour away
        let mut worker = RetentionWorker::new(config, LocalFs::new(), Duration::from_secs(3600));
        worker
            .run_until(tokio::time::sleep(Duration::from_millis(200)))
            .await
            .unwrap();

        assert_eq!(worker.run_count(), 1);
        assert!(base.join("old.zip").exists());
    }

    #[tokio::test]
    async fn test_pending_shutdown_wins_over_tick() {
        let mut worker =
            RetentionWorker::new("/definitely/not/here.json", LocalFs::new(), Duration::from_millis(1));
        worker.run_until(std::future::ready(())).await.unwrap();

        assert_eq!(worker.run_count(), 0);
    }

    #[tokio::test]
    async fn test_config_error_does_not_stop_run_until() {
        let mut worker =
            RetentionWorker::new("/definitely/not/here.json", LocalFs::new(), Duration::from_millis(10));
        let result = worker
            .run_until(tokio::time::sleep(Duration::from_millis(50)))
            .await;

        assert!(result.is_ok());
        assert_eq!(worker.run_count(), 0);
    }

    #[tokio::test]
    async fn test_missing_config_fails_cycle() {
        let mut worker = RetentionWorker::new(
            "/definitely/not/here.json",
            LocalFs::new(),
            Duration::from_secs(60),
        );
        let result = worker.run_cycles(1).await;

        assert!(matches!(result, Err(JanitorError::Config(_))));
        assert_eq!(worker.run_count(), 0);
    }
}
