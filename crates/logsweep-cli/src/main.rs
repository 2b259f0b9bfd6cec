//! Logsweep CLI - archive stale log directories and expire old archives.

use clap::Parser;
use logsweep_archive::LocalFs;
use logsweep_cli::logging::init_logging;
use logsweep_cli::{Cli, CliError, Formatter};
use logsweep_domain::SystemClock;
use logsweep_janitor::{Janitor, JanitorError, RetentionConfig, RetentionWorker, RunSummary};
use std::process;
use std::time::Duration;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

async fn run() -> logsweep_cli::Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();
    let color_enabled = !cli.no_color;

    // The guard outlives every log line below and syncs the sink on drop
    let _guard = init_logging(cli.log_file.as_deref(), cli.log_level(), color_enabled)?;
    let formatter = Formatter::new(cli.format, color_enabled);

    tracing::info!("logsweep start (config: {})", cli.config.display());
    let result = execute(&cli, &formatter).await;
    match &result {
        Ok(()) => tracing::info!("logsweep end"),
        Err(e) => tracing::error!("logsweep failed: {}", e),
    }
    result
}

async fn execute(cli: &Cli, formatter: &Formatter) -> logsweep_cli::Result<()> {
    match cli.interval_minutes {
        Some(minutes) => {
            let interval = minutes
                .checked_mul(60)
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs)
                .ok_or_else(|| {
                    CliError::InvalidInput(format!("invalid --interval-minutes: {minutes}"))
                })?;

            let mut worker = RetentionWorker::new(cli.config.clone(), LocalFs::new(), interval)
                .with_dry_run(cli.dry_run);
            match cli.cycles {
                Some(cycles) => worker.run_cycles(cycles).await?,
                None => worker.run().await?,
            }

            if let Some(summary) = worker.last_summary() {
                print_summary(formatter, summary)?;
            }
        }
        None => {
            let mut config = RetentionConfig::load(&cli.config, &SystemClock)?;
            config.dry_run |= cli.dry_run;

            let summary = tokio::task::spawn_blocking(move || Janitor::local(config).run())
                .await
                .map_err(|e| JanitorError::Worker(e.to_string()))?;
            print_summary(formatter, &summary)?;
        }
    }

    Ok(())
}

fn print_summary(formatter: &Formatter, summary: &RunSummary) -> logsweep_cli::Result<()> {
    let output = formatter.format_summary(summary)?;
    if !output.is_empty() {
        println!("{}", output);
    }
    Ok(())
}
