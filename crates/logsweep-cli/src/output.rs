//! Output formatting for the CLI.

use crate::cli::CliFormat;
use crate::error::Result;
use colored::*;
use logsweep_janitor::{PathReport, PathStatus, RunSummary};
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Output formatter.
pub struct Formatter {
    format: CliFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: CliFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Format a run summary.
    pub fn format_summary(&self, summary: &RunSummary) -> Result<String> {
        match self.format {
            CliFormat::Json => Ok(serde_json::to_string_pretty(summary)?),
            CliFormat::Text => Ok(self.format_summary_text(summary)),
            CliFormat::Quiet => Ok(String::new()),
        }
    }

    /// Format a run summary as a table plus failure details.
    fn format_summary_text(&self, summary: &RunSummary) -> String {
        if summary.reports.is_empty() {
            return self.warning("No base paths configured.");
        }

        let mut builder = Builder::default();
        builder.push_record([
            "Base path", "Status", "Archived", "Skipped", "Expired", "Cleaned", "Fresh", "Planned",
            "Failed",
        ]);
        for report in &summary.reports {
            builder.push_record(row(report));
        }

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));

        let mut lines = vec![table.to_string()];

        for report in &summary.reports {
            if let PathStatus::Invalid { reason } = &report.status {
                lines.push(self.warning(&format!(
                    "Invalid path: {} ({})",
                    report.base_path.display(),
                    reason
                )));
            }
            for error in report.errors() {
                lines.push(self.error(&format!("[{}] {}", error.kind(), error)));
            }
        }

        let done = format!(
            "{} archived, {} expired, {} failed in {}ms",
            summary.total_archived(),
            summary.total_expired(),
            summary.total_failed(),
            summary.runtime_ms
        );
        if summary.has_failures() {
            lines.push(self.warning(&done));
        } else {
            lines.push(self.success(&done));
        }

        lines.join("\n")
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "yellow" => text.yellow().to_string(),
            _ => text.to_string(),
        }
    }
}

fn row(report: &PathReport) -> [String; 9] {
    let status = match report.status {
        PathStatus::Processed => "processed",
        PathStatus::Invalid { .. } => "invalid",
    };
    [
        report.base_path.display().to_string(),
        status.to_string(),
        report.archived().to_string(),
        report.skipped().to_string(),
        report.expired().to_string(),
        report.cleaned().to_string(),
        report.fresh().to_string(),
        report.planned().to_string(),
        report.failed().to_string(),
    ]
}
