//! Output formatters for validation reports.
//!
//! - **TTY**: coloured terminal output for humans
//! - **JSON**: the serialized report, for CI pipelines and tooling

mod json;
mod tty;

pub use json::JsonFormatter;
pub use tty::TtyFormatter;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::io::Write;

use crate::validator::ValidationReport;

/// Output format for reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Colored terminal output (default)
    #[default]
    Tty,
    /// Pretty-printed JSON
    Json,
}

/// Trait for formatting reports.
pub trait Formatter {
    /// Format the report and write to the given writer.
    fn format<W: Write>(
        &self,
        report: &ValidationReport,
        filename: &str,
        writer: &mut W,
    ) -> std::io::Result<()>;

    /// Format the report to a string.
    fn format_to_string(&self, report: &ValidationReport, filename: &str) -> String {
        let mut buf = Vec::new();
        self.format(report, filename, &mut buf).unwrap_or_default();
        String::from_utf8(buf).unwrap_or_default()
    }
}

/// Format a report using the specified output format.
pub fn format_report<W: Write>(
    report: &ValidationReport,
    filename: &str,
    format: OutputFormat,
    colors: bool,
    writer: &mut W,
) -> std::io::Result<()> {
    match format {
        OutputFormat::Tty => {
            let formatter = if colors { TtyFormatter::new() } else { TtyFormatter::no_color() };
            formatter.format(report, filename, writer)
        }
        OutputFormat::Json => JsonFormatter::new().format(report, filename, writer),
    }
}
