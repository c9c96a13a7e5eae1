//! JSON formatter.
//!
//! Writes the report exactly as it serializes (camelCase keys), so the
//! output can be deserialized back into a `ValidationReport`.

use crate::formatter::Formatter;
use crate::validator::ValidationReport;
use std::io::Write;

/// JSON output formatter.
#[derive(Debug, Clone)]
pub struct JsonFormatter {
    /// Pretty-print the output.
    pub pretty: bool,
}

impl Default for JsonFormatter {
    fn default() -> Self {
        Self { pretty: true }
    }
}

impl JsonFormatter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Single-line output.
    pub fn compact() -> Self {
        Self { pretty: false }
    }
}

impl Formatter for JsonFormatter {
    fn format<W: Write>(
        &self,
        report: &ValidationReport,
        _filename: &str,
        writer: &mut W,
    ) -> std::io::Result<()> {
        if self.pretty {
            serde_json::to_writer_pretty(&mut *writer, report)?;
        } else {
            serde_json::to_writer(&mut *writer, report)?;
        }
        writeln!(writer)
    }
}
