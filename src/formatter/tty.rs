//! TTY formatter.
//!
//! Failures first, each with its remediation, then a score summary line.
//! Uses ANSI escape codes for colors.

use crate::formatter::Formatter;
use crate::validator::{Grade, ResultSource, Severity, ValidationReport};
use std::io::Write;

/// TTY (terminal) output formatter with colors.
#[derive(Debug, Clone)]
pub struct TtyFormatter {
    /// Use colors in output.
    pub colors: bool,
    /// List passing results too.
    pub show_passed: bool,
}

impl Default for TtyFormatter {
    fn default() -> Self {
        Self {
            colors: true,
            show_passed: true,
        }
    }
}

impl TtyFormatter {
    /// Create a new TTY formatter with colors enabled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a TTY formatter without colors.
    pub fn no_color() -> Self {
        Self {
            colors: false,
            ..Self::default()
        }
    }

    fn severity_color(&self, severity: Severity) -> &'static str {
        if !self.colors {
            return "";
        }
        match severity {
            Severity::Error => "\x1b[1;31m",   // Bold red
            Severity::Warning => "\x1b[1;33m", // Bold yellow
            Severity::Info => "\x1b[1;36m",    // Bold cyan
        }
    }

    fn grade_color(&self, grade: Grade) -> &'static str {
        if !self.colors {
            return "";
        }
        match grade {
            Grade::A | Grade::B => "\x1b[1;32m",
            Grade::C | Grade::D => "\x1b[1;33m",
            Grade::F => "\x1b[1;31m",
        }
    }

    fn green(&self) -> &'static str {
        if self.colors { "\x1b[32m" } else { "" }
    }

    fn reset(&self) -> &'static str {
        if self.colors { "\x1b[0m" } else { "" }
    }

    fn dim(&self) -> &'static str {
        if self.colors { "\x1b[2m" } else { "" }
    }

    fn bold(&self) -> &'static str {
        if self.colors { "\x1b[1m" } else { "" }
    }
}

impl Formatter for TtyFormatter {
    fn format<W: Write>(
        &self,
        report: &ValidationReport,
        filename: &str,
        writer: &mut W,
    ) -> std::io::Result<()> {
        let reset = self.reset();
        let dim = self.dim();
        let bold = self.bold();

        writeln!(writer, "{}{}{}", bold, filename, reset)?;

        for result in report.failures() {
            let color = self.severity_color(result.severity);

            write!(writer, "  ")?;
            if let Some(line) = result.line {
                write!(writer, "{}{}:{} ", dim, line, reset)?;
            }
            write!(writer, "{}{}{}", color, result.severity, reset)?;
            write!(writer, " {}{}{}", dim, result.rule_id, reset)?;
            if result.source == ResultSource::External {
                write!(writer, " {}(external){}", dim, reset)?;
            }
            writeln!(writer, ": {}", result.message)?;

            for suggestion in &result.suggestions {
                writeln!(writer, "      {}→ {}{}", dim, suggestion, reset)?;
            }
        }

        if self.show_passed {
            for result in report.results.iter().filter(|r| r.passed) {
                writeln!(writer, "  {}{}{}", self.green(), result.message, reset)?;
            }
        }

        writeln!(writer)?;

        let mut parts = Vec::new();
        if report.error_count > 0 {
            parts.push(format!(
                "{}{} error{}{}",
                self.severity_color(Severity::Error),
                report.error_count,
                if report.error_count == 1 { "" } else { "s" },
                reset
            ));
        }
        if report.warning_count > 0 {
            parts.push(format!(
                "{}{} warning{}{}",
                self.severity_color(Severity::Warning),
                report.warning_count,
                if report.warning_count == 1 { "" } else { "s" },
                reset
            ));
        }
        if report.info_count > 0 {
            parts.push(format!(
                "{}{} info{}",
                self.severity_color(Severity::Info),
                report.info_count,
                reset
            ));
        }
        if parts.is_empty() {
            parts.push(format!("{}no issues{}", self.green(), reset));
        }

        writeln!(
            writer,
            "Score: {}{}/100{} Grade: {}{}{} ({})",
            bold,
            report.score,
            reset,
            self.grade_color(report.grade),
            report.grade,
            reset,
            parts.join(", ")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validator::{EvaluationPath, ValidationResult, build_report};
    use chrono::{TimeZone, Utc};

    fn sample() -> ValidationReport {
        build_report(
            vec![
                ValidationResult::fail("no-root-user", Severity::Error, "Runs as root", "Add USER app"),
                ValidationResult::fail("pinned-base-image", Severity::Warning, "latest tag", "Pin it")
                    .with_line(1),
                ValidationResult::pass("workdir-set", Severity::Warning, "Working directory set"),
            ],
            EvaluationPath::Structured,
            Utc.timestamp_opt(0, 0).unwrap(),
        )
    }

    #[test]
    fn test_plain_output() {
        let output = TtyFormatter::no_color().format_to_string(&sample(), "Dockerfile");

        assert!(output.starts_with("Dockerfile\n"));
        assert!(output.contains("  error no-root-user: ✗ Runs as root"));
        assert!(output.contains("→ Add USER app"));
        assert!(output.contains("  1: warning pinned-base-image"));
        assert!(output.contains("✓ Working directory set"));
        assert!(output.contains("Score: 81/100 Grade: C (1 error, 1 warning)"));
        assert!(!output.contains('\x1b'));
    }

    #[test]
    fn test_colored_output() {
        let output = TtyFormatter::new().format_to_string(&sample(), "Dockerfile");
        assert!(output.contains("\x1b[1;31m"));
    }

    #[test]
    fn test_clean_report() {
        let report = build_report(vec![], EvaluationPath::Structured, Utc.timestamp_opt(0, 0).unwrap());
        let output = TtyFormatter::no_color().format_to_string(&report, "Dockerfile");
        assert!(output.contains("Score: 100/100 Grade: A (no issues)"));
    }
}
