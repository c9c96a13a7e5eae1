//! Syntax pre-check.
//!
//! Runs before tokenization to separate genuine grammar errors from noise.
//! Validators are free to over-report; `blocking_errors` keeps only the
//! priority-zero structural errors that should stop validation.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::fmt;

use super::parser::is_known_instruction;

static HEREDOC_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"<<-?\s*["']?([A-Za-z_][A-Za-z0-9_]*)["']?"#).unwrap());

/// Diagnostic priority that marks a structural error.
pub const STRUCTURAL_PRIORITY: u8 = 0;

/// Kind of syntax diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// The file never declares a base image
    MissingFrom,
    /// An instruction other than ARG appears before the first FROM
    InstructionBeforeFrom,
    /// The keyword is not a Dockerfile instruction
    InvalidInstruction,
    /// The file ends with a line continuation
    EmptyContinuation,
    /// MAINTAINER and friends
    DeprecatedInstruction,
    /// Keyword not written in uppercase
    LowercaseInstruction,
}

/// One finding from a syntax validator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyntaxDiagnostic {
    pub kind: DiagnosticKind,
    /// Line the diagnostic refers to (1-indexed).
    pub line: u32,
    /// 0 is a structural error; higher values are advisory.
    pub priority: u8,
    pub message: String,
}

impl SyntaxDiagnostic {
    pub fn new(kind: DiagnosticKind, line: u32, priority: u8, message: impl Into<String>) -> Self {
        Self {
            kind,
            line,
            priority,
            message: message.into(),
        }
    }

    pub fn is_structural(&self) -> bool {
        self.priority == STRUCTURAL_PRIORITY
    }
}

impl fmt::Display for SyntaxDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}", self.line, self.message)
    }
}

/// A syntax validator consulted before the tokenizer.
pub trait SyntaxValidator: Send + Sync {
    fn check(&self, content: &str) -> Vec<SyntaxDiagnostic>;
}

/// Keep only diagnostics that must stop validation.
///
/// Health-check lines reported as invalid instructions are dropped: older
/// grammars do not know HEALTHCHECK and flag it even though it is valid.
pub fn blocking_errors<'a>(
    diagnostics: &'a [SyntaxDiagnostic],
    content: &str,
) -> Vec<&'a SyntaxDiagnostic> {
    let lines: Vec<&str> = content.lines().collect();

    diagnostics
        .iter()
        .filter(|d| d.is_structural())
        .filter(|d| match d.kind {
            DiagnosticKind::MissingFrom | DiagnosticKind::InstructionBeforeFrom => true,
            DiagnosticKind::InvalidInstruction => {
                let source = lines
                    .get((d.line as usize).saturating_sub(1))
                    .copied()
                    .unwrap_or("");
                !is_healthcheck_line(source)
            }
            _ => false,
        })
        .collect()
}

fn is_healthcheck_line(line: &str) -> bool {
    line.trim_start()
        .get(..11)
        .is_some_and(|head| head.eq_ignore_ascii_case("HEALTHCHECK"))
}

/// Built-in grammar checker.
///
/// Understands heredoc bodies and parser directives, so BuildKit files
/// pass the pre-check even when the tokenizer later rejects them.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinSyntaxValidator;

impl BuiltinSyntaxValidator {
    pub fn new() -> Self {
        Self
    }
}

impl SyntaxValidator for BuiltinSyntaxValidator {
    fn check(&self, content: &str) -> Vec<SyntaxDiagnostic> {
        let lines: Vec<&str> = content.lines().collect();
        let mut diagnostics = Vec::new();
        let mut heredocs: Vec<String> = Vec::new();
        let mut seen_from = false;
        let mut i = 0;

        while i < lines.len() {
            if let Some(delimiter) = heredocs.first() {
                if lines[i].trim() == delimiter.as_str() {
                    heredocs.remove(0);
                }
                i += 1;
                continue;
            }

            let trimmed = lines[i].trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                i += 1;
                continue;
            }

            let start_line = (i + 1) as u32;
            let mut logical = String::new();
            loop {
                let line = lines[i].trim_end();
                i += 1;
                match line.strip_suffix('\\') {
                    Some(stripped) => {
                        logical.push_str(stripped);
                        logical.push(' ');
                        if i >= lines.len() {
                            diagnostics.push(SyntaxDiagnostic::new(
                                DiagnosticKind::EmptyContinuation,
                                start_line,
                                1,
                                "Line continuation at end of file",
                            ));
                            break;
                        }
                    }
                    None => {
                        logical.push_str(line);
                        break;
                    }
                }
            }

            let keyword = logical.split_whitespace().next().unwrap_or_default();
            if !is_known_instruction(keyword) {
                diagnostics.push(SyntaxDiagnostic::new(
                    DiagnosticKind::InvalidInstruction,
                    start_line,
                    STRUCTURAL_PRIORITY,
                    format!("Invalid instruction: {}", keyword),
                ));
                continue;
            }

            let upper = keyword.to_ascii_uppercase();
            if keyword != upper {
                diagnostics.push(SyntaxDiagnostic::new(
                    DiagnosticKind::LowercaseInstruction,
                    start_line,
                    2,
                    format!("Instructions should be uppercase: {}", keyword),
                ));
            }

            match upper.as_str() {
                "FROM" => seen_from = true,
                "ARG" => {}
                _ if !seen_from => diagnostics.push(SyntaxDiagnostic::new(
                    DiagnosticKind::InstructionBeforeFrom,
                    start_line,
                    STRUCTURAL_PRIORITY,
                    format!("{} instruction before the first FROM", upper),
                )),
                _ => {}
            }

            if upper == "MAINTAINER" {
                diagnostics.push(SyntaxDiagnostic::new(
                    DiagnosticKind::DeprecatedInstruction,
                    start_line,
                    2,
                    "MAINTAINER is deprecated",
                ));
            }

            if matches!(upper.as_str(), "RUN" | "COPY" | "ADD") {
                for caps in HEREDOC_MARKER.captures_iter(&logical) {
                    heredocs.push(caps[1].to_string());
                }
            }
        }

        if !seen_from {
            diagnostics.push(SyntaxDiagnostic::new(
                DiagnosticKind::MissingFrom,
                1,
                STRUCTURAL_PRIORITY,
                "Missing FROM instruction",
            ));
        }

        diagnostics
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check(content: &str) -> Vec<SyntaxDiagnostic> {
        BuiltinSyntaxValidator::new().check(content)
    }

    #[test]
    fn test_valid_file_has_no_blocking_errors() {
        let content = "ARG BASE=alpine:3.19\nFROM ${BASE}\nRUN apk add curl\nHEALTHCHECK CMD wget -q localhost\n";
        let diagnostics = check(content);
        assert!(blocking_errors(&diagnostics, content).is_empty());
    }

    #[test]
    fn test_missing_from() {
        let content = "RUN echo hi\n";
        let diagnostics = check(content);
        let blocking = blocking_errors(&diagnostics, content);
        assert!(blocking.iter().any(|d| d.kind == DiagnosticKind::MissingFrom));
        assert!(blocking.iter().any(|d| d.kind == DiagnosticKind::InstructionBeforeFrom));
    }

    #[test]
    fn test_empty_file_is_missing_from() {
        let diagnostics = check("");
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].kind, DiagnosticKind::MissingFrom);
    }

    #[test]
    fn test_unknown_instruction() {
        let content = "FROM alpine:3.19\nFOO bar\n";
        let diagnostics = check(content);
        let blocking = blocking_errors(&diagnostics, content);
        assert_eq!(blocking.len(), 1);
        assert_eq!(blocking[0].kind, DiagnosticKind::InvalidInstruction);
        assert_eq!(blocking[0].line, 2);
    }

    #[test]
    fn test_heredoc_body_is_skipped() {
        let content = "# syntax=docker/dockerfile:1\nFROM alpine:3.19\nRUN <<EOF\napk add curl\necho done\nEOF\nUSER app\n";
        let diagnostics = check(content);
        assert!(blocking_errors(&diagnostics, content).is_empty());
    }

    #[test]
    fn test_healthcheck_false_positive_is_filtered() {
        let content = "FROM alpine:3.19\nHEALTHCHECK --interval=30s CMD wget -q localhost\n";
        let reported = vec![SyntaxDiagnostic::new(
            DiagnosticKind::InvalidInstruction,
            2,
            STRUCTURAL_PRIORITY,
            "Invalid instruction: HEALTHCHECK",
        )];
        assert!(blocking_errors(&reported, content).is_empty());
    }

    #[test]
    fn test_advisory_diagnostics_do_not_block() {
        let content = "from alpine:3.19\nMAINTAINER someone\nRUN echo \\";
        let diagnostics = check(content);
        assert!(diagnostics.iter().any(|d| d.kind == DiagnosticKind::LowercaseInstruction));
        assert!(diagnostics.iter().any(|d| d.kind == DiagnosticKind::DeprecatedInstruction));
        assert!(diagnostics.iter().any(|d| d.kind == DiagnosticKind::EmptyContinuation));
        assert!(blocking_errors(&diagnostics, content).is_empty());
    }
}
