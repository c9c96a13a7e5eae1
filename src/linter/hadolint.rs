//! Adapter for the `hadolint` binary.
//!
//! Runs `hadolint --format json -` with the Dockerfile on stdin. hadolint
//! exits non-zero whenever it reports findings, so the exit status alone
//! does not mean failure: a decodable JSON report on stdout is success.

use async_trait::async_trait;
use chrono::Utc;
use serde::Deserialize;
use std::io::ErrorKind;
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use super::ExternalLinter;
use crate::error::{Result, ValidatorError};
use crate::validator::scoring::build_report;
use crate::validator::types::{EvaluationPath, Severity, ValidationReport, ValidationResult};

/// Default binary name, resolved through `PATH`.
pub const DEFAULT_BINARY: &str = "hadolint";

/// One entry of hadolint's JSON output.
#[derive(Debug, Clone, Deserialize)]
pub struct HadolintFinding {
    pub line: u32,
    pub code: String,
    pub message: String,
    pub level: String,
    #[serde(default)]
    pub column: Option<u32>,
}

impl HadolintFinding {
    /// Documentation link for the finding's rule.
    pub fn wiki_url(&self) -> String {
        format!("https://github.com/hadolint/hadolint/wiki/{}", self.code)
    }

    fn into_result(self) -> ValidationResult {
        let severity = Severity::parse(&self.level).unwrap_or(Severity::Info);
        let url = self.wiki_url();
        let result = ValidationResult::fail(self.code, severity, self.message, url).with_line(self.line);
        match self.column {
            Some(column) => result.with_details(format!("column {}", column)),
            None => result,
        }
    }
}

/// Decode hadolint JSON output into failed results.
pub fn parse_output(stdout: &str) -> Result<Vec<ValidationResult>> {
    let findings: Vec<HadolintFinding> = serde_json::from_str(stdout.trim())?;
    Ok(findings.into_iter().map(HadolintFinding::into_result).collect())
}

/// Runs the hadolint binary as an external linter.
#[derive(Debug, Clone)]
pub struct HadolintLinter {
    binary: String,
    extra_args: Vec<String>,
}

impl HadolintLinter {
    pub fn new() -> Self {
        Self::with_binary(DEFAULT_BINARY)
    }

    pub fn with_binary(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
            extra_args: Vec::new(),
        }
    }

    /// Extra arguments passed before the stdin marker, e.g. `--ignore DL3008`.
    pub fn with_args(mut self, args: Vec<String>) -> Self {
        self.extra_args = args;
        self
    }

    pub fn binary(&self) -> &str {
        &self.binary
    }
}

impl Default for HadolintLinter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ExternalLinter for HadolintLinter {
    fn name(&self) -> &str {
        "hadolint"
    }

    async fn lint(&self, content: &str) -> Result<ValidationReport> {
        let mut cmd = Command::new(&self.binary);
        cmd.arg("--format").arg("json");
        cmd.args(&self.extra_args);
        cmd.arg("-");
        cmd.stdin(Stdio::piped());
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());

        let mut child = cmd.spawn().map_err(|e| match e.kind() {
            ErrorKind::NotFound | ErrorKind::PermissionDenied => ValidatorError::LinterUnavailable {
                binary: self.binary.clone(),
                reason: e.to_string(),
            },
            _ => ValidatorError::Io(e),
        })?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(content.as_bytes()).await?;
            // Dropping closes the pipe so hadolint sees EOF
        }

        let output = child.wait_with_output().await?;
        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);

        let results = match parse_output(&stdout) {
            Ok(results) => results,
            Err(_) if !output.status.success() => {
                return Err(ValidatorError::LinterFailed {
                    code: output.status.code(),
                    stderr: stderr.trim().to_string(),
                });
            }
            Err(e) => return Err(e),
        };

        log::debug!("{} reported {} findings", self.name(), results.len());
        Ok(build_report(results, EvaluationPath::External, Utc::now()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"[
        {"line":1,"code":"DL3007","message":"Using latest is prone to errors","column":1,"file":"-","level":"warning"},
        {"line":3,"code":"DL3008","message":"Pin versions in apt get install","column":1,"file":"-","level":"warning"},
        {"line":4,"code":"DL3059","message":"Multiple consecutive RUN instructions","column":1,"file":"-","level":"info"},
        {"line":5,"code":"SC2086","message":"Double quote to prevent globbing","column":1,"file":"-","level":"style"}
    ]"#;

    #[test]
    fn test_parse_output() {
        let results = parse_output(SAMPLE).unwrap();
        assert_eq!(results.len(), 4);
        assert!(results.iter().all(|r| !r.passed));

        let first = &results[0];
        assert_eq!(first.rule_id, "DL3007");
        assert_eq!(first.severity, Severity::Warning);
        assert_eq!(first.line, Some(1));
        assert_eq!(
            first.suggestions,
            vec!["https://github.com/hadolint/hadolint/wiki/DL3007".to_string()]
        );

        assert_eq!(results[3].severity, Severity::Info);
    }

    #[test]
    fn test_parse_empty_output() {
        assert!(parse_output("[]").unwrap().is_empty());
    }

    #[test]
    fn test_parse_garbage_fails() {
        assert!(matches!(
            parse_output("hadolint: command not understood"),
            Err(ValidatorError::LinterOutput(_))
        ));
    }

    #[tokio::test]
    async fn test_missing_binary_is_unavailable() {
        let linter = HadolintLinter::with_binary("hadolint-binary-that-does-not-exist");
        let err = linter.lint("FROM alpine:3.19\n").await.unwrap_err();
        assert!(matches!(err, ValidatorError::LinterUnavailable { .. }));
    }
}
