//! Core types for the validation engine.
//!
//! - `Severity` - rule severity, which also drives the scoring weight
//! - `RuleCategory` - security / best-practice / optimization grouping
//! - `ValidationResult` - one verdict per evaluated rule (or heuristic hit)
//! - `ValidationReport` - the aggregate handed back to callers

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Severity levels for rule verdicts.
///
/// Ordered from most severe to least severe:
/// `Error > Warning > Info`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    /// Must be fixed; heavily penalised
    Error,
    /// Should usually be fixed
    Warning,
    /// Suggestion for improvement
    #[default]
    Info,
}

impl Severity {
    /// Parse a severity from a string (case-insensitive).
    ///
    /// `style` is accepted and treated as `Info`, since external linters
    /// report a fourth, lower level that this engine does not distinguish.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "error" => Some(Self::Error),
            "warning" => Some(Self::Warning),
            "info" | "style" => Some(Self::Info),
            _ => None,
        }
    }

    /// Get the string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Info => "info",
        }
    }

    /// Points deducted from the score for one failed result at this severity.
    pub fn penalty(&self) -> u32 {
        match self {
            Self::Error => 15,
            Self::Warning => 4,
            Self::Info => 1,
        }
    }

    fn rank(&self) -> u8 {
        match self {
            Self::Error => 0,
            Self::Warning => 1,
            Self::Info => 2,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Ord for Severity {
    fn cmp(&self, other: &Self) -> Ordering {
        // Lower rank is more severe, so reverse
        other.rank().cmp(&self.rank())
    }
}

impl PartialOrd for Severity {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Rule category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RuleCategory {
    Security,
    BestPractice,
    Optimization,
}

impl RuleCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Security => "security",
            Self::BestPractice => "best-practice",
            Self::Optimization => "optimization",
        }
    }
}

impl fmt::Display for RuleCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Letter grade derived from the score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Grade {
    A,
    B,
    C,
    D,
    F,
}

impl Grade {
    /// Map a score onto its grade band.
    pub fn from_score(score: u8) -> Self {
        match score {
            90.. => Self::A,
            80..=89 => Self::B,
            70..=79 => Self::C,
            60..=69 => Self::D,
            _ => Self::F,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
            Self::D => "D",
            Self::F => "F",
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Which engine produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultSource {
    #[default]
    Internal,
    External,
}

/// How the report was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EvaluationPath {
    /// Catalog predicates over parsed instructions
    Structured,
    /// Line-scan heuristics after the tokenizer rejected BuildKit syntax
    Heuristic,
    /// Terminal structural error; no rules ran
    ParseError,
    /// Produced by an external linter
    External,
}

/// One verdict.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    /// Stable identifier of the rule (or heuristic) that produced this verdict.
    pub rule_id: String,
    pub passed: bool,
    pub severity: Severity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<RuleCategory>,
    /// Human-readable message, prefixed with ✓ or ✗.
    pub message: String,
    /// Remediation text; empty for passing results.
    pub suggestions: Vec<String>,
    /// Extra detail; the secrets rule uses it to name the offending variable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    /// Source line for line-scan hits (1-indexed).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
    #[serde(default)]
    pub source: ResultSource,
}

impl ValidationResult {
    /// A passing verdict.
    pub fn pass(rule_id: impl Into<String>, severity: Severity, message: impl AsRef<str>) -> Self {
        Self {
            rule_id: rule_id.into(),
            passed: true,
            severity,
            category: None,
            message: format!("✓ {}", message.as_ref()),
            suggestions: Vec::new(),
            details: None,
            line: None,
            source: ResultSource::Internal,
        }
    }

    /// A failing verdict with a single remediation suggestion.
    pub fn fail(
        rule_id: impl Into<String>,
        severity: Severity,
        message: impl AsRef<str>,
        fix: impl Into<String>,
    ) -> Self {
        Self {
            rule_id: rule_id.into(),
            passed: false,
            severity,
            category: None,
            message: format!("✗ {}", message.as_ref()),
            suggestions: vec![fix.into()],
            details: None,
            line: None,
            source: ResultSource::Internal,
        }
    }

    pub fn with_category(mut self, category: RuleCategory) -> Self {
        self.category = Some(category);
        self
    }

    pub fn with_line(mut self, line: u32) -> Self {
        self.line = Some(line);
        self
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn with_source(mut self, source: ResultSource) -> Self {
        self.source = source;
        self
    }
}

/// Aggregate returned to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    pub results: Vec<ValidationResult>,
    pub score: u8,
    pub grade: Grade,
    pub passed_count: usize,
    pub failed_count: usize,
    pub error_count: usize,
    pub warning_count: usize,
    pub info_count: usize,
    pub timestamp: DateTime<Utc>,
    pub evaluation: EvaluationPath,
}

impl ValidationReport {
    /// Check if any result failed.
    pub fn has_failures(&self) -> bool {
        self.failed_count > 0
    }

    /// Iterate over failing results.
    pub fn failures(&self) -> impl Iterator<Item = &ValidationResult> {
        self.results.iter().filter(|r| !r.passed)
    }

    /// Find the first result for a rule.
    pub fn result_for(&self, rule_id: &str) -> Option<&ValidationResult> {
        self.results.iter().find(|r| r.rule_id == rule_id)
    }

    /// Check whether the named rule produced at least one failure.
    pub fn failed(&self, rule_id: &str) -> bool {
        self.results.iter().any(|r| r.rule_id == rule_id && !r.passed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Error > Severity::Warning);
        assert!(Severity::Warning > Severity::Info);
    }

    #[test]
    fn test_severity_parse() {
        assert_eq!(Severity::parse("error"), Some(Severity::Error));
        assert_eq!(Severity::parse("WARNING"), Some(Severity::Warning));
        assert_eq!(Severity::parse("Info"), Some(Severity::Info));
        assert_eq!(Severity::parse("style"), Some(Severity::Info));
        assert_eq!(Severity::parse("ignore"), None);
    }

    #[test]
    fn test_grade_bands() {
        assert_eq!(Grade::from_score(100), Grade::A);
        assert_eq!(Grade::from_score(90), Grade::A);
        assert_eq!(Grade::from_score(89), Grade::B);
        assert_eq!(Grade::from_score(80), Grade::B);
        assert_eq!(Grade::from_score(70), Grade::C);
        assert_eq!(Grade::from_score(60), Grade::D);
        assert_eq!(Grade::from_score(59), Grade::F);
        assert_eq!(Grade::from_score(0), Grade::F);
    }

    #[test]
    fn test_result_prefixes() {
        let ok = ValidationResult::pass("workdir-set", Severity::Warning, "WORKDIR is set");
        assert!(ok.message.starts_with('✓'));
        assert!(ok.suggestions.is_empty());

        let bad = ValidationResult::fail("workdir-set", Severity::Warning, "No WORKDIR", "Add WORKDIR /app");
        assert!(bad.message.starts_with('✗'));
        assert_eq!(bad.suggestions, vec!["Add WORKDIR /app".to_string()]);
    }

    #[test]
    fn test_report_serializes_camel_case() {
        let report = ValidationReport {
            results: vec![],
            score: 100,
            grade: Grade::A,
            passed_count: 0,
            failed_count: 0,
            error_count: 0,
            warning_count: 0,
            info_count: 0,
            timestamp: Utc.timestamp_opt(0, 0).unwrap(),
            evaluation: EvaluationPath::Structured,
        };
        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("\"passedCount\":0"));
        assert!(json.contains("\"grade\":\"A\""));
    }
}
