//! Dockerfile validation and scoring engine.
//!
//! Validation runs in stages:
//!
//! 1. BuildKit feature detection over the raw text
//! 2. Syntax pre-check; a genuine structural error ends the call with a
//!    score-0 report
//! 3. Structured evaluation of the rule catalog, or the line-scan heuristics
//!    when the tokenizer rejects text the pre-check accepted
//! 4. Scoring and grading
//! 5. Optionally, a merge with an external linter's findings
//!
//! # Example
//!
//! ```rust,ignore
//! use dockerfile_validator::validator::{DockerfileValidator, ValidationOptions};
//!
//! let validator = DockerfileValidator::new();
//! let report = validator.validate("FROM node:20\nUSER node\n", &ValidationOptions::default()).await;
//! println!("{} ({})", report.score, report.grade);
//! ```

pub mod buildkit;
pub mod fallback;
pub mod merge;
pub mod parser;
pub mod rules;
pub mod scoring;
pub mod structured;
pub mod syntax;
pub mod types;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;

use crate::linter::{ExternalLinter, HadolintLinter};

pub use buildkit::BuildKitFeatures;
pub use fallback::HeuristicEvaluator;
pub use merge::merge_reports;
pub use parser::{DockerfileParser, Instruction, InstructionArgs, InstructionParser, ParseError};
pub use rules::{ValidationRule, all_rules, find_rule};
pub use scoring::{build_report, parse_error_report};
pub use structured::StructuredEvaluator;
pub use syntax::{BuiltinSyntaxValidator, SyntaxDiagnostic, SyntaxValidator, blocking_errors};
pub use types::{
    EvaluationPath, Grade, ResultSource, RuleCategory, Severity, ValidationReport, ValidationResult,
};

/// One way of turning Dockerfile text into verdicts.
pub trait EvaluationStrategy: Send + Sync {
    /// Path recorded on reports built from this strategy's results.
    fn path(&self) -> EvaluationPath;

    /// Evaluate the text. Only tokenizer failures are errors.
    fn evaluate(&self, content: &str) -> Result<Vec<ValidationResult>, ParseError>;
}

/// Source of report timestamps.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Always returns the same instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Per-call options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ValidationOptions {
    /// Merge findings from the external linter.
    pub enable_external_linter: bool,
    /// Reserved for platform-specific rules.
    pub target_platform: Option<String>,
    /// Reserved for platform-specific rules.
    pub strict_platform_validation: bool,
}

impl Default for ValidationOptions {
    fn default() -> Self {
        Self {
            enable_external_linter: true,
            target_platform: None,
            strict_platform_validation: false,
        }
    }
}

impl ValidationOptions {
    /// Options with the external linter turned off.
    pub fn internal_only() -> Self {
        Self {
            enable_external_linter: false,
            ..Self::default()
        }
    }
}

/// Entry point of the engine.
///
/// Holds only immutable collaborators, so one instance can serve
/// concurrent validations.
#[derive(Clone)]
pub struct DockerfileValidator {
    parser: Arc<dyn InstructionParser>,
    syntax: Arc<dyn SyntaxValidator>,
    linter: Option<Arc<dyn ExternalLinter>>,
    clock: Arc<dyn Clock>,
}

impl DockerfileValidator {
    /// Validator with the nom tokenizer, the built-in syntax checker and
    /// hadolint as external linter.
    pub fn new() -> Self {
        Self {
            parser: Arc::new(DockerfileParser::new()),
            syntax: Arc::new(BuiltinSyntaxValidator::new()),
            linter: Some(Arc::new(HadolintLinter::new())),
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_parser(mut self, parser: Arc<dyn InstructionParser>) -> Self {
        self.parser = parser;
        self
    }

    pub fn with_syntax_validator(mut self, syntax: Arc<dyn SyntaxValidator>) -> Self {
        self.syntax = syntax;
        self
    }

    pub fn with_linter(mut self, linter: Arc<dyn ExternalLinter>) -> Self {
        self.linter = Some(linter);
        self
    }

    pub fn without_linter(mut self) -> Self {
        self.linter = None;
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Validate without consulting the external linter.
    pub fn validate_internal(&self, content: &str, options: &ValidationOptions) -> ValidationReport {
        let started = Instant::now();

        if options.target_platform.is_some() || options.strict_platform_validation {
            log::debug!(
                "Platform options accepted but unused: target={:?} strict={}",
                options.target_platform,
                options.strict_platform_validation
            );
        }

        let features = BuildKitFeatures::detect(content);
        if features.any() {
            log::debug!("BuildKit features detected: {:?}", features);
        }

        let diagnostics = self.syntax.check(content);
        for diagnostic in diagnostics.iter().filter(|d| !d.is_structural()) {
            log::debug!("Syntax advisory: {}", diagnostic);
        }

        let blocking = blocking_errors(&diagnostics, content);
        if !blocking.is_empty() {
            let message = blocking
                .iter()
                .map(|d| d.to_string())
                .collect::<Vec<_>>()
                .join("; ");
            log::debug!("Structural syntax error, skipping rules: {}", message);
            return parse_error_report(message, self.clock.now());
        }

        let structured = StructuredEvaluator::new(Arc::clone(&self.parser));
        let report = match self.run(&structured, content) {
            Ok(report) => report,
            // Text that passed the pre-check is treated as unsupported syntax
            Err(err) => {
                log::debug!("Tokenizer failed ({}), using line heuristics", err);
                let heuristic = HeuristicEvaluator::new(features);
                self.run(&heuristic, content)
                    .unwrap_or_else(|err| parse_error_report(err.to_string(), self.clock.now()))
            }
        };

        log::debug!(
            "Validated via {:?} in {:?}: score {} grade {}",
            report.evaluation,
            started.elapsed(),
            report.score,
            report.grade
        );
        report
    }

    /// Validate, merging external linter findings when enabled.
    ///
    /// Never fails: linter errors are logged and the internal report is
    /// returned as is.
    pub async fn validate(&self, content: &str, options: &ValidationOptions) -> ValidationReport {
        let internal = self.validate_internal(content, options);

        if internal.evaluation == EvaluationPath::ParseError || !options.enable_external_linter {
            return internal;
        }
        let Some(linter) = &self.linter else {
            return internal;
        };

        match linter.lint(content).await {
            Ok(external) => merge_reports(internal, external),
            Err(err) => {
                log::warn!("{} failed, using internal results only: {}", linter.name(), err);
                internal
            }
        }
    }

    fn run(
        &self,
        strategy: &dyn EvaluationStrategy,
        content: &str,
    ) -> Result<ValidationReport, ParseError> {
        let results = strategy.evaluate(content)?;
        Ok(build_report(results, strategy.path(), self.clock.now()))
    }
}

impl Default for DockerfileValidator {
    fn default() -> Self {
        Self::new()
    }
}

/// Validate with the default collaborators.
pub async fn validate_dockerfile(content: &str, options: &ValidationOptions) -> ValidationReport {
    DockerfileValidator::new().validate(content, options).await
}
