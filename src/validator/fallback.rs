//! Heuristic evaluation for files the tokenizer cannot handle.
//!
//! Heredocs and other BuildKit syntax defeat the structured tokenizer. This
//! strategy scans raw lines instead, re-implementing a subset of the catalog
//! and emitting one line-numbered verdict per hit. Extended features that are
//! in use earn passing informational results.

use once_cell::sync::Lazy;
use regex::Regex;

use super::EvaluationStrategy;
use super::buildkit::{BuildKitFeatures, has_non_secret_mount, is_secret_mount_line};
use super::parser::ParseError;
use super::rules::{no_install_recommends, no_root_user, no_secrets, pinned_base_image};
use super::types::{EvaluationPath, Severity, ValidationResult};

static FROM_LINE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^\s*FROM\s+(.+)$").unwrap());
static USER_LINE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^\s*USER\s+(\S+)").unwrap());
static LATEST: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i):latest$").unwrap());

/// Line-scan strategy used when BuildKit syntax defeats the tokenizer.
#[derive(Debug, Clone, Default)]
pub struct HeuristicEvaluator {
    features: BuildKitFeatures,
}

impl HeuristicEvaluator {
    pub fn new(features: BuildKitFeatures) -> Self {
        Self { features }
    }

    fn scan_line(line: &str, number: u32, results: &mut Vec<ValidationResult>) {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            return;
        }

        if let Some(caps) = FROM_LINE.captures(trimmed) {
            let image = pinned_base_image::image_reference(&caps[1]);
            if LATEST.is_match(&image) {
                let rule = pinned_base_image::rule();
                results.push(
                    ValidationResult::fail(
                        rule.id,
                        rule.severity,
                        format!("Line {}: base image '{}' uses the latest tag", number, image),
                        rule.fix,
                    )
                    .with_category(rule.category)
                    .with_line(number),
                );
            }
        }

        // Secret mounts are the sanctioned way to hand secrets to a build
        if no_secrets::looks_like_secret(trimmed) && !is_secret_mount_line(trimmed) {
            let rule = no_secrets::rule();
            let variable = no_secrets::secret_variable(trimmed);
            let message = match &variable {
                Some(name) => format!("Line {}: potential hardcoded secret: {}", number, name),
                None => format!("Line {}: potential hardcoded secret", number),
            };
            let result = ValidationResult::fail(rule.id, rule.severity, message, rule.fix)
                .with_category(rule.category)
                .with_line(number);
            results.push(match variable {
                Some(name) => result.with_details(name),
                None => result,
            });
        }

        if let Some(caps) = USER_LINE.captures(trimmed) {
            if no_root_user::is_root(&caps[1]) {
                let rule = no_root_user::rule();
                results.push(
                    ValidationResult::fail(
                        rule.id,
                        rule.severity,
                        format!("Line {}: container switches to the root user", number),
                        rule.fix,
                    )
                    .with_category(rule.category)
                    .with_line(number),
                );
            }
        }

        if no_install_recommends::installs_recommends(trimmed) {
            let rule = no_install_recommends::rule();
            results.push(
                ValidationResult::fail(
                    rule.id,
                    rule.severity,
                    format!("Line {}: apt-get install without --no-install-recommends", number),
                    rule.fix,
                )
                .with_category(rule.category)
                .with_line(number),
            );
        }
    }

    fn feature_results(&self, content: &str) -> Vec<ValidationResult> {
        let mut results = Vec::new();

        if let Some(syntax) = &self.features.syntax_directive {
            results.push(ValidationResult::pass(
                "buildkit-syntax",
                Severity::Info,
                format!("BuildKit syntax directive in use ({})", syntax),
            ));
        }
        if self.features.has_heredocs {
            results.push(ValidationResult::pass(
                "buildkit-heredoc",
                Severity::Info,
                "Heredocs keep multi-line scripts readable",
            ));
        }
        if self.features.has_mounts && content.lines().any(has_non_secret_mount) {
            results.push(ValidationResult::pass(
                "buildkit-cache-mount",
                Severity::Info,
                "RUN --mount speeds up rebuilds",
            ));
        }
        if self.features.has_secret_mounts {
            results.push(ValidationResult::pass(
                "buildkit-secret-mount",
                Severity::Info,
                "Secrets are provided through secret mounts",
            ));
        }

        results
    }
}

impl EvaluationStrategy for HeuristicEvaluator {
    fn path(&self) -> EvaluationPath {
        EvaluationPath::Heuristic
    }

    fn evaluate(&self, content: &str) -> Result<Vec<ValidationResult>, ParseError> {
        let mut results = Vec::new();
        for (idx, line) in content.lines().enumerate() {
            Self::scan_line(line, idx as u32 + 1, &mut results);
        }
        results.extend(self.feature_results(content));
        Ok(results)
    }
}
