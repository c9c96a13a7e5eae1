//! no-secrets: ENV and ARG carry no hardcoded credentials
//!
//! Values baked into ENV or ARG end up in the image history. On failure the
//! verdict names the offending variable.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::validator::parser::Instruction;
use crate::validator::rules::ValidationRule;
use crate::validator::types::{RuleCategory, Severity};

pub const ID: &str = "no-secrets";

/// Assignment to a variable whose name mentions a credential.
static SECRET_ASSIGNMENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b[A-Z0-9_]*(?:password|passwd|secret|token|api[_-]?key|private[_-]?key|access[_-]?key)[A-Z0-9_]*\s*=\s*\S+",
    )
    .unwrap()
});

static VARIABLE_NAME: Lazy<Regex> = Lazy::new(|| Regex::new(r"([A-Za-z_][A-Za-z0-9_]*)=").unwrap());

pub fn rule() -> ValidationRule {
    ValidationRule {
        id: ID,
        name: "No hardcoded secrets",
        description: "ENV and ARG values do not contain passwords, keys or tokens",
        check,
        detail: Some(offending_variable),
        message: "Potential secret hardcoded in ENV/ARG",
        severity: Severity::Error,
        fix: "Pass secrets at runtime or mount them with 'RUN --mount=type=secret,id=<name>' instead of ENV/ARG",
        category: RuleCategory::Security,
    }
}

pub(crate) fn looks_like_secret(text: &str) -> bool {
    SECRET_ASSIGNMENT.is_match(text)
}

fn assignments(instructions: &[Instruction]) -> impl Iterator<Item = String> + '_ {
    instructions
        .iter()
        .filter(|i| i.is("ENV") || i.is("ARG"))
        .flat_map(|i| match i.args.as_map() {
            Some(pairs) => pairs.iter().map(|(k, v)| format!("{}={}", k, v)).collect(),
            None => vec![i.value()],
        })
}

fn check(instructions: &[Instruction]) -> bool {
    !assignments(instructions).any(|a| looks_like_secret(&a))
}

fn offending_variable(instructions: &[Instruction]) -> Option<String> {
    assignments(instructions)
        .find(|a| looks_like_secret(a))
        .and_then(|a| secret_variable(&a))
}

/// Name of the variable holding a secret-like value.
///
/// Prefers the `NAME=` token that itself matches; falls back to the first
/// assignment on the line.
pub(crate) fn secret_variable(text: &str) -> Option<String> {
    text.split_whitespace()
        .find(|token| looks_like_secret(token))
        .and_then(|token| VARIABLE_NAME.captures(token))
        .or_else(|| VARIABLE_NAME.captures(text))
        .map(|c| c[1].to_string())
}
