//! no-install-recommends: apt-get installs skip recommended packages

use once_cell::sync::Lazy;
use regex::Regex;

use crate::validator::parser::Instruction;
use crate::validator::rules::{ValidationRule, named};
use crate::validator::types::{RuleCategory, Severity};

pub const ID: &str = "no-install-recommends";

static APT_INSTALL: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bapt-get\s+(?:\S+\s+)*?install\b").unwrap());

pub fn rule() -> ValidationRule {
    ValidationRule {
        id: ID,
        name: "Minimal apt-get installs",
        description: "apt-get install is run with --no-install-recommends",
        check,
        detail: None,
        message: "apt-get install without --no-install-recommends pulls in unneeded packages",
        severity: Severity::Info,
        fix: "Use 'apt-get install -y --no-install-recommends <packages>'",
        category: RuleCategory::Optimization,
    }
}

/// True when the command runs apt-get install without the exclusion flag.
pub(crate) fn installs_recommends(command: &str) -> bool {
    APT_INSTALL.is_match(command) && !command.contains("--no-install-recommends")
}

fn check(instructions: &[Instruction]) -> bool {
    !named(instructions, "RUN").any(|run| installs_recommends(&run.value()))
}
