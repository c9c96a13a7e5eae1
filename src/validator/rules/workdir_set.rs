//! workdir-set: a WORKDIR is declared

use crate::validator::parser::Instruction;
use crate::validator::rules::{ValidationRule, named};
use crate::validator::types::{RuleCategory, Severity};

pub const ID: &str = "workdir-set";

pub fn rule() -> ValidationRule {
    ValidationRule {
        id: ID,
        name: "Working directory set",
        description: "A WORKDIR is declared instead of relying on the image default",
        check,
        detail: None,
        message: "No WORKDIR instruction; files land in the image's default directory",
        severity: Severity::Warning,
        fix: "Set an explicit working directory, e.g. 'WORKDIR /app'",
        category: RuleCategory::BestPractice,
    }
}

fn check(instructions: &[Instruction]) -> bool {
    named(instructions, "WORKDIR").next().is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validator::rules::test_util::instructions;

    #[test]
    fn test_missing_fails() {
        assert!(!check(&instructions("FROM alpine:3.19\nCOPY app /app\n")));
    }

    #[test]
    fn test_present_passes() {
        assert!(check(&instructions("FROM alpine:3.19\nWORKDIR /srv\n")));
    }
}
