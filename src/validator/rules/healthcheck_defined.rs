//! healthcheck-defined: a HEALTHCHECK is declared

use crate::validator::parser::Instruction;
use crate::validator::rules::{ValidationRule, named};
use crate::validator::types::{RuleCategory, Severity};

pub const ID: &str = "healthcheck-defined";

pub fn rule() -> ValidationRule {
    ValidationRule {
        id: ID,
        name: "Health check defined",
        description: "The image declares how the runtime can probe its health",
        check,
        detail: None,
        message: "No HEALTHCHECK instruction",
        severity: Severity::Warning,
        fix: "Add a HEALTHCHECK, e.g. 'HEALTHCHECK --interval=30s CMD wget -qO- http://localhost:8080/health || exit 1'",
        category: RuleCategory::BestPractice,
    }
}

fn check(instructions: &[Instruction]) -> bool {
    // HEALTHCHECK NONE disables an inherited check
    named(instructions, "HEALTHCHECK").any(|hc| !hc.value().trim().eq_ignore_ascii_case("NONE"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validator::rules::test_util::instructions;

    #[test]
    fn test_missing_fails() {
        assert!(!check(&instructions("FROM nginx:1.25\n")));
    }

    #[test]
    fn test_present_passes() {
        assert!(check(&instructions(
            "FROM nginx:1.25\nHEALTHCHECK --interval=30s CMD curl -f http://localhost/ || exit 1\n"
        )));
    }

    #[test]
    fn test_none_fails() {
        assert!(!check(&instructions("FROM nginx:1.25\nHEALTHCHECK NONE\n")));
    }
}
