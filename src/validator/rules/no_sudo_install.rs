//! no-sudo-install: no sudo in RUN instructions
//!
//! Build steps already run with the privileges of the current USER;
//! installing or invoking sudo leaves a privilege-escalation path in the image.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::validator::parser::Instruction;
use crate::validator::rules::{ValidationRule, named};
use crate::validator::types::{RuleCategory, Severity};

pub const ID: &str = "no-sudo-install";

static SUDO: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bsudo\b").unwrap());

pub fn rule() -> ValidationRule {
    ValidationRule {
        id: ID,
        name: "No sudo usage",
        description: "RUN instructions neither install nor invoke sudo",
        check,
        detail: None,
        message: "sudo is installed or used in a RUN instruction",
        severity: Severity::Error,
        fix: "Remove sudo; run privileged steps before switching USER instead of escalating at runtime",
        category: RuleCategory::Security,
    }
}

fn check(instructions: &[Instruction]) -> bool {
    !named(instructions, "RUN").any(|run| SUDO.is_match(&run.value()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validator::rules::test_util::instructions;

    #[test]
    fn test_plain_install_passes() {
        assert!(check(&instructions("FROM ubuntu:22.04\nRUN apt-get install -y curl\n")));
    }

    #[test]
    fn test_sudo_invocation_fails() {
        assert!(!check(&instructions("FROM ubuntu:22.04\nRUN sudo apt-get update\n")));
    }

    #[test]
    fn test_sudo_package_fails() {
        assert!(!check(&instructions(
            "FROM ubuntu:22.04\nRUN apt-get install -y curl sudo\n"
        )));
    }

    #[test]
    fn test_substring_is_not_sudo() {
        assert!(check(&instructions("FROM ubuntu:22.04\nRUN echo pseudocode\n")));
    }
}
