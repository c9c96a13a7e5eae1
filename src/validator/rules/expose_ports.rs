//! expose-ports: images with a run command document their ports

use crate::validator::parser::Instruction;
use crate::validator::rules::{ValidationRule, named};
use crate::validator::types::{RuleCategory, Severity};

pub const ID: &str = "expose-ports";

pub fn rule() -> ValidationRule {
    ValidationRule {
        id: ID,
        name: "Ports documented",
        description: "Images that define a run command declare the ports they listen on",
        check,
        detail: None,
        message: "CMD/ENTRYPOINT present but no EXPOSE instruction",
        severity: Severity::Info,
        fix: "Document listening ports with EXPOSE, e.g. 'EXPOSE 8080'",
        category: RuleCategory::BestPractice,
    }
}

fn check(instructions: &[Instruction]) -> bool {
    let runs_something = instructions.iter().any(|i| i.is("CMD") || i.is("ENTRYPOINT"));
    !runs_something || named(instructions, "EXPOSE").next().is_some()
}
