//! no-root-user: the final USER must not be root
//!
//! Containers run as root unless told otherwise. Requires at least one USER
//! instruction, and the last one must name a non-root user.

use crate::validator::parser::Instruction;
use crate::validator::rules::{ValidationRule, named};
use crate::validator::types::{RuleCategory, Severity};

pub const ID: &str = "no-root-user";

pub fn rule() -> ValidationRule {
    ValidationRule {
        id: ID,
        name: "Runs as a non-root user",
        description: "The last USER instruction switches to a non-root user",
        check,
        detail: None,
        message: "Container runs as root (no non-root USER instruction)",
        severity: Severity::Error,
        fix: "Create an unprivileged user and add 'USER <name>' after the last privileged step, e.g. 'RUN adduser -D app' then 'USER app'",
        category: RuleCategory::Security,
    }
}

fn check(instructions: &[Instruction]) -> bool {
    match named(instructions, "USER").last() {
        Some(user) => !is_root(&user.value()),
        None => false,
    }
}

/// `root`, `0`, `root:group` and `0:0` all resolve to uid 0.
pub(crate) fn is_root(user: &str) -> bool {
    let name = user.trim().split(':').next().unwrap_or_default();
    name == "root" || name == "0"
}
