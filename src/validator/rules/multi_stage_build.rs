//! multi-stage-build: non-trivial builds use more than one stage

use crate::validator::parser::Instruction;
use crate::validator::rules::{ValidationRule, named};
use crate::validator::types::{RuleCategory, Severity};

pub const ID: &str = "multi-stage-build";

/// Files with fewer instructions than this pass unconditionally.
pub const MULTI_STAGE_MIN_INSTRUCTIONS: usize = 10;

pub fn rule() -> ValidationRule {
    ValidationRule {
        id: ID,
        name: "Multi-stage build",
        description: "Larger builds separate build-time and runtime stages",
        check,
        detail: None,
        message: "Single-stage build; build tooling ships in the final image",
        severity: Severity::Info,
        fix: "Split into a builder stage and a slim runtime stage, copying artifacts with 'COPY --from=builder'",
        category: RuleCategory::Optimization,
    }
}

fn check(instructions: &[Instruction]) -> bool {
    instructions.len() < MULTI_STAGE_MIN_INSTRUCTIONS || named(instructions, "FROM").count() > 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validator::rules::test_util::instructions;

    fn long_single_stage(extra_runs: usize) -> String {
        let mut dockerfile = String::from("FROM node:20\nWORKDIR /app\n");
        for n in 0..extra_runs {
            dockerfile.push_str(&format!("RUN echo step{}\n", n));
        }
        dockerfile.push_str("CMD [\"node\", \"index.js\"]\n");
        dockerfile
    }

    #[test]
    fn test_short_file_passes() {
        let instrs = instructions(&long_single_stage(3));
        assert!(instrs.len() < MULTI_STAGE_MIN_INSTRUCTIONS);
        assert!(check(&instrs));
    }

    #[test]
    fn test_nine_instructions_passes() {
        let instrs = instructions(&long_single_stage(6));
        assert_eq!(instrs.len(), 9);
        assert!(check(&instrs));
    }

    #[test]
    fn test_long_single_stage_fails() {
        let instrs = instructions(&long_single_stage(8));
        assert_eq!(instrs.len(), 11);
        assert!(!check(&instrs));
    }

    #[test]
    fn test_long_multi_stage_passes() {
        let mut dockerfile = long_single_stage(8);
        dockerfile.push_str("FROM node:20-slim\n");
        assert!(check(&instructions(&dockerfile)));
    }
}
