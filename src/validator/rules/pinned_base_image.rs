//! pinned-base-image: every FROM carries an explicit, non-latest tag
//!
//! Untagged and `:latest` images change underneath the build.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::validator::parser::Instruction;
use crate::validator::rules::{ValidationRule, named};
use crate::validator::types::{RuleCategory, Severity};

pub const ID: &str = "pinned-base-image";

static LATEST_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i):latest$").unwrap());

pub fn rule() -> ValidationRule {
    ValidationRule {
        id: ID,
        name: "Base images are pinned",
        description: "Every FROM references a specific tag rather than latest or nothing",
        check,
        detail: None,
        message: "Base image uses the 'latest' tag or no tag at all",
        severity: Severity::Warning,
        fix: "Pin the base image to a release tag, e.g. 'FROM node:20-alpine' instead of 'FROM node:latest'",
        category: RuleCategory::BestPractice,
    }
}

fn check(instructions: &[Instruction]) -> bool {
    named(instructions, "FROM").all(|from| {
        let image = image_reference(&from.value());
        image.contains(':') && !LATEST_TAG.is_match(&image)
    })
}

/// Strip `--platform=...` style flags and an `AS <stage>` suffix.
pub(crate) fn image_reference(from_args: &str) -> String {
    let tokens: Vec<&str> = from_args
        .split_whitespace()
        .skip_while(|t| t.starts_with("--"))
        .collect();

    let end = tokens
        .iter()
        .position(|t| t.eq_ignore_ascii_case("as"))
        .unwrap_or(tokens.len());

    tokens[..end].join(" ")
}
