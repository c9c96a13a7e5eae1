//! layer-caching: dependency manifests are copied before the source tree
//!
//! Copying `package.json` (or any other manifest) on its own and installing
//! dependencies before `COPY . .` keeps the install layer cached across
//! source-only edits.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::validator::parser::Instruction;
use crate::validator::rules::ValidationRule;
use crate::validator::types::{RuleCategory, Severity};

pub const ID: &str = "layer-caching";

static MANIFEST: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?x)
        (^|/)(
            package(-lock)?\.json | yarn\.lock | pnpm-lock\.yaml | bun\.lockb? | npm-shrinkwrap\.json
          | requirements[\w.-]*\.txt | Pipfile(\.lock)? | poetry\.lock | pyproject\.toml
          | go\.(mod|sum)
          | Cargo\.(toml|lock)
          | Gemfile(\.lock)?
          | composer\.(json|lock)
          | pom\.xml | build\.gradle(\.kts)? | settings\.gradle(\.kts)?
          | [^/]+\.csproj
        )$",
    )
    .unwrap()
});

pub fn rule() -> ValidationRule {
    ValidationRule {
        id: ID,
        name: "Cache-friendly layer ordering",
        description: "Dependency manifests are copied and installed before the full source tree",
        check,
        detail: None,
        message: "Source tree is copied before dependency manifests, invalidating the dependency cache on every change",
        severity: Severity::Warning,
        fix: "Copy dependency manifests first (e.g. 'COPY package*.json ./'), install dependencies, then 'COPY . .'",
        category: RuleCategory::Optimization,
    }
}

fn check(instructions: &[Instruction]) -> bool {
    let copies: Vec<&Instruction> = instructions.iter().filter(|i| i.is("COPY")).collect();

    let Some(source_copy) = copies.iter().position(|c| is_source_copy(c)) else {
        return true;
    };

    copies
        .iter()
        .position(|c| is_manifest_copy(c))
        .is_some_and(|manifest_copy| manifest_copy < source_copy)
}

/// Source operands of a COPY, flags and destination removed.
fn sources(copy: &Instruction) -> Vec<String> {
    let mut parts: Vec<String> = match copy.args.as_list() {
        Some(list) => list.to_vec(),
        None => copy
            .value()
            .split_whitespace()
            .filter(|t| !t.starts_with("--"))
            .map(str::to_string)
            .collect(),
    };
    parts.pop();
    parts
}

fn has_from_flag(copy: &Instruction) -> bool {
    copy.value().split_whitespace().any(|t| t.starts_with("--from"))
}

/// `COPY . .` / `COPY ./ /app`; globs and stage copies do not count.
fn is_source_copy(copy: &Instruction) -> bool {
    if has_from_flag(copy) {
        return false;
    }
    sources(copy)
        .iter()
        .any(|src| (src == "." || src == "./") && !src.contains('*'))
}

fn is_manifest_copy(copy: &Instruction) -> bool {
    if has_from_flag(copy) {
        return false;
    }
    sources(copy).iter().any(|src| {
        // `package*.json` is the idiomatic manifest glob
        let probe = src.replace('*', "");
        MANIFEST.is_match(&probe) || MANIFEST.is_match(src)
    })
}
