//! Rule catalog for the validation engine.
//!
//! Each rule lives in its own module and exposes `rule()`, returning a
//! static `ValidationRule`. Predicates are plain function pointers over the
//! full instruction list: pure, stateless and total.
//!
//! The catalog is built once per process and never mutated.

use once_cell::sync::Lazy;

use crate::validator::parser::Instruction;
use crate::validator::types::{RuleCategory, Severity, ValidationResult};

pub mod expose_ports;
pub mod healthcheck_defined;
pub mod layer_caching;
pub mod multi_stage_build;
pub mod no_install_recommends;
pub mod no_root_user;
pub mod no_secrets;
pub mod no_sudo_install;
pub mod pinned_base_image;
pub mod workdir_set;

/// Rules whose Error-severity failure caps the grade at C.
pub const SECURITY_CRITICAL_RULES: &[&str] = &[
    no_root_user::ID,
    no_sudo_install::ID,
    no_secrets::ID,
];

/// Predicate over the whole instruction list; `true` means the rule passed.
pub type CheckFn = fn(&[Instruction]) -> bool;

/// Extracts extra context for a failed verdict.
pub type DetailFn = fn(&[Instruction]) -> Option<String>;

/// A catalog entry.
#[derive(Debug, Clone, Copy)]
pub struct ValidationRule {
    /// Stable identifier.
    pub id: &'static str,
    /// Short name, shown on passing results.
    pub name: &'static str,
    pub description: &'static str,
    pub check: CheckFn,
    /// Optional detail extractor run only when the check fails.
    pub detail: Option<DetailFn>,
    /// Failure message.
    pub message: &'static str,
    pub severity: Severity,
    /// Remediation text.
    pub fix: &'static str,
    pub category: RuleCategory,
}

impl ValidationRule {
    /// Evaluate the rule and build its verdict.
    pub fn evaluate(&self, instructions: &[Instruction]) -> ValidationResult {
        if (self.check)(instructions) {
            return ValidationResult::pass(self.id, self.severity, self.name)
                .with_category(self.category);
        }

        let detail = self.detail.and_then(|extract| extract(instructions));
        let message = match &detail {
            Some(detail) => format!("{}: {}", self.message, detail),
            None => self.message.to_string(),
        };

        let result = ValidationResult::fail(self.id, self.severity, message, self.fix)
            .with_category(self.category);
        match detail {
            Some(detail) => result.with_details(detail),
            None => result,
        }
    }

    /// Check whether this rule belongs to the grade-capping subset.
    pub fn is_security_critical(&self) -> bool {
        SECURITY_CRITICAL_RULES.contains(&self.id)
    }
}

static CATALOG: Lazy<Vec<ValidationRule>> = Lazy::new(|| {
    vec![
        no_root_user::rule(),
        no_sudo_install::rule(),
        pinned_base_image::rule(),
        healthcheck_defined::rule(),
        layer_caching::rule(),
        no_secrets::rule(),
        multi_stage_build::rule(),
        expose_ports::rule(),
        workdir_set::rule(),
        no_install_recommends::rule(),
    ]
});

/// All rules, in evaluation order.
pub fn all_rules() -> &'static [ValidationRule] {
    &CATALOG
}

/// Look up a rule by id.
pub fn find_rule(id: &str) -> Option<&'static ValidationRule> {
    CATALOG.iter().find(|rule| rule.id == id)
}

/// Iterate over instructions with the given keyword.
pub(crate) fn named<'a>(
    instructions: &'a [Instruction],
    name: &'a str,
) -> impl Iterator<Item = &'a Instruction> + 'a {
    instructions.iter().filter(move |i| i.is(name))
}
