//! Score, grade and report assembly.
//!
//! The score is a straight deduction from 100 per failed result; the grade
//! is the score's band, capped at C when a security-critical rule failed
//! at Error severity.

use chrono::{DateTime, Utc};

use super::rules::SECURITY_CRITICAL_RULES;
use super::types::{EvaluationPath, Grade, Severity, ValidationReport, ValidationResult};

/// Rule id used for the single verdict of a terminal parse failure.
pub const PARSE_ERROR_RULE: &str = "parse-error";

/// Compute the numeric score over failed results.
pub fn compute_score(results: &[ValidationResult]) -> u8 {
    let penalty: u32 = results
        .iter()
        .filter(|r| !r.passed)
        .map(|r| r.severity.penalty())
        .sum();

    100u32.saturating_sub(penalty) as u8
}

/// Check whether any security-critical rule failed at Error severity.
pub fn security_cap_applies(results: &[ValidationResult]) -> bool {
    results.iter().any(|r| {
        !r.passed
            && r.severity == Severity::Error
            && SECURITY_CRITICAL_RULES.contains(&r.rule_id.as_str())
    })
}

/// Grade for a score, with the security cap applied.
pub fn compute_grade(score: u8, results: &[ValidationResult]) -> Grade {
    let grade = Grade::from_score(score);
    if security_cap_applies(results) && grade < Grade::C {
        Grade::C
    } else {
        grade
    }
}

/// Assemble a report from a list of verdicts.
pub fn build_report(
    results: Vec<ValidationResult>,
    evaluation: EvaluationPath,
    timestamp: DateTime<Utc>,
) -> ValidationReport {
    let score = compute_score(&results);
    let grade = compute_grade(score, &results);

    let mut report = ValidationReport {
        results,
        score,
        grade,
        passed_count: 0,
        failed_count: 0,
        error_count: 0,
        warning_count: 0,
        info_count: 0,
        timestamp,
        evaluation,
    };
    recount(&mut report);
    report
}

/// Recompute the pass/fail and severity tallies from `report.results`.
pub(crate) fn recount(report: &mut ValidationReport) {
    report.passed_count = 0;
    report.failed_count = 0;
    report.error_count = 0;
    report.warning_count = 0;
    report.info_count = 0;

    for result in &report.results {
        if result.passed {
            report.passed_count += 1;
            continue;
        }
        report.failed_count += 1;
        match result.severity {
            Severity::Error => report.error_count += 1,
            Severity::Warning => report.warning_count += 1,
            Severity::Info => report.info_count += 1,
        }
    }
}

/// Terminal report for input that could not be understood at all.
pub fn parse_error_report(message: impl AsRef<str>, timestamp: DateTime<Utc>) -> ValidationReport {
    let result = ValidationResult::fail(
        PARSE_ERROR_RULE,
        Severity::Error,
        format!("Dockerfile syntax error: {}", message.as_ref()),
        "Fix the syntax error before validating further",
    );

    let mut report = build_report(vec![result], EvaluationPath::ParseError, timestamp);
    report.score = 0;
    report.grade = Grade::F;
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn epoch() -> DateTime<Utc> {
        Utc.timestamp_opt(0, 0).unwrap()
    }

    fn failed(rule_id: &str, severity: Severity) -> ValidationResult {
        ValidationResult::fail(rule_id, severity, "failed", "fix it")
    }

    #[test]
    fn test_all_passed_scores_100() {
        let results = vec![ValidationResult::pass("workdir-set", Severity::Warning, "ok")];
        let report = build_report(results, EvaluationPath::Structured, epoch());
        assert_eq!(report.score, 100);
        assert_eq!(report.grade, Grade::A);
        assert_eq!(report.passed_count, 1);
        assert_eq!(report.failed_count, 0);
    }

    #[test]
    fn test_weights() {
        let results = vec![
            failed("pinned-base-image", Severity::Warning),
            failed("healthcheck-defined", Severity::Warning),
            failed("expose-ports", Severity::Info),
        ];
        assert_eq!(compute_score(&results), 91);
    }

    #[test]
    fn test_floor_at_zero() {
        let results: Vec<_> = (0..8).map(|_| failed("no-secrets", Severity::Error)).collect();
        assert_eq!(compute_score(&results), 0);
        assert_eq!(compute_grade(0, &results), Grade::F);
    }

    #[test]
    fn test_cap_forces_c() {
        let results = vec![failed("no-root-user", Severity::Error)];
        let report = build_report(results, EvaluationPath::Structured, epoch());
        assert_eq!(report.score, 85);
        assert_eq!(report.grade, Grade::C);
        assert_eq!(report.error_count, 1);
    }

    #[test]
    fn test_cap_ignores_other_errors() {
        let results = vec![failed("hadolint-DL3000", Severity::Error)];
        assert_eq!(compute_grade(85, &results), Grade::B);
    }

    #[test]
    fn test_cap_never_raises_grade() {
        let results = vec![failed("no-sudo-install", Severity::Error)];
        assert_eq!(compute_grade(40, &results), Grade::F);
    }

    #[test]
    fn test_parse_error_report() {
        let report = parse_error_report("Unknown instruction: FORM", epoch());
        assert_eq!(report.score, 0);
        assert_eq!(report.grade, Grade::F);
        assert_eq!(report.results.len(), 1);
        assert_eq!(report.results[0].rule_id, PARSE_ERROR_RULE);
        assert_eq!(report.error_count, 1);
        assert_eq!(report.evaluation, EvaluationPath::ParseError);
    }
}
