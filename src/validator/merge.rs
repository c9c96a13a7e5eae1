//! Joins the internal report with an external linter's report.

use super::types::{ResultSource, ValidationReport};

/// Append external findings to the internal report.
///
/// External results are tagged `External` and their tallies are added as
/// reported. Score, grade, timestamp and evaluation path stay the internal
/// ones, so the security cap survives merging.
pub fn merge_reports(internal: ValidationReport, external: ValidationReport) -> ValidationReport {
    let mut merged = internal;

    merged.passed_count += external.passed_count;
    merged.failed_count += external.failed_count;
    merged.error_count += external.error_count;
    merged.warning_count += external.warning_count;
    merged.info_count += external.info_count;

    merged.results.extend(
        external
            .results
            .into_iter()
            .map(|r| r.with_source(ResultSource::External)),
    );

    merged
}
