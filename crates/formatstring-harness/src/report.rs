//! Report generation for conformance results.

use std::fmt::Write;

use serde::{Deserialize, Serialize};

use crate::verify::VerificationSummary;

/// A conformance report for one run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConformanceReport {
    pub title: String,
    /// Subject executable path.
    pub subject: String,
    /// Timestamp (UTC).
    pub timestamp: String,
    /// SHA-256 fingerprint of the test table.
    pub fingerprint: String,
    pub summary: VerificationSummary,
}

impl ConformanceReport {
    /// Render the report as markdown.
    #[must_use]
    pub fn to_markdown(&self) -> String {
        let mut out = String::new();
        let summary = &self.summary;
        let _ = writeln!(out, "# {}\n", self.title);
        let _ = writeln!(out, "- Subject: `{}`", self.subject);
        let _ = writeln!(out, "- Timestamp: {}", self.timestamp);
        let _ = writeln!(out, "- Plan fingerprint: `{}`", self.fingerprint);
        let _ = writeln!(out, "- Total: {}", summary.total);
        let _ = writeln!(out, "- Passed: {}", summary.passed);
        let _ = writeln!(out, "- Failed: {}", summary.failed);
        let _ = writeln!(out, "- Skipped: {}", summary.skipped);
        if summary.aborted {
            out.push_str("- Aborted at first failure\n");
        }
        out.push('\n');

        out.push_str("| Type | Total | Passed | Failed | Skipped | Status |\n");
        out.push_str("|------|-------|--------|--------|---------|--------|\n");
        for t in &summary.types {
            let status = if t.failed == 0 { "PASS" } else { "FAIL" };
            let _ = writeln!(
                out,
                "| {} | {} | {} | {} | {} | {} |",
                t.semantic_type.tag(),
                t.total,
                t.passed,
                t.failed,
                t.skipped,
                status
            );
        }

        if summary.failures.is_empty() {
            return out;
        }
        out.push_str("\n## Failures\n");
        for failure in &summary.failures {
            let case = &failure.case;
            let _ = writeln!(
                out,
                "\n### `{}` `{}` with `{}`\n",
                case.semantic_type.tag(),
                case.format,
                case.value
            );
            match &failure.diff {
                Some(diff) => {
                    let _ = write!(out, "```diff\n{diff}```\n");
                }
                None => {
                    let _ = write!(
                        out,
                        "expected `{}`, subject reported:\n\n```\n{}\n```\n",
                        case.expected, case.actual
                    );
                }
            }
        }
        if summary.omitted_failures > 0 {
            let _ = writeln!(
                out,
                "\n{} more failures omitted; see the run transcript.",
                summary.omitted_failures
            );
        }
        out
    }

    /// Render the report as JSON.
    #[must_use]
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|e| format!("{{\"error\": \"{e}\"}}"))
    }
}

#[cfg(test)]
mod tests {
    use formatstring_reference::SemanticType;

    use super::*;
    use crate::compare::{CaseRecord, ComparisonResult};
    use crate::verify::MAX_RETAINED_FAILURES;

    fn record(result: ComparisonResult, actual: &str) -> CaseRecord {
        CaseRecord {
            semantic_type: SemanticType::Float64,
            format: String::from("{:.2f}"),
            value: String::from("inf"),
            result,
            expected: String::from("inf"),
            actual: actual.to_string(),
            exit_code: Some(0),
        }
    }

    fn report(records: &[CaseRecord]) -> ConformanceReport {
        ConformanceReport {
            title: String::from("Format conformance"),
            subject: String::from("./subject"),
            timestamp: String::from("2026-10-16T00:00:00.000Z"),
            fingerprint: String::from("ab12"),
            summary: VerificationSummary::from_records(records),
        }
    }

    #[test]
    fn markdown_has_type_table_and_failures() {
        let doc = report(&[
            record(ComparisonResult::Match, "inf"),
            record(ComparisonResult::Mismatch, "INF"),
        ]);
        let md = doc.to_markdown();
        assert!(md.starts_with("# Format conformance\n"));
        assert!(md.contains("- Plan fingerprint: `ab12`"));
        assert!(md.contains("| double | 2 | 1 | 1 | 0 | FAIL |"));
        assert!(md.contains("## Failures"));
        assert!(md.contains("-inf\n+INF\n"));
    }

    #[test]
    fn passing_report_has_no_failure_section() {
        let md = report(&[record(ComparisonResult::Match, "inf")]).to_markdown();
        assert!(md.contains("| double | 1 | 1 | 0 | 0 | PASS |"));
        assert!(!md.contains("## Failures"));
    }

    #[test]
    fn long_failure_lists_are_truncated() {
        let records: Vec<CaseRecord> = (0..MAX_RETAINED_FAILURES + 3)
            .map(|_| record(ComparisonResult::SubjectError, "boom"))
            .collect();
        let md = report(&records).to_markdown();
        assert!(md.contains("3 more failures omitted"));
        assert_eq!(md.matches("### ").count(), MAX_RETAINED_FAILURES);
        let json: serde_json::Value = serde_json::from_str(&report(&records).to_json()).unwrap();
        assert_eq!(json["summary"]["omitted_failures"], 3);
        assert_eq!(json["summary"]["failed"], MAX_RETAINED_FAILURES + 3);
    }

    #[test]
    fn json_round_trips_summary_counts() {
        let doc = report(&[record(ComparisonResult::ReferenceRejected, "")]);
        let json: serde_json::Value = serde_json::from_str(&doc.to_json()).unwrap();
        assert_eq!(json["summary"]["skipped"], 1);
        assert_eq!(json["summary"]["types"][0]["semantic_type"], "double");
        assert_eq!(json["fingerprint"], "ab12");
    }
}
