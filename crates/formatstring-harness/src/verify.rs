//! Aggregation of case results.

use serde::{Deserialize, Serialize};

use formatstring_reference::SemanticType;

use crate::compare::{CaseRecord, ComparisonResult};
use crate::diff::render_diff;

/// Failures kept with full detail; later ones are only counted.
pub const MAX_RETAINED_FAILURES: usize = 50;

/// Counts for one semantic type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeSummary {
    pub semantic_type: SemanticType,
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
}

impl TypeSummary {
    #[must_use]
    pub fn new(semantic_type: SemanticType) -> Self {
        Self {
            semantic_type,
            total: 0,
            passed: 0,
            failed: 0,
            skipped: 0,
        }
    }

    fn record(&mut self, result: ComparisonResult) {
        self.total += 1;
        if result.passed() {
            self.passed += 1;
        } else if result.skipped() {
            self.skipped += 1;
        } else {
            self.failed += 1;
        }
    }
}

/// A failing case with its diff.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FailureDetail {
    pub case: CaseRecord,
    /// Diff for mismatches; absent for subject errors.
    pub diff: Option<String>,
}

/// Aggregate summary of a run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationSummary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
    /// Whether the run stopped at the first failure.
    pub aborted: bool,
    /// Per-type counts in table order.
    pub types: Vec<TypeSummary>,
    /// The first [`MAX_RETAINED_FAILURES`] failures.
    pub failures: Vec<FailureDetail>,
    /// Failures past the retention cap.
    #[serde(default)]
    pub omitted_failures: usize,
}

impl Default for VerificationSummary {
    fn default() -> Self {
        Self::new()
    }
}

impl VerificationSummary {
    #[must_use]
    pub fn new() -> Self {
        Self {
            total: 0,
            passed: 0,
            failed: 0,
            skipped: 0,
            aborted: false,
            types: Vec::new(),
            failures: Vec::new(),
            omitted_failures: 0,
        }
    }

    /// Build a summary from a list of records.
    #[must_use]
    pub fn from_records<'a>(records: impl IntoIterator<Item = &'a CaseRecord>) -> Self {
        let mut summary = Self::new();
        for record in records {
            summary.record(record);
        }
        summary
    }

    /// Fold one case into the counts.
    pub fn record(&mut self, case: &CaseRecord) {
        self.total += 1;
        let result = case.result;
        if result.passed() {
            self.passed += 1;
        } else if result.skipped() {
            self.skipped += 1;
        } else {
            self.failed += 1;
            if self.failures.len() < MAX_RETAINED_FAILURES {
                let diff = (result == ComparisonResult::Mismatch)
                    .then(|| render_diff(&case.expected, &case.actual));
                self.failures.push(FailureDetail {
                    case: case.clone(),
                    diff,
                });
            } else {
                self.omitted_failures += 1;
            }
        }
        self.type_entry(case.semantic_type).record(result);
    }

    /// Ensure a row exists for `ty`, even if it runs no cases.
    pub fn type_entry(&mut self, ty: SemanticType) -> &mut TypeSummary {
        let index = match self.types.iter().position(|t| t.semantic_type == ty) {
            Some(index) => index,
            None => {
                self.types.push(TypeSummary::new(ty));
                self.types.len() - 1
            }
        };
        &mut self.types[index]
    }

    /// Returns true if no case failed.
    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.failed == 0
    }
}
