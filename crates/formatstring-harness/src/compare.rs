//! Case comparison and transcript lines.

use serde::{Deserialize, Serialize};

use formatstring_reference::{FormatError, SemanticType, Value, string_repr};

use crate::invoker::SubjectOutput;

/// Outcome of one case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComparisonResult {
    /// Subject output equals the normalized reference rendering.
    Match,
    /// Subject exited 0 with different output.
    Mismatch,
    /// Subject exited non-zero, was killed, or could not be started.
    SubjectError,
    /// The reference engine rejects the case; not dispatched.
    ReferenceRejected,
    /// Both the reference engine and the subject reject the case.
    BothRejected,
    /// The reference engine rejects the case but the subject rendered it.
    UnexpectedRendering,
}

impl ComparisonResult {
    #[must_use]
    pub const fn passed(self) -> bool {
        matches!(self, Self::Match | Self::BothRejected)
    }

    #[must_use]
    pub const fn skipped(self) -> bool {
        matches!(self, Self::ReferenceRejected)
    }

    #[must_use]
    pub const fn failed(self) -> bool {
        !self.passed() && !self.skipped()
    }
}

/// Full record of one executed case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseRecord {
    pub semantic_type: SemanticType,
    pub format: String,
    /// `repr` of the value, as shown in the transcript.
    pub value: String,
    pub result: ComparisonResult,
    /// Reference rendering, or the rejection message.
    pub expected: String,
    /// Subject stdout, or its diagnostics when it failed.
    pub actual: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exit_code: Option<i32>,
}

impl CaseRecord {
    /// Classify a dispatched case.
    #[must_use]
    pub fn from_subject(
        ty: SemanticType,
        format: &str,
        value: &Value,
        expected: &Result<String, FormatError>,
        output: &SubjectOutput,
    ) -> Self {
        let (result, expected, actual) = match (expected, output.success()) {
            (Ok(want), true) if *want == output.stdout => {
                (ComparisonResult::Match, want.clone(), output.stdout.clone())
            }
            (Ok(want), true) => (ComparisonResult::Mismatch, want.clone(), output.stdout.clone()),
            (Ok(want), false) => (
                ComparisonResult::SubjectError,
                want.clone(),
                output.diagnostics(),
            ),
            (Err(err), false) => (
                ComparisonResult::BothRejected,
                err.to_string(),
                output.diagnostics(),
            ),
            (Err(err), true) => (
                ComparisonResult::UnexpectedRendering,
                err.to_string(),
                output.stdout.clone(),
            ),
        };
        Self {
            semantic_type: ty,
            format: format.to_string(),
            value: value.repr(),
            result,
            expected,
            actual,
            exit_code: output.exit_code(),
        }
    }

    /// A case the reference engine rejected and that was not dispatched.
    #[must_use]
    pub fn rejected(ty: SemanticType, format: &str, value: &Value, err: &FormatError) -> Self {
        Self {
            semantic_type: ty,
            format: format.to_string(),
            value: value.repr(),
            result: ComparisonResult::ReferenceRejected,
            expected: err.to_string(),
            actual: String::new(),
            exit_code: None,
        }
    }

    /// A case whose subject could not be run at all.
    #[must_use]
    pub fn unreachable(
        ty: SemanticType,
        format: &str,
        value: &Value,
        expected: &Result<String, FormatError>,
        reason: String,
    ) -> Self {
        Self {
            semantic_type: ty,
            format: format.to_string(),
            value: value.repr(),
            result: ComparisonResult::SubjectError,
            expected: match expected {
                Ok(want) => want.clone(),
                Err(err) => err.to_string(),
            },
            actual: reason,
            exit_code: None,
        }
    }

    /// The transcript line for this case, without a trailing newline.
    #[must_use]
    pub fn transcript_line(&self) -> String {
        let head = format!(
            "{} {}.format({})",
            self.semantic_type.tag(),
            string_repr(&self.format, false),
            self.value
        );
        match self.result {
            ComparisonResult::Match => {
                format!("[  OK  ] {head}: {} == {}", self.expected, self.actual)
            }
            ComparisonResult::Mismatch => {
                format!("[ FAIL ] {head}: {} != {}", self.expected, self.actual)
            }
            ComparisonResult::SubjectError => format!("[ FAIL ] {head}: {}", self.actual),
            ComparisonResult::ReferenceRejected => {
                format!("[ SKIP ] {head}: reference rejected: {}", self.expected)
            }
            ComparisonResult::BothRejected => {
                format!("[  OK  ] {head}: rejected: {}", self.expected)
            }
            ComparisonResult::UnexpectedRendering => format!(
                "[ FAIL ] {head}: rejected: {} != {}",
                self.expected, self.actual
            ),
        }
    }
}
