//! The test table: one group per semantic type, with its value domain and
//! format strings, in a fixed order.

use serde::Serialize;
use sha2::{Digest, Sha256};

use formatstring_reference::{SemanticType, Value};

use crate::config::HarnessConfig;
use crate::{domains, grammar};

/// One row of the test table.
#[derive(Debug, Clone)]
pub struct TestGroup {
    pub ty: SemanticType,
    pub values: Vec<Value>,
    pub formats: Vec<String>,
}

impl TestGroup {
    #[must_use]
    pub fn new(ty: SemanticType, config: &HarnessConfig) -> Self {
        Self {
            ty,
            values: domains::values(ty),
            formats: grammar::formats_for(ty, config),
        }
    }

    #[must_use]
    pub fn case_count(&self) -> usize {
        self.values.len() * self.formats.len()
    }
}

/// The full, ordered test table.
#[derive(Debug, Clone)]
pub struct TestPlan {
    pub groups: Vec<TestGroup>,
}

/// Size of one group, for `--plan` output and reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupSize {
    pub semantic_type: SemanticType,
    pub values: usize,
    pub formats: usize,
    pub cases: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlanSummary {
    pub fingerprint: String,
    pub total_cases: usize,
    pub groups: Vec<GroupSize>,
}

impl TestPlan {
    /// Build the table enabled by `config`.
    #[must_use]
    pub fn build(config: &HarnessConfig) -> Self {
        let groups = SemanticType::ALL
            .into_iter()
            .filter(|ty| enabled(*ty, config))
            .map(|ty| TestGroup::new(ty, config))
            .collect();
        Self { groups }
    }

    /// Keep only the groups whose tag is listed, in table order.
    pub fn retain_tags(&mut self, tags: &[String]) {
        self.groups
            .retain(|group| tags.iter().any(|tag| tag == group.ty.tag()));
    }

    #[must_use]
    pub fn total_cases(&self) -> usize {
        self.groups.iter().map(TestGroup::case_count).sum()
    }

    /// SHA-256 over every tag, value and format in order.
    #[must_use]
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        for group in &self.groups {
            hasher.update(group.ty.tag().as_bytes());
            hasher.update([0u8]);
            for value in &group.values {
                hasher.update(value_key(value).as_bytes());
                hasher.update([0u8]);
            }
            for format in &group.formats {
                hasher.update(format.as_bytes());
                hasher.update([0u8]);
            }
            hasher.update([0xffu8]);
        }
        hex_lower(&hasher.finalize())
    }

    #[must_use]
    pub fn summary(&self) -> PlanSummary {
        PlanSummary {
            fingerprint: self.fingerprint(),
            total_cases: self.total_cases(),
            groups: self
                .groups
                .iter()
                .map(|group| GroupSize {
                    semantic_type: group.ty,
                    values: group.values.len(),
                    formats: group.formats.len(),
                    cases: group.case_count(),
                })
                .collect(),
        }
    }
}

fn enabled(ty: SemanticType, config: &HarnessConfig) -> bool {
    match ty {
        SemanticType::Bool => config.include_bool,
        SemanticType::Char | SemanticType::UnsignedChar => config.include_char,
        SemanticType::Int8 | SemanticType::UInt8 => config.include_8bit,
        _ => true,
    }
}

/// Distinguishes values `repr` conflates (the sign of NaN).
fn value_key(value: &Value) -> String {
    match value {
        Value::Float(f) if f.is_nan() && f.is_sign_negative() => String::from("-nan"),
        other => other.repr(),
    }
}

fn hex_lower(bytes: &[u8]) -> String {
    use std::fmt::Write;
    let mut out = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        let _ = write!(&mut out, "{b:02x}");
    }
    out
}
