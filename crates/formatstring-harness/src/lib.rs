//! Differential conformance harness for replacement-field string formatting.
//!
//! This crate provides:
//! - Test table: value domains per semantic type and a composed grid of
//!   format specifiers, fingerprinted for reproducibility
//! - Canonicalization: reference renderings and subject literals per case
//! - Invocation: one subject process per case with captured output
//! - Comparison: transcript lines, per-type summaries and diffs
//! - Reports: markdown and JSON conformance reports, JSONL structured logs

#![forbid(unsafe_code)]

pub mod canonical;
pub mod compare;
pub mod config;
pub mod diff;
pub mod domains;
pub mod error;
pub mod grammar;
pub mod invoker;
pub mod plan;
pub mod report;
pub mod runner;
pub mod structured_log;
pub mod verify;

pub use compare::{CaseRecord, ComparisonResult};
pub use config::{HarnessConfig, Presentation};
pub use error::HarnessError;
pub use invoker::SubjectInvoker;
pub use plan::TestPlan;
pub use report::ConformanceReport;
pub use runner::TestRunner;
pub use verify::VerificationSummary;
