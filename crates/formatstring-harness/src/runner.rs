//! Test execution engine.

use std::io::Write;
use std::time::Duration;

use formatstring_reference::{SemanticType, Value};

use crate::canonical::canonicalize;
use crate::compare::CaseRecord;
use crate::config::HarnessConfig;
use crate::error::HarnessError;
use crate::invoker::{SubjectInvoker, SubjectStatus};
use crate::plan::TestPlan;
use crate::structured_log::{LogEmitter, LogEntry, LogLevel, Outcome};
use crate::verify::VerificationSummary;

/// One executed case with its timing.
#[derive(Debug, Clone)]
pub struct CaseRun {
    pub record: CaseRecord,
    /// Wall time of the subject process, when one ran.
    pub duration: Option<Duration>,
    pub timed_out: bool,
}

/// Runs a test plan against a subject and writes the transcript.
pub struct TestRunner {
    invoker: SubjectInvoker,
    config: HarnessConfig,
    log: Option<LogEmitter>,
}

impl TestRunner {
    /// Create a runner; the invoker's timeout is taken from `config`.
    #[must_use]
    pub fn new(invoker: SubjectInvoker, config: HarnessConfig) -> Self {
        let timeout = config.timeout_ms.map(Duration::from_millis);
        Self {
            invoker: invoker.with_timeout(timeout),
            config,
            log: None,
        }
    }

    /// Attach a structured log.
    #[must_use]
    pub fn with_log(mut self, log: LogEmitter) -> Self {
        self.log = Some(log);
        self
    }

    /// Run every group of `plan`, formats outermost, writing one transcript
    /// line per case and a blank line after each group.
    pub fn run<W: Write>(
        &mut self,
        plan: &TestPlan,
        out: &mut W,
    ) -> Result<VerificationSummary, HarnessError> {
        let mut summary = VerificationSummary::new();
        self.log_event(
            LogEntry::new("", LogLevel::Info, "run_start").with_details(serde_json::json!({
                "subject": self.invoker.program().display().to_string(),
                "fingerprint": plan.fingerprint(),
                "total_cases": plan.total_cases(),
            })),
        )?;

        'groups: for group in &plan.groups {
            summary.type_entry(group.ty);
            for format in &group.formats {
                for value in &group.values {
                    let run = self.run_case(group.ty, value, format)?;
                    writeln!(out, "{}", run.record.transcript_line())?;
                    self.log_case(&run)?;
                    let failed = run.record.result.failed();
                    summary.record(&run.record);
                    if failed && self.config.abort_on_first_failure {
                        summary.aborted = true;
                        break 'groups;
                    }
                }
            }
            writeln!(out)?;
        }
        out.flush()?;

        self.log_event(
            LogEntry::new("", LogLevel::Info, "run_end")
                .with_outcome(if summary.all_passed() {
                    Outcome::Pass
                } else {
                    Outcome::Fail
                })
                .with_details(serde_json::json!({
                    "total": summary.total,
                    "passed": summary.passed,
                    "failed": summary.failed,
                    "skipped": summary.skipped,
                    "aborted": summary.aborted,
                })),
        )?;
        if let Some(log) = self.log.as_mut() {
            log.flush()?;
        }
        Ok(summary)
    }

    /// Canonicalize and, unless the reference rejects it, dispatch one case.
    pub fn run_case(
        &self,
        ty: SemanticType,
        value: &Value,
        format: &str,
    ) -> Result<CaseRun, HarnessError> {
        let case = canonicalize(ty, value, format)?;
        if let Err(err) = &case.expected
            && !self.config.dispatch_rejected
        {
            return Ok(CaseRun {
                record: CaseRecord::rejected(ty, format, value, err),
                duration: None,
                timed_out: false,
            });
        }

        match self.invoker.invoke(format, ty.tag(), &case.literal) {
            Ok(output) => Ok(CaseRun {
                record: CaseRecord::from_subject(ty, format, value, &case.expected, &output),
                duration: Some(output.duration),
                timed_out: output.status == SubjectStatus::TimedOut,
            }),
            Err(err) => Ok(CaseRun {
                record: CaseRecord::unreachable(ty, format, value, &case.expected, err.to_string()),
                duration: None,
                timed_out: false,
            }),
        }
    }

    fn log_case(&mut self, run: &CaseRun) -> Result<(), HarnessError> {
        if self.log.is_none() {
            return Ok(());
        }
        let record = &run.record;
        let outcome = Outcome::of(record, run.timed_out);
        let level = match outcome {
            Outcome::Pass => LogLevel::Debug,
            Outcome::Skip => LogLevel::Info,
            Outcome::Fail | Outcome::Error | Outcome::Timeout => LogLevel::Error,
        };
        let mut entry = LogEntry::new("", level, "case_result")
            .with_case(record.semantic_type, &record.format, &record.value)
            .with_outcome(outcome);
        if let Some(code) = record.exit_code {
            entry = entry.with_exit_code(code);
        }
        if let Some(duration) = run.duration {
            entry = entry.with_duration_ms(u64::try_from(duration.as_millis()).unwrap_or(u64::MAX));
        }
        if record.result.failed() || record.result.skipped() {
            entry = entry.with_details(serde_json::json!({
                "result": record.result,
                "expected": record.expected,
                "actual": record.actual,
            }));
        }
        self.log_event(entry)
    }

    fn log_event(&mut self, entry: LogEntry) -> Result<(), HarnessError> {
        if let Some(log) = self.log.as_mut() {
            log.emit_entry(entry)?;
        }
        Ok(())
    }
}

#[cfg(all(test, unix))]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::compare::ComparisonResult;
    use crate::plan::TestGroup;
    use crate::structured_log::validate_log_line;

    #[derive(Clone, Default)]
    struct SharedBuf(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    fn group(ty: SemanticType, values: Vec<Value>, formats: &[&str]) -> TestGroup {
        TestGroup {
            ty,
            values,
            formats: formats.iter().map(|f| (*f).to_string()).collect(),
        }
    }

    fn run_with(program: &str, config: HarnessConfig, plan: &TestPlan) -> (VerificationSummary, String) {
        let mut runner = TestRunner::new(SubjectInvoker::new(program), config);
        let mut out = Vec::new();
        let summary = runner.run(plan, &mut out).unwrap();
        (summary, String::from_utf8(out).unwrap())
    }

    #[test]
    fn failing_subject_fails_every_case_and_continues() {
        let plan = TestPlan {
            groups: vec![
                group(SemanticType::Int32, vec![Value::Int(1), Value::Int(2)], &["{}"]),
                group(SemanticType::String, vec![Value::Str("a".into())], &["{}"]),
            ],
        };
        let (summary, transcript) = run_with("/bin/false", HarnessConfig::default(), &plan);
        assert_eq!(summary.total, 3);
        assert_eq!(summary.failed, 3);
        assert!(!summary.aborted);
        let lines: Vec<&str> = transcript.split('\n').collect();
        assert!(lines[0].starts_with("[ FAIL ] std::int32_t '{}'.format(1): "));
        assert_eq!(lines[2], "");
        assert!(lines[3].starts_with("[ FAIL ] std::string '{}'.format('a'): "));
        assert!(transcript.ends_with("\n\n"));
    }

    #[test]
    fn abort_stops_at_first_failure() {
        let plan = TestPlan {
            groups: vec![group(
                SemanticType::Int32,
                vec![Value::Int(1), Value::Int(2)],
                &["{}", "{0}"],
            )],
        };
        let config = HarnessConfig {
            abort_on_first_failure: true,
            ..HarnessConfig::default()
        };
        let (summary, transcript) = run_with("/bin/false", config, &plan);
        assert!(summary.aborted);
        assert_eq!(summary.total, 1);
        assert_eq!(transcript.lines().count(), 1);
    }

    #[test]
    fn formats_are_the_outer_loop() {
        let plan = TestPlan {
            groups: vec![group(
                SemanticType::Int16,
                vec![Value::Int(1), Value::Int(2)],
                &["{}", "{!r}"],
            )],
        };
        let (_, transcript) = run_with("/bin/false", HarnessConfig::default(), &plan);
        let heads: Vec<&str> = transcript
            .lines()
            .filter(|l| !l.is_empty())
            .map(|l| l.split(": ").next().unwrap())
            .collect();
        assert_eq!(
            heads,
            [
                "[ FAIL ] std::int16_t '{}'.format(1)",
                "[ FAIL ] std::int16_t '{}'.format(2)",
                "[ FAIL ] std::int16_t '{!r}'.format(1)",
                "[ FAIL ] std::int16_t '{!r}'.format(2)",
            ]
        );
    }

    #[test]
    fn rejected_cases_are_skipped_without_dispatch() {
        let plan = TestPlan {
            groups: vec![group(SemanticType::String, vec![Value::Str("a".into())], &["{:+}"])],
        };
        let (summary, transcript) = run_with("/nonexistent/subject", HarnessConfig::default(), &plan);
        assert_eq!(summary.skipped, 1);
        assert!(summary.all_passed());
        assert!(transcript.starts_with("[ SKIP ] std::string '{:+}'.format('a'): reference rejected: "));
    }

    #[test]
    fn dispatched_rejection_passes_on_nonzero_exit() {
        let runner = TestRunner::new(
            SubjectInvoker::new("/bin/false"),
            HarnessConfig {
                dispatch_rejected: true,
                ..HarnessConfig::default()
            },
        );
        let run = runner
            .run_case(SemanticType::String, &Value::Str("a".into()), "{:+}")
            .unwrap();
        assert_eq!(run.record.result, ComparisonResult::BothRejected);
    }

    #[test]
    fn spawn_failure_is_a_subject_error() {
        let runner = TestRunner::new(SubjectInvoker::new("/nonexistent/subject"), HarnessConfig::default());
        let run = runner
            .run_case(SemanticType::Int32, &Value::Int(7), "{}")
            .unwrap();
        assert_eq!(run.record.result, ComparisonResult::SubjectError);
        assert!(run.record.actual.contains("failed to spawn subject"));
    }

    #[test]
    fn structured_log_lines_validate() {
        let buf = SharedBuf::default();
        let plan = TestPlan {
            groups: vec![group(SemanticType::Int64, vec![Value::Int(5)], &["{}"])],
        };
        let mut runner = TestRunner::new(SubjectInvoker::new("/bin/false"), HarnessConfig::default())
            .with_log(LogEmitter::to_writer(Box::new(buf.clone()), "unit"));
        runner.run(&plan, &mut std::io::sink()).unwrap();

        let text = String::from_utf8(buf.0.lock().unwrap().clone()).unwrap();
        let entries: Vec<LogEntry> = text
            .lines()
            .enumerate()
            .map(|(i, line)| validate_log_line(line, i + 1).unwrap())
            .collect();
        let events: Vec<&str> = entries.iter().map(|e| e.event.as_str()).collect();
        assert_eq!(events, ["run_start", "case_result", "run_end"]);
        assert_eq!(entries[1].outcome, Some(Outcome::Error));
        assert_eq!(entries[1].exit_code, Some(1));
        assert_eq!(entries[2].outcome, Some(Outcome::Fail));
    }
}
