//! CLI entrypoint for the format conformance harness.

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use formatstring_harness::structured_log::{LogEmitter, now_utc};
use formatstring_harness::{
    ConformanceReport, HarnessConfig, HarnessError, SubjectInvoker, TestPlan, TestRunner,
};
use formatstring_reference::SemanticType;

/// Differential conformance testing of a string-formatting executable.
#[derive(Debug, Parser)]
#[command(name = "formatstring-harness")]
#[command(about = "Compare a formatting subject against the reference engine")]
struct Cli {
    /// Subject executable, invoked as `<subject> <format> <type> <literal>`.
    #[arg(required_unless_present = "plan")]
    subject: Option<PathBuf>,
    /// JSON harness configuration file.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Stop at the first failing case.
    #[arg(long)]
    abort_on_failure: bool,
    /// Kill a subject process after this many milliseconds.
    #[arg(long)]
    timeout_ms: Option<u64>,
    /// Only run the given type group (repeatable), e.g. `--only std::string`.
    #[arg(long = "only", value_name = "TAG")]
    only: Vec<String>,
    /// Output report path (markdown); a `.json` sibling is written too.
    #[arg(long)]
    report: Option<PathBuf>,
    /// JSONL structured log path.
    #[arg(long)]
    log: Option<PathBuf>,
    /// Print the test table sizes and fingerprint, then exit.
    #[arg(long)]
    plan: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::from(2)
        }
    }
}

/// Returns whether every dispatched case passed.
fn run(cli: Cli) -> Result<bool, Box<dyn std::error::Error>> {
    let mut config = match &cli.config {
        Some(path) => HarnessConfig::from_file(path)?,
        None => HarnessConfig::default(),
    };
    if cli.abort_on_failure {
        config.abort_on_first_failure = true;
    }
    if cli.timeout_ms.is_some() {
        config.timeout_ms = cli.timeout_ms;
    }

    let mut plan = TestPlan::build(&config);
    if !cli.only.is_empty() {
        for tag in &cli.only {
            let planned = SemanticType::from_tag(tag)
                .is_some_and(|ty| plan.groups.iter().any(|group| group.ty == ty));
            if !planned {
                return Err(HarnessError::TypeNotPlanned(tag.clone()).into());
            }
        }
        plan.retain_tags(&cli.only);
    }

    if cli.plan {
        let json = serde_json::to_string_pretty(&plan.summary())?;
        println!("{json}");
        return Ok(true);
    }

    let Some(subject) = cli.subject else {
        return Err("a subject executable is required".into());
    };
    let fingerprint = plan.fingerprint();
    eprintln!(
        "Running {} cases in {} groups against {} (plan {})",
        plan.total_cases(),
        plan.groups.len(),
        subject.display(),
        &fingerprint[..12]
    );

    let mut runner = TestRunner::new(SubjectInvoker::new(&subject), config);
    if let Some(log_path) = &cli.log {
        let run_id = format!("fmt-{}", &fingerprint[..12]);
        runner = runner.with_log(LogEmitter::to_file(log_path, &run_id)?);
    }

    let stdout = std::io::stdout();
    let mut out = std::io::BufWriter::new(stdout.lock());
    let summary = runner.run(&plan, &mut out)?;
    out.flush()?;

    eprintln!(
        "Conformance run complete: total={}, passed={}, failed={}, skipped={}{}",
        summary.total,
        summary.passed,
        summary.failed,
        summary.skipped,
        if summary.aborted { " (aborted)" } else { "" }
    );

    let all_passed = summary.all_passed();
    if let Some(report_path) = cli.report {
        let report_doc = ConformanceReport {
            title: String::from("Format Conformance Report"),
            subject: subject.display().to_string(),
            timestamp: now_utc(),
            fingerprint,
            summary,
        };
        eprintln!("Writing report to {}", report_path.display());
        std::fs::write(&report_path, report_doc.to_markdown())?;
        std::fs::write(report_path.with_extension("json"), report_doc.to_json())?;
    }

    Ok(all_passed)
}
